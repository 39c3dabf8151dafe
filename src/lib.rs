//! Built to Scale - a reverse shrink ray action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, levels, camera)
//! - `render`: Render sink capability consumed by the frame drawer
//! - `settings`: Player preferences persisted to LocalStorage
//! - `tuning`: Data-driven game balance

pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{KeyBindings, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate; velocities are expressed in units per tick
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Display surface dimensions
    pub const VIEWPORT_WIDTH: f32 = 650.0;
    pub const VIEWPORT_HEIGHT: f32 = 576.0;

    /// Player body size
    pub const PLAYER_SIZE: f32 = 35.0;
    /// Goal body size
    pub const GOAL_SIZE: f32 = 80.0;
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded, at least 1)
#[inline]
pub fn millis_to_ticks(ms: u32) -> u32 {
    ((ms * consts::TICKS_PER_SECOND + 500) / 1000).max(1)
}

/// Center point of an axis-aligned box
#[inline]
pub fn center_of(pos: Vec2, size: Vec2) -> Vec2 {
    pos + size * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_ticks() {
        assert_eq!(millis_to_ticks(500), 30);
        assert_eq!(millis_to_ticks(100), 6);
        assert_eq!(millis_to_ticks(0), 1);
    }

    #[test]
    fn test_center_of() {
        let c = center_of(Vec2::new(10.0, 20.0), Vec2::new(4.0, 8.0));
        assert_eq!(c, Vec2::new(12.0, 24.0));
    }
}

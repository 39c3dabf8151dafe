//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so levels and
//! settings can override them without touching the step logic.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A tuning value the simulation cannot run with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be at least one tick")]
    ZeroTicks { field: &'static str },
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::Negative { field, value })
    }
}

fn ticks(field: &'static str, value: u32) -> Result<(), TuningError> {
    if value == 0 {
        Err(TuningError::ZeroTicks { field })
    } else {
        Ok(())
    }
}

/// Viewport band the player is kept inside by scrolling the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for ScrollBounds {
    fn default() -> Self {
        // Half a player width inside the 225..425 x 188..388 comfort box
        Self {
            min_x: 225.0 + 17.0,
            max_x: 425.0 - 17.0,
            min_y: 188.0 + 17.0,
            max_y: 388.0 - 17.0,
        }
    }
}

/// Gameplay tuning. Speeds are in units per tick, durations in ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player speed while a movement key is held
    pub player_speed: f32,

    /// Chase speed of an aggroed enemy before its slow factor is subtracted
    pub enemy_base_speed: f32,
    /// Slow factor every enemy starts (and resets) with
    pub enemy_initial_slow: f32,
    /// Slow added per projectile hit
    pub slow_step: f32,
    /// A hit only adds `slow_step` if the result stays at or below this
    pub slow_cap: f32,
    /// Enemy-to-player distance (x, y) that triggers aggro
    pub aggro_range: Vec2,
    /// Delay between an enemy touching a trap and it being marked dead
    pub enemy_death_delay_ticks: u32,

    /// Size added to any body a projectile hits
    pub enlarge_step: f32,

    /// Square projectile edge length
    pub projectile_size: f32,
    /// Projectile velocity = last move direction * this
    pub projectile_speed_multiplier: f32,
    /// Projectile lifetime
    pub projectile_lifetime_ticks: u32,

    /// Ticks each queued animation frame stays on screen
    pub animation_interval_ticks: u32,

    /// World shift per tick while the player is outside `scroll_bounds`
    pub scroll_step: f32,
    pub scroll_bounds: ScrollBounds,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 4.0,
            enemy_base_speed: 2.8,
            enemy_initial_slow: 0.2,
            slow_step: 0.8,
            slow_cap: 2.2,
            aggro_range: Vec2::new(350.0, 350.0),
            enemy_death_delay_ticks: crate::millis_to_ticks(100),
            enlarge_step: 10.0,
            projectile_size: 20.0,
            projectile_speed_multiplier: 2.0,
            projectile_lifetime_ticks: crate::millis_to_ticks(500),
            animation_interval_ticks: crate::millis_to_ticks(100),
            scroll_step: 3.0,
            scroll_bounds: ScrollBounds::default(),
        }
    }
}

impl Tuning {
    /// Chase speed of an enemy carrying `slow`, never negative
    #[inline]
    pub fn enemy_speed(&self, slow: f32) -> f32 {
        (self.enemy_base_speed - slow).max(0.0)
    }

    /// Reject values that would shrink bodies, stall timers or speed enemies up on hit
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("enlarge_step", self.enlarge_step)?;
        positive("projectile_size", self.projectile_size)?;
        non_negative("player_speed", self.player_speed)?;
        non_negative("enemy_base_speed", self.enemy_base_speed)?;
        non_negative("slow_step", self.slow_step)?;
        non_negative("scroll_step", self.scroll_step)?;
        ticks("enemy_death_delay_ticks", self.enemy_death_delay_ticks)?;
        ticks("projectile_lifetime_ticks", self.projectile_lifetime_ticks)?;
        ticks("animation_interval_ticks", self.animation_interval_ticks)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_enemies_moving_at_cap() {
        let t = Tuning::default();
        assert!(t.enemy_speed(t.slow_cap) > 0.0);
        assert_eq!(t.projectile_lifetime_ticks, 30);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t: Tuning = serde_json::from_str(r#"{"player_speed": 6.0}"#).unwrap();
        assert_eq!(t.player_speed, 6.0);
        assert_eq!(t.slow_cap, 2.2);
        assert_eq!(t.scroll_bounds, ScrollBounds::default());
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_shrinking_and_stalled_values() {
        let t = Tuning {
            enlarge_step: -50.0,
            ..Default::default()
        };
        assert_eq!(
            t.validate(),
            Err(TuningError::NotPositive {
                field: "enlarge_step",
                value: -50.0
            })
        );

        let t = Tuning {
            slow_step: -0.8,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(TuningError::Negative { field: "slow_step", .. })
        ));

        let t = Tuning {
            projectile_lifetime_ticks: 0,
            ..Default::default()
        };
        assert_eq!(
            t.validate(),
            Err(TuningError::ZeroTicks {
                field: "projectile_lifetime_ticks"
            })
        );

        let t = Tuning {
            projectile_size: f32::NAN,
            ..Default::default()
        };
        assert!(t.validate().is_err());
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call, velocities in units per tick
//! - Delays counted in ticks, never wall-clock time
//! - Stable iteration order (collection order of the level definition)
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod input;
pub mod level;
pub mod schedule;
pub mod state;
pub mod tick;

pub use body::{Body, Look, VisualFrame, VisualState};
pub use camera::{scroll_delta, scroll_world};
pub use collision::{overlaps, within_range};
pub use input::{InputState, Key, TickInput};
pub use level::{BoxDef, EnemyDef, LabelDef, Level, LevelDef, LevelError, LevelRegistry, builtin_levels};
pub use schedule::{Deferred, Schedule};
pub use state::{
    DeathCause, Enemy, GameEvent, GameState, Label, Obstacle, ObstacleKind, Projectile, TargetKind,
};
pub use tick::{chase_velocity, tick};

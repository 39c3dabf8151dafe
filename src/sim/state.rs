//! Game state and core simulation types
//!
//! Entities live inside the `Level` that defines them; `GameState` points at
//! the active level by index. Loading a level resets those same instances in
//! place, so the live collections always belong to exactly one level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, VisualFrame};
use super::level::{Level, LevelError, LevelRegistry};
use super::schedule::{Deferred, Schedule};
use crate::consts::*;
use crate::tuning::Tuning;

/// A chasing monster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    /// Chasing the player
    pub aggro: bool,
    pub alive: bool,
    /// Touched a trap; death is pending
    pub dying: bool,
    /// Subtracted from the base chase speed
    pub slow: f32,
    pub origin_slow: f32,
    /// Shown briefly when the enemy is killed
    pub hurt_sprite: Option<String>,
}

impl Enemy {
    pub fn new(body: Body, slow: f32) -> Self {
        Self {
            body,
            aggro: false,
            alive: true,
            dying: false,
            slow,
            origin_slow: slow,
            hurt_sprite: None,
        }
    }

    pub fn with_hurt_sprite(mut self, sprite: Option<String>) -> Self {
        self.hurt_sprite = sprite;
        self
    }

    pub fn reset(&mut self) {
        self.body.reset();
        self.aggro = false;
        self.alive = true;
        self.dying = false;
        self.slow = self.origin_slow;
    }

    /// Add `step` to the slow factor unless that would exceed `cap`
    pub fn add_slow(&mut self, step: f32, cap: f32) {
        if self.slow + step <= cap {
            self.slow += step;
        }
    }

    /// Flash the hurt image, then settle back on the idle image
    pub fn start_dying(&mut self, interval_ticks: u32) {
        self.dying = true;
        let frames = [
            VisualFrame::new(self.hurt_sprite.clone()),
            VisualFrame::new(self.body.sprite.clone()),
        ];
        self.body.animate(frames, interval_ticks);
    }

    pub fn finish_dying(&mut self) {
        self.aggro = false;
        self.alive = false;
    }
}

/// Wall or trap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Blocks movement
    Wall,
    /// Kills the player and aggroed enemies on touch
    Trap,
}

/// A static, enlargeable box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn wall(body: Body) -> Self {
        Self {
            body,
            kind: ObstacleKind::Wall,
        }
    }

    pub fn trap(body: Body) -> Self {
        Self {
            body,
            kind: ObstacleKind::Trap,
        }
    }

    #[inline]
    pub fn is_trap(&self) -> bool {
        self.kind == ObstacleKind::Trap
    }
}

/// A shrink-ray shot (in reverse)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
}

/// Decorative level text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// CSS-style size, e.g. "30px"
    pub size: String,
    pub pos: Vec2,
    pub origin_pos: Vec2,
}

impl Label {
    pub fn new(text: impl Into<String>, size: impl Into<String>, pos: Vec2) -> Self {
        Self {
            text: text.into(),
            size: size.into(),
            pos,
            origin_pos: pos,
        }
    }

    pub fn reset(&mut self) {
        self.pos = self.origin_pos;
    }
}

/// What killed the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Enemy(String),
    Trap(String),
}

/// Which collection a projectile hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Enemy,
    Obstacle,
    Trap,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { index: usize },
    LevelAdvanced { from: usize, to: usize },
    LevelReset,
    PlayerDied(DeathCause),
    EnemyAggro { enemy: String },
    EnemyKilled { enemy: String },
    Enlarged { target: TargetKind, identity: String },
    ProjectileFired { identity: String },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    /// Level table; entities of the active level are the live collections
    pub levels: Vec<Level>,
    pub level_index: usize,
    pub player: Body,
    pub goal: Body,
    /// Survive level loads
    pub projectiles: Vec<Projectile>,
    /// Last non-zero movement on each axis; projectiles fly this way
    pub aim: Vec2,
    /// Bumped on every level load
    pub epoch: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub schedule: Schedule,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    projectiles_fired: u32,
}

impl GameState {
    /// Create a game on the first level of `registry`
    pub fn new(registry: LevelRegistry, tuning: Tuning) -> Self {
        let levels = registry.into_levels();
        let mut state = Self {
            tuning,
            player: Body::new("player", Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            goal: Body::new("goal", Vec2::ZERO, Vec2::splat(GOAL_SIZE)),
            levels,
            level_index: 0,
            projectiles: Vec::new(),
            aim: Vec2::ZERO,
            epoch: 0,
            time_ticks: 0,
            schedule: Schedule::new(),
            events: Vec::new(),
            projectiles_fired: 0,
        };
        state.load_level(0);
        state
    }

    /// Built-in levels with default tuning
    pub fn with_builtin_levels() -> Result<Self, LevelError> {
        let tuning = Tuning::default();
        let registry = LevelRegistry::builtin(&tuning)?;
        Ok(Self::new(registry, tuning))
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    #[inline]
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.level_index]
    }

    #[inline]
    pub fn is_last_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    /// Make `index` (clamped to the table) the active level and reset it
    pub fn load_level(&mut self, index: usize) {
        let index = index.min(self.levels.len().saturating_sub(1));
        self.level_index = index;
        self.epoch += 1;

        let level = &mut self.levels[index];
        level.reset();
        self.player.pos = level.player_spawn;
        self.goal.pos = level.goal_spawn;

        log::info!("Loaded {} (epoch {})", level.name, self.epoch);
        self.events.push(GameEvent::LevelLoaded { index });
    }

    /// Goal reached: move to the next level, or replay the last one
    pub fn advance_level(&mut self) {
        let from = self.level_index;
        let to = (from + 1).min(self.levels.len().saturating_sub(1));
        if from == to {
            log::info!("Final goal reached, replaying {}", self.level().name);
        }
        self.events.push(GameEvent::LevelAdvanced { from, to });
        self.load_level(to);
    }

    pub fn kill_player(&mut self, cause: DeathCause) {
        log::debug!("Player died: {:?}", cause);
        self.events.push(GameEvent::PlayerDied(cause));
        self.load_level(self.level_index);
    }

    pub fn reset_level(&mut self) {
        self.events.push(GameEvent::LevelReset);
        self.load_level(self.level_index);
    }

    /// Fire a projectile from the player's center along `aim`.
    /// `sign` is +1 for forward, -1 for backward.
    pub fn fire(&mut self, sign: f32) {
        self.projectiles_fired += 1;
        let identity = format!("bullet{}", self.projectiles_fired);
        let size = Vec2::splat(self.tuning.projectile_size);
        let vel = self.aim * self.tuning.projectile_speed_multiplier * sign;
        let body = Body::new(identity.clone(), self.player.center() - size / 2.0, size)
            .with_velocity(vel);

        self.projectiles.push(Projectile { body });
        self.schedule.after(
            self.time_ticks,
            self.tuning.projectile_lifetime_ticks,
            None,
            Deferred::ExpireProjectile {
                identity: identity.clone(),
            },
        );
        self.events.push(GameEvent::ProjectileFired { identity });
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_loads_first_level() {
        let state = GameState::with_builtin_levels().unwrap();
        assert_eq!(state.level_index, 0);
        assert_eq!(state.epoch, 1);
        assert_eq!(state.player.pos, Vec2::new(290.0, 200.0));
        assert_eq!(state.goal.pos, Vec2::new(290.0, -500.0));
        assert_eq!(state.events, vec![GameEvent::LevelLoaded { index: 0 }]);
    }

    #[test]
    fn test_slow_cap_checked_before_adding() {
        let mut e = Enemy::new(Body::new("e", Vec2::ZERO, Vec2::splat(35.0)), 0.2);
        e.add_slow(0.8, 2.2);
        e.add_slow(0.8, 2.2);
        assert!((e.slow - 1.8).abs() < 1e-5);
        e.add_slow(0.8, 2.2);
        assert!((e.slow - 1.8).abs() < 1e-5);
    }

    #[test]
    fn test_enemy_reset_revives() {
        let mut e = Enemy::new(Body::new("e", Vec2::ZERO, Vec2::splat(35.0)), 0.2);
        e.aggro = true;
        e.start_dying(4);
        e.finish_dying();
        e.add_slow(0.8, 2.2);
        e.reset();
        assert!(e.alive && !e.aggro && !e.dying);
        assert_eq!(e.slow, 0.2);
    }

    #[test]
    fn test_fire_spawns_centered_projectile() {
        let mut state = GameState::with_builtin_levels().unwrap();
        state.aim = Vec2::new(4.0, 0.0);
        state.fire(-1.0);

        let shot = &state.projectiles[0];
        assert_eq!(shot.body.identity, "bullet1");
        assert_eq!(shot.body.center(), state.player.center());
        assert_eq!(shot.body.vel, Vec2::new(-8.0, 0.0));
        assert_eq!(state.schedule.len(), 1);
    }

    #[test]
    fn test_advance_saturates_at_last_level() {
        let mut state = GameState::with_builtin_levels().unwrap();
        let last = state.levels.len() - 1;
        state.load_level(last);
        state.advance_level();
        assert_eq!(state.level_index, last);
        assert!(state.is_last_level());
    }

    #[test]
    fn test_advance_reports_before_loading() {
        let mut state = GameState::with_builtin_levels().unwrap();
        state.drain_events();
        state.advance_level();
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::LevelAdvanced { from: 0, to: 1 },
                GameEvent::LevelLoaded { index: 1 },
            ]
        );
    }

    #[test]
    fn test_load_bumps_epoch() {
        let mut state = GameState::with_builtin_levels().unwrap();
        let before = state.epoch;
        state.reset_level();
        assert_eq!(state.epoch, before + 1);
    }
}

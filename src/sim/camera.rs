//! Camera scrolling
//!
//! There is no camera transform: when the player drifts out of the comfort
//! band, the whole world (player included) is shifted back by a fixed step.
//! Origins are left alone, so level loads still place things in screen space.

use glam::Vec2;

use super::state::GameState;
use crate::tuning::ScrollBounds;

/// World shift for this tick; x and y are decided independently
pub fn scroll_delta(player_pos: Vec2, bounds: &ScrollBounds, step: f32) -> Vec2 {
    let x = if player_pos.x < bounds.min_x {
        step
    } else if player_pos.x > bounds.max_x {
        -step
    } else {
        0.0
    };
    let y = if player_pos.y < bounds.min_y {
        step
    } else if player_pos.y > bounds.max_y {
        -step
    } else {
        0.0
    };
    Vec2::new(x, y)
}

/// Shift every live entity of the active level plus the globals by `delta`
pub fn scroll_world(state: &mut GameState, delta: Vec2) {
    let level = &mut state.levels[state.level_index];
    for enemy in &mut level.enemies {
        enemy.body.shift(delta);
    }
    for trap in &mut level.traps {
        trap.body.shift(delta);
    }
    for wall in &mut level.obstacles {
        wall.body.shift(delta);
    }
    for label in &mut level.labels {
        label.pos += delta;
    }
    for shot in &mut state.projectiles {
        shot.body.shift(delta);
    }
    state.player.shift(delta);
    state.goal.shift(delta);
}

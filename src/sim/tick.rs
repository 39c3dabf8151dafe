//! Per-frame simulation step
//!
//! One call advances the game by one tick. Velocities are in units per tick.
//! Any level load inside a tick ends that tick: the fresh level is shown
//! exactly as loaded.

use std::ops::ControlFlow;

use glam::Vec2;

use super::body::Body;
use super::camera::{scroll_delta, scroll_world};
use super::collision::within_range;
use super::input::TickInput;
use super::level::Level;
use super::schedule::Deferred;
use super::state::{DeathCause, GameEvent, GameState, TargetKind};
use crate::tuning::Tuning;

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    run_deferred(state);
    advance_animations(state);

    // Key releases stop movement on that axis before anything integrates
    if input.released_x {
        state.player.vel.x = 0.0;
    }
    if input.released_y {
        state.player.vel.y = 0.0;
    }

    if input.reset_level {
        state.reset_level();
        return;
    }
    if input.fire_forward {
        state.fire(1.0);
    }
    if input.fire_backward {
        state.fire(-1.0);
    }

    state.player.integrate();
    state.goal.integrate();

    if state.player.overlaps(&state.goal) {
        state.advance_level();
        return;
    }

    if trap_pass(state).is_break() {
        return;
    }
    if enemy_pass(state).is_break() {
        return;
    }
    projectile_pass(state);
    apply_movement_input(state, input);
    obstacle_pass(state);

    let delta = scroll_delta(
        state.player.pos,
        &state.tuning.scroll_bounds,
        state.tuning.scroll_step,
    );
    if delta != Vec2::ZERO {
        scroll_world(state, delta);
    }
}

/// Chase direction from `from` to `to`, normalized so |vx| + |vy| == `speed`.
///
/// Coincident points yield zero velocity.
pub fn chase_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let d = to - from;
    let total = d.x.abs() + d.y.abs();
    if total == 0.0 {
        return Vec2::ZERO;
    }
    d / total * speed
}

fn run_deferred(state: &mut GameState) {
    for action in state.schedule.take_due(state.time_ticks, state.epoch) {
        match action {
            Deferred::FinishEnemyDeath { enemy } => {
                if let Some(e) = state.levels[state.level_index].enemies.get_mut(enemy) {
                    e.finish_dying();
                    log::debug!("{} died", e.body.identity);
                    state.events.push(GameEvent::EnemyKilled {
                        enemy: e.body.identity.clone(),
                    });
                }
            }
            Deferred::ExpireProjectile { identity } => {
                state.projectiles.retain(|p| p.body.identity != identity);
            }
        }
    }
}

fn advance_animations(state: &mut GameState) {
    state.player.advance_animation();
    state.goal.advance_animation();
    let level = &mut state.levels[state.level_index];
    for enemy in &mut level.enemies {
        enemy.body.advance_animation();
    }
    for obstacle in level.traps.iter_mut().chain(level.obstacles.iter_mut()) {
        obstacle.body.advance_animation();
    }
    for shot in &mut state.projectiles {
        shot.body.advance_animation();
    }
}

/// Traps kill the player on touch and doom aggroed enemies that walk into them
fn trap_pass(state: &mut GameState) -> ControlFlow<()> {
    let idx = state.level_index;
    let level = &mut state.levels[idx];

    for trap in &mut level.traps {
        trap.body.integrate();
    }
    let lethal = level
        .traps
        .iter()
        .find(|t| state.player.overlaps(&t.body))
        .map(|t| t.body.identity.clone());
    if let Some(identity) = lethal {
        state.kill_player(DeathCause::Trap(identity));
        return ControlFlow::Break(());
    }

    let interval = state.tuning.animation_interval_ticks;
    for (i, enemy) in level.enemies.iter_mut().enumerate() {
        if !enemy.aggro || !enemy.alive || enemy.dying {
            continue;
        }
        if level.traps.iter().any(|t| t.body.overlaps(&enemy.body)) {
            log::debug!("{} hit a trap", enemy.body.identity);
            enemy.start_dying(interval);
            state.schedule.after(
                state.time_ticks,
                state.tuning.enemy_death_delay_ticks,
                Some(state.epoch),
                Deferred::FinishEnemyDeath { enemy: i },
            );
        }
    }
    ControlFlow::Continue(())
}

/// Move living enemies, steer aggroed ones at the player, check for contact
fn enemy_pass(state: &mut GameState) -> ControlFlow<()> {
    let idx = state.level_index;
    let tuning = &state.tuning;
    let player = &state.player;
    let level = &mut state.levels[idx];

    let mut killer = None;
    for enemy in level.enemies.iter_mut().filter(|e| e.alive) {
        enemy.body.integrate();

        if enemy.aggro {
            let speed = tuning.enemy_speed(enemy.slow);
            enemy.body.vel = chase_velocity(enemy.body.center(), player.center(), speed);
        }

        if !enemy.aggro
            && within_range(
                enemy.body.pos,
                enemy.body.size,
                player.pos,
                player.size,
                tuning.aggro_range,
            )
        {
            enemy.aggro = true;
            log::debug!("{} is chasing", enemy.body.identity);
            state.events.push(GameEvent::EnemyAggro {
                enemy: enemy.body.identity.clone(),
            });
        }

        if player.overlaps(&enemy.body) {
            killer = Some(enemy.body.identity.clone());
            break;
        }
    }

    match killer {
        Some(identity) => {
            state.kill_player(DeathCause::Enemy(identity));
            ControlFlow::Break(())
        }
        None => ControlFlow::Continue(()),
    }
}

/// Move projectiles; each one enlarges at most one target and is consumed
fn projectile_pass(state: &mut GameState) {
    let idx = state.level_index;
    let tuning = &state.tuning;
    let level = &mut state.levels[idx];
    let events = &mut state.events;

    state.projectiles.retain_mut(|shot| {
        shot.body.integrate();
        match strike(level, &shot.body, tuning) {
            Some(hit) => {
                events.push(hit);
                false
            }
            None => true,
        }
    });
}

/// Apply a hit to the first target `shot` touches: enemies, then walls, then traps
fn strike(level: &mut Level, shot: &Body, tuning: &Tuning) -> Option<GameEvent> {
    let step = tuning.enlarge_step;

    if let Some(enemy) = level
        .enemies
        .iter_mut()
        .find(|e| e.alive && shot.overlaps(&e.body))
    {
        enemy.body.enlarge(step);
        enemy.add_slow(tuning.slow_step, tuning.slow_cap);
        return Some(GameEvent::Enlarged {
            target: TargetKind::Enemy,
            identity: enemy.body.identity.clone(),
        });
    }

    let targets = [
        (TargetKind::Obstacle, &mut level.obstacles),
        (TargetKind::Trap, &mut level.traps),
    ];
    for (kind, collection) in targets {
        if let Some(hit) = collection.iter_mut().find(|o| shot.overlaps(&o.body)) {
            hit.body.enlarge(step);
            return Some(GameEvent::Enlarged {
                target: kind,
                identity: hit.body.identity.clone(),
            });
        }
    }
    None
}

/// Held keys drive the player's velocity and the aim direction
fn apply_movement_input(state: &mut GameState, input: &TickInput) {
    let speed = state.tuning.player_speed;
    let player = &mut state.player;
    let aim = &mut state.aim;

    let horizontal = if input.left {
        Some(-speed)
    } else if input.right {
        Some(speed)
    } else {
        None
    };
    if let Some(vx) = horizontal {
        player.vel.x = vx;
        aim.x = vx;
        if !input.vertical_held() {
            aim.y = 0.0;
        }
    }

    let vertical = if input.up {
        Some(-speed)
    } else if input.down {
        Some(speed)
    } else {
        None
    };
    if let Some(vy) = vertical {
        player.vel.y = vy;
        aim.y = vy;
        if !input.horizontal_held() {
            aim.x = 0.0;
        }
    }
}

/// Walls cancel any move that would end inside them
fn obstacle_pass(state: &mut GameState) {
    let idx = state.level_index;
    let level = &mut state.levels[idx];
    let player = &mut state.player;

    for wall in &mut level.obstacles {
        wall.body.integrate();

        if player.would_overlap(&wall.body) {
            player.vel = Vec2::ZERO;
        }
        for enemy in &mut level.enemies {
            if enemy.body.would_overlap(&wall.body) {
                enemy.body.vel = Vec2::ZERO;
            }
        }
    }
}

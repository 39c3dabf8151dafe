//! Frame drawing against an abstract render sink
//!
//! The simulation owns no drawing state. A host implements `RenderSink`
//! (canvas 2D on the web, a recorder in tests) and `draw_frame` walks the
//! live entities once per frame.

use glam::Vec2;

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::{Body, GameState};

/// Fill colour used when a body has no image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Player,
    Goal,
    Enemy,
    Wall,
    Trap,
    Projectile,
}

impl Fill {
    pub fn css(&self) -> &'static str {
        match self {
            Fill::Player | Fill::Wall | Fill::Projectile => "green",
            Fill::Goal => "gold",
            Fill::Enemy => "crimson",
            Fill::Trap => "orange",
        }
    }
}

/// Drawing capability supplied by the host
pub trait RenderSink {
    /// Clear to the background colour
    fn clear_frame(&mut self, size: Vec2);
    /// Draw `sprite` scaled to `size` at `pos`, or a `fallback` rectangle if there is none
    fn draw_body(&mut self, pos: Vec2, size: Vec2, sprite: Option<&str>, fallback: Fill);
    /// Draw text; `size` is a CSS size such as "30px"
    fn draw_text(&mut self, text: &str, size: &str, pos: Vec2);
}

fn draw(sink: &mut impl RenderSink, body: &Body, fallback: Fill) {
    let look = body.current_look();
    sink.draw_body(look.pos, look.size, look.sprite, fallback);
}

/// Draw one frame. Dead enemies are not drawn.
pub fn draw_frame(state: &GameState, sink: &mut impl RenderSink, show_labels: bool) {
    sink.clear_frame(Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT));

    let level = state.level();
    draw(sink, &state.player, Fill::Player);
    draw(sink, &state.goal, Fill::Goal);
    for enemy in level.enemies.iter().filter(|e| e.alive) {
        draw(sink, &enemy.body, Fill::Enemy);
    }
    for shot in &state.projectiles {
        draw(sink, &shot.body, Fill::Projectile);
    }
    for trap in &level.traps {
        draw(sink, &trap.body, Fill::Trap);
    }
    for wall in &level.obstacles {
        draw(sink, &wall.body, Fill::Wall);
    }
    if show_labels {
        for label in &level.labels {
            sink.draw_text(&label.text, &label.size, label.pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::VisualFrame;

    #[derive(Default)]
    struct Recorder {
        clears: usize,
        bodies: Vec<(Vec2, Fill, Option<String>)>,
        sizes: Vec<Vec2>,
        texts: Vec<String>,
    }

    impl RenderSink for Recorder {
        fn clear_frame(&mut self, _size: Vec2) {
            self.clears += 1;
        }

        fn draw_body(&mut self, pos: Vec2, size: Vec2, sprite: Option<&str>, fallback: Fill) {
            self.bodies.push((pos, fallback, sprite.map(str::to_string)));
            self.sizes.push(size);
        }

        fn draw_text(&mut self, text: &str, _size: &str, _pos: Vec2) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn test_draws_every_entity_once() {
        let state = GameState::with_builtin_levels().unwrap();
        let mut sink = Recorder::default();
        draw_frame(&state, &mut sink, true);

        assert_eq!(sink.clears, 1);
        // player + goal + 12 walls
        assert_eq!(sink.bodies.len(), 14);
        assert_eq!(sink.texts.len(), 3);
        assert_eq!(sink.bodies[0].1, Fill::Player);
    }

    #[test]
    fn test_labels_can_be_hidden() {
        let state = GameState::with_builtin_levels().unwrap();
        let mut sink = Recorder::default();
        draw_frame(&state, &mut sink, false);
        assert!(sink.texts.is_empty());
    }

    #[test]
    fn test_dead_enemies_are_skipped() {
        let mut state = GameState::with_builtin_levels().unwrap();
        state.load_level(2);
        state.level_mut().enemies[0].alive = false;
        let mut sink = Recorder::default();
        draw_frame(&state, &mut sink, false);
        let enemies: Vec<_> = sink.bodies.iter().filter(|b| b.1 == Fill::Enemy).collect();
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].2.as_deref(), Some("img/enemy_idle.png"));
    }

    #[test]
    fn test_animation_frame_offset_and_size_reach_the_sink() {
        let mut state = GameState::with_builtin_levels().unwrap();
        let player_pos = state.player.pos;
        state.player.animate(
            [
                VisualFrame::placed(Some("grow.png".into()), Vec2::new(-10.0, -10.0), Vec2::splat(55.0)),
                VisualFrame::new(None),
            ],
            4,
        );
        let mut sink = Recorder::default();
        draw_frame(&state, &mut sink, false);

        assert_eq!(sink.bodies[0].0, player_pos + Vec2::new(-10.0, -10.0));
        assert_eq!(sink.bodies[0].2.as_deref(), Some("grow.png"));
        assert_eq!(sink.sizes[0], Vec2::splat(55.0));
        assert_eq!(sink.sizes[1], state.goal.size);
    }
}

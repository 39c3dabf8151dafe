//! Per-tick input snapshots
//!
//! The host feeds raw key transitions into `InputState`; once per tick it takes
//! a `TickInput` snapshot. Movement keys are level-triggered (held flags),
//! everything else is edge-triggered and consumed by the snapshot.

use serde::{Deserialize, Serialize};

/// Logical game keys (the host owns the key-code mapping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    FireForward,
    FireBackward,
    Reset,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// A horizontal movement key was released since the last tick
    pub released_x: bool,
    /// A vertical movement key was released since the last tick
    pub released_y: bool,
    pub fire_forward: bool,
    pub fire_backward: bool,
    pub reset_level: bool,
}

impl TickInput {
    #[inline]
    pub fn horizontal_held(&self) -> bool {
        self.left || self.right
    }

    #[inline]
    pub fn vertical_held(&self) -> bool {
        self.up || self.down
    }
}

/// Accumulates key transitions between ticks
#[derive(Debug, Clone)]
pub struct InputState {
    held: TickInput,
    pending: TickInput,
    can_fire_forward: bool,
    can_fire_backward: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            held: TickInput::default(),
            pending: TickInput::default(),
            can_fire_forward: true,
            can_fire_backward: true,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed (auto-repeat presses are harmless)
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Up => self.held.up = true,
            Key::Down => self.held.down = true,
            Key::Left => self.held.left = true,
            Key::Right => self.held.right = true,
            Key::FireForward => {
                if self.can_fire_forward {
                    self.can_fire_forward = false;
                    self.pending.fire_forward = true;
                }
            }
            Key::FireBackward => {
                if self.can_fire_backward {
                    self.can_fire_backward = false;
                    self.pending.fire_backward = true;
                }
            }
            Key::Reset => self.pending.reset_level = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => {
                self.held.up = false;
                self.pending.released_y = true;
            }
            Key::Down => {
                self.held.down = false;
                self.pending.released_y = true;
            }
            Key::Left => {
                self.held.left = false;
                self.pending.released_x = true;
            }
            Key::Right => {
                self.held.right = false;
                self.pending.released_x = true;
            }
            Key::FireForward => self.can_fire_forward = true,
            Key::FireBackward => self.can_fire_backward = true,
            Key::Reset => {}
        }
    }

    /// Take this tick's input, clearing edge events
    pub fn snapshot(&mut self) -> TickInput {
        let edges = std::mem::take(&mut self.pending);
        TickInput {
            up: self.held.up,
            down: self.held.down,
            left: self.held.left,
            right: self.held.right,
            ..edges
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_is_latched_until_release() {
        let mut input = InputState::new();
        input.key_down(Key::FireForward);
        assert!(input.snapshot().fire_forward);

        // Held (auto-repeat) does not re-fire
        input.key_down(Key::FireForward);
        assert!(!input.snapshot().fire_forward);

        input.key_up(Key::FireForward);
        input.key_down(Key::FireForward);
        assert!(input.snapshot().fire_forward);
    }

    #[test]
    fn test_fire_latches_are_per_direction() {
        let mut input = InputState::new();
        input.key_down(Key::FireForward);
        input.key_down(Key::FireBackward);
        let snap = input.snapshot();
        assert!(snap.fire_forward && snap.fire_backward);
    }

    #[test]
    fn test_held_keys_persist_edges_do_not() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.key_down(Key::Reset);
        let first = input.snapshot();
        assert!(first.right && first.reset_level);

        let second = input.snapshot();
        assert!(second.right);
        assert!(!second.reset_level);
    }

    #[test]
    fn test_release_sets_axis_edge() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.snapshot();
        input.key_up(Key::Up);
        let snap = input.snapshot();
        assert!(!snap.up);
        assert!(snap.released_y);
        assert!(!snap.released_x);
        assert!(!input.snapshot().released_y);
    }
}

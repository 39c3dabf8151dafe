//! Movable bodies and their visual state
//!
//! A `Body` is the common core of every entity: an axis-aligned box with a
//! velocity, the origin it resets to on level load, and an optional queue of
//! animation frames advanced once per tick by the sequencer.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::overlaps;
use crate::center_of;

/// Whether a body may start a new animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisualState {
    #[default]
    Ready,
    Animating,
}

/// One frame of an animation: what image to show and where, relative to the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualFrame {
    /// Image reference, `None` draws the fill colour
    pub sprite: Option<String>,
    /// Draw offset from the body position
    #[serde(default)]
    pub offset: Vec2,
    /// Draw size, `None` uses the body size
    #[serde(default)]
    pub size: Option<Vec2>,
}

impl VisualFrame {
    pub fn new(sprite: Option<String>) -> Self {
        Self {
            sprite,
            offset: Vec2::ZERO,
            size: None,
        }
    }

    /// A frame drawn at `offset` from the body with its own `size`
    pub fn placed(sprite: Option<String>, offset: Vec2, size: Vec2) -> Self {
        Self {
            sprite,
            offset,
            size: Some(size),
        }
    }
}

/// What to draw for a body this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look<'a> {
    pub sprite: Option<&'a str>,
    pub pos: Vec2,
    pub size: Vec2,
}

/// An axis-aligned box that can move, grow and be reset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Unique within the owning collection
    pub identity: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub origin_pos: Vec2,
    pub origin_size: Vec2,
    /// Base image, shown whenever no animation frame overrides it
    pub sprite: Option<String>,
    pub visual: VisualState,
    /// Frame currently shown by the animation sequencer
    #[serde(default)]
    pub shown: Option<VisualFrame>,
    #[serde(default)]
    frames: VecDeque<VisualFrame>,
    #[serde(default)]
    frame_interval: u32,
    #[serde(default)]
    frame_countdown: u32,
}

impl Body {
    pub fn new(identity: impl Into<String>, pos: Vec2, size: Vec2) -> Self {
        Self {
            identity: identity.into(),
            pos,
            vel: Vec2::ZERO,
            size,
            origin_pos: pos,
            origin_size: size,
            sprite: None,
            visual: VisualState::Ready,
            shown: None,
            frames: VecDeque::new(),
            frame_interval: 0,
            frame_countdown: 0,
        }
    }

    pub fn with_sprite(mut self, sprite: Option<String>) -> Self {
        self.sprite = sprite;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        center_of(self.pos, self.size)
    }

    /// Where the body will be after the next integration
    #[inline]
    pub fn projected_pos(&self) -> Vec2 {
        self.pos + self.vel
    }

    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        overlaps(self.pos, self.size, other.pos, other.size)
    }

    /// Would this body, after moving one step, overlap `other` where it stands now?
    #[inline]
    pub fn would_overlap(&self, other: &Body) -> bool {
        overlaps(self.projected_pos(), self.size, other.pos, other.size)
    }

    /// Grow by `step` on both axes, keeping the center fixed
    pub fn enlarge(&mut self, step: f32) {
        self.size += Vec2::splat(step);
        self.pos -= Vec2::splat(step / 2.0);
    }

    #[inline]
    pub fn shift(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Restore origin position and size, stop, and drop any pending animation
    pub fn reset(&mut self) {
        self.pos = self.origin_pos;
        self.size = self.origin_size;
        self.vel = Vec2::ZERO;
        self.visual = VisualState::Ready;
        self.shown = None;
        self.frames.clear();
        self.frame_countdown = 0;
    }

    /// Image, position and size to draw this tick
    pub fn current_look(&self) -> Look<'_> {
        match &self.shown {
            Some(frame) => Look {
                sprite: frame.sprite.as_deref(),
                pos: self.pos + frame.offset,
                size: frame.size.unwrap_or(self.size),
            },
            None => Look {
                sprite: self.sprite.as_deref(),
                pos: self.pos,
                size: self.size,
            },
        }
    }

    /// Queue `frames` and show the first one immediately.
    ///
    /// Returns false (and leaves the body untouched) if `frames` is empty.
    /// Callers that must not restart a running animation check `visual` first.
    pub fn animate(&mut self, frames: impl IntoIterator<Item = VisualFrame>, interval_ticks: u32) -> bool {
        let frames: VecDeque<VisualFrame> = frames.into_iter().collect();
        if frames.is_empty() {
            return false;
        }
        self.frames = frames;
        self.frame_interval = interval_ticks.max(1);
        self.visual = VisualState::Animating;
        self.show_next_frame();
        true
    }

    /// Sequencer hook, called once per tick
    pub fn advance_animation(&mut self) {
        if self.visual != VisualState::Animating {
            return;
        }
        self.frame_countdown = self.frame_countdown.saturating_sub(1);
        if self.frame_countdown == 0 {
            self.show_next_frame();
        }
    }

    fn show_next_frame(&mut self) {
        if let Some(frame) = self.frames.pop_front() {
            self.shown = Some(frame);
        }
        if self.frames.is_empty() {
            self.visual = VisualState::Ready;
            self.frame_countdown = 0;
        } else {
            self.frame_countdown = self.frame_interval;
        }
    }
}

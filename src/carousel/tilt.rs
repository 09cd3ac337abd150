//! Pointer tilt
//!
//! The current card leans toward the pointer. Only the horizontal offset from
//! the card's center counts, so the tilt is one-dimensional.

use glam::Vec2;

use super::timeline::{Props, Target};

/// Axis-aligned element bounds in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(left, top),
            size: Vec2::new(width, height),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }
}

/// Tilt angle in degrees for a pointer at `pointer_x`.
///
/// `atan2(dx, 0)` is ±π/2 on either side of the center and 0 on it, scaled by
/// `factor / π`.
#[inline]
pub fn tilt_angle(pointer_x: f32, bounds: &Bounds, factor: f32) -> f32 {
    let dx = pointer_x - bounds.center().x;
    dx.atan2(0.0) * (factor / std::f32::consts::PI)
}

/// Rotation to apply to the current card and info panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltUpdate {
    pub card: usize,
    pub info: usize,
    pub angle: f32,
}

impl TiltUpdate {
    /// Immediate property sets for this update
    pub fn sets(&self) -> [(Target, Props); 2] {
        [
            (
                Target::Card(self.card),
                Props {
                    card_rotation: Some(self.angle),
                    ..Default::default()
                },
            ),
            (
                Target::InfoPanel(self.info),
                Props {
                    rotate_y: Some(self.angle),
                    ..Default::default()
                },
            ),
        ]
    }
}

/// Tracks which card the pointer listeners are bound to
#[derive(Debug, Clone)]
pub struct TiltController {
    attached: Option<usize>,
    factor: f32,
    enabled: bool,
}

impl TiltController {
    pub fn new(factor: f32, enabled: bool) -> Self {
        Self {
            attached: None,
            factor,
            enabled,
        }
    }

    pub fn attached(&self) -> Option<usize> {
        self.attached
    }

    /// Bind to `card`. Returns the previously bound card, if different.
    pub fn attach(&mut self, card: usize) -> Option<usize> {
        let previous = self.attached.replace(card);
        previous.filter(|&p| p != card)
    }

    /// Unbind. Returns the card that was bound.
    pub fn detach(&mut self) -> Option<usize> {
        self.attached.take()
    }

    /// Pointer moved over `card`; `info` is the current info panel
    pub fn on_move(&self, card: usize, info: usize, pointer_x: f32, bounds: &Bounds) -> Option<TiltUpdate> {
        if !self.enabled || self.attached != Some(card) {
            return None;
        }
        Some(TiltUpdate {
            card,
            info,
            angle: tilt_angle(pointer_x, bounds, self.factor),
        })
    }

    /// Pointer left `card`: both rotations go back to zero
    pub fn on_leave(&self, card: usize, info: usize) -> Option<TiltUpdate> {
        if !self.enabled || self.attached != Some(card) {
            return None;
        }
        Some(TiltUpdate {
            card,
            info,
            angle: 0.0,
        })
    }
}

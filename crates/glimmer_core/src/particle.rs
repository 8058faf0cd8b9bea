//! Particle records.
//!
//! Every variant carries `life` (1.0 at birth for canvas variants, removed at
//! or below zero) and a per-frame `decay`. Canvas variants live in screen
//! space with 0-255 colors; [`GpuSparkle`] lives in the 3D scene with 0-1
//! colors.

use glam::{Vec2, Vec3};

use crate::color::Rgb;
use crate::memory::PoolSlot;

/// Star-shaped spark drawn on the 2D surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    /// Screen position
    pub position: Vec2,
    /// Screen velocity (units per frame)
    pub velocity: Vec2,
    /// Remaining life
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
    /// Outer radius of the star
    pub size: f32,
    /// 0-255 channels
    pub color: Rgb,
    /// Accumulated rotation (radians)
    pub rotation: f32,
    /// Rotation added per frame
    pub rotation_speed: f32,
}

/// Flickering glowing circle drawn on the 2D surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ember {
    /// Screen position
    pub position: Vec2,
    /// Screen velocity (units per frame)
    pub velocity: Vec2,
    /// Remaining life
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
    /// Radius
    pub size: f32,
    /// 0-255 channels
    pub color: Rgb,
    /// Flicker phase (radians), brightness follows `sin(flicker)`
    pub flicker: f32,
}

/// One recorded pointer position of the motion trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    /// Screen position
    pub position: Vec2,
    /// Remaining life
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
}

impl TrailPoint {
    /// Decay applied to every trail point.
    pub const DECAY: f32 = 0.05;

    /// Creates a fresh point at full life.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            life: 1.0,
            decay: Self::DECAY,
        }
    }
}

/// Point sprite living in a fixed GPU slot.
///
/// A slot with `life <= 0` is dead and eligible for reuse. `max_life` is
/// assigned once per slot and survives every [`PoolSlot::revive`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpuSparkle {
    /// Scene position
    pub position: Vec3,
    /// Scene velocity (units per frame)
    pub velocity: Vec3,
    /// Remaining life, starts at `max_life`
    pub life: f32,
    /// Life at spawn
    pub max_life: f32,
    /// Randomized per-instance decay. Only applied in per-instance mode.
    pub decay: f32,
    /// Base point size
    pub size: f32,
    /// 0-1 channels
    pub color: Rgb,
}

impl GpuSparkle {
    /// Creates a dead slot with the given fixed lifetime.
    #[must_use]
    pub const fn dead(max_life: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            life: 0.0,
            max_life,
            decay: 0.0,
            size: 0.0,
            color: Rgb::BLACK,
        }
    }

    /// Fraction of life remaining, in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl PoolSlot for GpuSparkle {
    #[inline]
    fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    fn revive(&mut self, spawn: Self) {
        let max_life = self.max_life;
        *self = Self {
            life: max_life,
            max_life,
            ..spawn
        };
    }

    fn clear(&mut self) {
        *self = Self::dead(self.max_life);
    }
}

/// Ambient mote rising from the bottom edge of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientMote {
    /// Screen position
    pub position: Vec2,
    /// Screen velocity (units per frame)
    pub velocity: Vec2,
    /// Radius
    pub size: f32,
    /// Remaining life
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
    /// 0-255 channels from the configured palette
    pub color: Rgb,
    /// Glow blur radius
    pub glow: f32,
}

//! # 2D Canvas Pass
//!
//! An immediate-mode drawing surface abstraction plus the pass that draws
//! canvas particles on it. Hosts implement [`Canvas2d`] over their own 2D
//! API, or replay the commands captured by [`RecordingCanvas`].

mod pass;
mod recorder;

pub use pass::{CanvasLayers, CanvasPass, CanvasStats};
pub use recorder::{DrawCommand, RecordingCanvas};

use glam::Vec2;
use glimmer_core::Rgba;

/// How new pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Normal alpha compositing.
    #[default]
    SourceOver,
    /// Additive: overlapping draws brighten.
    Lighter,
}

/// Line end style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Flat end at the endpoint.
    #[default]
    Butt,
    /// Semicircle past the endpoint.
    Round,
}

/// One gradient stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient, 0 to 1.
    pub offset: f32,
    /// Color at this stop.
    pub color: Rgba,
}

impl ColorStop {
    /// Creates a stop.
    #[must_use]
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Fill or stroke style.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Uniform color.
    Solid(Rgba),
    /// Gradient along the line from `start` to `end`.
    Linear {
        /// Where offset 0 lies.
        start: Vec2,
        /// Where offset 1 lies.
        end: Vec2,
        /// Ordered by offset.
        stops: Vec<ColorStop>,
    },
    /// Gradient between two concentric circles.
    Radial {
        /// Shared center.
        center: Vec2,
        /// Radius of offset 0.
        inner_radius: f32,
        /// Radius of offset 1.
        outer_radius: f32,
        /// Ordered by offset.
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    /// Highest alpha any part of this paint can produce.
    #[must_use]
    pub fn max_alpha(&self) -> f32 {
        match self {
            Self::Solid(color) => color.a,
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => {
                stops.iter().map(|s| s.color.a).fold(0.0, f32::max)
            }
        }
    }
}

/// Blurred glow drawn under subsequent fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Blur radius in pixels.
    pub blur: f32,
    /// Glow color.
    pub color: Rgba,
}

/// Immediate-mode 2D drawing surface.
///
/// State set by [`set_composite`](Self::set_composite) and
/// [`set_shadow`](Self::set_shadow) applies to every later draw until
/// changed or until [`clear`](Self::clear), which resets it.
pub trait Canvas2d {
    /// Backing size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resizes the backing store. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Wipes the surface to transparent and resets draw state.
    fn clear(&mut self);

    /// Sets the composition mode.
    fn set_composite(&mut self, mode: CompositeMode);

    /// Sets or removes the glow shadow.
    fn set_shadow(&mut self, shadow: Option<Shadow>);

    /// Strokes a single line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, paint: &Paint, width: f32, cap: LineCap);

    /// Fills a closed polygon.
    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
}

impl<C: Canvas2d + ?Sized> Canvas2d for Box<C> {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        (**self).set_composite(mode);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        (**self).set_shadow(shadow);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, paint: &Paint, width: f32, cap: LineCap) {
        (**self).stroke_line(from, to, paint, width, cap);
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        (**self).fill_polygon(points, paint);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        (**self).fill_circle(center, radius, paint);
    }
}

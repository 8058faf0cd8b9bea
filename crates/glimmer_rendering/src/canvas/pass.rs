//! Draws canvas particles onto up to three 2D layers.
//!
//! | Layer   | Contents              | Composite          |
//! |---------|-----------------------|--------------------|
//! | sparkle | trail, then sparkles  | lighter            |
//! | ember   | embers                | lighter            |
//! | ambient | ambient motes + glow  | source-over        |
//!
//! A layer that is absent is skipped. Nothing here mutates particle state.

use std::f32::consts::TAU;

use glam::Vec2;
use glimmer_core::{AmbientField, EffectPools, Ember, Rgba, Sparkle, TrailBuffer};

use super::{Canvas2d, ColorStop, CompositeMode, LineCap, Paint, Shadow};

/// Star arms: alternating outer and inner vertices.
const STAR_POINTS: usize = 8;
/// Inner vertex radius relative to `size`.
const STAR_INNER_RATIO: f32 = 0.4;
/// Trail opacity relative to point life.
const TRAIL_ALPHA: f32 = 0.3;
/// Trail width at full life.
const TRAIL_WIDTH: f32 = 3.0;

/// The 2D surfaces the canvas pass draws on.
#[derive(Debug)]
pub struct CanvasLayers<C> {
    /// Trail and sparkles.
    pub sparkle: Option<C>,
    /// Embers.
    pub ember: Option<C>,
    /// Ambient motes.
    pub ambient: Option<C>,
}

impl<C> CanvasLayers<C> {
    /// No surfaces at all. The canvas pass becomes a no-op.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            sparkle: None,
            ember: None,
            ambient: None,
        }
    }

    /// Sparkle and ember surfaces, no ambient layer.
    #[must_use]
    pub const fn cursor(sparkle: C, ember: C) -> Self {
        Self {
            sparkle: Some(sparkle),
            ember: Some(ember),
            ambient: None,
        }
    }

    /// Adds an ambient surface.
    #[must_use]
    pub fn with_ambient(mut self, ambient: C) -> Self {
        self.ambient = Some(ambient);
        self
    }

    /// Returns true if no layer is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sparkle.is_none() && self.ember.is_none() && self.ambient.is_none()
    }

    /// Every present layer.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        [&mut self.sparkle, &mut self.ember, &mut self.ambient]
            .into_iter()
            .filter_map(Option::as_mut)
    }
}

impl<C: Canvas2d> CanvasLayers<C> {
    /// Resizes every present layer.
    pub fn resize(&mut self, width: u32, height: u32) {
        for layer in self.iter_mut() {
            layer.resize(width, height);
        }
    }
}

impl<C> Default for CanvasLayers<C> {
    fn default() -> Self {
        Self::none()
    }
}

/// Draw counts for one canvas pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasStats {
    /// Trail segments stroked
    pub segments: usize,
    /// Stars filled
    pub sparkles: usize,
    /// Ember circles filled
    pub embers: usize,
    /// Ambient motes filled
    pub motes: usize,
}

/// The 2D half of the dual renderer.
#[derive(Debug, Default)]
pub struct CanvasPass {
    last: CanvasStats,
}

impl CanvasPass {
    /// Creates the pass.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: CanvasStats {
                segments: 0,
                sparkles: 0,
                embers: 0,
                motes: 0,
            },
        }
    }

    /// Counts from the most recent [`draw`](Self::draw).
    #[must_use]
    pub const fn last_stats(&self) -> CanvasStats {
        self.last
    }

    /// Clears and redraws every present layer.
    pub fn draw<C: Canvas2d>(
        &mut self,
        layers: &mut CanvasLayers<C>,
        pools: &EffectPools,
        ambient: Option<&AmbientField>,
    ) -> CanvasStats {
        let mut stats = CanvasStats::default();

        if let Some(canvas) = layers.sparkle.as_mut() {
            canvas.clear();
            stats.segments = draw_trail(canvas, pools.trail());
            canvas.set_composite(CompositeMode::Lighter);
            for sparkle in pools.sparkles().iter().filter(|s| s.life > 0.0) {
                draw_sparkle(canvas, sparkle);
                stats.sparkles += 1;
            }
        }

        if let Some(canvas) = layers.ember.as_mut() {
            canvas.clear();
            canvas.set_composite(CompositeMode::Lighter);
            for ember in pools.embers().iter().filter(|e| e.life > 0.0) {
                draw_ember(canvas, ember);
                stats.embers += 1;
            }
        }

        if let (Some(canvas), Some(field)) = (layers.ambient.as_mut(), ambient) {
            canvas.clear();
            for mote in field.motes().iter().filter(|m| m.life > 0.0) {
                let alpha = mote.life;
                let color = mote.color.with_alpha(alpha);
                canvas.set_shadow(Some(Shadow {
                    blur: mote.glow,
                    color,
                }));
                canvas.fill_circle(mote.position, mote.size, &Paint::Solid(color));
                stats.motes += 1;
            }
            canvas.set_shadow(None);
        }

        self.last = stats;
        stats
    }
}

/// Connected fading segments, skipped below two points.
fn draw_trail<C: Canvas2d>(canvas: &mut C, trail: &TrailBuffer) -> usize {
    if trail.len() < 2 {
        return 0;
    }

    canvas.set_composite(CompositeMode::Lighter);

    let mut segments = 0;
    for (prev, point) in trail.segments() {
        let alpha = point.life * TRAIL_ALPHA;
        let paint = Paint::Linear {
            start: prev.position,
            end: point.position,
            stops: vec![
                ColorStop::new(0.0, Rgba::new(255.0, 180.0, 50.0, alpha)),
                ColorStop::new(1.0, Rgba::new(255.0, 100.0, 20.0, alpha * 0.5)),
            ],
        };
        canvas.stroke_line(
            prev.position,
            point.position,
            &paint,
            TRAIL_WIDTH * point.life,
            LineCap::Round,
        );
        segments += 1;
    }
    segments
}

fn draw_sparkle<C: Canvas2d>(canvas: &mut C, sparkle: &Sparkle) {
    let alpha = sparkle.life;
    let c = sparkle.color;
    let paint = Paint::Radial {
        center: sparkle.position,
        inner_radius: 0.0,
        outer_radius: sparkle.size,
        stops: vec![
            ColorStop::new(0.0, c.with_alpha(alpha)),
            ColorStop::new(0.5, c.with_alpha(alpha * 0.5)),
            ColorStop::new(1.0, c.with_alpha(0.0)),
        ],
    };

    let points = star_points(sparkle.position, sparkle.size, sparkle.rotation);
    canvas.fill_polygon(&points, &paint);
}

/// Brightness follows `sin(flicker)` between 0.4 and 1.0.
fn draw_ember<C: Canvas2d>(canvas: &mut C, ember: &Ember) {
    let alpha = ember.life;
    let flicker = ember.flicker.sin() * 0.3 + 0.7;
    let c = ember.color;
    let paint = Paint::Radial {
        center: ember.position,
        inner_radius: 0.0,
        outer_radius: ember.size,
        stops: vec![
            ColorStop::new(0.0, c.with_alpha(alpha * flicker)),
            ColorStop::new(0.6, c.scaled(1.0, 0.7, 0.5).with_alpha(alpha * 0.5 * flicker)),
            ColorStop::new(1.0, c.scaled(0.5, 0.3, 0.0).with_alpha(0.0)),
        ],
    };

    canvas.fill_circle(ember.position, ember.size, &paint);
}

/// Vertices of an 8-point star, outer radius on even indices.
#[must_use]
pub(crate) fn star_points(center: Vec2, size: f32, rotation: f32) -> [Vec2; STAR_POINTS] {
    let mut points = [Vec2::ZERO; STAR_POINTS];
    for (i, point) in points.iter_mut().enumerate() {
        let angle = i as f32 / STAR_POINTS as f32 * TAU + rotation;
        let radius = if i % 2 == 0 {
            size
        } else {
            size * STAR_INNER_RATIO
        };
        *point = center + Vec2::from_angle(angle) * radius;
    }
    points
}

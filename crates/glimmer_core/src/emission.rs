//! # Emission Controller
//!
//! Turns pointer signals into new particles. Emission only appends; it
//! never reads what is already alive.
//!
//! ```text
//! pointer move ──> trail point (always)
//!              └─> |dx| or |dy| > threshold ──> sparkle + ember + GPU slot attempt
//!
//! pointer down ──> 20 sparkles at 2πi/20 (+ one GPU attempt each)
//!              └─> 15 embers at 2πi/15
//! ```
//!
//! Canvas particles do not inherit pointer velocity. Their velocity is
//! random drift, and the pointer delta only gates whether they spawn.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::color::Rgb;
use crate::config::EffectsConfig;
use crate::memory::SpawnTargets;
use crate::particle::{AmbientMote, Ember, GpuSparkle, Sparkle, TrailPoint};
use crate::rng::EffectRng;

/// Used when the ambient palette is unusable.
const FALLBACK_MOTE_COLOR: Rgb = Rgb::new(255.0, 140.0, 66.0);

/// Drawing surface size in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width, never zero
    pub width: u32,
    /// Height, never zero
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport, raising zero dimensions to one.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Creates a viewport no smaller than `min_width` x `min_height`.
    #[must_use]
    pub fn clamped(width: u32, height: u32, min_width: u32, min_height: u32) -> Self {
        Self::new(width.max(min_width), height.max(min_height))
    }

    /// Size as a float vector.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Width divided by height.
    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Maps a screen point to normalized space: `x` in `[-1, 1]` left to right,
/// `y` in `[-1, 1]` bottom to top.
#[inline]
#[must_use]
pub fn screen_to_normalized(point: Vec2, viewport: Viewport) -> Vec2 {
    let size = viewport.size();
    Vec2::new(
        (point.x / size.x) * 2.0 - 1.0,
        -(point.y / size.y) * 2.0 + 1.0,
    )
}

/// Maps a screen point into the visible slab of the 3D scene.
#[inline]
#[must_use]
pub fn screen_to_world(point: Vec2, viewport: Viewport, world_scale: f32) -> Vec2 {
    screen_to_normalized(point, viewport) * world_scale
}

/// Creates particles from pointer, click and ambient signals.
#[derive(Debug, Clone)]
pub struct EmissionController {
    rng: EffectRng,
    viewport: Viewport,
    world_scale: f32,
    move_threshold: f32,
    burst_sparkles: usize,
    burst_embers: usize,
    palette: Vec<Rgb>,
}

impl EmissionController {
    /// Creates a controller seeded from `config.seed`.
    #[must_use]
    pub fn new(config: &EffectsConfig, viewport: Viewport) -> Self {
        Self::with_rng(config, viewport, EffectRng::from_optional_seed(config.seed))
    }

    /// Creates a controller drawing from an existing generator.
    #[must_use]
    pub fn with_rng(config: &EffectsConfig, viewport: Viewport, rng: EffectRng) -> Self {
        let palette = match config.ambient.palette() {
            Ok(colors) if !colors.is_empty() => colors,
            Ok(_) => vec![FALLBACK_MOTE_COLOR],
            Err(err) => {
                tracing::warn!(%err, "ambient palette unusable, using fallback color");
                vec![FALLBACK_MOTE_COLOR]
            }
        };

        Self {
            rng,
            viewport,
            world_scale: config.world_scale,
            move_threshold: config.move_threshold,
            burst_sparkles: config.burst_sparkles,
            burst_embers: config.burst_embers,
            palette,
        }
    }

    /// Current viewport used for normalized mapping.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The random source.
    pub fn rng_mut(&mut self) -> &mut EffectRng {
        &mut self.rng
    }

    /// Handles one pointer move event.
    ///
    /// A trail point is appended unconditionally. Sparkle, ember and a GPU
    /// slot attempt follow only if either velocity axis exceeds the move
    /// threshold.
    ///
    /// # Returns
    ///
    /// Whether the movement qualified for canvas emission.
    pub fn emit_on_move(
        &mut self,
        targets: &mut SpawnTargets<'_>,
        position: Vec2,
        velocity: Vec2,
    ) -> bool {
        self.emit_trail_point(targets, position);

        let moving =
            velocity.x.abs() > self.move_threshold || velocity.y.abs() > self.move_threshold;
        if moving {
            self.emit_sparkle(targets, position);
            self.emit_ember(targets, position);
        }
        moving
    }

    /// Radial burst at `position`: evenly spaced angles, random speeds.
    pub fn emit_on_down(&mut self, targets: &mut SpawnTargets<'_>, position: Vec2) {
        let sparkles = self.burst_sparkles;
        for i in 0..sparkles {
            let direction = Self::ring_direction(i, sparkles);
            let speed = self.rng.range(3.0, 9.0);
            let sparkle = Sparkle {
                position,
                velocity: direction * speed,
                life: 1.0,
                decay: self.rng.range(0.015, 0.035),
                size: self.rng.range(4.0, 16.0),
                color: Rgb::new(255.0, self.rng.range(100.0, 250.0), self.rng.range(40.0, 120.0)),
                rotation: self.rng.angle(),
                rotation_speed: self.rng.signed(0.15),
            };
            targets.sparkles.try_insert(sparkle);
            self.try_spawn_gpu(targets, position);
        }

        let embers = self.burst_embers;
        for i in 0..embers {
            let direction = Self::ring_direction(i, embers);
            let speed = self.rng.range(2.0, 6.0);
            let ember = Ember {
                position,
                velocity: direction * speed,
                life: 1.0,
                decay: self.rng.range(0.01, 0.03),
                size: self.rng.range(4.0, 12.0),
                color: Rgb::new(255.0, self.rng.range(80.0, 180.0), self.rng.range(0.0, 50.0)),
                flicker: self.rng.angle(),
            };
            targets.embers.try_insert(ember);
        }

        tracing::trace!(x = position.x, y = position.y, sparkles, embers, "burst emitted");
    }

    /// One jittered drifting sparkle, plus one GPU slot attempt at `position`.
    ///
    /// # Returns
    ///
    /// Whether a GPU slot was acquired.
    pub fn emit_sparkle(&mut self, targets: &mut SpawnTargets<'_>, position: Vec2) -> bool {
        let jitter = Vec2::new(self.rng.signed(10.0), self.rng.signed(10.0));
        let sparkle = Sparkle {
            position: position + jitter,
            velocity: Vec2::new(self.rng.signed(2.0), self.rng.signed(2.0)),
            life: 1.0,
            decay: self.rng.range(0.01, 0.03),
            size: self.rng.range(2.0, 10.0),
            color: Rgb::new(255.0, self.rng.range(100.0, 200.0), self.rng.range(20.0, 70.0)),
            rotation: self.rng.angle(),
            rotation_speed: self.rng.signed(0.1),
        };
        targets.sparkles.try_insert(sparkle);

        self.try_spawn_gpu(targets, position)
    }

    /// One jittered ember drifting upward.
    pub fn emit_ember(&mut self, targets: &mut SpawnTargets<'_>, position: Vec2) {
        let jitter = Vec2::new(self.rng.signed(15.0), self.rng.signed(15.0));
        let ember = Ember {
            position: position + jitter,
            velocity: Vec2::new(self.rng.signed(1.0), self.rng.range(-3.0, -1.0)),
            life: 1.0,
            decay: self.rng.range(0.005, 0.02),
            size: self.rng.range(3.0, 9.0),
            color: Rgb::new(255.0, self.rng.range(60.0, 140.0), self.rng.range(0.0, 30.0)),
            flicker: self.rng.angle(),
        };
        targets.embers.try_insert(ember);
    }

    /// Appends a trail point at `position`.
    pub fn emit_trail_point(&mut self, targets: &mut SpawnTargets<'_>, position: Vec2) {
        targets.trail.try_insert(TrailPoint::new(position));
    }

    /// A fresh ambient mote just below the bottom edge of `viewport`.
    pub fn emit_ambient(&mut self, viewport: Viewport) -> AmbientMote {
        let size = viewport.size();
        let color = self
            .rng
            .pick(&self.palette)
            .copied()
            .unwrap_or(FALLBACK_MOTE_COLOR);

        AmbientMote {
            position: Vec2::new(self.rng.unit() * size.x, size.y + 10.0),
            velocity: Vec2::new(self.rng.signed(1.0), self.rng.range(-4.0, -1.0)),
            size: self.rng.range(2.0, 6.0),
            life: 1.0,
            decay: self.rng.range(0.005, 0.025),
            color,
            glow: self.rng.range(5.0, 15.0),
        }
    }

    /// Builds a GPU sparkle template at a screen position.
    ///
    /// `life` and `max_life` are placeholders; the slot supplies its own.
    #[must_use]
    pub fn gpu_spawn(&mut self, position: Vec2) -> GpuSparkle {
        let world = screen_to_world(position, self.viewport, self.world_scale);
        GpuSparkle {
            position: Vec3::new(world.x, world.y, self.rng.signed(1.0)),
            velocity: Vec3::new(
                self.rng.signed(0.01),
                self.rng.signed(0.01),
                self.rng.signed(0.01),
            ),
            life: 1.0,
            max_life: 1.0,
            decay: self.rng.range(0.01, 0.03),
            size: self.rng.range(10.0, 30.0),
            color: Rgb::new(1.0, self.rng.range(0.4, 0.9), self.rng.range(0.1, 0.4)),
        }
    }

    fn try_spawn_gpu(&mut self, targets: &mut SpawnTargets<'_>, position: Vec2) -> bool {
        let spawn = self.gpu_spawn(position);
        targets.gpu_sparkles.try_insert(spawn)
    }

    fn ring_direction(index: usize, count: usize) -> Vec2 {
        let angle = TAU * index as f32 / count as f32;
        Vec2::new(angle.cos(), angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{EffectPools, PoolSlot};

    fn setup() -> (EmissionController, EffectPools) {
        let config = EffectsConfig::default().with_seed(11);
        let mut rng = EffectRng::from_seed(11);
        let pools = EffectPools::new(&config, &mut rng);
        let controller = EmissionController::with_rng(&config, Viewport::new(1280, 720), rng);
        (controller, pools)
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-6
    }

    #[test]
    fn test_normalized_mapping_exact() {
        let viewport = Viewport::new(1280, 720);

        assert!(approx(screen_to_normalized(Vec2::new(640.0, 360.0), viewport), Vec2::ZERO));
        assert!(approx(screen_to_normalized(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0)));
        assert!(approx(
            screen_to_normalized(Vec2::new(1280.0, 720.0), viewport),
            Vec2::new(1.0, -1.0)
        ));
        assert!(approx(
            screen_to_world(Vec2::ZERO, viewport, 3.0),
            Vec2::new(-3.0, 3.0)
        ));
    }

    #[test]
    fn test_viewport_clamps() {
        assert_eq!(Viewport::new(0, 0), Viewport { width: 1, height: 1 });
        assert_eq!(
            Viewport::clamped(100, 900, 320, 240),
            Viewport { width: 320, height: 900 }
        );
    }

    #[test]
    fn test_small_move_only_trails() {
        let (mut controller, mut pools) = setup();

        let moved =
            controller.emit_on_move(&mut pools.targets(), Vec2::new(50.0, 50.0), Vec2::new(1.0, -1.0));

        assert!(!moved);
        assert_eq!(pools.trail().len(), 1);
        assert_eq!(pools.canvas_count(), 0);
        assert_eq!(pools.gpu_sparkles().live_count(), 0);
    }

    #[test]
    fn test_move_spawns_jittered_pair() {
        let (mut controller, mut pools) = setup();
        let at = Vec2::new(200.0, 300.0);

        assert!(controller.emit_on_move(&mut pools.targets(), at, Vec2::new(0.0, 4.0)));

        assert_eq!(pools.sparkles().len(), 1);
        assert_eq!(pools.embers().len(), 1);
        assert_eq!(pools.gpu_sparkles().live_count(), 1);

        let sparkle = pools.sparkles().as_slice()[0];
        assert!((sparkle.position - at).abs().max_element() <= 10.0);
        assert!((sparkle.life - 1.0).abs() < f32::EPSILON);

        let ember = pools.embers().as_slice()[0];
        assert!((ember.position - at).abs().max_element() <= 15.0);
        assert!(ember.velocity.y < 0.0);
    }

    #[test]
    fn test_burst_angles_evenly_spaced() {
        let (mut controller, mut pools) = setup();

        controller.emit_on_down(&mut pools.targets(), Vec2::new(400.0, 400.0));

        assert_eq!(pools.sparkles().len(), 20);
        assert_eq!(pools.embers().len(), 15);

        for (i, sparkle) in pools.sparkles().iter().enumerate() {
            let expected = TAU * i as f32 / 20.0;
            let actual = sparkle.velocity.y.atan2(sparkle.velocity.x);
            let diff = (actual - expected).rem_euclid(TAU);
            assert!(diff < 1e-4 || diff > TAU - 1e-4, "sparkle {i}: {actual} vs {expected}");

            let speed = sparkle.velocity.length();
            assert!((2.99..=9.01).contains(&speed), "speed {speed}");
            assert_eq!(sparkle.position, Vec2::new(400.0, 400.0));
        }
    }

    #[test]
    fn test_burst_gpu_attempts_respect_capacity() {
        let config = EffectsConfig {
            max_sparkles: 5,
            ..EffectsConfig::default()
        };
        let mut rng = EffectRng::from_seed(5);
        let mut pools = EffectPools::new(&config, &mut rng);
        let mut controller = EmissionController::with_rng(&config, Viewport::default(), rng);

        controller.emit_on_down(&mut pools.targets(), Vec2::new(10.0, 10.0));

        assert_eq!(pools.sparkles().len(), 20);
        assert_eq!(pools.gpu_sparkles().live_count(), 5);
    }

    #[test]
    fn test_gpu_spawn_in_world_space() {
        let (mut controller, mut pools) = setup();

        assert!(controller.emit_sparkle(&mut pools.targets(), Vec2::new(640.0, 360.0)));

        let (_, slot) = pools.gpu_sparkles().iter_live().next().unwrap();
        assert!(slot.position.x.abs() < 1e-6);
        assert!(slot.position.y.abs() < 1e-6);
        assert!(slot.position.z.abs() <= 1.0);
        assert!(slot.velocity.abs().max_element() <= 0.01);
        assert!((10.0..30.0).contains(&slot.size));
        assert!((slot.life - slot.max_life).abs() < f32::EPSILON);
        assert!(!slot.is_dead());
    }

    #[test]
    fn test_ambient_spawns_below_viewport() {
        let (mut controller, _) = setup();
        let viewport = Viewport::new(800, 600);

        for _ in 0..50 {
            let mote = controller.emit_ambient(viewport);
            assert!((0.0..800.0).contains(&mote.position.x));
            assert!((mote.position.y - 610.0).abs() < f32::EPSILON);
            assert!(mote.velocity.y < 0.0);
            assert!((2.0..6.0).contains(&mote.size));
        }
    }
}

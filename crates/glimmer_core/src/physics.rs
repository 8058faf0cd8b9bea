//! # Physics Integrator
//!
//! One explicit Euler step per frame, in this order for every particle:
//! position, forces, life, phase accumulators, removal.
//!
//! | Variant     | Gravity | Drag         | Life loss         |
//! |-------------|---------|--------------|-------------------|
//! | Sparkle     | 0.1     | vx *= 0.99   | own decay         |
//! | Ember       | 0.05    | vx *= 0.98   | own decay         |
//! | Trail point | -       | -            | own decay (0.05)  |
//! | GPU sparkle | -       | -            | see [`GpuDecayMode`] |
//! | Ambient     | -       | v *= 0.98    | own decay, respawned |

use crate::ambient::AmbientField;
use crate::config::{EffectsConfig, GpuDecayMode};
use crate::emission::EmissionController;
use crate::memory::EffectPools;
use crate::particle::{AmbientMote, Ember, GpuSparkle, Sparkle};

/// Downward acceleration of sparkles, per frame.
pub const SPARKLE_GRAVITY: f32 = 0.1;
/// Horizontal drag factor of sparkles.
pub const SPARKLE_DRAG: f32 = 0.99;
/// Downward acceleration of embers, per frame.
pub const EMBER_GRAVITY: f32 = 0.05;
/// Horizontal drag factor of embers.
pub const EMBER_DRAG: f32 = 0.98;
/// Flicker phase advance of embers, per frame.
pub const EMBER_FLICKER_RATE: f32 = 0.3;
/// Drag factor of ambient motes on both axes.
pub const AMBIENT_DRAG: f32 = 0.98;

/// Advances particles by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    gpu_decay: GpuDecayMode,
    gpu_fixed_decay: f32,
}

impl Integrator {
    /// Creates an integrator with the given GPU decay semantics.
    #[must_use]
    pub const fn new(gpu_decay: GpuDecayMode, gpu_fixed_decay: f32) -> Self {
        Self {
            gpu_decay,
            gpu_fixed_decay,
        }
    }

    /// Creates an integrator from the effects config.
    #[must_use]
    pub fn from_config(config: &EffectsConfig) -> Self {
        Self::new(config.gpu_decay, config.gpu_fixed_decay)
    }

    /// Steps every cursor collection. Must finish before any render pass reads.
    pub fn step(&self, pools: &mut EffectPools) {
        pools.sparkles_mut().update(step_sparkle);
        pools.embers_mut().update(step_ember);
        pools.trail_mut().update();

        let decay_mode = self.gpu_decay;
        let fixed = self.gpu_fixed_decay;
        pools
            .gpu_sparkles_mut()
            .update(|slot| step_gpu_sparkle(slot, decay_mode, fixed));
    }

    /// Steps the ambient field and replaces every expired mote.
    ///
    /// # Returns
    ///
    /// The number of motes respawned.
    pub fn step_ambient(&self, field: &mut AmbientField, emitter: &mut EmissionController) -> usize {
        let before = field.len();
        field.motes_mut().retain_mut(step_mote);
        let expired = before - field.len();

        field.refill(emitter);
        expired
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::from_config(&EffectsConfig::default())
    }
}

/// Rotation advances regardless of life.
fn step_sparkle(p: &mut Sparkle) -> bool {
    p.position += p.velocity;
    p.velocity.y += SPARKLE_GRAVITY;
    p.velocity.x *= SPARKLE_DRAG;
    p.life -= p.decay;
    p.rotation += p.rotation_speed;
    p.life > 0.0
}

fn step_ember(p: &mut Ember) -> bool {
    p.position += p.velocity;
    p.velocity.y += EMBER_GRAVITY;
    p.velocity.x *= EMBER_DRAG;
    p.life -= p.decay;
    p.flicker += EMBER_FLICKER_RATE;
    p.life > 0.0
}

/// No forces: constant slow drift.
fn step_gpu_sparkle(p: &mut GpuSparkle, mode: GpuDecayMode, fixed: f32) -> bool {
    p.position += p.velocity;
    p.life -= match mode {
        GpuDecayMode::Fixed => fixed,
        GpuDecayMode::PerInstance => p.decay,
    };
    p.life > 0.0
}

fn step_mote(p: &mut AmbientMote) -> bool {
    p.position += p.velocity;
    p.life -= p.decay;
    p.velocity *= AMBIENT_DRAG;
    p.life > 0.0
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::color::Rgb;
    use crate::emission::Viewport;
    use crate::memory::PoolSlot;
    use crate::rng::EffectRng;

    fn sparkle(decay: f32) -> Sparkle {
        Sparkle {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(2.0, -1.0),
            life: 1.0,
            decay,
            size: 5.0,
            color: Rgb::new(255.0, 150.0, 40.0),
            rotation: 0.0,
            rotation_speed: 0.1,
        }
    }

    fn gpu_spawn(decay: f32) -> GpuSparkle {
        GpuSparkle {
            position: Vec3::ZERO,
            velocity: Vec3::new(0.01, 0.0, -0.01),
            life: 1.0,
            max_life: 1.0,
            decay,
            size: 20.0,
            color: Rgb::new(1.0, 0.6, 0.2),
        }
    }

    fn pools(config: &EffectsConfig) -> EffectPools {
        EffectPools::new(config, &mut EffectRng::from_seed(9))
    }

    #[test]
    fn test_sparkle_step_order() {
        let mut p = sparkle(0.02);
        assert!(step_sparkle(&mut p));

        // Position uses the pre-step velocity
        assert_eq!(p.position, Vec2::new(102.0, 99.0));
        assert!((p.velocity.x - 1.98).abs() < 1e-6);
        assert!((p.velocity.y - (-0.9)).abs() < 1e-6);
        assert!((p.life - 0.98).abs() < 1e-6);
        assert!((p.rotation - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_life_strictly_decreases_until_removed() {
        let mut pools = pools(&EffectsConfig::default());
        pools.sparkles_mut().push(sparkle(0.03));
        let integrator = Integrator::default();

        let mut last = 1.0;
        while let Some(p) = pools.sparkles().iter().next().copied() {
            assert!(p.life < last || (p.life - 1.0).abs() < f32::EPSILON);
            assert!(p.life > 0.0);
            last = p.life;
            integrator.step(&mut pools);
        }
        assert!(pools.sparkles().is_empty());
    }

    #[test]
    fn test_ember_flicker_and_drag() {
        let mut e = Ember {
            position: Vec2::ZERO,
            velocity: Vec2::new(1.0, -2.0),
            life: 1.0,
            decay: 0.5,
            size: 4.0,
            color: Rgb::new(255.0, 100.0, 0.0),
            flicker: 0.0,
        };

        assert!(step_ember(&mut e));
        assert!((e.velocity.x - 0.98).abs() < 1e-6);
        assert!((e.velocity.y - (-1.95)).abs() < 1e-6);
        assert!((e.flicker - 0.3).abs() < 1e-6);

        assert!(!step_ember(&mut e));
        assert!((e.flicker - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_gpu_fixed_decay_ignores_instance_decay() {
        let mut pools = pools(&EffectsConfig::default());
        pools.gpu_sparkles_mut().acquire(gpu_spawn(0.5));
        let max_life = pools.gpu_sparkles().slots()[0].max_life;

        Integrator::new(GpuDecayMode::Fixed, 0.02).step(&mut pools);

        let slot = pools.gpu_sparkles().slots()[0];
        assert!((slot.life - (max_life - 0.02)).abs() < 1e-5);
        assert_eq!(slot.position, Vec3::new(0.01, 0.0, -0.01));
    }

    #[test]
    fn test_gpu_per_instance_decay() {
        let mut pools = pools(&EffectsConfig::default());
        pools.gpu_sparkles_mut().acquire(gpu_spawn(0.5));
        let max_life = pools.gpu_sparkles().slots()[0].max_life;

        Integrator::new(GpuDecayMode::PerInstance, 0.02).step(&mut pools);

        let slot = pools.gpu_sparkles().slots()[0];
        assert!((slot.life - (max_life - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_gpu_slot_zeroed_on_death() {
        let mut pools = pools(&EffectsConfig::default());
        pools.gpu_sparkles_mut().acquire(gpu_spawn(0.0));
        let integrator = Integrator::new(GpuDecayMode::Fixed, 0.5);

        for _ in 0..10 {
            integrator.step(&mut pools);
        }

        let slot = pools.gpu_sparkles().slots()[0];
        assert!(slot.is_dead());
        assert_eq!(slot.position, Vec3::ZERO);
        assert!(slot.size.abs() < f32::EPSILON);
        assert_eq!(pools.gpu_sparkles().live_count(), 0);
    }

    #[test]
    fn test_ambient_population_constant() {
        let config = EffectsConfig::default().with_seed(4);
        let mut emitter = EmissionController::new(&config, Viewport::new(640, 480));
        let mut field = AmbientField::new(12);
        field.refill(&mut emitter);
        let integrator = Integrator::default();

        let mut respawned = 0;
        for _ in 0..300 {
            respawned += integrator.step_ambient(&mut field, &mut emitter);
            assert_eq!(field.len(), 12);
        }
        // Min decay 0.005 means every initial mote dies within 200 frames
        assert!(respawned >= 12);
    }
}

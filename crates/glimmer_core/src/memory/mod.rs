//! # Particle Storage
//!
//! Two container policies behind one insertion interface:
//! - [`SlotPool`]: fixed slots, dead slots reused, never compacted (GPU sparkles)
//! - [`ParticleList`] / [`TrailBuffer`]: dynamic lists (canvas particles, trail)
//!
//! Emission only ever sees [`ParticleSink`], so it does not know which policy
//! backs a given variant.

mod list;
mod pool;

pub use list::{ParticleList, TrailBuffer};
pub use pool::{AcquirePolicy, PoolSlot, SlotPool};

use crate::config::EffectsConfig;
use crate::particle::{Ember, GpuSparkle, Sparkle, TrailPoint};
use crate::rng::EffectRng;

/// Append-only capability handed to emitters.
pub trait ParticleSink<P> {
    /// Offers a particle to the container.
    ///
    /// Returns false if it was dropped. Dropping is not an error.
    fn try_insert(&mut self, particle: P) -> bool;
}

/// Mutable insertion view of every cursor collection.
///
/// Borrowed by the emission controller for the duration of one event.
pub struct SpawnTargets<'a> {
    /// Canvas sparkles
    pub sparkles: &'a mut dyn ParticleSink<Sparkle>,
    /// Canvas embers
    pub embers: &'a mut dyn ParticleSink<Ember>,
    /// Motion trail
    pub trail: &'a mut dyn ParticleSink<TrailPoint>,
    /// GPU slots
    pub gpu_sparkles: &'a mut dyn ParticleSink<GpuSparkle>,
}

/// Owner of all cursor particle collections.
#[derive(Debug, Clone)]
pub struct EffectPools {
    sparkles: ParticleList<Sparkle>,
    embers: ParticleList<Ember>,
    trail: TrailBuffer,
    gpu_sparkles: SlotPool<GpuSparkle>,
}

impl EffectPools {
    /// Lower bound of the per-slot GPU lifetime.
    pub const GPU_MIN_LIFE: f32 = 1.0;
    /// Upper bound of the per-slot GPU lifetime.
    pub const GPU_MAX_LIFE: f32 = 3.0;

    /// Allocates every collection from the config.
    ///
    /// Each GPU slot draws its fixed `max_life` here, once.
    #[must_use]
    pub fn new(config: &EffectsConfig, rng: &mut EffectRng) -> Self {
        let gpu_sparkles = SlotPool::new(config.max_sparkles, config.slot_acquire, |_| {
            GpuSparkle::dead(rng.range(Self::GPU_MIN_LIFE, Self::GPU_MAX_LIFE))
        });

        Self {
            sparkles: ParticleList::with_capacity(config.max_sparkles),
            embers: ParticleList::with_capacity(config.max_embers),
            trail: TrailBuffer::new(config.max_trail_points),
            gpu_sparkles,
        }
    }

    /// Canvas sparkles.
    #[must_use]
    pub const fn sparkles(&self) -> &ParticleList<Sparkle> {
        &self.sparkles
    }

    /// Canvas embers.
    #[must_use]
    pub const fn embers(&self) -> &ParticleList<Ember> {
        &self.embers
    }

    /// Motion trail.
    #[must_use]
    pub const fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// GPU slot pool.
    #[must_use]
    pub const fn gpu_sparkles(&self) -> &SlotPool<GpuSparkle> {
        &self.gpu_sparkles
    }

    /// Mutable canvas sparkles.
    pub fn sparkles_mut(&mut self) -> &mut ParticleList<Sparkle> {
        &mut self.sparkles
    }

    /// Mutable canvas embers.
    pub fn embers_mut(&mut self) -> &mut ParticleList<Ember> {
        &mut self.embers
    }

    /// Mutable trail.
    pub fn trail_mut(&mut self) -> &mut TrailBuffer {
        &mut self.trail
    }

    /// Mutable GPU slot pool.
    pub fn gpu_sparkles_mut(&mut self) -> &mut SlotPool<GpuSparkle> {
        &mut self.gpu_sparkles
    }

    /// Splits the pools into insertion-only sinks.
    pub fn targets(&mut self) -> SpawnTargets<'_> {
        SpawnTargets {
            sparkles: &mut self.sparkles,
            embers: &mut self.embers,
            trail: &mut self.trail,
            gpu_sparkles: &mut self.gpu_sparkles,
        }
    }

    /// Number of live canvas particles (sparkles plus embers).
    #[must_use]
    pub fn canvas_count(&self) -> usize {
        self.sparkles.len() + self.embers.len()
    }

    /// Drops every particle. GPU slots keep their lifetimes.
    pub fn clear(&mut self) {
        self.sparkles.clear();
        self.embers.clear();
        self.trail.clear();
        self.gpu_sparkles.clear();
    }
}

//! Random source for particle variation.
//!
//! Seedable so tests can pin the sequence. Runs are not meant to replay
//! identically across builds; the seed only makes a single run reproducible.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Thin wrapper over ChaCha8 with the shapes emission needs.
#[derive(Debug, Clone)]
pub struct EffectRng {
    inner: ChaCha8Rng,
}

impl EffectRng {
    /// Creates a generator from a fixed seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from the wall clock.
    #[must_use]
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);
        Self::from_seed(nanos)
    }

    /// Creates a generator from an optional seed, falling back to the clock.
    #[must_use]
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_clock, Self::from_seed)
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Uniform float in `[lo, hi)`. An empty range yields `lo`.
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if lo < hi {
            self.inner.gen_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform float in `[-half_width, half_width)`.
    #[inline]
    pub fn signed(&mut self, half_width: f32) -> f32 {
        self.range(-half_width, half_width)
    }

    /// Uniform angle in `[0, 2π)`.
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.range(0.0, std::f32::consts::TAU)
    }

    /// Picks one element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.inner.gen_range(0..items.len()))
    }
}

//! Ambient field of motes rising from the bottom edge.
//!
//! The population is constant: every expired mote is replaced by a new one
//! at the bottom, so the field never drains.

use crate::emission::EmissionController;
use crate::particle::AmbientMote;

/// Fixed-population collection of [`AmbientMote`]s.
#[derive(Debug, Clone, Default)]
pub struct AmbientField {
    motes: Vec<AmbientMote>,
    population: usize,
}

impl AmbientField {
    /// Creates an empty field that [`refill`](Self::refill) grows to `population`.
    #[must_use]
    pub fn new(population: usize) -> Self {
        Self {
            motes: Vec::with_capacity(population),
            population,
        }
    }

    /// Target population.
    #[must_use]
    pub const fn population(&self) -> usize {
        self.population
    }

    /// Live motes, oldest first.
    #[must_use]
    pub fn motes(&self) -> &[AmbientMote] {
        &self.motes
    }

    /// Mutable access for the integrator.
    pub fn motes_mut(&mut self) -> &mut Vec<AmbientMote> {
        &mut self.motes
    }

    /// Number of live motes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.motes.len()
    }

    /// Returns true if no motes are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.motes.is_empty()
    }

    /// Spawns motes at the bottom of the emitter's viewport until the
    /// population is reached.
    pub fn refill(&mut self, emitter: &mut EmissionController) {
        let viewport = emitter.viewport();
        while self.motes.len() < self.population {
            self.motes.push(emitter.emit_ambient(viewport));
        }
    }
}

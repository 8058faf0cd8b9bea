//! # Glimmer Core
//!
//! Particle simulation for cursor-following decorative effects:
//! - Sparkles and embers shed by a moving pointer
//! - A bounded motion trail
//! - Radial click bursts
//! - GPU-backed sparkles living in a fixed slot pool
//! - An ever-respawning ambient field of rising motes
//!
//! ## Frame Flow
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  pointer / click / ambient timer                             │
//! │        ↓                                                      │
//! │  EmissionController ──try_insert──> EffectPools (sinks)      │
//! │                                         ↓   every frame       │
//! │                                    Integrator::step           │
//! │                                         ↓                     │
//! │                             renderer (read-only borrow)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is single-threaded and strictly sequenced: the
//! integrator finishes mutating before any renderer borrows the pools.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ambient;
pub mod color;
pub mod config;
pub mod emission;
pub mod error;
pub mod memory;
pub mod particle;
pub mod physics;
pub mod rng;

pub use ambient::AmbientField;
pub use color::{Rgb, Rgba};
pub use config::{AmbientConfig, EffectsConfig, GpuDecayMode};
pub use emission::{screen_to_normalized, screen_to_world, EmissionController, Viewport};
pub use error::{ConfigError, ConfigResult};
pub use memory::{
    AcquirePolicy, EffectPools, ParticleList, ParticleSink, PoolSlot, SlotPool, SpawnTargets,
    TrailBuffer,
};
pub use particle::{AmbientMote, Ember, GpuSparkle, Sparkle, TrailPoint};
pub use physics::Integrator;
pub use rng::EffectRng;

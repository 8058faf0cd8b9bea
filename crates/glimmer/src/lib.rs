//! # Glimmer
//!
//! Cursor-following decorative effects: sparkles and embers shed by the
//! pointer, a fading motion trail, radial click bursts, and GPU point-sprite
//! sparkles floating in a 3D layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                          GLIMMER ENGINE                            │
//! ├────────────────────────────────────────────────────────────────────┤
//! │                                                                    │
//! │  host events ──> CursorEffects ──────────────┐                     │
//! │  EffectRemote ──> (commands, next frame)     │                     │
//! │                                              ↓                     │
//! │  ┌─────────────────┐    tick    ┌─────────────────────────────┐    │
//! │  │   FrameDriver   │──────────> │ integrate → render(t)       │    │
//! │  │  Idle / Running │            │  glimmer_core  (simulation) │    │
//! │  └─────────────────┘            │  glimmer_rendering (passes) │    │
//! │                                 └─────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `effects`: the engine that owns pools, emitter and surfaces
//! - `events`: effect commands for choreography layers
//! - `frame_loop`: the per-refresh driver and teardown
//! - `input`: pointer state

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod effects;
pub mod events;
pub mod frame_loop;
pub mod input;

// Re-export the layers
pub use glimmer_core as core;
pub use glimmer_rendering as rendering;

// Re-export commonly used types
pub use effects::CursorEffects;
pub use events::{EffectCommand, EffectRemote, ScreenRect};
pub use frame_loop::{DriverState, FrameDriver, FrameStats, FrameTarget, LiveCounts, StopHandle};
pub use input::PointerState;

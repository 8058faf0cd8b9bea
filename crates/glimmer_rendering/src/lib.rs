//! # Glimmer Rendering
//!
//! The dual renderer for the cursor effects engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ONE FRAME (after integration)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CanvasPass ──> Canvas2d layers (sparkle / ember / ambient)  │
//! │     trail segments, 8-point stars, flickering embers         │
//! │                                                              │
//! │  PointSpriteBuffer::write_from(slot pool)                    │
//! │     └──> PointSpriteBackend::draw  (one draw call)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both passes run every frame. Either may be absent; the other still runs.
//! Renderers only borrow particle state immutably.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod canvas;
pub mod error;
pub mod sprites;

pub use canvas::{
    Canvas2d, CanvasLayers, CanvasPass, CanvasStats, ColorStop, CompositeMode, DrawCommand,
    LineCap, Paint, RecordingCanvas, Shadow,
};
pub use error::{RenderError, RenderResult};
pub use sprites::{
    DirtyAttributes, PointSpriteBackend, PointSpriteBuffer, SpriteBlend, SpriteCamera,
    SpriteUniforms, WgpuPointSprites, POINT_SPRITE_SHADER,
};

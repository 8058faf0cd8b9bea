//! # GPU Point-Sprite Pass
//!
//! ```text
//! SlotPool<GpuSparkle> ──write_from──> PointSpriteBuffer (positions, colors, sizes, time)
//!                                           │ dirty flags
//!                                           ↓
//!                                 PointSpriteBackend::draw
//!                                   (one instanced draw call)
//! ```

mod backend;
mod buffer;
mod camera;
mod shaders;
mod wgpu_backend;

pub use backend::PointSpriteBackend;
pub use buffer::{DirtyAttributes, PointSpriteBuffer};
pub use camera::{SpriteCamera, SpriteUniforms};
pub use shaders::{SpriteBlend, POINT_SPRITE_SHADER};
pub use wgpu_backend::WgpuPointSprites;

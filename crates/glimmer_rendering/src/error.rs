//! Errors raised while building a GPU backend.
//!
//! Per-frame rendering never returns these. They only surface from
//! construction, after which the host decides whether to run without the
//! sprite pass.

use thiserror::Error;

/// GPU backend construction failure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The window could not be turned into a presentable surface.
    #[error("failed to create GPU surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No adapter can present to the surface.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// The adapter refused to open a device.
    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The surface reports no usable texture format.
    #[error("surface has no supported texture format")]
    UnsupportedSurface,
}

/// Result alias for backend construction.
pub type RenderResult<T> = Result<T, RenderError>;

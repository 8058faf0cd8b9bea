//! GPU-side consumer of a [`PointSpriteBuffer`].

use super::PointSpriteBuffer;

/// Draws the whole sprite set with one submission per frame.
///
/// Implementations absorb every per-frame failure. A backend that can no
/// longer draw turns [`draw`](Self::draw) into a no-op.
pub trait PointSpriteBackend {
    /// Resizes the target surface and camera.
    fn resize(&mut self, width: u32, height: u32);

    /// Uploads dirty arrays, advances the time uniform and draws.
    fn draw(&mut self, sprites: &mut PointSpriteBuffer);

    /// Frees the surface. Must be safe to call more than once.
    fn release(&mut self);

    /// Returns false once the backend has been released or disabled.
    fn is_active(&self) -> bool {
        true
    }
}

impl<B: PointSpriteBackend + ?Sized> PointSpriteBackend for Box<B> {
    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn draw(&mut self, sprites: &mut PointSpriteBuffer) {
        (**self).draw(sprites);
    }

    fn release(&mut self) {
        (**self).release();
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

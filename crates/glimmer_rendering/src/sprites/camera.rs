//! Perspective camera for the sparkle scene.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Uniform block consumed by the point-sprite shader.
///
/// Layout matches the WGSL `Uniforms` struct: two matrices, then
/// `viewport`, `time` and `pixel_ratio` packed into the last 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteUniforms {
    /// World to view
    pub view: [[f32; 4]; 4],
    /// View to clip
    pub proj: [[f32; 4]; 4],
    /// Framebuffer size in pixels
    pub viewport: [f32; 2],
    /// Shimmer time in seconds
    pub time: f32,
    /// Physical pixels per logical pixel
    pub pixel_ratio: f32,
}

/// Fixed camera looking down -Z at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteCamera {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
    /// Eye position
    pub eye: Vec3,
    /// Width over height
    pub aspect: f32,
}

impl SpriteCamera {
    /// Creates the camera for a `width` x `height` surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 0.0, 5.0),
            aspect: 1.0,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Recomputes the aspect ratio.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// World to view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, Vec3::new(self.eye.x, self.eye.y, 0.0), Vec3::Y)
    }

    /// View to clip matrix, wgpu depth range.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Pixel size of a sprite at `position`, as the shader computes it.
    #[must_use]
    pub fn point_size(&self, size: f32, position: Vec3) -> f32 {
        let depth = -self.view().transform_point3(position).z;
        size * 300.0 / depth.max(0.0001)
    }

    /// Builds the uniform block for one frame.
    #[must_use]
    pub fn uniforms(&self, viewport: [u32; 2], time: f32, pixel_ratio: f32) -> SpriteUniforms {
        SpriteUniforms {
            view: self.view().to_cols_array_2d(),
            proj: self.projection().to_cols_array_2d(),
            viewport: [viewport[0].max(1) as f32, viewport[1].max(1) as f32],
            time,
            pixel_ratio,
        }
    }
}

impl Default for SpriteCamera {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn ndc(camera: &SpriteCamera, world: Vec3) -> Vec3 {
        let clip = camera.projection() * camera.view() * Vec4::new(world.x, world.y, world.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = SpriteCamera::new(1280, 720);
        let p = ndc(&camera, Vec3::ZERO);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&p.z));
    }

    #[test]
    fn test_world_scale_slab_visible() {
        // Pointer mapping scales the vertical edge to +-3
        let camera = SpriteCamera::new(1280, 720);
        let top = ndc(&camera, Vec3::new(0.0, 3.0, 0.0));
        assert!(top.y > 0.0 && top.y < 1.0);
    }

    #[test]
    fn test_point_size_attenuation() {
        let camera = SpriteCamera::default();
        assert!((camera.point_size(10.0, Vec3::ZERO) - 600.0).abs() < 1e-3);
        assert!(camera.point_size(10.0, Vec3::new(0.0, 0.0, -5.0)) < 600.0);
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<SpriteUniforms>(), 144);
        let u = SpriteCamera::new(0, 0).uniforms([0, 0], 1.5, 2.0);
        assert_eq!(u.viewport, [1.0, 1.0]);
    }
}

//! Point-sprite shader and blend configuration.
//!
//! wgpu has no point size, so each sprite is an instanced quad sized in
//! pixels by the vertex shader:
//!
//! ```text
//! point_size = size * 300 / -z_view          (pixels)
//! alpha      = 1 / (1 + 0.1 * |view_pos|)     (distance falloff)
//!            * (sin(3t + 10x) * 0.5 + 0.5)    (shimmer)
//! fragment   : discard outside r = 0.5,
//!              a = (1 - 2d) * alpha * (1 - 2d)^2
//! ```
//!
//! Blending is additive with no depth writes, so sprites never need sorting.

/// WGSL source for the point-sprite pipeline.
pub const POINT_SPRITE_SHADER: &str = r"
struct Uniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    viewport: vec2<f32>,
    time: f32,
    pixel_ratio: f32,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) alpha: f32,
    @location(2) corner: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) size: f32,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, 0.5),
    );
    let corner = corners[vertex_index];

    let view_pos = u.view * vec4<f32>(position, 1.0);
    var clip = u.proj * view_pos;

    let depth = max(-view_pos.z, 0.0001);
    let point_size = size * (300.0 / depth) * u.pixel_ratio;
    let offset = corner * point_size * 2.0 / u.viewport;
    clip = vec4<f32>(clip.xy + offset * clip.w, clip.zw);

    let falloff = 1.0 / (1.0 + length(view_pos.xyz) * 0.1);
    let shimmer = sin(u.time * 3.0 + position.x * 10.0) * 0.5 + 0.5;

    var out: VertexOutput;
    out.clip = clip;
    out.color = color;
    out.alpha = falloff * shimmer;
    out.corner = corner;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.corner);
    if dist > 0.5 {
        discard;
    }

    let edge = 1.0 - dist * 2.0;
    let alpha = edge * in.alpha * edge * edge;
    return vec4<f32>(in.color, alpha);
}
";

/// How sprites combine with the cleared surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpriteBlend {
    /// `SRC_ALPHA + ONE` color, `ONE + ONE` alpha. Overlaps brighten.
    #[default]
    Additive,
    /// `ONE + ONE_MINUS_SRC` color. Brightens without blowing out to white;
    /// matches a `screen` page composite.
    Screen,
}

impl SpriteBlend {
    /// The wgpu blend state for this mode.
    #[must_use]
    pub const fn blend_state(self) -> wgpu::BlendState {
        let alpha = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        match self {
            Self::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha,
            },
            Self::Screen => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::OneMinusSrc,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_entry_points() {
        assert!(POINT_SPRITE_SHADER.contains("fn vs_main"));
        assert!(POINT_SPRITE_SHADER.contains("fn fs_main"));
        assert!(POINT_SPRITE_SHADER.contains("discard"));
    }

    #[test]
    fn test_additive_never_darkens() {
        let state = SpriteBlend::Additive.blend_state();
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(state.color.operation, wgpu::BlendOperation::Add);
    }

    #[test]
    fn test_screen_blend() {
        let state = SpriteBlend::Screen.blend_state();
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::OneMinusSrc);
    }
}

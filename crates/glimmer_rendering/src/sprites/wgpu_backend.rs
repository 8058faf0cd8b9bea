//! wgpu implementation of [`PointSpriteBackend`].
//!
//! Three instance-rate vertex buffers (positions, colors, sizes) feed six
//! generated quad vertices per sprite. One render pass, one draw call.
//!
//! Surface errors never escape a frame:
//! - `Lost` / `Outdated`: reconfigure, skip this frame
//! - `Timeout`: skip this frame
//! - `OutOfMemory`: drop the GPU state, later frames are no-ops

use std::mem::size_of;

use super::shaders::POINT_SPRITE_SHADER;
use super::{PointSpriteBackend, PointSpriteBuffer, SpriteBlend, SpriteCamera, SpriteUniforms};
use crate::error::{RenderError, RenderResult};

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const SIZE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32];

/// Everything that lives on the device.
struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    sizes: wgpu::Buffer,
    capacity: usize,
}

enum FrameOutcome {
    Presented,
    Skipped,
    Fatal,
}

/// Point sprites drawn onto a window surface with wgpu.
pub struct WgpuPointSprites {
    gpu: Option<GpuState>,
    camera: SpriteCamera,
    pixel_ratio: f32,
    frames: u64,
}

impl WgpuPointSprites {
    /// Opens a device for `target` and builds the sprite pipeline.
    ///
    /// # Errors
    ///
    /// Fails if the surface, adapter or device cannot be created. The host
    /// may then run the engine without a sprite pass.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        capacity: usize,
        blend: SpriteBlend,
    ) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        tracing::info!(adapter = %adapter.get_info().name, "sprite backend adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("glimmer sprite device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("point sprite shader"),
            source: wgpu::ShaderSource::Wgsl(POINT_SPRITE_SHADER.into()),
        });

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite uniforms"),
            size: size_of::<SpriteUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite uniforms layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite uniforms"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("point sprites"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[
                    instance_layout(12, &POSITION_ATTRIBUTES),
                    instance_layout(12, &COLOR_ATTRIBUTES),
                    instance_layout(4, &SIZE_ATTRIBUTES),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend.blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // No depth buffer: additive sprites never occlude each other
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let slots = capacity.max(1) as u64;
        let positions = instance_buffer(&device, "sprite positions", slots * 12);
        let colors = instance_buffer(&device, "sprite colors", slots * 12);
        let sizes = instance_buffer(&device, "sprite sizes", slots * 4);

        tracing::info!(capacity, width, height, ?blend, "sprite backend ready");

        Ok(Self {
            gpu: Some(GpuState {
                surface,
                device,
                queue,
                config,
                pipeline,
                uniforms,
                bind_group,
                positions,
                colors,
                sizes,
                capacity,
            }),
            camera: SpriteCamera::new(width, height),
            pixel_ratio: 1.0,
            frames: 0,
        })
    }

    /// Sets the physical-to-logical pixel ratio used for sprite sizing.
    pub fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio.max(0.1);
    }

    /// Frames presented so far.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Camera used for the sprite scene.
    #[must_use]
    pub const fn camera(&self) -> &SpriteCamera {
        &self.camera
    }
}

impl PointSpriteBackend for WgpuPointSprites {
    fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);

        if let Some(gpu) = self.gpu.as_mut() {
            gpu.config.width = width.max(1);
            gpu.config.height = height.max(1);
            gpu.surface.configure(&gpu.device, &gpu.config);
            tracing::debug!(width, height, "sprite surface resized");
        }
    }

    fn draw(&mut self, sprites: &mut PointSpriteBuffer) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        match draw_frame(gpu, &self.camera, self.pixel_ratio, sprites) {
            FrameOutcome::Presented => self.frames += 1,
            FrameOutcome::Skipped => {}
            FrameOutcome::Fatal => {
                tracing::warn!("GPU out of memory, sprite pass disabled");
                self.gpu = None;
            }
        }
    }

    fn release(&mut self) {
        if self.gpu.take().is_some() {
            tracing::info!(frames = self.frames, "sprite backend released");
        }
    }

    fn is_active(&self) -> bool {
        self.gpu.is_some()
    }
}

fn draw_frame(
    gpu: &mut GpuState,
    camera: &SpriteCamera,
    pixel_ratio: f32,
    sprites: &mut PointSpriteBuffer,
) -> FrameOutcome {
    let count = sprites.capacity().min(gpu.capacity);
    let dirty = sprites.take_dirty();

    if count > 0 {
        if dirty.positions {
            let bytes = &sprites.positions_bytes()[..count * 12];
            gpu.queue.write_buffer(&gpu.positions, 0, bytes);
        }
        if dirty.colors {
            let bytes = &sprites.colors_bytes()[..count * 12];
            gpu.queue.write_buffer(&gpu.colors, 0, bytes);
        }
        if dirty.sizes {
            let bytes = &sprites.sizes_bytes()[..count * 4];
            gpu.queue.write_buffer(&gpu.sizes, 0, bytes);
        }
    }

    let uniforms = camera.uniforms(
        [gpu.config.width, gpu.config.height],
        sprites.time(),
        pixel_ratio,
    );
    gpu.queue
        .write_buffer(&gpu.uniforms, 0, bytemuck::bytes_of(&uniforms));

    let frame = match gpu.surface.get_current_texture() {
        Ok(frame) => frame,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            gpu.surface.configure(&gpu.device, &gpu.config);
            tracing::debug!("sprite surface reconfigured, frame skipped");
            return FrameOutcome::Skipped;
        }
        Err(wgpu::SurfaceError::Timeout) => return FrameOutcome::Skipped,
        Err(wgpu::SurfaceError::OutOfMemory) => return FrameOutcome::Fatal,
    };

    let view = frame
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("sprite frame"),
        });

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if count > 0 {
            pass.set_pipeline(&gpu.pipeline);
            pass.set_bind_group(0, &gpu.bind_group, &[]);
            pass.set_vertex_buffer(0, gpu.positions.slice(..));
            pass.set_vertex_buffer(1, gpu.colors.slice(..));
            pass.set_vertex_buffer(2, gpu.sizes.slice(..));
            pass.draw(0..6, 0..count as u32);
        }
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
    frame.present();
    FrameOutcome::Presented
}

fn instance_layout(
    stride: u64,
    attributes: &'static [wgpu::VertexAttribute],
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: stride,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    }
}

fn instance_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

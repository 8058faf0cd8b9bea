//! # Glimmer Demo
//!
//! A window running the GPU sparkle layer under the pointer.
//!
//! No 2D surface is attached, so the canvas pass is skipped and only the
//! point sprites are drawn. Left click bursts.
//!
//! ```text
//! RUST_LOG=debug cargo run -p glimmer --features window --bin glimmer_demo [config.toml]
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use glimmer::core::EffectsConfig;
use glimmer::rendering::{Canvas2d, CanvasLayers, SpriteBlend, WgpuPointSprites};
use glimmer::{CursorEffects, FrameDriver};
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

type DemoEffects = CursorEffects<Box<dyn Canvas2d>, WgpuPointSprites>;

fn load_config() -> EffectsConfig {
    let Some(path) = std::env::args().nth(1) else {
        return EffectsConfig::default();
    };
    match EffectsConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(%path, error = %e, "config rejected, using defaults");
            EffectsConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!(error = %e, "failed to create event loop");
            return ExitCode::FAILURE;
        }
    };
    let window = match WindowBuilder::new()
        .with_title("glimmer")
        .with_inner_size(PhysicalSize::new(1280, 720))
        .build(&event_loop)
    {
        Ok(window) => Arc::new(window),
        Err(e) => {
            tracing::error!(error = %e, "failed to create window");
            return ExitCode::FAILURE;
        }
    };

    let size = window.inner_size();
    let backend = match pollster::block_on(WgpuPointSprites::new(
        Arc::clone(&window),
        size.width,
        size.height,
        config.max_sparkles,
        SpriteBlend::Additive,
    )) {
        Ok(mut sprites) => {
            sprites.set_pixel_ratio(window.scale_factor() as f32);
            Some(sprites)
        }
        Err(e) => {
            tracing::warn!(error = %e, "GPU sprites unavailable");
            None
        }
    };

    let effects =
        match DemoEffects::new(config, size.width, size.height, CanvasLayers::none(), backend) {
            Ok(effects) => effects,
            Err(e) => {
                tracing::error!(error = %e, "invalid effects config");
                return ExitCode::FAILURE;
            }
        };

    let mut driver = FrameDriver::new(effects);
    let clock = Instant::now();

    let result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        match event {
            Event::Resumed => {
                driver.start();
                window.request_redraw();
            }
            Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    driver.teardown();
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. }
                    if event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
                {
                    driver.teardown();
                    elwt.exit();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    driver
                        .target_mut()
                        .pointer_move(position.x as f32, position.y as f32);
                }
                WindowEvent::MouseInput {
                    button: MouseButton::Left,
                    state,
                    ..
                } => match state {
                    ElementState::Pressed => driver.target_mut().pointer_down(),
                    ElementState::Released => driver.target_mut().pointer_up(),
                },
                WindowEvent::Resized(new_size) => {
                    driver.target_mut().resize(new_size.width, new_size.height);
                }
                WindowEvent::RedrawRequested => {
                    let now = clock.elapsed().as_secs_f64();
                    if driver.tick(now).is_continue() {
                        window.request_redraw();
                    } else {
                        elwt.exit();
                    }

                    let stats = driver.last_stats();
                    if stats.frame > 0 && stats.frame % 600 == 0 {
                        tracing::debug!(
                            frame = stats.frame,
                            gpu = stats.counts.gpu_sparkles,
                            trail = stats.counts.trail_points,
                            "frame stats"
                        );
                    }
                }
                _ => {}
            },
            Event::LoopExiting => driver.teardown(),
            _ => {}
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "event loop failed");
            ExitCode::FAILURE
        }
    }
}

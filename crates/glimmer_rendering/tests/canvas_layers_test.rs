//! # Canvas Layers Integration Test
//!
//! Runs the canvas pass over boxed, mixed surface types the way a host
//! with several 2D backends would.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use glimmer_core::{EffectPools, EffectRng, EffectsConfig, EmissionController, Viewport};
use glimmer_rendering::{
    Canvas2d, CanvasLayers, CanvasPass, CompositeMode, DrawCommand, LineCap, Paint,
    RecordingCanvas, Shadow,
};

/// A recorder the test can still read after handing it to the layers.
#[derive(Clone, Default)]
struct SharedCanvas(Rc<RefCell<RecordingCanvas>>);

impl Canvas2d for SharedCanvas {
    fn size(&self) -> (u32, u32) {
        self.0.borrow().size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().resize(width, height);
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.0.borrow_mut().set_composite(mode);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.0.borrow_mut().set_shadow(shadow);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, paint: &Paint, width: f32, cap: LineCap) {
        self.0.borrow_mut().stroke_line(from, to, paint, width, cap);
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        self.0.borrow_mut().fill_polygon(points, paint);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.0.borrow_mut().fill_circle(center, radius, paint);
    }
}

fn scene() -> (EffectPools, EmissionController) {
    let config = EffectsConfig::default().with_seed(21);
    let mut rng = EffectRng::from_seed(21);
    let pools = EffectPools::new(&config, &mut rng);
    let emitter = EmissionController::with_rng(&config, Viewport::new(1280, 720), rng);
    (pools, emitter)
}

/// Test: boxed layers of different types each get their own content.
#[test]
fn test_boxed_mixed_layers() {
    let sparkle = SharedCanvas::default();
    let ember = SharedCanvas::default();
    let mut layers: CanvasLayers<Box<dyn Canvas2d>> =
        CanvasLayers::cursor(Box::new(sparkle.clone()), Box::new(ember.clone()));

    let (mut pools, mut emitter) = scene();
    {
        let mut targets = pools.targets();
        for i in 0..6 {
            let p = Vec2::new(100.0 + i as f32 * 10.0, 100.0);
            emitter.emit_on_move(&mut targets, p, Vec2::new(10.0, 0.0));
        }
    }

    let mut pass = CanvasPass::new();
    let stats = pass.draw(&mut layers, &pools, None);
    assert_eq!(stats.segments, 5);
    assert_eq!(stats.sparkles, 6);
    assert_eq!(stats.embers, 6);

    let sparkle = sparkle.0.borrow();
    let lines = sparkle
        .draws()
        .filter(|c| matches!(c, DrawCommand::StrokeLine { cap: LineCap::Round, .. }))
        .count();
    let stars = sparkle
        .draws()
        .filter(|c| matches!(c, DrawCommand::FillPolygon { points, .. } if points.len() == 8))
        .count();
    assert_eq!(lines, 5);
    assert_eq!(stars, 6);
    assert_eq!(sparkle.composite(), CompositeMode::Lighter);

    let ember = ember.0.borrow();
    assert!(ember
        .draws()
        .all(|c| matches!(c, DrawCommand::FillCircle { .. })));
    assert_eq!(ember.draw_count(), 6);
}

/// Test: resize reaches every boxed layer, and each redraw starts clean.
#[test]
fn test_resize_and_redraw() {
    let sparkle = SharedCanvas::default();
    let mut layers: CanvasLayers<Box<dyn Canvas2d>> = CanvasLayers::none();
    layers.sparkle = Some(Box::new(sparkle.clone()));
    layers.resize(640, 480);
    assert_eq!(sparkle.size(), (640, 480));

    let (mut pools, mut emitter) = scene();
    emitter.emit_on_down(&mut pools.targets(), Vec2::new(320.0, 240.0));

    let mut pass = CanvasPass::new();
    pass.draw(&mut layers, &pools, None);
    pass.draw(&mut layers, &pools, None);

    let canvas = sparkle.0.borrow();
    assert_eq!(canvas.clear_count(), 2);
    assert_eq!(canvas.draw_count(), 20);
    assert_eq!(pass.last_stats().embers, 0);
}

/// Test: a host replaying a frame takes its commands, and the next frame
/// records from a clean list.
#[test]
fn test_take_commands_for_replay() {
    let ember = SharedCanvas::default();
    let mut layers: CanvasLayers<Box<dyn Canvas2d>> = CanvasLayers::none();
    layers.ember = Some(Box::new(ember.clone()));

    let (mut pools, mut emitter) = scene();
    {
        let mut targets = pools.targets();
        for i in 0..3 {
            let p = Vec2::new(200.0 + i as f32 * 10.0, 200.0);
            emitter.emit_on_move(&mut targets, p, Vec2::new(10.0, 0.0));
        }
    }

    let mut pass = CanvasPass::new();
    pass.draw(&mut layers, &pools, None);

    let frame = ember.0.borrow_mut().take_commands();
    assert_eq!(frame.first(), Some(&DrawCommand::Clear));
    assert_eq!(frame.iter().filter(|c| c.is_draw()).count(), 3);
    assert!(ember.0.borrow().commands().is_empty());
    assert_eq!(ember.0.borrow().clear_count(), 1);

    pass.draw(&mut layers, &pools, None);
    let next = ember.0.borrow_mut().take_commands();
    assert_eq!(next.first(), Some(&DrawCommand::Clear));
    assert_eq!(next.len(), frame.len());
    assert_eq!(ember.0.borrow().clear_count(), 2);
}

//! # Cursor Effects Engine
//!
//! Owns every piece of one cursor effect instance and wires them in frame
//! order:
//!
//! ```text
//! pointer_move / pointer_down ──> EmissionController ──> EffectPools
//! EffectRemote commands ────────────────┘  (applied at the top of integrate)
//!
//! integrate():  commands → Integrator::step → Integrator::step_ambient
//! render(t):    CanvasPass::draw(layers)  →  PointSpriteBuffer → backend.draw
//! release():    backend.release(), canvases cleared, once
//! ```
//!
//! Absent surfaces are not errors. With no canvas layers the canvas pass
//! draws nothing; with no sprite backend the GPU pass is skipped. The
//! simulation runs either way.

use glam::Vec2;
use glimmer_core::{
    AmbientField, ConfigResult, EffectPools, EffectRng, EffectsConfig, EmissionController,
    Integrator, Viewport,
};
use glimmer_rendering::{
    Canvas2d, CanvasLayers, CanvasPass, CanvasStats, PointSpriteBackend, PointSpriteBuffer,
};

use crate::events::{
    CommandQueue, EffectCommand, EffectRemote, ScreenRect, DEFAULT_COMMAND_CAPACITY,
};
use crate::frame_loop::{FrameTarget, LiveCounts};
use crate::input::PointerState;

/// Cursor-following sparkles, embers, trail and bursts over two surfaces.
///
/// `C` is the 2D surface type, `B` the point-sprite backend. Hosts that mix
/// surface kinds use the boxed defaults.
pub struct CursorEffects<C = Box<dyn Canvas2d>, B = Box<dyn PointSpriteBackend>> {
    config: EffectsConfig,
    viewport: Viewport,
    pointer: PointerState,

    pools: EffectPools,
    emitter: EmissionController,
    integrator: Integrator,
    ambient: Option<AmbientField>,

    layers: CanvasLayers<C>,
    canvas_pass: CanvasPass,
    sprites: PointSpriteBuffer,
    backend: Option<B>,

    commands: CommandQueue,
    released: bool,
}

impl<C: Canvas2d, B: PointSpriteBackend> CursorEffects<C, B> {
    /// Builds the engine for a `width` x `height` viewport.
    ///
    /// The size is clamped to the configured floor and pushed to every
    /// present surface.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is unusable.
    pub fn new(
        config: EffectsConfig,
        width: u32,
        height: u32,
        layers: CanvasLayers<C>,
        backend: Option<B>,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let viewport = Viewport::clamped(width, height, config.min_width, config.min_height);
        let mut rng = EffectRng::from_optional_seed(config.seed);
        let pools = EffectPools::new(&config, &mut rng);
        let mut emitter = EmissionController::with_rng(&config, viewport, rng);

        let ambient = config.ambient.enabled.then(|| {
            let mut field = AmbientField::new(config.ambient.max_particles);
            field.refill(&mut emitter);
            field
        });

        if layers.is_empty() {
            tracing::warn!("no 2D surfaces, canvas pass skipped");
        } else if ambient.is_some() && layers.ambient.is_none() {
            tracing::debug!("ambient field enabled without a surface, motes simulated only");
        }
        if backend.is_none() {
            tracing::warn!("no GPU surface, sprite pass skipped");
        }

        let mut effects = Self {
            sprites: PointSpriteBuffer::new(config.max_sparkles),
            commands: CommandQueue::new(DEFAULT_COMMAND_CAPACITY),
            integrator: Integrator::from_config(&config),
            pointer: PointerState::new(),
            canvas_pass: CanvasPass::new(),
            released: false,
            config,
            viewport,
            pools,
            emitter,
            ambient,
            layers,
            backend,
        };
        effects.resize_surfaces();

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            max_sparkles = effects.config.max_sparkles,
            max_trail_points = effects.config.max_trail_points,
            "cursor effects ready"
        );
        Ok(effects)
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Pointer moved to `(x, y)`.
    ///
    /// Always extends the trail. Sparkle, ember and a GPU attempt follow
    /// when the move exceeds the threshold.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        let velocity = self.pointer.move_to(position);
        let mut targets = self.pools.targets();
        self.emitter.emit_on_move(&mut targets, position, velocity);
    }

    /// Primary button pressed: burst at the pointer.
    pub fn pointer_down(&mut self) {
        self.pointer.press();
        self.emit_on_down();
    }

    /// Primary button released.
    pub fn pointer_up(&mut self) {
        self.pointer.release();
    }

    /// Viewport changed. Sizes below the floor are clamped.
    pub fn resize(&mut self, width: u32, height: u32) {
        let viewport =
            Viewport::clamped(width, height, self.config.min_width, self.config.min_height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.emitter.set_viewport(viewport);
        self.resize_surfaces();
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
    }

    fn resize_surfaces(&mut self) {
        let Viewport { width, height } = self.viewport;
        self.layers.resize(width, height);
        if let Some(backend) = self.backend.as_mut() {
            backend.resize(width, height);
        }
    }

    // =========================================================================
    // Choreography hooks
    // =========================================================================

    /// Moves the tracked pointer without emitting anything.
    pub fn set_pointer_position(&mut self, x: f32, y: f32) {
        self.pointer.warp_to(Vec2::new(x, y));
    }

    /// Radial burst at the tracked pointer position.
    pub fn emit_on_down(&mut self) {
        self.emit_burst_at(self.pointer.position);
    }

    /// Radial burst at `position`. The tracked pointer is unchanged.
    pub fn emit_burst_at(&mut self, position: Vec2) {
        let mut targets = self.pools.targets();
        self.emitter.emit_on_down(&mut targets, position);
    }

    /// One sparkle and one GPU attempt at the tracked pointer position.
    ///
    /// # Returns
    ///
    /// Whether a GPU slot was acquired.
    pub fn emit_sparkle(&mut self) -> bool {
        self.emit_sparkle_at(self.pointer.position)
    }

    /// One sparkle and one GPU attempt at `position`.
    pub fn emit_sparkle_at(&mut self, position: Vec2) -> bool {
        let mut targets = self.pools.targets();
        self.emitter.emit_sparkle(&mut targets, position)
    }

    /// `count` sparkles at random points inside `rect`.
    ///
    /// At most `max_sparkles` are spawned per call.
    pub fn sparkle_scatter(&mut self, rect: ScreenRect, count: u32) {
        let count = (count as usize).min(self.config.max_sparkles);
        for _ in 0..count {
            let rng = self.emitter.rng_mut();
            let (u, v) = (rng.unit(), rng.unit());
            self.emit_sparkle_at(rect.lerp(u, v));
        }
    }

    /// Handle for triggering effects from outside the pointer stream.
    #[must_use]
    pub fn remote(&self) -> EffectRemote {
        self.commands.remote()
    }

    /// Applies the commands queued before this call.
    ///
    /// # Returns
    ///
    /// How many were applied.
    pub fn apply_commands(&mut self) -> usize {
        let pending = self.commands.pending();
        let mut applied = 0;
        while applied < pending {
            let Some(command) = self.commands.try_recv() else {
                break;
            };
            self.apply(command);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, command: EffectCommand) {
        match command {
            EffectCommand::SetPointer { x, y } => self.set_pointer_position(x, y),
            EffectCommand::Burst => self.emit_on_down(),
            EffectCommand::BurstAt { x, y } => self.emit_burst_at(Vec2::new(x, y)),
            EffectCommand::SparkleAt { x, y } => {
                self.emit_sparkle_at(Vec2::new(x, y));
            }
            EffectCommand::SparkleScatter { rect, count } => self.sparkle_scatter(rect, count),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Current clamped viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Tracked pointer.
    #[must_use]
    pub const fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Every cursor particle collection.
    #[must_use]
    pub const fn pools(&self) -> &EffectPools {
        &self.pools
    }

    /// The ambient field, if enabled.
    #[must_use]
    pub const fn ambient(&self) -> Option<&AmbientField> {
        self.ambient.as_ref()
    }

    /// 2D surfaces.
    #[must_use]
    pub const fn layers(&self) -> &CanvasLayers<C> {
        &self.layers
    }

    /// 2D surfaces, for hosts that present them after each frame.
    pub fn layers_mut(&mut self) -> &mut CanvasLayers<C> {
        &mut self.layers
    }

    /// Arrays last written for the GPU pass.
    #[must_use]
    pub const fn sprites(&self) -> &PointSpriteBuffer {
        &self.sprites
    }

    /// The sprite backend, until release.
    #[must_use]
    pub const fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Counts from the last canvas pass.
    #[must_use]
    pub const fn canvas_stats(&self) -> CanvasStats {
        self.canvas_pass.last_stats()
    }

    /// Whether surfaces were released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }
}

impl<C: Canvas2d, B: PointSpriteBackend> FrameTarget for CursorEffects<C, B> {
    fn integrate(&mut self) {
        self.apply_commands();
        self.integrator.step(&mut self.pools);
        if let Some(field) = self.ambient.as_mut() {
            self.integrator.step_ambient(field, &mut self.emitter);
        }
    }

    fn render(&mut self, time: f32) {
        if self.released {
            return;
        }

        self.canvas_pass
            .draw(&mut self.layers, &self.pools, self.ambient.as_ref());

        let Some(backend) = self.backend.as_mut().filter(|b| b.is_active()) else {
            return;
        };
        self.sprites.write_from(self.pools.gpu_sparkles());
        self.sprites.set_time(time);
        backend.draw(&mut self.sprites);
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Some(mut backend) = self.backend.take() {
            backend.release();
        }
        for canvas in self.layers.iter_mut() {
            canvas.clear();
        }
    }

    fn live_counts(&self) -> LiveCounts {
        LiveCounts {
            sparkles: self.pools.sparkles().len(),
            embers: self.pools.embers().len(),
            trail_points: self.pools.trail().len(),
            gpu_sparkles: self.pools.gpu_sparkles().live_count(),
            motes: self.ambient.as_ref().map_or(0, AmbientField::len),
        }
    }
}

#[cfg(test)]
mod tests {
    use glimmer_rendering::RecordingCanvas;

    use super::*;

    #[derive(Default)]
    struct NullSprites {
        draws: u32,
        size: (u32, u32),
        released: bool,
    }

    impl PointSpriteBackend for NullSprites {
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn draw(&mut self, sprites: &mut PointSpriteBuffer) {
            sprites.take_dirty();
            self.draws += 1;
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    type TestEffects = CursorEffects<RecordingCanvas, NullSprites>;

    fn effects() -> TestEffects {
        let layers = CanvasLayers::cursor(RecordingCanvas::default(), RecordingCanvas::default());
        CursorEffects::new(
            EffectsConfig::default().with_seed(3),
            1280,
            720,
            layers,
            Some(NullSprites::default()),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EffectsConfig {
            max_trail_points: 0,
            ..EffectsConfig::default()
        };
        let result = TestEffects::new(config, 800, 600, CanvasLayers::none(), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_surfaces_sized_at_construction() {
        let fx = effects();
        assert_eq!(fx.backend().unwrap().size, (1280, 720));
        assert_eq!(fx.layers().sparkle.as_ref().unwrap().size(), (1280, 720));
    }

    #[test]
    fn test_move_emits_when_moving() {
        let mut fx = effects();
        fx.pointer_move(100.0, 100.0);
        // First sighting is stationary: trail only
        assert_eq!(fx.pools().trail().len(), 1);
        assert_eq!(fx.pools().sparkles().len(), 0);

        fx.pointer_move(110.0, 100.0);
        assert_eq!(fx.pools().trail().len(), 2);
        assert_eq!(fx.pools().sparkles().len(), 1);
        assert_eq!(fx.pools().embers().len(), 1);
        assert_eq!(fx.pools().gpu_sparkles().live_count(), 1);
    }

    #[test]
    fn test_sub_threshold_move_trail_only() {
        let mut fx = effects();
        fx.pointer_move(100.0, 100.0);
        fx.pointer_move(100.5, 101.0);
        assert_eq!(fx.pools().trail().len(), 2);
        assert_eq!(fx.pools().canvas_count(), 0);
    }

    #[test]
    fn test_pointer_down_bursts_at_pointer() {
        let mut fx = effects();
        fx.set_pointer_position(300.0, 200.0);
        fx.pointer_down();
        assert!(fx.pointer().pressed);
        assert_eq!(fx.pools().sparkles().len(), 20);
        assert_eq!(fx.pools().embers().len(), 15);
        assert!(fx
            .pools()
            .sparkles()
            .iter()
            .all(|s| s.position == Vec2::new(300.0, 200.0)));
        fx.pointer_up();
        assert!(!fx.pointer().pressed);
    }

    #[test]
    fn test_set_pointer_emits_nothing() {
        let mut fx = effects();
        fx.set_pointer_position(50.0, 60.0);
        assert_eq!(fx.pointer().position, Vec2::new(50.0, 60.0));
        assert!(fx.pools().trail().is_empty());
        assert_eq!(fx.pools().canvas_count(), 0);
    }

    #[test]
    fn test_resize_clamps_and_propagates() {
        let mut fx = effects();
        fx.resize(0, 0);
        assert_eq!(fx.viewport(), Viewport::new(320, 240));
        assert_eq!(fx.backend().unwrap().size, (320, 240));
        assert_eq!(fx.layers().ember.as_ref().unwrap().size(), (320, 240));
    }

    #[test]
    fn test_remote_commands_apply_next_frame() {
        let mut fx = effects();
        let remote = fx.remote();
        assert!(remote.send(EffectCommand::BurstAt { x: 10.0, y: 10.0 }));
        assert!(remote.emit_sparkle(20.0, 20.0));
        assert_eq!(fx.pools().canvas_count(), 0);

        fx.integrate();
        assert_eq!(fx.pools().sparkles().len(), 21);
        assert_eq!(fx.pools().embers().len(), 15);
        // Pointer untouched by positioned commands
        assert_eq!(fx.pointer().position, Vec2::ZERO);
    }

    #[test]
    fn test_scatter_stays_inside_rect() {
        let mut fx = effects();
        let rect = ScreenRect::new(100.0, 100.0, 200.0, 40.0);
        fx.sparkle_scatter(rect, 12);
        assert_eq!(fx.pools().sparkles().len(), 12);
        for s in fx.pools().sparkles().iter() {
            // Sparkle jitter is +-10
            assert!(s.position.x >= 90.0 && s.position.x <= 310.0);
            assert!(s.position.y >= 90.0 && s.position.y <= 150.0);
        }
    }

    #[test]
    fn test_scatter_capped_per_call() {
        let mut fx = effects();
        let cap = fx.config().max_sparkles;
        fx.sparkle_scatter(ScreenRect::new(0.0, 0.0, 50.0, 50.0), u32::MAX);
        assert_eq!(fx.pools().sparkles().len(), cap);

        // Same cap through the command queue
        let mut fx = effects();
        let rect = ScreenRect::new(0.0, 0.0, 50.0, 50.0);
        assert!(fx.remote().send(EffectCommand::SparkleScatter { rect, count: 1_000_000 }));
        assert_eq!(fx.apply_commands(), 1);
        assert_eq!(fx.pools().sparkles().len(), cap);
    }

    #[test]
    fn test_render_runs_both_passes() {
        let mut fx = effects();
        fx.emit_burst_at(Vec2::new(640.0, 360.0));
        fx.integrate();
        fx.render(0.5);

        assert_eq!(fx.backend().unwrap().draws, 1);
        assert!((fx.sprites().time() - 0.5).abs() < f32::EPSILON);
        assert_eq!(fx.canvas_stats().sparkles, 20);
        assert_eq!(fx.canvas_stats().embers, 15);
    }

    #[test]
    fn test_missing_surfaces_still_simulate() {
        let mut fx = TestEffects::new(
            EffectsConfig::default().with_seed(1),
            800,
            600,
            CanvasLayers::none(),
            None,
        )
        .unwrap();
        fx.emit_burst_at(Vec2::new(400.0, 300.0));
        fx.integrate();
        fx.render(0.0);
        assert_eq!(fx.canvas_stats(), CanvasStats::default());
        assert_eq!(fx.pools().sparkles().len(), 20);
    }

    #[test]
    fn test_release_idempotent() {
        let mut fx = effects();
        fx.emit_on_down();
        fx.render(0.0);
        fx.release();
        fx.release();

        assert!(fx.is_released());
        assert!(fx.backend().is_none());
        assert_eq!(fx.layers().sparkle.as_ref().unwrap().draw_count(), 0);

        fx.render(1.0);
        assert_eq!(fx.layers().sparkle.as_ref().unwrap().draw_count(), 0);
    }

    #[test]
    fn test_ambient_field_population_constant() {
        let mut config = EffectsConfig::default().with_seed(5);
        config.ambient.enabled = true;
        config.ambient.max_particles = 12;
        let layers = CanvasLayers::none().with_ambient(RecordingCanvas::default());
        let mut fx = TestEffects::new(config, 1280, 720, layers, None).unwrap();

        for _ in 0..300 {
            fx.integrate();
            assert_eq!(fx.ambient().unwrap().len(), 12);
        }
        fx.render(0.0);
        assert_eq!(fx.canvas_stats().motes, 12);
        assert_eq!(fx.live_counts().motes, 12);
    }
}

//! Command-recording canvas.
//!
//! Captures draw calls so a host can replay them onto any 2D API. A
//! [`Canvas2d::clear`] discards everything recorded before it, so the list
//! always describes what is currently visible.

use glam::Vec2;

use super::{Canvas2d, CompositeMode, LineCap, Paint, Shadow};

/// A recorded canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Surface wiped.
    Clear,
    /// Composition mode changed.
    SetComposite(CompositeMode),
    /// Glow shadow changed.
    SetShadow(Option<Shadow>),
    /// Line segment.
    StrokeLine {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke style.
        paint: Paint,
        /// Line width.
        width: f32,
        /// End caps.
        cap: LineCap,
    },
    /// Closed polygon.
    FillPolygon {
        /// Vertices in order.
        points: Vec<Vec2>,
        /// Fill style.
        paint: Paint,
    },
    /// Circle.
    FillCircle {
        /// Center.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill style.
        paint: Paint,
    },
}

impl DrawCommand {
    /// Returns true for commands that put pixels on the surface.
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::StrokeLine { .. } | Self::FillPolygon { .. } | Self::FillCircle { .. }
        )
    }

    /// The paint of a draw command.
    #[must_use]
    pub const fn paint(&self) -> Option<&Paint> {
        match self {
            Self::StrokeLine { paint, .. }
            | Self::FillPolygon { paint, .. }
            | Self::FillCircle { paint, .. } => Some(paint),
            _ => None,
        }
    }
}

/// Canvas that records instead of rasterizing.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    composite: CompositeMode,
    shadow: Option<Shadow>,
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl RecordingCanvas {
    /// Creates an empty recording surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            composite: CompositeMode::SourceOver,
            shadow: None,
            commands: Vec::with_capacity(256),
            clears: 0,
        }
    }

    /// Commands since the last clear, the clear included.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Iterates over pixel-producing commands only.
    pub fn draws(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_draw())
    }

    /// Number of pixel-producing commands since the last clear.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }

    /// Total number of clears, one per rendered frame.
    #[must_use]
    pub const fn clear_count(&self) -> u64 {
        self.clears
    }

    /// Current composition mode.
    #[must_use]
    pub const fn composite(&self) -> CompositeMode {
        self.composite
    }

    /// Current shadow.
    #[must_use]
    pub const fn shadow(&self) -> Option<Shadow> {
        self.shadow
    }

    /// Hands the recorded commands to the caller, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

impl Canvas2d for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.composite = CompositeMode::SourceOver;
        self.shadow = None;
        self.clears += 1;
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.composite = mode;
        self.commands.push(DrawCommand::SetComposite(mode));
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.shadow = shadow;
        self.commands.push(DrawCommand::SetShadow(shadow));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, paint: &Paint, width: f32, cap: LineCap) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            paint: paint.clone(),
            width,
            cap,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }
}

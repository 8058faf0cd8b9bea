//! Pointer state for cursor effects.
//!
//! Velocity is the raw delta between consecutive move events, in screen
//! units per event. It is not scaled by time.

use glam::Vec2;

/// Where the pointer is and how it last moved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Current position.
    pub position: Vec2,
    /// Position before the last move.
    pub previous: Vec2,
    /// Primary button held.
    pub pressed: bool,
    /// Whether any position has been seen yet.
    tracked: bool,
}

impl PointerState {
    /// Creates a pointer with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move and returns the delta from the previous position.
    ///
    /// The first move has no previous position and reports zero velocity,
    /// so a pointer entering the surface does not count as motion.
    pub fn move_to(&mut self, position: Vec2) -> Vec2 {
        self.previous = if self.tracked { self.position } else { position };
        self.position = position;
        self.tracked = true;
        self.velocity()
    }

    /// Moves the pointer without producing motion.
    pub fn warp_to(&mut self, position: Vec2) {
        self.previous = position;
        self.position = position;
        self.tracked = true;
    }

    /// Delta of the most recent move.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.position - self.previous
    }

    /// Whether a position has been recorded.
    #[must_use]
    pub const fn is_tracked(&self) -> bool {
        self.tracked
    }

    /// Button down.
    pub fn press(&mut self) {
        self.pressed = true;
    }

    /// Button up.
    pub fn release(&mut self) {
        self.pressed = false;
    }
}

//! # Effect Commands
//!
//! How choreography layers trigger effects without touching cursor state.
//!
//! ```text
//! ┌──────────────────┐   EffectCommand   ┌──────────────┐   next frame   ┌───────────────┐
//! │  EffectRemote    │──────────────────>│   bounded    │───────────────>│ CursorEffects │
//! │ (scroll reveals, │     try_send      │   channel    │     drain      │   integrate   │
//! │  hero intro...)  │                   └──────────────┘                └───────────────┘
//! └──────────────────┘
//! ```
//!
//! Sending never blocks. A full channel drops the command, the same way a
//! full GPU pool drops a sparkle.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use glam::Vec2;

/// Default number of commands buffered between frames.
pub const DEFAULT_COMMAND_CAPACITY: usize = 256;

/// Axis-aligned rectangle in screen units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl ScreenRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Maps `(u, v)` in `[0, 1]²` to a point inside the rectangle.
    #[must_use]
    pub fn lerp(&self, u: f32, v: f32) -> Vec2 {
        Vec2::new(self.x + u * self.width, self.y + v * self.height)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.lerp(0.5, 0.5)
    }
}

/// An effect requested from outside the pointer stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectCommand {
    /// Moves the tracked pointer without emitting anything.
    SetPointer {
        /// Screen x.
        x: f32,
        /// Screen y.
        y: f32,
    },
    /// Radial burst at the tracked pointer position.
    Burst,
    /// Radial burst at a point. The tracked pointer is left alone.
    BurstAt {
        /// Screen x.
        x: f32,
        /// Screen y.
        y: f32,
    },
    /// One sparkle (and one GPU slot attempt) at a point.
    SparkleAt {
        /// Screen x.
        x: f32,
        /// Screen y.
        y: f32,
    },
    /// `count` sparkles at random points inside `rect`.
    SparkleScatter {
        /// Area to decorate.
        rect: ScreenRect,
        /// Sparkles to emit.
        count: u32,
    },
}

/// Cloneable sending half handed to choreography layers.
#[derive(Clone, Debug)]
pub struct EffectRemote {
    sender: Sender<EffectCommand>,
}

impl EffectRemote {
    /// Queues a command for the next frame.
    ///
    /// # Returns
    ///
    /// False if the command was dropped because the channel is full or the
    /// engine is gone.
    #[inline]
    pub fn send(&self, command: EffectCommand) -> bool {
        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::trace!(?command, "effect command dropped, channel full");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// [`EffectCommand::SetPointer`]
    #[inline]
    pub fn set_pointer_position(&self, x: f32, y: f32) -> bool {
        self.send(EffectCommand::SetPointer { x, y })
    }

    /// [`EffectCommand::Burst`]
    #[inline]
    pub fn emit_on_down(&self) -> bool {
        self.send(EffectCommand::Burst)
    }

    /// [`EffectCommand::SparkleAt`]
    #[inline]
    pub fn emit_sparkle(&self, x: f32, y: f32) -> bool {
        self.send(EffectCommand::SparkleAt { x, y })
    }
}

/// Receiving half, drained by the engine once per frame.
#[derive(Debug)]
pub(crate) struct CommandQueue {
    sender: Sender<EffectCommand>,
    receiver: Receiver<EffectCommand>,
}

impl CommandQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    pub(crate) fn remote(&self) -> EffectRemote {
        EffectRemote {
            sender: self.sender.clone(),
        }
    }

    /// Next pending command, if any.
    #[inline]
    pub(crate) fn try_recv(&self) -> Option<EffectCommand> {
        self.receiver.try_recv().ok()
    }

    pub(crate) fn pending(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_arrive_in_order() {
        let queue = CommandQueue::new(8);
        let remote = queue.remote();
        assert!(remote.set_pointer_position(1.0, 2.0));
        assert!(remote.emit_on_down());

        assert_eq!(queue.pending(), 2);
        assert_eq!(
            queue.try_recv(),
            Some(EffectCommand::SetPointer { x: 1.0, y: 2.0 })
        );
        assert_eq!(queue.try_recv(), Some(EffectCommand::Burst));
        assert_eq!(queue.try_recv(), None);
    }

    #[test]
    fn test_full_channel_drops() {
        let queue = CommandQueue::new(1);
        let remote = queue.remote();
        assert!(remote.emit_sparkle(0.0, 0.0));
        assert!(!remote.emit_sparkle(1.0, 1.0));
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_send_after_engine_dropped() {
        let remote = CommandQueue::new(4).remote();
        // Receiver is gone with the queue
        assert!(!remote.emit_on_down());
    }

    #[test]
    fn test_rect_lerp() {
        let rect = ScreenRect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.lerp(0.0, 0.0), Vec2::new(10.0, 20.0));
        assert_eq!(rect.lerp(1.0, 1.0), Vec2::new(110.0, 70.0));
        assert_eq!(rect.center(), Vec2::new(60.0, 45.0));
    }
}

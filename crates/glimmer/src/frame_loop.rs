//! # Frame Driver
//!
//! ```text
//!            start()                 tick(t): stop flag set
//!   ┌──────┐ ───────> ┌─────────┐ ──────────────────────────┐
//!   │ Idle │          │ Running │   tick(t): integrate,      │
//!   └──────┘ <─────── └─────────┘   render(t), Continue      │
//!       ↑   teardown()     ↑ └──────────────┘                │
//!       └──────────────────┴─────────────────────────────────┘
//! ```
//!
//! The host owns scheduling: it calls [`FrameDriver::tick`] from its
//! display-refresh callback and schedules the next callback only while the
//! tick returns [`ControlFlow::Continue`]. Once torn down, the driver never
//! integrates or renders again and its surfaces are released exactly once.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Work done once per display refresh.
pub trait FrameTarget {
    /// Advances every particle one step.
    fn integrate(&mut self);

    /// Draws both passes. `time` is seconds since the driver started.
    fn render(&mut self, time: f32);

    /// Frees surfaces. Called at most once by the driver.
    fn release(&mut self);

    /// Live particle counts, for frame statistics.
    fn live_counts(&self) -> LiveCounts {
        LiveCounts::default()
    }
}

/// Live particles per variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveCounts {
    /// Canvas sparkles
    pub sparkles: usize,
    /// Canvas embers
    pub embers: usize,
    /// Trail points
    pub trail_points: usize,
    /// Occupied GPU slots
    pub gpu_sparkles: usize,
    /// Ambient motes
    pub motes: usize,
}

/// One completed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Seconds since start.
    pub time: f32,
    /// Counts after integration.
    pub counts: LiveCounts,
}

/// Driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Before the display is ready, or after teardown.
    Idle,
    /// Integrating and rendering every tick.
    Running,
}

/// Cloneable stop request, checked at the top of every tick.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
}

impl StopHandle {
    /// Asks the driver to tear down on its next tick.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Drives a [`FrameTarget`] from host refresh callbacks.
pub struct FrameDriver<T: FrameTarget> {
    target: T,
    state: DriverState,
    released: bool,
    stop: StopHandle,
    started_at: Option<f64>,
    frames: u64,
    last: FrameStats,
}

impl<T: FrameTarget> FrameDriver<T> {
    /// Wraps `target` in the idle state.
    #[must_use]
    pub fn new(target: T) -> Self {
        Self {
            target,
            state: DriverState::Idle,
            released: false,
            stop: StopHandle::default(),
            started_at: None,
            frames: 0,
            last: FrameStats::default(),
        }
    }

    /// Display is ready: enter the running state.
    ///
    /// # Returns
    ///
    /// False if the driver was already torn down. A released target cannot
    /// be restarted.
    pub fn start(&mut self) -> bool {
        if self.released {
            tracing::debug!("start ignored, driver already torn down");
            return false;
        }
        if self.state == DriverState::Idle {
            self.state = DriverState::Running;
            tracing::info!("frame driver running");
        }
        true
    }

    /// One display refresh at `timestamp` seconds (any monotonic origin).
    ///
    /// # Returns
    ///
    /// `Continue` if the host should schedule another tick.
    pub fn tick(&mut self, timestamp: f64) -> ControlFlow<()> {
        if self.stop.is_stop_requested() {
            self.teardown();
        }
        if self.state != DriverState::Running {
            return ControlFlow::Break(());
        }

        let origin = *self.started_at.get_or_insert(timestamp);
        let time = (timestamp - origin).max(0.0) as f32;

        self.target.integrate();
        self.target.render(time);

        self.frames += 1;
        self.last = FrameStats {
            frame: self.frames,
            time,
            counts: self.target.live_counts(),
        };

        ControlFlow::Continue(())
    }

    /// Cancels further ticks and releases surfaces. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.stop.request_stop();
        self.state = DriverState::Idle;
        if !self.released {
            self.released = true;
            self.target.release();
            tracing::info!(frames = self.frames, "frame driver torn down");
        }
    }

    /// Handle for requesting a stop from elsewhere.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Whether teardown has run.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Completed ticks.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Stats of the most recent tick.
    #[must_use]
    pub const fn last_stats(&self) -> FrameStats {
        self.last
    }

    /// The driven target.
    #[must_use]
    pub const fn target(&self) -> &T {
        &self.target
    }

    /// The driven target, for input between ticks.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

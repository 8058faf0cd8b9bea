//! CPU-side attribute arrays for GPU point sprites.
//!
//! Slot `i` of the sparkle pool always maps to entry `i` here. Dead slots
//! are written as zeros so they rasterize to nothing.

use glimmer_core::{GpuSparkle, PoolSlot, SlotPool};

/// Which attribute arrays changed since the last upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyAttributes {
    /// `positions` needs re-upload
    pub positions: bool,
    /// `colors` needs re-upload
    pub colors: bool,
    /// `sizes` needs re-upload
    pub sizes: bool,
}

impl DirtyAttributes {
    /// Every array dirty.
    pub const ALL: Self = Self {
        positions: true,
        colors: true,
        sizes: true,
    };

    /// Nothing dirty.
    pub const NONE: Self = Self {
        positions: false,
        colors: false,
        sizes: false,
    };

    /// Returns true if any array is dirty.
    #[must_use]
    pub const fn any(self) -> bool {
        self.positions || self.colors || self.sizes
    }
}

/// Flat `positions[3n]`, `colors[3n]`, `sizes[n]` plus the shared time uniform.
#[derive(Debug, Clone)]
pub struct PointSpriteBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    dirty: DirtyAttributes,
    time: f32,
}

impl PointSpriteBuffer {
    /// Allocates zeroed arrays for `capacity` sprites.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: vec![0.0; capacity * 3],
            colors: vec![0.0; capacity * 3],
            sizes: vec![0.0; capacity],
            dirty: DirtyAttributes::ALL,
            time: 0.0,
        }
    }

    /// Number of sprite entries.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.sizes.len()
    }

    /// Copies every slot into the arrays and marks them dirty.
    ///
    /// Live slots fade by `alpha = life / max_life`: color becomes
    /// `(r, g * alpha, b * alpha)` and size `size * alpha`. Dead slots are
    /// zeroed.
    ///
    /// # Returns
    ///
    /// The number of live sprites written.
    pub fn write_from(&mut self, pool: &SlotPool<GpuSparkle>) -> usize {
        let mut live = 0;

        for (i, slot) in pool.slots().iter().enumerate().take(self.capacity()) {
            let p = i * 3;
            if slot.is_dead() {
                self.positions[p..p + 3].fill(0.0);
                self.colors[p..p + 3].fill(0.0);
                self.sizes[i] = 0.0;
                continue;
            }

            let alpha = slot.alpha();
            self.positions[p..p + 3].copy_from_slice(&slot.position.to_array());
            self.colors[p] = slot.color.r;
            self.colors[p + 1] = slot.color.g * alpha;
            self.colors[p + 2] = slot.color.b * alpha;
            self.sizes[i] = slot.size * alpha;
            live += 1;
        }

        self.dirty = DirtyAttributes::ALL;
        live
    }

    /// Sets the shimmer time uniform, in seconds.
    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    /// The shimmer time uniform.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// Pending dirty flags.
    #[must_use]
    pub const fn dirty(&self) -> DirtyAttributes {
        self.dirty
    }

    /// Returns the dirty flags and resets them. Called by a backend right
    /// before upload.
    pub fn take_dirty(&mut self) -> DirtyAttributes {
        std::mem::replace(&mut self.dirty, DirtyAttributes::NONE)
    }

    /// Positions, three floats per sprite.
    #[must_use]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Colors, three floats per sprite.
    #[must_use]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Sizes, one float per sprite.
    #[must_use]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Positions as bytes for GPU upload.
    #[must_use]
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as bytes for GPU upload.
    #[must_use]
    pub fn colors_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Sizes as bytes for GPU upload.
    #[must_use]
    pub fn sizes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sizes)
    }
}

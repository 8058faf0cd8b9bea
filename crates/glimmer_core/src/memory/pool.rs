//! # Slot Pool
//!
//! Fixed-capacity slot array for particles that are uploaded to the GPU.

use serde::{Deserialize, Serialize};

use super::ParticleSink;

/// A record that can occupy a [`SlotPool`] slot.
pub trait PoolSlot {
    /// Returns true if the slot may be reacquired.
    fn is_dead(&self) -> bool;

    /// Brings a dead slot back to life from a spawn template.
    ///
    /// Implementations keep any fields that are fixed per slot.
    fn revive(&mut self, spawn: Self);

    /// Zeroes the visual fields and marks the slot dead.
    fn clear(&mut self);
}

/// How a free slot is found on insert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquirePolicy {
    /// First dead slot in index order. O(n), fine for tens of slots.
    #[default]
    LinearScan,
    /// Stack of freed indices. O(1); the most recently freed slot is reused first.
    FreeList,
}

/// A pool of fixed-capacity slots that are never compacted.
///
/// Dead slots stay in place with zeroed visual fields until reacquired, so
/// slot `i` always maps to GPU buffer entry `i`.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is owned by the single frame thread.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool = SlotPool::new(50, AcquirePolicy::LinearScan, |_| GpuSparkle::dead(2.0));
///
/// // Silent drop when every slot is live
/// let index = pool.acquire(spawn);
///
/// // Slots whose closure returns false are cleared and become reusable
/// pool.update(|slot| { slot.life -= 0.02; slot.life > 0.0 });
/// ```
#[derive(Debug, Clone)]
pub struct SlotPool<T> {
    /// The storage array, sized once.
    slots: Box<[T]>,
    /// Indices of dead slots (maintained only for [`AcquirePolicy::FreeList`]).
    free_list: Vec<usize>,
    /// Number of live slots.
    live_count: usize,
    /// Acquisition strategy.
    policy: AcquirePolicy,
}

impl<T: PoolSlot> SlotPool<T> {
    /// Creates a pool with `capacity` slots built by `init`.
    ///
    /// All memory is allocated here and never again.
    #[must_use]
    pub fn new(capacity: usize, policy: AcquirePolicy, init: impl FnMut(usize) -> T) -> Self {
        let slots: Box<[T]> = (0..capacity).map(init).collect();

        let live_count = slots.iter().filter(|s| !s.is_dead()).count();

        let free_list = match policy {
            AcquirePolicy::LinearScan => Vec::new(),
            AcquirePolicy::FreeList => {
                let mut free = Vec::with_capacity(capacity);
                free.extend((0..capacity).rev().filter(|&i| slots[i].is_dead()));
                free
            }
        };

        Self {
            slots,
            free_list,
            live_count,
            policy,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of live slots.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live_count
    }

    /// Returns the number of dead slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.capacity() - self.live_count
    }

    /// Returns the acquisition policy.
    #[must_use]
    pub const fn policy(&self) -> AcquirePolicy {
        self.policy
    }

    /// Revives a dead slot from `spawn`.
    ///
    /// # Returns
    ///
    /// The slot index, or `None` if every slot is live or the revived slot
    /// is still dead. The request is dropped, not queued.
    pub fn acquire(&mut self, spawn: T) -> Option<usize> {
        let index = match self.policy {
            AcquirePolicy::LinearScan => self.slots.iter().position(T::is_dead)?,
            AcquirePolicy::FreeList => loop {
                let candidate = self.free_list.pop()?;
                if self.slots[candidate].is_dead() {
                    break candidate;
                }
            },
        };

        let slot = &mut self.slots[index];
        slot.revive(spawn);
        if slot.is_dead() {
            // Slot stays free, e.g. a zero fixed max life
            slot.clear();
            if self.policy == AcquirePolicy::FreeList {
                self.free_list.push(index);
            }
            return None;
        }
        self.live_count += 1;

        Some(index)
    }

    /// Advances every live slot.
    ///
    /// `step` returns whether the slot survives. Slots that die (by returning
    /// false or by ending with `is_dead()`) are cleared in the same pass.
    pub fn update(&mut self, mut step: impl FnMut(&mut T) -> bool) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_dead() {
                continue;
            }

            let alive = step(slot) && !slot.is_dead();
            if !alive {
                slot.clear();
                self.live_count -= 1;
                if self.policy == AcquirePolicy::FreeList {
                    self.free_list.push(index);
                }
            }
        }
    }

    /// All slots in index order, dead ones included.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// Iterates over live slots with their indices.
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_dead())
    }

    /// Kills every slot.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.clear();
        }
        self.live_count = 0;
        self.free_list.clear();
        if self.policy == AcquirePolicy::FreeList {
            self.free_list.extend((0..self.slots.len()).rev());
        }
    }
}

impl<T: PoolSlot> ParticleSink<T> for SlotPool<T> {
    fn try_insert(&mut self, particle: T) -> bool {
        if self.acquire(particle).is_some() {
            true
        } else {
            tracing::trace!(capacity = self.capacity(), "slot pool exhausted, spawn dropped");
            false
        }
    }
}

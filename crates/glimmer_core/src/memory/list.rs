//! Dynamically sized particle collections for canvas-backed variants.

use std::collections::VecDeque;

use super::ParticleSink;
use crate::particle::TrailPoint;

/// Ordered, unbounded particle list.
///
/// Removal of expired particles is the only growth bound. With near-zero
/// decay and a high emission rate the list grows without limit.
#[derive(Debug, Clone)]
pub struct ParticleList<T> {
    items: Vec<T>,
}

impl<T> ParticleList<T> {
    /// Creates an empty list with room for `capacity` particles.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Appends a particle.
    #[inline]
    pub fn push(&mut self, particle: T) {
        self.items.push(particle);
    }

    /// Advances every particle and removes those for which `step` returns
    /// false, in one order-preserving pass.
    pub fn update(&mut self, step: impl FnMut(&mut T) -> bool) {
        self.items.retain_mut(step);
    }

    /// Number of particles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no particles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Particles in insertion order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for ParticleList<T> {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl<T> ParticleSink<T> for ParticleList<T> {
    #[inline]
    fn try_insert(&mut self, particle: T) -> bool {
        self.push(particle);
        true
    }
}

/// Bounded FIFO of trail points.
///
/// Insertion beyond capacity evicts the oldest point regardless of its
/// remaining life.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: VecDeque<TrailPoint>,
    capacity: usize,
}

impl TrailBuffer {
    /// Creates an empty trail holding at most `capacity` points.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends a point, then trims from the front.
    ///
    /// # Returns
    ///
    /// The number of points evicted.
    pub fn push(&mut self, point: TrailPoint) -> usize {
        self.points.push_back(point);

        let mut evicted = 0;
        while self.points.len() > self.capacity {
            self.points.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Decays every point and removes expired ones, oldest-first order kept.
    pub fn update(&mut self) {
        self.points.retain_mut(|point| {
            point.life -= point.decay;
            point.life > 0.0
        });
    }

    /// Maximum number of points.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the trail is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, TrailPoint> {
        self.points.iter()
    }

    /// Consecutive `(older, newer)` pairs, the segments of the trail.
    pub fn segments(&self) -> impl Iterator<Item = (&TrailPoint, &TrailPoint)> {
        self.points.iter().zip(self.points.iter().skip(1))
    }

    /// Removes every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl ParticleSink<TrailPoint> for TrailBuffer {
    #[inline]
    fn try_insert(&mut self, particle: TrailPoint) -> bool {
        self.push(particle);
        true
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn test_list_update_removes_in_order() {
        let mut list = ParticleList::with_capacity(4);
        for v in [1, 5, 2, 6, 3] {
            list.push(v);
        }

        list.update(|v| {
            *v -= 1;
            *v > 1
        });

        assert_eq!(list.as_slice(), &[4, 5, 2]);
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = TrailBuffer::new(3);
        for i in 0..5 {
            trail.push(TrailPoint::new(Vec2::new(i as f32, 0.0)));
        }

        assert_eq!(trail.len(), 3);
        let xs: Vec<f32> = trail.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_trail_eviction_ignores_life() {
        let mut trail = TrailBuffer::new(2);
        trail.push(TrailPoint::new(Vec2::ZERO));
        trail.update();
        trail.push(TrailPoint::new(Vec2::ONE));

        // The older point has less life but is still evicted first
        assert_eq!(trail.push(TrailPoint::new(Vec2::splat(2.0))), 1);
        assert!(trail.iter().all(|p| p.position != Vec2::ZERO));
    }

    #[test]
    fn test_trail_drains_by_decay() {
        let mut trail = TrailBuffer::new(20);
        trail.push(TrailPoint::new(Vec2::ZERO));

        // 1.0 / 0.05 = 20 frames, float error may add one
        for _ in 0..21 {
            trail.update();
        }
        assert!(trail.is_empty());
    }

    #[test]
    fn test_trail_segments() {
        let mut trail = TrailBuffer::new(5);
        assert_eq!(trail.segments().count(), 0);
        trail.push(TrailPoint::new(Vec2::ZERO));
        assert_eq!(trail.segments().count(), 0);
        trail.push(TrailPoint::new(Vec2::ONE));
        trail.push(TrailPoint::new(Vec2::splat(2.0)));
        assert_eq!(trail.segments().count(), 2);
    }
}

//! The pool of unassigned room slots for one generation pass.

use bevy::prelude::*;
use rand::Rng;

use super::archetype::slot_to_world;

/// Working pool of slot positions plus the untouched original layout.
#[derive(Debug, Default, Clone)]
pub struct SlotPool {
    remaining: Vec<Vec3>,
    original: Vec<Vec3>,
}

impl SlotPool {
    /// Replace both the working pool and the original layout with `slots`.
    ///
    /// An empty input leaves an empty pool; a zero-room floor is valid.
    pub fn initialize(&mut self, slots: &[IVec2]) {
        self.remaining.clear();
        self.original.clear();
        if slots.is_empty() {
            return;
        }
        self.original.extend(slots.iter().copied().map(slot_to_world));
        self.remaining.extend_from_slice(&self.original);
    }

    /// Remove and return the first slot in insertion order.
    pub fn reserve_entry(&mut self) -> Option<Vec3> {
        if self.remaining.is_empty() {
            return None;
        }
        Some(self.remaining.remove(0))
    }

    /// Remove and return the slot farthest from `entry`.
    ///
    /// Single pass keeping the best distance so far; a later candidate only
    /// wins when strictly farther, so the first of several equal maxima is kept.
    /// Slots at distance zero never qualify.
    pub fn reserve_boss(&mut self, entry: Vec3) -> Option<Vec3> {
        let mut best: Option<usize> = None;
        let mut best_distance = 0.0;
        for (i, slot) in self.remaining.iter().enumerate() {
            let distance = entry.distance(*slot);
            if distance > best_distance {
                best_distance = distance;
                best = Some(i);
            }
        }
        best.map(|i| self.remaining.remove(i))
    }

    /// Remove and return a uniformly random slot.
    pub fn reserve_random(&mut self, rng: &mut impl Rng) -> Option<Vec3> {
        if self.remaining.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.remaining.len());
        Some(self.remaining.remove(index))
    }

    /// First slot of the layout without consuming it.
    pub fn peek_entry(&self) -> Option<Vec3> {
        self.remaining.first().copied()
    }

    pub fn remaining(&self) -> &[Vec3] {
        &self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Every slot of the layout as it was delivered.
    pub fn original(&self) -> &[Vec3] {
        &self.original
    }
}

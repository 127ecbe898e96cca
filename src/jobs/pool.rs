use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Sizing policy of a [`JobPool`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobPoolConfig {
    /// Slots allocated up front.
    pub initial_capacity: usize,
    /// Share of the current capacity added when the free list runs dry.
    pub replenish_percentage: f64,
}

impl Default for JobPoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 4,
            replenish_percentage: 0.5,
        }
    }
}

impl JobPoolConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.replenish_percentage.is_finite()
            || self.replenish_percentage <= 0.0
            || self.replenish_percentage > 1.0
        {
            return Err(ChartError::InvalidData(
                "job pool replenish_percentage must be finite and in (0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Generation-checked reference to a pool slot.
///
/// Releasing a slot bumps its generation, so a handle kept past release can
/// never reach the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobHandle {
    index: u32,
    generation: u32,
}

impl JobHandle {
    #[must_use]
    pub fn index(self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena with a free list. Slots are reused in LIFO order.
#[derive(Debug, Clone)]
pub struct JobPool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    replenish_percentage: f64,
}

impl<T> Default for JobPool<T> {
    fn default() -> Self {
        Self::new(JobPoolConfig::default())
    }
}

impl<T> JobPool<T> {
    #[must_use]
    pub fn new(config: JobPoolConfig) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(config.initial_capacity),
            free: Vec::with_capacity(config.initial_capacity),
            replenish_percentage: config.replenish_percentage,
        };
        pool.add_slots(config.initial_capacity);
        pool
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Stores `value` in a free slot, growing the arena if none is left.
    pub fn acquire(&mut self, value: T) -> JobHandle {
        let index = loop {
            if let Some(index) = self.free.pop() {
                break index;
            }
            self.replenish();
        };
        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        JobHandle {
            index,
            generation: slot.generation,
        }
    }

    #[must_use]
    pub fn is_live(&self, handle: JobHandle) -> bool {
        self.get(handle).is_some()
    }

    #[must_use]
    pub fn get(&self, handle: JobHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: JobHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Returns the slot to the free list. Stale or repeated releases are
    /// no-ops returning `None`.
    pub fn release(&mut self, handle: JobHandle) -> Option<T> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(value)
    }

    fn replenish(&mut self) {
        let grow = (self.slots.len() as f64 * self.replenish_percentage).ceil() as usize;
        let grow = grow.max(1);
        trace!(capacity = self.slots.len(), grow, "replenishing job pool");
        self.add_slots(grow);
    }

    fn add_slots(&mut self, count: usize) {
        let start = self.slots.len();
        self.slots.extend((0..count).map(|_| Slot {
            generation: 0,
            value: None,
        }));
        // Lowest index on top of the free list.
        self.free
            .extend((start..start + count).rev().map(|index| index as u32));
    }
}

#[cfg(test)]
mod tests {
    use super::{JobPool, JobPoolConfig};

    #[test]
    fn released_slot_rejects_stale_handle() {
        let mut pool = JobPool::new(JobPoolConfig::default());
        let first = pool.acquire("first");
        assert_eq!(pool.release(first), Some("first"));

        let second = pool.acquire("second");
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert_eq!(pool.get(first), None);
        assert_eq!(pool.get(second), Some(&"second"));
    }

    #[test]
    fn double_release_is_a_no_op() {
        let mut pool = JobPool::new(JobPoolConfig::default());
        let handle = pool.acquire(7_u32);
        assert_eq!(pool.release(handle), Some(7));
        assert_eq!(pool.release(handle), None);
        assert_eq!(pool.free_count(), pool.capacity());
    }

    #[test]
    fn exhausted_pool_grows_by_replenish_percentage() {
        let mut pool = JobPool::new(JobPoolConfig {
            initial_capacity: 4,
            replenish_percentage: 0.5,
        });
        let handles: Vec<_> = (0..5).map(|value| pool.acquire(value)).collect();
        assert_eq!(pool.capacity(), 6);
        assert_eq!(pool.live_count(), 5);
        assert!(handles.iter().all(|handle| pool.is_live(*handle)));
    }

    #[test]
    fn empty_pool_grows_by_at_least_one() {
        let mut pool = JobPool::new(JobPoolConfig {
            initial_capacity: 0,
            replenish_percentage: 0.5,
        });
        let handle = pool.acquire('a');
        assert_eq!(pool.capacity(), 1);
        assert_eq!(pool.get(handle), Some(&'a'));
    }

    #[test]
    fn replenish_percentage_is_validated() {
        let config = JobPoolConfig {
            initial_capacity: 1,
            replenish_percentage: 0.0,
        };
        assert!(config.validate().is_err());
    }
}

//! Fixed-capacity arenas accounted against a startup byte budget
//!
//! A `MemoryPool` is a budget, not backing storage: it is sized once when the
//! game starts and only counts bytes. Each `Arena` owns its own allocation,
//! made in full when it is reserved, and the pool refuses reservations that
//! would overrun the budget. A reservation is never handed back or resized, so
//! no allocation happens after startup. Arenas append at the end and remove by
//! swapping the last live element into the freed slot, so removal is O(1) but
//! moves one element. Slots are addressed by index and the borrow checker
//! keeps references from outliving a mutation, so callers re-resolve by
//! identity after any removal.

use crate::error::SimError;

/// Byte budget that arena reservations are counted against.
#[derive(Debug, Clone)]
pub struct MemoryPool {
    capacity_bytes: usize,
    used_bytes: usize,
}

impl MemoryPool {
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            used_bytes: 0,
        }
    }

    /// Bytes not yet reserved
    pub fn available(&self) -> usize {
        self.capacity_bytes - self.used_bytes
    }

    /// Allocate an arena holding up to `capacity` values of `T`, charging its
    /// full size to the budget.
    pub fn reserve<T>(&mut self, capacity: usize) -> Result<Arena<T>, SimError> {
        let stride = std::mem::size_of::<T>().max(1);
        let requested = stride * capacity;
        let available = self.available();
        if requested > available {
            return Err(SimError::PoolExhausted {
                requested,
                available,
            });
        }
        self.used_bytes += requested;
        log::debug!(
            "Reserved arena: {} x {} bytes ({} bytes left)",
            capacity,
            stride,
            self.available()
        );
        Ok(Arena::with_capacity(capacity))
    }
}

/// Dense, fixed-capacity storage with O(1) swap-remove.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Arena<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Element stride in bytes
    #[inline]
    pub fn stride(&self) -> usize {
        std::mem::size_of::<T>()
    }

    /// Append a value in the next free slot and return the stored copy.
    pub fn push(&mut self, value: T) -> Result<&mut T, SimError> {
        if self.items.len() >= self.capacity {
            return Err(SimError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.items.push(value);
        let last = self.items.len() - 1;
        Ok(&mut self.items[last])
    }

    /// Remove the value at `index`, moving the last live value into its slot.
    ///
    /// Returns the removed value, or `None` if `index` is past the live end.
    pub fn swap_remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.swap_remove(index))
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Live prefix of the region
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Drop every live value; capacity is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut arena: Arena<u32> = Arena::with_capacity(3);
        for i in 0..3 {
            assert_eq!(*arena.push(i).unwrap(), i);
        }
        assert_eq!(arena.len(), 3);

        let err = arena.push(99).unwrap_err();
        assert!(matches!(err, SimError::CapacityExceeded { capacity: 3 }));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_swap_remove_moves_last_into_slot() {
        let mut arena: Arena<char> = Arena::with_capacity(4);
        for c in ['a', 'b', 'c', 'd'] {
            arena.push(c).unwrap();
        }

        assert_eq!(arena.swap_remove(1), Some('b'));
        assert_eq!(arena.iter().copied().collect::<Vec<_>>(), vec!['a', 'd', 'c']);

        // Removing the last slot moves nothing
        assert_eq!(arena.swap_remove(2), Some('c'));
        assert_eq!(arena.iter().copied().collect::<Vec<_>>(), vec!['a', 'd']);

        assert_eq!(arena.swap_remove(5), None);
    }

    #[test]
    fn test_freed_slot_is_reusable() {
        let mut arena: Arena<u8> = Arena::with_capacity(1);
        arena.push(1).unwrap();
        arena.swap_remove(0);
        assert!(arena.is_empty());
        assert!(arena.push(2).is_ok());
    }

    #[test]
    fn test_pool_reserves_in_sequence() {
        let mut pool = MemoryPool::new(64);
        let a: Arena<u64> = pool.reserve(4).unwrap();
        assert_eq!(a.capacity(), 4);
        assert_eq!(a.stride(), 8);
        assert_eq!(pool.available(), 32);

        let err = pool.reserve::<u64>(5).unwrap_err();
        assert!(matches!(
            err,
            SimError::PoolExhausted {
                requested: 40,
                available: 32
            }
        ));

        // A failed reservation consumes nothing
        assert!(pool.reserve::<u64>(4).is_ok());
        assert_eq!(pool.available(), 0);
    }
}

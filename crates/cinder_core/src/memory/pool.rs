//! # Pool Allocator
//!
//! Fixed-capacity slot allocator with two intrusive, index-linked lists.
//!
//! Every slot is on exactly one of the free list or the active list. Both
//! lists are singly linked through a shared `next` array, so a slot's single
//! link always belongs to whichever list currently owns it. Allocation pops
//! the free head and pushes onto the active head; the sweep unlinks expired
//! slots from anywhere in the active list and pushes them onto the free head.
//! All three are O(1) per slot and never touch the heap.

use std::ops::{Index, IndexMut};

/// Pools are never smaller than this, whatever the configuration asks for.
pub const ABSOLUTE_MIN_CAPACITY: usize = 512;

/// Default capacity when nothing is configured.
pub const DEFAULT_CAPACITY: usize = 2048;

/// Clamps a requested capacity to [`ABSOLUTE_MIN_CAPACITY`].
#[inline]
#[must_use]
pub const fn clamp_capacity(requested: usize) -> usize {
    if requested < ABSOLUTE_MIN_CAPACITY {
        ABSOLUTE_MIN_CAPACITY
    } else {
        requested
    }
}

/// Payloads that know when the sweep should reclaim them.
pub trait Expiring {
    /// True once `now` has reached the payload's deadline.
    fn is_expired(&self, now: f64) -> bool;
}

/// Handle to a slot in a pool.
///
/// Handles are only minted by [`PoolAllocator::allocate_one`] and are valid
/// until the slot is swept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle {
    /// Index into the pool.
    index: usize,
}

impl PoolHandle {
    /// Slot index inside the backing storage.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// A pool allocator for fixed-size records.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Allocation, sweeping, and active-list
/// iteration must be serialised by the caller; wrap it in a mutex to share it.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: PoolAllocator<Particle> = PoolAllocator::initialize(4096);
///
/// // Allocate - O(1), slot contents are stale until stamped
/// if let Some(handle) = pool.allocate_one() {
///     pool[handle] = Particle::born(now, now + 1.0, ParticleKind::Static, origin);
/// }
///
/// // Reclaim everything whose deadline has passed
/// pool.sweep_expired(now);
/// ```
#[derive(Clone, Debug)]
pub struct PoolAllocator<T> {
    /// The storage array.
    storage: Box<[T]>,
    /// Per-slot link into whichever list owns the slot.
    next: Box<[Option<usize>]>,
    /// Head of the free list.
    free_head: Option<usize>,
    /// Head of the active list (newest allocation first).
    active_head: Option<usize>,
    /// Number of slots on the active list.
    active_count: usize,
}

impl<T: Default + Clone> PoolAllocator<T> {
    /// Creates a pool with exactly `capacity` slots.
    ///
    /// All memory is pre-allocated upfront.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of slots, must be non-zero
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let mut pool = Self {
            storage: vec![T::default(); capacity].into_boxed_slice(),
            next: vec![None; capacity].into_boxed_slice(),
            free_head: None,
            active_head: None,
            active_count: 0,
        };
        pool.reset();
        pool
    }

    /// Creates a pool from a configured capacity, clamped to the floor.
    #[must_use]
    pub fn initialize(requested: usize) -> Self {
        Self::new(clamp_capacity(requested))
    }
}

impl<T> PoolAllocator<T> {
    /// Returns every slot to the free list in storage order and empties the
    /// active list. Reuses the existing storage; payloads are left stale.
    pub fn reset(&mut self) {
        let capacity = self.storage.len();
        for (index, link) in self.next.iter_mut().enumerate() {
            *link = if index + 1 < capacity { Some(index + 1) } else { None };
        }
        self.free_head = if capacity > 0 { Some(0) } else { None };
        self.active_head = None;
        self.active_count = 0;
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of slots on the active list.
    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Returns the number of slots on the free list.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.capacity() - self.active_count
    }

    /// True when the next allocation would fail.
    #[inline]
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.free_head.is_none()
    }

    /// Moves the free-list head onto the active-list head.
    ///
    /// This is a **O(1)** operation with **zero heap allocations**. The slot
    /// still holds whatever its previous occupant left behind, so the caller
    /// must stamp every field before relying on it.
    ///
    /// # Returns
    ///
    /// A handle to the slot, or None if the pool is exhausted. Exhaustion is
    /// not an error: callers stop emitting for the current effect.
    pub fn allocate_one(&mut self) -> Option<PoolHandle> {
        let index = self.free_head?;
        self.free_head = self.next[index];
        self.next[index] = self.active_head;
        self.active_head = Some(index);
        self.active_count += 1;
        Some(PoolHandle { index })
    }

    /// Allocates a slot and stamps it with `value`.
    pub fn emit(&mut self, value: T) -> Option<PoolHandle> {
        let handle = self.allocate_one()?;
        self.storage[handle.index] = value;
        Some(handle)
    }

    /// Single pass over the active list that returns every slot matching
    /// `expired` to the free list, re-anchoring the head when needed.
    ///
    /// Surviving slots keep their relative order.
    ///
    /// # Returns
    ///
    /// The number of slots released.
    pub fn release_where(&mut self, mut expired: impl FnMut(&T) -> bool) -> usize {
        let mut released = 0;

        while let Some(head) = self.active_head {
            if !expired(&self.storage[head]) {
                break;
            }
            self.active_head = self.next[head];
            self.push_free(head);
            released += 1;
        }

        let mut cursor = self.active_head;
        while let Some(current) = cursor {
            while let Some(candidate) = self.next[current] {
                if !expired(&self.storage[candidate]) {
                    break;
                }
                self.next[current] = self.next[candidate];
                self.push_free(candidate);
                released += 1;
            }
            cursor = self.next[current];
        }

        released
    }

    /// Iterates over active slots, newest first.
    pub fn active(&self) -> ActiveIter<'_, T> {
        ActiveIter {
            pool: self,
            cursor: self.active_head,
        }
    }

    /// Handles of the free slots, in free-list order.
    pub fn free_handles(&self) -> impl Iterator<Item = PoolHandle> + '_ {
        let mut cursor = self.free_head;
        std::iter::from_fn(move || {
            let index = cursor?;
            cursor = self.next[index];
            Some(PoolHandle { index })
        })
    }

    /// Calls `f` on every active slot, newest first.
    pub fn for_each_active_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let mut cursor = self.active_head;
        while let Some(index) = cursor {
            f(&mut self.storage[index]);
            cursor = self.next[index];
        }
    }

    /// Gets a reference to a slot.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.storage.get(handle.index)
    }

    /// Gets a mutable reference to a slot.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.storage.get_mut(handle.index)
    }

    #[inline]
    fn push_free(&mut self, index: usize) {
        self.next[index] = self.free_head;
        self.free_head = Some(index);
        self.active_count -= 1;
    }
}

impl<T: Expiring> PoolAllocator<T> {
    /// Returns every active slot whose deadline is at or before `now` to the
    /// free list.
    ///
    /// # Returns
    ///
    /// The number of slots released.
    pub fn sweep_expired(&mut self, now: f64) -> usize {
        self.release_where(|value| value.is_expired(now))
    }
}

impl<T> Index<PoolHandle> for PoolAllocator<T> {
    type Output = T;

    fn index(&self, handle: PoolHandle) -> &T {
        &self.storage[handle.index]
    }
}

impl<T> IndexMut<PoolHandle> for PoolAllocator<T> {
    fn index_mut(&mut self, handle: PoolHandle) -> &mut T {
        &mut self.storage[handle.index]
    }
}

/// Iterator over the active list.
pub struct ActiveIter<'a, T> {
    pool: &'a PoolAllocator<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for ActiveIter<'a, T> {
    type Item = (PoolHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        self.cursor = self.pool.next[index];
        Some((PoolHandle { index }, &self.pool.storage[index]))
    }
}

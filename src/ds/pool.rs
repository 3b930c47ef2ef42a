//! Preallocated entry pool with an index free list.
//!
//! One contiguous `Vec<Entry>` backs the whole table. The first `reserved`
//! slots are bucket sentinels owned by the table; every other slot is either
//! occupied (linked into a bucket chain) or on the free stack.
//!
//! ## Architecture
//!
//! ```text
//!   entries: Vec<Entry>
//!   ┌──────────────── reserved ───────────────┬──────────── pooled ─────────────┐
//!   │ S0 │ S1 │ S2 │ ... │ S(n-1)             │ E │ E │ f │ E │ f │ f │ ... │ f │
//!   └─────────────────────────────────────────┴─────────────────────────────────┘
//!     sentinels: next = chain head               E = occupied, f = free
//!
//!   free: Vec<EntryId>   (stack, top = next slot handed out)
//! ```
//!
//! Links are [`EntryId`] indices, never pointers, so a reallocation that moves
//! the buffer during [`EntryPool::grow`] leaves every link valid.
//!
//! ## Operations
//! - `acquire`: O(1), pops the free stack, never allocates
//! - `release`: O(1), scrubs the slot and pushes it (LIFO reuse)
//! - `grow`: O(capacity), doubles the pool and frees the new upper half

use crate::ds::key::FixedKey;
use crate::error::TableError;

/// Stable index of a slot in an [`EntryPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One key/count node. Sentinels reuse the layout with an empty key and only
/// their `next` link is meaningful.
#[derive(Debug, Clone)]
pub struct Entry {
    pub(crate) key: FixedKey,
    pub(crate) count: u64,
    pub(crate) next: Option<EntryId>,
    pub(crate) is_free: bool,
}

impl Entry {
    const fn sentinel() -> Self {
        Self {
            key: FixedKey::EMPTY,
            count: 0,
            next: None,
            is_free: false,
        }
    }

    const fn vacant() -> Self {
        Self {
            key: FixedKey::EMPTY,
            count: 0,
            next: None,
            is_free: true,
        }
    }

    pub fn key(&self) -> &FixedKey {
        &self.key
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn next(&self) -> Option<EntryId> {
        self.next
    }

    pub fn is_free(&self) -> bool {
        self.is_free
    }
}

#[derive(Debug)]
pub struct EntryPool {
    entries: Vec<Entry>,
    free: Vec<EntryId>,
    reserved: usize,
}

impl EntryPool {
    /// Creates a pool of `capacity` slots whose first `reserved` slots are
    /// sentinels.
    ///
    /// # Errors
    ///
    /// [`TableError::OutOfMemory`] if the slots cannot be allocated.
    pub fn new(reserved: usize, capacity: usize) -> Result<Self, TableError> {
        debug_assert!(capacity >= reserved);
        let oom = || TableError::OutOfMemory {
            requested: capacity,
        };

        let mut entries = Vec::new();
        entries.try_reserve_exact(capacity).map_err(|_| oom())?;
        let mut free = Vec::new();
        free.try_reserve_exact(capacity - reserved)
            .map_err(|_| oom())?;

        entries.resize(reserved, Entry::sentinel());
        entries.resize(capacity, Entry::vacant());
        free.extend((reserved..capacity).rev().map(EntryId));

        Ok(Self {
            entries,
            free,
            reserved,
        })
    }

    /// Pops a free slot, or `None` when the pool must grow first.
    #[inline]
    pub fn acquire(&mut self) -> Option<EntryId> {
        let id = self.free.pop()?;
        self.entries[id.0].is_free = false;
        Some(id)
    }

    /// Scrubs `id` and pushes it onto the free stack.
    #[inline]
    pub fn release(&mut self, id: EntryId) {
        debug_assert!(id.0 >= self.reserved, "sentinel {:?} released", id);
        let entry = &mut self.entries[id.0];
        debug_assert!(!entry.is_free, "double release of {:?}", id);
        entry.key.clear();
        entry.count = 0;
        entry.next = None;
        entry.is_free = true;
        self.free.push(id);
    }

    /// Doubles the pool, making the new upper half available for `acquire`.
    ///
    /// Memory is reserved before anything is touched, so on error the pool is
    /// exactly as it was. Returns the number of slots added.
    pub fn grow(&mut self) -> Result<usize, TableError> {
        let old_capacity = self.entries.len();
        let new_capacity = old_capacity
            .max(1)
            .checked_mul(2)
            .ok_or(TableError::OutOfMemory {
                requested: usize::MAX,
            })?;
        let added = new_capacity - old_capacity;
        let oom = TableError::OutOfMemory {
            requested: new_capacity,
        };

        self.entries
            .try_reserve_exact(added)
            .map_err(|_| oom.clone())?;
        self.free.try_reserve_exact(added).map_err(|_| oom)?;

        self.entries.resize(new_capacity, Entry::vacant());
        self.free
            .extend((old_capacity..new_capacity).rev().map(EntryId));
        Ok(added)
    }

    /// Returns every pooled slot to the free stack and unlinks all sentinels.
    pub fn reset(&mut self) {
        let capacity = self.entries.len();
        for entry in &mut self.entries[..self.reserved] {
            entry.next = None;
        }
        for entry in &mut self.entries[self.reserved..] {
            *entry = Entry::vacant();
        }
        self.free.clear();
        self.free
            .extend((self.reserved..capacity).rev().map(EntryId));
    }

    #[inline]
    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id.0]
    }

    #[inline]
    pub fn entry_mut(&mut self, id: EntryId) -> &mut Entry {
        &mut self.entries[id.0]
    }

    /// Sentinel for bucket `bucket`.
    #[inline]
    pub fn sentinel(&self, bucket: usize) -> &Entry {
        debug_assert!(bucket < self.reserved);
        &self.entries[bucket]
    }

    #[inline]
    pub fn sentinel_id(&self, bucket: usize) -> EntryId {
        debug_assert!(bucket < self.reserved);
        EntryId(bucket)
    }

    /// Total number of slots, sentinels included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Number of occupied (non-sentinel, non-free) slots.
    #[inline]
    pub fn occupied_len(&self) -> usize {
        self.entries.len() - self.reserved - self.free.len()
    }

    pub(crate) fn free_ids(&self) -> &[EntryId] {
        &self.free
    }

    /// Iterates the pooled (non-sentinel) slots with their ids.
    pub fn pooled(&self) -> impl Iterator<Item = (EntryId, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .skip(self.reserved)
            .map(|(idx, entry)| (EntryId(idx), entry))
    }
}

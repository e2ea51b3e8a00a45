//! Arena storage for graph entities
//!
//! A [`Pool`] keeps records contiguously in a vector addressed by slot index,
//! with a free-slot list so that removing and re-adding entities does not grow
//! the arena. Records are reached through [`Ref`] cursors.

pub mod slot_ref;

pub use slot_ref::{Ref, SlotIndex, NO_SLOT};

use std::marker::PhantomData;

/// Arena of fixed-shape records
///
/// - records: slot -> record (`None` for free slots)
/// - generations: slot -> generation, bumped every time the slot is freed
/// - free_slots: stack of free slot indices, reused before the arena grows
#[derive(Debug)]
pub struct Pool<T, R> {
    records: Vec<Option<R>>,
    generations: Vec<u32>,
    free_slots: Vec<SlotIndex>,
    live: usize,
    _tag: PhantomData<fn() -> T>,
}

impl<T, R> Pool<T, R> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Pool {
            records: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_slots: Vec::new(),
            live: 0,
            _tag: PhantomData,
        }
    }

    /// Reserve room for `additional` more slots beyond the current arena
    pub fn reserve(&mut self, additional: usize) {
        self.records.reserve(additional);
        self.generations.reserve(additional);
    }

    /// Store `record` in a free slot (or a new one) and return a ref to it
    pub fn allocate(&mut self, record: R) -> Ref<T> {
        self.live += 1;
        if let Some(slot) = self.free_slots.pop() {
            let idx = slot as usize;
            self.records[idx] = Some(record);
            return Ref::new(slot, self.generations[idx]);
        }

        let idx = self.records.len();
        self.records.push(Some(record));
        // generations may outlive a clear(), keep them so old refs stay stale
        if idx >= self.generations.len() {
            self.generations.push(0);
        }
        Ref::new(idx as SlotIndex, self.generations[idx])
    }

    /// Release a slot, returning its record
    ///
    /// Refs still pointing at the slot are not tracked; they simply stop
    /// resolving because the slot generation moves on.
    pub fn free(&mut self, slot: SlotIndex) -> Option<R> {
        let idx = slot as usize;
        let record = self.records.get_mut(idx)?.take()?;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_slots.push(slot);
        self.live -= 1;
        Some(record)
    }

    /// Resolve a ref, `None` if its slot is free or has been reused since
    pub fn get(&self, r: &Ref<T>) -> Option<&R> {
        let idx = r.internal_slot_index() as usize;
        if self.generations.get(idx) != Some(&r.generation()) {
            return None;
        }
        self.records.get(idx)?.as_ref()
    }

    pub fn get_mut(&mut self, r: &Ref<T>) -> Option<&mut R> {
        let idx = r.internal_slot_index() as usize;
        if self.generations.get(idx) != Some(&r.generation()) {
            return None;
        }
        self.records.get_mut(idx)?.as_mut()
    }

    /// Check that a ref still designates a live record
    pub fn contains(&self, r: &Ref<T>) -> bool {
        self.get(r).is_some()
    }

    /// Record at a raw slot, ignoring generations
    pub fn record(&self, slot: SlotIndex) -> Option<&R> {
        self.records.get(slot as usize)?.as_ref()
    }

    pub(crate) fn record_mut(&mut self, slot: SlotIndex) -> Option<&mut R> {
        self.records.get_mut(slot as usize)?.as_mut()
    }

    pub fn is_live(&self, slot: SlotIndex) -> bool {
        self.record(slot).is_some()
    }

    /// Fresh ref to a live slot
    pub fn ref_at(&self, slot: SlotIndex) -> Option<Ref<T>> {
        self.is_live(slot)
            .then(|| Ref::new(slot, self.generations[slot as usize]))
    }

    /// Repoint `r` at a live slot without creating a new ref
    pub fn point<'r>(&self, slot: SlotIndex, r: &'r mut Ref<T>) -> Option<&'r mut Ref<T>> {
        if !self.is_live(slot) {
            return None;
        }
        Some(r.point_at(slot, self.generations[slot as usize]))
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots in the arena, live or free
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Live slots in ascending order
    pub fn slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some())
            .map(|(idx, _)| idx as SlotIndex)
    }

    /// Live records with their refs, in ascending slot order
    pub fn iter(&self) -> impl Iterator<Item = (Ref<T>, &R)> + '_ {
        self.records.iter().enumerate().filter_map(move |(idx, r)| {
            r.as_ref()
                .map(|record| (Ref::new(idx as SlotIndex, self.generations[idx]), record))
        })
    }

    /// Drop every record, keeping the allocation
    ///
    /// Every generation is bumped, so refs taken before the clear are stale
    /// even once their slots are handed out again.
    pub fn clear(&mut self) {
        self.records.clear();
        self.free_slots.clear();
        for generation in &mut self.generations {
            *generation = generation.wrapping_add(1);
        }
        self.live = 0;
    }
}

impl<T, R> Default for Pool<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

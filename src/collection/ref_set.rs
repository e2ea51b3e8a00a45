//! Set of pool refs backed by a bitmap over slot indices

use crate::pool::{Ref, SlotIndex};
use roaring::RoaringBitmap;
use std::fmt;
use std::marker::PhantomData;

/// Set of entities identified by slot index
///
/// Membership is keyed by slot, not by ref generation: callers remove an
/// entity from the set before its slot is freed.
pub struct RefSet<T> {
    bits: RoaringBitmap,
    _tag: PhantomData<fn() -> T>,
}

impl<T> RefSet<T> {
    pub fn new() -> Self {
        RefSet {
            bits: RoaringBitmap::new(),
            _tag: PhantomData,
        }
    }

    /// Returns true if the ref was not already present
    pub fn insert(&mut self, r: &Ref<T>) -> bool {
        self.bits.insert(r.internal_slot_index())
    }

    pub fn remove(&mut self, r: &Ref<T>) -> bool {
        self.bits.remove(r.internal_slot_index())
    }

    pub fn contains(&self, r: &Ref<T>) -> bool {
        self.bits.contains(r.internal_slot_index())
    }

    pub fn len(&self) -> usize {
        self.bits.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Member slots in ascending order
    pub fn slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        self.bits.iter()
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }
}

impl<T> Default for RefSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RefSet<T> {
    fn clone(&self) -> Self {
        RefSet {
            bits: self.bits.clone(),
            _tag: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RefSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.iter()).finish()
    }
}

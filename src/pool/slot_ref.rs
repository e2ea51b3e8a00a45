//! Flyweight references into a pool
//!
//! A [`Ref`] is a small `Copy` cursor naming a pool slot. It never owns the
//! record it points at and can be repointed at will, so traversal code can keep
//! a single cursor around instead of allocating per visited element.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Integer address of a record inside a pool arena.
pub type SlotIndex = u32;

/// Slot index carried by a ref that points nowhere.
pub const NO_SLOT: SlotIndex = SlotIndex::MAX;

/// Repointable, non-owning proxy to a pool slot.
///
/// The tag parameter only separates vertex refs from edge refs at the type
/// level; it carries no data.
///
/// Besides the slot index a ref remembers the generation of the slot at the
/// time it was pointed there. Freeing a slot bumps its generation, so a ref
/// kept across a free (and possible reuse) of its slot no longer resolves.
pub struct Ref<T> {
    slot: SlotIndex,
    generation: u32,
    _tag: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    pub(crate) fn new(slot: SlotIndex, generation: u32) -> Self {
        Ref {
            slot,
            generation,
            _tag: PhantomData,
        }
    }

    /// A ref that points at no slot
    pub fn null() -> Self {
        Ref::new(NO_SLOT, 0)
    }

    /// Make this ref point at the same slot as `other`
    pub fn ref_to(&mut self, other: &Ref<T>) -> &mut Self {
        self.slot = other.slot;
        self.generation = other.generation;
        self
    }

    /// Raw slot index, for pool-aware collections keyed by slot
    pub fn internal_slot_index(&self) -> SlotIndex {
        self.slot
    }

    /// Generation of the slot when this ref was pointed at it
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_null(&self) -> bool {
        self.slot == NO_SLOT
    }

    pub(crate) fn point_at(&mut self, slot: SlotIndex, generation: u32) -> &mut Self {
        self.slot = slot;
        self.generation = generation;
        self
    }
}

// Manual impls: derives would put bounds on the tag type.

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.generation == other.generation
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slot.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Default for Ref<T> {
    fn default() -> Self {
        Ref::null()
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Ref(null)")
        } else {
            write!(f, "Ref({}@{})", self.slot, self.generation)
        }
    }
}

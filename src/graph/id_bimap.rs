//! Bidirectional map between stable IDs and pool slots
//!
//! Slot indices are reused as entities come and go; stable IDs are not. The
//! bimap keeps the two in sync so consumers can hold on to an ID across
//! arbitrary churn and resolve it back to a slot when they need the record.

use super::store::{GraphError, GraphResult};
use super::types::{EdgeId, StableId, VertexId};
use crate::pool::SlotIndex;
use rustc_hash::FxHashMap;

const NO_ID: u64 = u64::MAX;

/// Bijection `stable ID <-> slot index` for one entity kind
#[derive(Debug)]
pub struct IdBimap<I: StableId> {
    /// stable ID -> slot
    id_to_slot: FxHashMap<I, SlotIndex>,
    /// slot -> stable ID (`NO_ID` for slots without a mapping)
    slot_to_id: Vec<u64>,
    /// Next ID handed out by `assign`
    next_id: u64,
}

impl<I: StableId> IdBimap<I> {
    pub fn new() -> Self {
        IdBimap {
            id_to_slot: FxHashMap::default(),
            slot_to_id: Vec::new(),
            next_id: 0,
        }
    }

    /// Give `slot` the next unused stable ID
    pub fn assign(&mut self, slot: SlotIndex) -> I {
        let id = I::from_u64(self.next_id);
        self.next_id += 1;
        self.link(slot, id);
        id
    }

    /// Give `slot` a caller-chosen stable ID
    ///
    /// The generator is moved past `id` so later `assign` calls never collide
    /// with it.
    pub fn assign_explicit(&mut self, slot: SlotIndex, id: I) -> GraphResult<()> {
        if self.id_to_slot.contains_key(&id) {
            return Err(GraphError::StableIdInUse(id.as_u64()));
        }
        if id.as_u64() >= self.next_id {
            self.next_id = id.as_u64() + 1;
        }
        self.link(slot, id);
        Ok(())
    }

    fn link(&mut self, slot: SlotIndex, id: I) {
        let idx = slot as usize;
        if idx >= self.slot_to_id.len() {
            self.slot_to_id.resize(idx + 1, NO_ID);
        }
        self.slot_to_id[idx] = id.as_u64();
        self.id_to_slot.insert(id, slot);
    }

    /// Drop the mapping for `id`, returning the slot it pointed at
    pub fn retire(&mut self, id: I) -> Option<SlotIndex> {
        let slot = self.id_to_slot.remove(&id)?;
        self.slot_to_id[slot as usize] = NO_ID;
        Some(slot)
    }

    /// Drop the mapping for `slot`, returning the ID it carried
    pub fn retire_slot(&mut self, slot: SlotIndex) -> Option<I> {
        let id = self.id_of(slot)?;
        self.retire(id);
        Some(id)
    }

    pub fn id_of(&self, slot: SlotIndex) -> Option<I> {
        match self.slot_to_id.get(slot as usize) {
            Some(&id) if id != NO_ID => Some(I::from_u64(id)),
            _ => None,
        }
    }

    pub fn slot_of(&self, id: I) -> Option<SlotIndex> {
        self.id_to_slot.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.id_to_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_slot.is_empty()
    }

    /// ID the next `assign` will hand out
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Forget every mapping and restart the generator
    pub fn clear(&mut self) {
        self.id_to_slot.clear();
        self.slot_to_id.clear();
        self.next_id = 0;
    }

    /// Check that both directions agree and that exactly `live_slots` are mapped
    pub fn verify(&self, live_slots: impl Iterator<Item = SlotIndex>) -> GraphResult<()> {
        let mut seen = 0usize;
        for slot in live_slots {
            let id = self.id_of(slot).ok_or_else(|| {
                GraphError::InconsistentIdMap(format!("live slot {} has no stable ID", slot))
            })?;
            match self.slot_of(id) {
                Some(back) if back == slot => {}
                Some(back) => {
                    return Err(GraphError::InconsistentIdMap(format!(
                        "{} maps to slot {} but slot {} maps to it",
                        id, back, slot
                    )))
                }
                None => {
                    return Err(GraphError::InconsistentIdMap(format!(
                        "{} of slot {} is not mapped back",
                        id, slot
                    )))
                }
            }
            seen += 1;
        }
        if seen != self.id_to_slot.len() {
            return Err(GraphError::InconsistentIdMap(format!(
                "{} stable IDs mapped for {} live slots",
                self.id_to_slot.len(),
                seen
            )));
        }
        Ok(())
    }
}

impl<I: StableId> Default for IdBimap<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertex and edge ID maps of one graph
#[derive(Debug, Default)]
pub struct GraphIdBimap {
    pub(crate) vertices: IdBimap<VertexId>,
    pub(crate) edges: IdBimap<EdgeId>,
}

impl GraphIdBimap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &IdBimap<VertexId> {
        &self.vertices
    }

    pub fn edges(&self) -> &IdBimap<EdgeId> {
        &self.edges
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }
}

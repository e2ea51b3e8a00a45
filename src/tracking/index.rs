//! Spots grouped by timepoint

use crate::collection::RefSet;
use crate::graph::{PoolGraph, VertexRef, VertexTag};
use std::collections::BTreeMap;

use super::spot::Spot;

/// Timepoint -> set of spot slots
#[derive(Debug, Clone, Default)]
pub struct TimepointIndex {
    by_timepoint: BTreeMap<i32, RefSet<VertexTag>>,
}

impl TimepointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, timepoint: i32, v: &VertexRef) {
        self.by_timepoint.entry(timepoint).or_default().insert(v);
    }

    pub fn remove(&mut self, timepoint: i32, v: &VertexRef) {
        if let Some(set) = self.by_timepoint.get_mut(&timepoint) {
            set.remove(v);
            if set.is_empty() {
                self.by_timepoint.remove(&timepoint);
            }
        }
    }

    /// Recompute the index from scratch
    pub fn rebuild<E>(&mut self, graph: &PoolGraph<Spot, E>) {
        self.by_timepoint.clear();
        for (v, record) in graph.vertex_pool().iter() {
            self.insert(record.payload.timepoint, &v);
        }
    }

    pub fn clear(&mut self) {
        self.by_timepoint.clear();
    }

    /// Slots of the spots at `timepoint`, ascending
    pub fn slots(&self, timepoint: i32) -> impl Iterator<Item = u32> + '_ {
        self.by_timepoint
            .get(&timepoint)
            .into_iter()
            .flat_map(|set| set.slots())
    }

    pub fn count(&self, timepoint: i32) -> usize {
        self.by_timepoint.get(&timepoint).map_or(0, RefSet::len)
    }

    /// Timepoints holding at least one spot, ascending
    pub fn timepoints(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_timepoint.keys().copied()
    }
}

//! Transient file IDs
//!
//! On write, live vertices and then live edges are numbered densely from 0 in
//! ascending slot order. On read, the inverse map is filled as entities are
//! allocated. Neither map survives the stream it was built for.

use crate::features::EntityKind;
use crate::graph::PoolGraph;
use crate::pool::SlotIndex;

const NO_FILE_ID: u32 = u32::MAX;

/// Slot -> file ID, built from a graph before writing
#[derive(Debug, Default)]
pub struct GraphToFileIdMap {
    vertices: Vec<u32>,
    edges: Vec<u32>,
    vertex_count: u32,
    edge_count: u32,
}

fn number(slots: impl Iterator<Item = SlotIndex>, capacity: usize) -> (Vec<u32>, u32) {
    let mut ids = vec![NO_FILE_ID; capacity];
    let mut next = 0u32;
    for slot in slots {
        ids[slot as usize] = next;
        next += 1;
    }
    (ids, next)
}

impl GraphToFileIdMap {
    pub fn build<V, E>(graph: &PoolGraph<V, E>) -> Self {
        let vpool = graph.vertex_pool();
        let epool = graph.edge_pool();
        let (vertices, vertex_count) = number(vpool.slots(), vpool.capacity());
        let (edges, edge_count) = number(epool.slots(), epool.capacity());
        GraphToFileIdMap {
            vertices,
            edges,
            vertex_count,
            edge_count,
        }
    }

    pub fn file_id(&self, kind: EntityKind, slot: SlotIndex) -> Option<u32> {
        let ids = match kind {
            EntityKind::Vertex => &self.vertices,
            EntityKind::Edge => &self.edges,
        };
        ids.get(slot as usize).copied().filter(|&id| id != NO_FILE_ID)
    }

    pub fn vertex_file_id(&self, slot: SlotIndex) -> Option<u32> {
        self.file_id(EntityKind::Vertex, slot)
    }

    pub fn edge_file_id(&self, slot: SlotIndex) -> Option<u32> {
        self.file_id(EntityKind::Edge, slot)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn edge_count(&self) -> u32 {
        self.edge_count
    }
}

/// File ID -> slot, filled while reading
#[derive(Debug, Default)]
pub struct FileIdToGraphMap {
    vertices: Vec<SlotIndex>,
    edges: Vec<SlotIndex>,
}

impl FileIdToGraphMap {
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        FileIdToGraphMap {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Record the slot of the next vertex file ID
    pub fn push_vertex(&mut self, slot: SlotIndex) {
        self.vertices.push(slot);
    }

    /// Record the slot of the next edge file ID
    pub fn push_edge(&mut self, slot: SlotIndex) {
        self.edges.push(slot);
    }

    pub fn slot(&self, kind: EntityKind, file_id: u32) -> Option<SlotIndex> {
        let slots = match kind {
            EntityKind::Vertex => &self.vertices,
            EntityKind::Edge => &self.edges,
        };
        slots.get(file_id as usize).copied()
    }

    pub fn vertex_slot(&self, file_id: u32) -> Option<SlotIndex> {
        self.slot(EntityKind::Vertex, file_id)
    }

    pub fn edge_slot(&self, file_id: u32) -> Option<SlotIndex> {
        self.slot(EntityKind::Edge, file_id)
    }
}

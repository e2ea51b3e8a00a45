//! Pool-backed graph storage
//!
//! Vertices and edges live in two [`Pool`]s. Adjacency is kept on the vertex
//! records as lists of edge slots, and every live entity carries a stable ID
//! in the graph's [`GraphIdBimap`].

use super::id_bimap::GraphIdBimap;
use super::types::{EdgeId, EdgeRef, EdgeTag, VertexId, VertexRef, VertexTag};
use crate::pool::{Pool, SlotIndex};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Vertex ref {0:?} does not point at a live vertex")]
    StaleVertexRef(VertexRef),

    #[error("Edge ref {0:?} does not point at a live edge")]
    StaleEdgeRef(EdgeRef),

    #[error("{0} not found")]
    VertexNotFound(VertexId),

    #[error("{0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Stable ID {0} is already in use")]
    StableIdInUse(u64),

    #[error("Inconsistent ID map: {0}")]
    InconsistentIdMap(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Vertex row: payload plus incident edge slots
#[derive(Debug, Clone)]
pub struct VertexRecord<V> {
    pub(crate) payload: V,
    pub(crate) outgoing: Vec<SlotIndex>,
    pub(crate) incoming: Vec<SlotIndex>,
}

/// Edge row: endpoint vertex slots plus payload
#[derive(Debug, Clone)]
pub struct EdgeRecord<E> {
    pub(crate) source: SlotIndex,
    pub(crate) target: SlotIndex,
    pub(crate) payload: E,
}

/// Directed multigraph stored in pools
///
/// - vertices: slot -> VertexRecord (payload, outgoing, incoming)
/// - edges: slot -> EdgeRecord (source, target, payload)
/// - idmap: stable IDs of all live vertices and edges
///
/// Removing a vertex here also removes its incident edges. The owning
/// [`Model`](crate::model::Model) removes them one by one first so that each
/// removal is announced to listeners.
#[derive(Debug)]
pub struct PoolGraph<V, E> {
    vertices: Pool<VertexTag, VertexRecord<V>>,
    edges: Pool<EdgeTag, EdgeRecord<E>>,
    idmap: GraphIdBimap,
}

impl<V, E> PoolGraph<V, E> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        PoolGraph {
            vertices: Pool::with_capacity(vertices),
            edges: Pool::with_capacity(edges),
            idmap: GraphIdBimap::new(),
        }
    }

    pub fn reserve(&mut self, vertices: usize, edges: usize) {
        self.vertices.reserve(vertices);
        self.edges.reserve(edges);
    }

    // ============================================================
    // Structural mutation
    // ============================================================

    /// Add a vertex with a freshly generated stable ID
    pub fn add_vertex(&mut self, payload: V) -> VertexRef {
        let v = self.vertices.allocate(VertexRecord {
            payload,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        self.idmap.vertices.assign(v.internal_slot_index());
        v
    }

    /// Add a vertex under a caller-chosen stable ID
    pub fn add_vertex_with_id(&mut self, id: VertexId, payload: V) -> GraphResult<VertexRef> {
        if self.idmap.vertices.slot_of(id).is_some() {
            return Err(GraphError::StableIdInUse(id.0));
        }
        let v = self.vertices.allocate(VertexRecord {
            payload,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        self.idmap.vertices.assign_explicit(v.internal_slot_index(), id)?;
        Ok(v)
    }

    /// Add a directed edge between two live vertices
    pub fn add_edge(&mut self, source: VertexRef, target: VertexRef, payload: E) -> GraphResult<EdgeRef> {
        if !self.vertices.contains(&source) {
            return Err(GraphError::StaleVertexRef(source));
        }
        if !self.vertices.contains(&target) {
            return Err(GraphError::StaleVertexRef(target));
        }

        let e = self.edges.allocate(EdgeRecord {
            source: source.internal_slot_index(),
            target: target.internal_slot_index(),
            payload,
        });
        let slot = e.internal_slot_index();

        // Update adjacency lists
        if let Some(record) = self.vertices.get_mut(&source) {
            record.outgoing.push(slot);
        }
        if let Some(record) = self.vertices.get_mut(&target) {
            record.incoming.push(slot);
        }

        self.idmap.edges.assign(slot);
        Ok(e)
    }

    /// Remove an edge, returning its payload
    pub fn remove_edge(&mut self, e: EdgeRef) -> GraphResult<E> {
        if !self.edges.contains(&e) {
            return Err(GraphError::StaleEdgeRef(e));
        }
        let slot = e.internal_slot_index();
        let record = self.edges.free(slot).ok_or(GraphError::StaleEdgeRef(e))?;

        // Remove from adjacency lists
        if let Some(source) = self.vertices.record_mut(record.source) {
            source.outgoing.retain(|&s| s != slot);
        }
        if let Some(target) = self.vertices.record_mut(record.target) {
            target.incoming.retain(|&s| s != slot);
        }

        self.idmap.edges.retire_slot(slot);
        Ok(record.payload)
    }

    /// Remove a vertex and all its incident edges, returning its payload
    pub fn remove_vertex(&mut self, v: VertexRef) -> GraphResult<V> {
        let record = self.vertices.get(&v).ok_or(GraphError::StaleVertexRef(v))?;
        let incident: Vec<SlotIndex> = record
            .outgoing
            .iter()
            .chain(record.incoming.iter())
            .copied()
            .collect();

        for slot in incident {
            if let Some(e) = self.edges.ref_at(slot) {
                self.remove_edge(e)?;
            }
        }

        let slot = v.internal_slot_index();
        let record = self.vertices.free(slot).ok_or(GraphError::StaleVertexRef(v))?;
        self.idmap.vertices.retire_slot(slot);
        Ok(record.payload)
    }

    /// Drop every vertex and edge and restart the stable ID generators
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.idmap.clear();
    }

    // ============================================================
    // Record access
    // ============================================================

    pub fn vertex(&self, v: VertexRef) -> GraphResult<&V> {
        self.vertices
            .get(&v)
            .map(|r| &r.payload)
            .ok_or(GraphError::StaleVertexRef(v))
    }

    pub fn vertex_mut(&mut self, v: VertexRef) -> GraphResult<&mut V> {
        self.vertices
            .get_mut(&v)
            .map(|r| &mut r.payload)
            .ok_or(GraphError::StaleVertexRef(v))
    }

    pub fn edge(&self, e: EdgeRef) -> GraphResult<&E> {
        self.edges
            .get(&e)
            .map(|r| &r.payload)
            .ok_or(GraphError::StaleEdgeRef(e))
    }

    pub fn edge_mut(&mut self, e: EdgeRef) -> GraphResult<&mut E> {
        self.edges
            .get_mut(&e)
            .map(|r| &mut r.payload)
            .ok_or(GraphError::StaleEdgeRef(e))
    }

    pub fn contains_vertex(&self, v: VertexRef) -> bool {
        self.vertices.contains(&v)
    }

    pub fn contains_edge(&self, e: EdgeRef) -> bool {
        self.edges.contains(&e)
    }

    pub fn edge_source(&self, e: EdgeRef) -> GraphResult<VertexRef> {
        let record = self.edges.get(&e).ok_or(GraphError::StaleEdgeRef(e))?;
        self.vertices
            .ref_at(record.source)
            .ok_or(GraphError::StaleEdgeRef(e))
    }

    pub fn edge_target(&self, e: EdgeRef) -> GraphResult<VertexRef> {
        let record = self.edges.get(&e).ok_or(GraphError::StaleEdgeRef(e))?;
        self.vertices
            .ref_at(record.target)
            .ok_or(GraphError::StaleEdgeRef(e))
    }

    // ============================================================
    // Traversal
    // ============================================================

    /// All live vertices in ascending slot order
    pub fn vertices(&self) -> impl Iterator<Item = VertexRef> + '_ {
        self.vertices.iter().map(|(v, _)| v)
    }

    /// All live edges in ascending slot order
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.edges.iter().map(|(e, _)| e)
    }

    /// Outgoing edges of a vertex (empty for a stale ref)
    pub fn outgoing_edges(&self, v: VertexRef) -> impl Iterator<Item = EdgeRef> + '_ {
        self.adjacent(v, |r| &r.outgoing)
    }

    /// Incoming edges of a vertex (empty for a stale ref)
    pub fn incoming_edges(&self, v: VertexRef) -> impl Iterator<Item = EdgeRef> + '_ {
        self.adjacent(v, |r| &r.incoming)
    }

    fn adjacent<'a>(
        &'a self,
        v: VertexRef,
        list: fn(&VertexRecord<V>) -> &Vec<SlotIndex>,
    ) -> impl Iterator<Item = EdgeRef> + 'a {
        self.vertices
            .get(&v)
            .map(|r| list(r).as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&slot| self.edges.ref_at(slot))
    }

    /// First edge going from `source` to `target`
    pub fn find_edge(&self, source: VertexRef, target: VertexRef) -> Option<EdgeRef> {
        let target_slot = target.internal_slot_index();
        if !self.vertices.contains(&target) {
            return None;
        }
        self.outgoing_edges(source).find(|e| {
            self.edges
                .get(e)
                .map(|r| r.target == target_slot)
                .unwrap_or(false)
        })
    }

    /// Get total number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ============================================================
    // Stable IDs
    // ============================================================

    pub fn id_bimap(&self) -> &GraphIdBimap {
        &self.idmap
    }

    pub fn vertex_id(&self, v: VertexRef) -> Option<VertexId> {
        if !self.vertices.contains(&v) {
            return None;
        }
        self.idmap.vertices.id_of(v.internal_slot_index())
    }

    pub fn edge_id(&self, e: EdgeRef) -> Option<EdgeId> {
        if !self.edges.contains(&e) {
            return None;
        }
        self.idmap.edges.id_of(e.internal_slot_index())
    }

    /// Point `r` at the vertex with stable ID `id`
    pub fn vertex_by_id<'r>(&self, id: VertexId, r: &'r mut VertexRef) -> Option<&'r mut VertexRef> {
        let slot = self.idmap.vertices.slot_of(id)?;
        self.vertices.point(slot, r)
    }

    /// Point `r` at the edge with stable ID `id`
    pub fn edge_by_id<'r>(&self, id: EdgeId, r: &'r mut EdgeRef) -> Option<&'r mut EdgeRef> {
        let slot = self.idmap.edges.slot_of(id)?;
        self.edges.point(slot, r)
    }

    /// Check the ID bimap against the live pool contents
    pub fn verify_ids(&self) -> GraphResult<()> {
        self.idmap.vertices.verify(self.vertices.slots())?;
        self.idmap.edges.verify(self.edges.slots())
    }

    // ============================================================
    // Slot-level access for persistence and indices
    // ============================================================

    pub(crate) fn vertex_pool(&self) -> &Pool<VertexTag, VertexRecord<V>> {
        &self.vertices
    }

    pub(crate) fn edge_pool(&self) -> &Pool<EdgeTag, EdgeRecord<E>> {
        &self.edges
    }
}

impl<V, E> Default for PoolGraph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

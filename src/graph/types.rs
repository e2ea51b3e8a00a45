//! Core type definitions for the pooled graph

use crate::pool::Ref;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Type tag for vertex pools and refs
#[derive(Debug)]
pub enum VertexTag {}

/// Type tag for edge pools and refs
#[derive(Debug)]
pub enum EdgeTag {}

/// Cursor into the vertex pool
pub type VertexRef = Ref<VertexTag>;

/// Cursor into the edge pool
pub type EdgeRef = Ref<EdgeTag>;

/// Identifier that outlives slot reuse
///
/// Stable IDs are handed out by a generator per graph and mapped to slots by
/// the [`IdBimap`](super::id_bimap::IdBimap).
pub trait StableId: Copy + Eq + Hash + fmt::Debug + fmt::Display {
    fn from_u64(id: u64) -> Self;

    fn as_u64(&self) -> u64;
}

/// Stable identifier for a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct VertexId(pub u64);

impl VertexId {
    pub fn new(id: u64) -> Self {
        VertexId(id)
    }
}

impl StableId for VertexId {
    fn from_u64(id: u64) -> Self {
        VertexId(id)
    }

    fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexId({})", self.0)
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        VertexId(id)
    }
}

/// Stable identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }
}

impl StableId for EdgeId {
    fn from_u64(id: u64) -> Self {
        EdgeId(id)
    }

    fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        EdgeId(id)
    }
}

//! Pooled graph implementation
//!
//! This module implements the in-memory graph substrate:
//! - Vertices and edges stored in slot arenas, reached through refs
//! - Stable IDs kept in a bimap independent of slot reuse
//! - Change listeners with pause/resume for bulk mutation
//! - A read-only trait for consumers that must not mutate

pub mod id_bimap;
pub mod listener;
pub mod store;
pub mod types;
pub mod view;

// Re-export main types
pub use id_bimap::{GraphIdBimap, IdBimap};
pub use listener::{GraphListener, GraphListeners, ListenerId};
pub use store::{EdgeRecord, GraphError, GraphResult, PoolGraph, VertexRecord};
pub use types::{EdgeId, EdgeRef, EdgeTag, StableId, VertexId, VertexRef, VertexTag};
pub use view::ReadOnlyGraph;

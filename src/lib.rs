//! Cellgraph
//!
//! A pooled graph storage engine for cell-lineage tracking: hundreds of
//! thousands of spots and links, mutated continuously, persisted and restored
//! without allocation storms.
//!
//! # Architecture
//!
//! - `pool`: arena of fixed-shape records with a free-slot list, reached
//!   through copyable, repointable [`Ref`] cursors carrying a slot generation
//! - `graph`: directed multigraph on two pools, stable IDs kept in a bimap
//!   independent of slot reuse, change listeners with pause/resume
//! - `features`: registry of named, typed features and per-graph value columns
//! - `persistence`: raw binary stream using dense file IDs computed at write time
//! - `model`: the façade owning a graph, its feature values and listeners
//! - `tracking`: spots, links and a per-timepoint spot index
//! - `collection`: slot-keyed sets and maps
//!
//! ## Example Usage
//!
//! ```rust
//! use cellgraph::{EntityKind, FeatureRegistry, FeatureValue, Spot, TrackingModel, ValueType};
//!
//! let registry = FeatureRegistry::shared();
//! registry
//!     .register_feature(EntityKind::Vertex, "intensity", ValueType::Double)
//!     .unwrap();
//!
//! let mut model = TrackingModel::new(registry);
//! let mother = model.add_spot(Spot::new(0, [10.0, 10.0, 5.0], 2.0));
//! let daughter = model.add_spot(Spot::new(1, [11.0, 9.5, 5.0], 1.5));
//! model.add_link(mother, daughter).unwrap();
//! model.set_spot_feature(daughter, "intensity", 812.5f64).unwrap();
//!
//! let mut buf = Vec::new();
//! model.write_raw(&mut buf).unwrap();
//!
//! let mut restored = TrackingModel::new(model.registry().clone());
//! restored.read_raw(&mut buf.as_slice()).unwrap();
//! assert_eq!(restored.graph().vertex_count(), 2);
//! assert_eq!(restored.graph().edge_count(), 1);
//!
//! let d = restored.spots_at(1).next().unwrap();
//! assert_eq!(restored.vertex_feature(d, "intensity"), Some(FeatureValue::Double(812.5)));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod features;
pub mod graph;
pub mod model;
pub mod persistence;
pub mod pool;
pub mod tracking;

// Re-export main types for convenience
pub use collection::{IntObjectArrayMap, RefSet};

pub use config::{ConfigError, ConfigResult, ModelConfig};

pub use features::{
    EntityKind, Feature, FeatureError, FeatureId, FeatureRegistry, FeatureResult, FeatureStore,
    FeatureValue, ValueType,
};

pub use graph::{
    EdgeId, EdgeRef, GraphError, GraphIdBimap, GraphListener, GraphResult, IdBimap, ListenerId,
    PoolGraph, ReadOnlyGraph, StableId, VertexId, VertexRef,
};

pub use model::{Model, ModelBatch, ModelError, ModelResult};

pub use persistence::{RawIoError, RawIoResult, RawSummary};

pub use pool::{Pool, Ref, SlotIndex};

pub use tracking::{Link, Spot, TimepointIndex, TrackingModel};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}

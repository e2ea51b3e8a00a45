//! Model façade
//!
//! A [`Model`] owns one pooled graph together with its feature values and
//! listeners, and is the only way to mutate them. Readers get the graph
//! through [`Model::graph`], which hands out a shared borrow.

use crate::config::{ConfigError, ModelConfig};
use crate::features::{EntityKind, Feature, FeatureError, FeatureRegistry, FeatureStore, FeatureValue};
use crate::graph::{
    EdgeRef, GraphError, GraphListener, GraphListeners, ListenerId, PoolGraph, VertexId, VertexRef,
};
use crate::persistence::{read_graph, write_graph, RawIoError, RawSummary};
use crate::pool::SlotIndex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by the model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    #[error("Raw I/O error: {0}")]
    RawIo(#[from] RawIoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> Self {
        ModelError::RawIo(RawIoError::Io(e))
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Graph, feature values and listeners of one dataset
#[derive(Debug)]
pub struct Model<V, E> {
    graph: PoolGraph<V, E>,
    features: FeatureStore,
    registry: Arc<FeatureRegistry>,
    listeners: GraphListeners,
    config: ModelConfig,
}

impl<V, E> Model<V, E> {
    pub fn new(registry: Arc<FeatureRegistry>) -> Self {
        Self::with_config(registry, ModelConfig::default())
    }

    pub fn with_config(registry: Arc<FeatureRegistry>, config: ModelConfig) -> Self {
        Model {
            graph: PoolGraph::with_capacity(config.vertex_capacity, config.edge_capacity),
            features: FeatureStore::new(),
            registry,
            listeners: GraphListeners::new(),
            config,
        }
    }

    /// Read-only view of the graph
    pub fn graph(&self) -> &PoolGraph<V, E> {
        &self.graph
    }

    pub fn registry(&self) -> &Arc<FeatureRegistry> {
        &self.registry
    }

    pub fn feature_store(&self) -> &FeatureStore {
        &self.features
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // ============================================================
    // Structure
    // ============================================================

    pub fn add_vertex(&mut self, payload: V) -> VertexRef {
        let v = self.graph.add_vertex(payload);
        self.listeners.notify(|l| l.vertex_added(v));
        v
    }

    pub fn add_vertex_with_id(&mut self, id: VertexId, payload: V) -> ModelResult<VertexRef> {
        let v = self.graph.add_vertex_with_id(id, payload)?;
        self.listeners.notify(|l| l.vertex_added(v));
        Ok(v)
    }

    pub fn add_edge(&mut self, source: VertexRef, target: VertexRef, payload: E) -> ModelResult<EdgeRef> {
        let e = self.graph.add_edge(source, target, payload)?;
        self.listeners.notify(|l| l.edge_added(e));
        Ok(e)
    }

    /// Remove an edge and its feature values
    pub fn remove_edge(&mut self, e: EdgeRef) -> ModelResult<E> {
        if !self.graph.contains_edge(e) {
            return Err(GraphError::StaleEdgeRef(e).into());
        }
        self.listeners.notify(|l| l.edge_removed(e));
        self.features
            .columns_mut(EntityKind::Edge)
            .remove_slot(e.internal_slot_index());
        Ok(self.graph.remove_edge(e)?)
    }

    /// Remove a vertex, its incident edges and all their feature values
    ///
    /// Each incident edge is removed (and announced) before the vertex.
    pub fn remove_vertex(&mut self, v: VertexRef) -> ModelResult<V> {
        if !self.graph.contains_vertex(v) {
            return Err(GraphError::StaleVertexRef(v).into());
        }
        let incident: Vec<EdgeRef> = self
            .graph
            .outgoing_edges(v)
            .chain(self.graph.incoming_edges(v))
            .collect();
        for e in incident {
            // self-loops show up in both lists
            if self.graph.contains_edge(e) {
                self.remove_edge(e)?;
            }
        }

        self.listeners.notify(|l| l.vertex_removed(v));
        self.features
            .columns_mut(EntityKind::Vertex)
            .remove_slot(v.internal_slot_index());
        Ok(self.graph.remove_vertex(v)?)
    }

    /// Drop every vertex, edge and feature value
    ///
    /// Listeners get a single `graph_rebuilt` instead of per-entity removals.
    pub fn clear(&mut self) {
        let mut batch = self.batch();
        batch.clear_storage();
    }

    fn clear_storage(&mut self) {
        self.graph.clear();
        self.features.clear();
    }

    // ============================================================
    // Features
    // ============================================================

    fn registered(&self, kind: EntityKind, key: &str) -> ModelResult<Arc<Feature>> {
        self.registry.feature(kind, key).ok_or_else(|| {
            FeatureError::NotRegistered {
                kind,
                key: key.to_string(),
            }
            .into()
        })
    }

    fn set_feature(
        &mut self,
        kind: EntityKind,
        slot: SlotIndex,
        key: &str,
        value: FeatureValue,
    ) -> ModelResult<Option<FeatureValue>> {
        let feature = self.registered(kind, key)?;
        Ok(self
            .features
            .set(kind, key, feature.id, feature.value_type, slot, value)?)
    }

    fn get_feature(&self, kind: EntityKind, slot: SlotIndex, key: &str) -> Option<FeatureValue> {
        let feature = self.registry.feature(kind, key)?;
        self.features.get(kind, feature.id, slot)
    }

    fn take_feature(&mut self, kind: EntityKind, slot: SlotIndex, key: &str) -> Option<FeatureValue> {
        let feature = self.registry.feature(kind, key)?;
        self.features.remove(kind, feature.id, slot)
    }

    /// Set a vertex feature value, returning the value it replaced
    pub fn set_vertex_feature(
        &mut self,
        v: VertexRef,
        key: &str,
        value: impl Into<FeatureValue>,
    ) -> ModelResult<Option<FeatureValue>> {
        if !self.graph.contains_vertex(v) {
            return Err(GraphError::StaleVertexRef(v).into());
        }
        self.set_feature(EntityKind::Vertex, v.internal_slot_index(), key, value.into())
    }

    /// Set an edge feature value, returning the value it replaced
    pub fn set_edge_feature(
        &mut self,
        e: EdgeRef,
        key: &str,
        value: impl Into<FeatureValue>,
    ) -> ModelResult<Option<FeatureValue>> {
        if !self.graph.contains_edge(e) {
            return Err(GraphError::StaleEdgeRef(e).into());
        }
        self.set_feature(EntityKind::Edge, e.internal_slot_index(), key, value.into())
    }

    /// Value of `key` for `v`; `None` if unset, unregistered or `v` is stale
    pub fn vertex_feature(&self, v: VertexRef, key: &str) -> Option<FeatureValue> {
        if !self.graph.contains_vertex(v) {
            return None;
        }
        self.get_feature(EntityKind::Vertex, v.internal_slot_index(), key)
    }

    pub fn edge_feature(&self, e: EdgeRef, key: &str) -> Option<FeatureValue> {
        if !self.graph.contains_edge(e) {
            return None;
        }
        self.get_feature(EntityKind::Edge, e.internal_slot_index(), key)
    }

    pub fn remove_vertex_feature(&mut self, v: VertexRef, key: &str) -> Option<FeatureValue> {
        if !self.graph.contains_vertex(v) {
            return None;
        }
        self.take_feature(EntityKind::Vertex, v.internal_slot_index(), key)
    }

    pub fn remove_edge_feature(&mut self, e: EdgeRef, key: &str) -> Option<FeatureValue> {
        if !self.graph.contains_edge(e) {
            return None;
        }
        self.take_feature(EntityKind::Edge, e.internal_slot_index(), key)
    }

    // ============================================================
    // Listeners
    // ============================================================

    pub fn add_graph_listener(&mut self, listener: impl GraphListener + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    pub fn remove_graph_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Suppress notifications until the matching [`resume_listeners`](Self::resume_listeners)
    pub fn pause_listeners(&mut self) {
        self.listeners.pause();
    }

    pub fn resume_listeners(&mut self) {
        self.listeners.resume();
    }

    pub fn listeners_paused(&self) -> bool {
        self.listeners.is_paused()
    }

    /// Pause listeners for the lifetime of the returned guard
    pub fn batch(&mut self) -> ModelBatch<'_, V, E> {
        self.listeners.pause();
        ModelBatch { model: self }
    }
}

impl<V, E> Model<V, E>
where
    V: DeserializeOwned,
    E: DeserializeOwned,
{
    /// Replace the model contents with a raw stream read from `path`
    pub fn load_raw(&mut self, path: impl AsRef<Path>) -> ModelResult<RawSummary> {
        let path = path.as_ref();
        info!("Loading raw graph from {:?}", path);
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(self.config.io_buffer_size, file);
        self.read_raw(&mut reader)
    }

    /// Replace the model contents with a raw stream
    ///
    /// Listeners are paused throughout and get one `graph_rebuilt` at the
    /// end, whether the read succeeds or not. A failed read leaves the
    /// model empty.
    pub fn read_raw<R: Read>(&mut self, reader: &mut R) -> ModelResult<RawSummary> {
        let mut batch = self.batch();
        let model: &mut Model<V, E> = &mut batch;
        model.clear_storage();

        match read_graph(&mut model.graph, &mut model.features, &model.registry, reader) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                debug!("Raw read failed, clearing model: {}", e);
                model.clear_storage();
                Err(e.into())
            }
        }
    }
}

impl<V, E> Model<V, E>
where
    V: Serialize,
    E: Serialize,
{
    /// Write the model to `path` as a raw stream
    pub fn save_raw(&self, path: impl AsRef<Path>) -> ModelResult<RawSummary> {
        let path = path.as_ref();
        info!("Saving raw graph to {:?}", path);
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(self.config.io_buffer_size, file);
        self.write_raw(&mut writer)
    }

    /// Write the model as a raw stream; `writer` is flushed on success
    pub fn write_raw<W: Write>(&self, writer: &mut W) -> ModelResult<RawSummary> {
        Ok(write_graph(&self.graph, &self.features, &self.registry, writer)?)
    }
}

/// Scoped listener pause
///
/// Derefs to the model; dropping it resumes listeners, firing
/// `graph_rebuilt` if this was the outermost pause.
pub struct ModelBatch<'a, V, E> {
    model: &'a mut Model<V, E>,
}

impl<V, E> Deref for ModelBatch<'_, V, E> {
    type Target = Model<V, E>;

    fn deref(&self) -> &Self::Target {
        self.model
    }
}

impl<V, E> DerefMut for ModelBatch<'_, V, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.model
    }
}

impl<V, E> Drop for ModelBatch<'_, V, E> {
    fn drop(&mut self) {
        self.model.listeners.resume();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ValueType;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        VertexAdded(VertexRef),
        VertexRemoved(VertexRef),
        EdgeAdded(EdgeRef),
        EdgeRemoved(EdgeRef),
        Rebuilt,
    }

    struct Recorder(Arc<Mutex<Vec<Event>>>);

    impl GraphListener for Recorder {
        fn vertex_added(&mut self, v: VertexRef) {
            self.0.lock().unwrap().push(Event::VertexAdded(v));
        }
        fn vertex_removed(&mut self, v: VertexRef) {
            self.0.lock().unwrap().push(Event::VertexRemoved(v));
        }
        fn edge_added(&mut self, e: EdgeRef) {
            self.0.lock().unwrap().push(Event::EdgeAdded(e));
        }
        fn edge_removed(&mut self, e: EdgeRef) {
            self.0.lock().unwrap().push(Event::EdgeRemoved(e));
        }
        fn graph_rebuilt(&mut self) {
            self.0.lock().unwrap().push(Event::Rebuilt);
        }
    }

    fn model() -> (Model<u32, ()>, Arc<Mutex<Vec<Event>>>) {
        let registry = FeatureRegistry::shared();
        registry
            .register_feature(EntityKind::Vertex, "area", ValueType::Double)
            .unwrap();
        registry
            .register_feature(EntityKind::Edge, "cost", ValueType::Double)
            .unwrap();
        let mut model = Model::new(registry);
        let events = Arc::new(Mutex::new(Vec::new()));
        model.add_graph_listener(Recorder(Arc::clone(&events)));
        (model, events)
    }

    #[test]
    fn test_mutations_are_announced_in_order() {
        let (mut model, events) = model();
        let a = model.add_vertex(1);
        let b = model.add_vertex(2);
        let e = model.add_edge(a, b, ()).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::VertexAdded(a), Event::VertexAdded(b), Event::EdgeAdded(e)]
        );
    }

    #[test]
    fn test_remove_vertex_removes_edges_first() {
        let (mut model, events) = model();
        let a = model.add_vertex(1);
        let b = model.add_vertex(2);
        let e1 = model.add_edge(a, b, ()).unwrap();
        let e2 = model.add_edge(b, b, ()).unwrap();
        events.lock().unwrap().clear();

        assert_eq!(model.remove_vertex(b).unwrap(), 2);
        let seen = events.lock().unwrap().clone();
        assert_eq!(seen.len(), 3);
        assert!(seen.contains(&Event::EdgeRemoved(e1)));
        assert!(seen.contains(&Event::EdgeRemoved(e2)));
        assert_eq!(seen[2], Event::VertexRemoved(b));
        assert_eq!(model.graph().edge_count(), 0);
    }

    #[test]
    fn test_batch_suppresses_and_rebuilds_once() {
        let (mut model, events) = model();
        {
            let mut batch = model.batch();
            let a = batch.add_vertex(1);
            let b = batch.add_vertex(2);
            batch.add_edge(a, b, ()).unwrap();
            {
                let mut inner = batch.batch();
                inner.add_vertex(3);
            }
            assert!(batch.listeners_paused());
        }
        assert!(!model.listeners_paused());
        assert_eq!(*events.lock().unwrap(), vec![Event::Rebuilt]);
    }

    #[test]
    fn test_clear_fires_rebuilt() {
        let (mut model, events) = model();
        let a = model.add_vertex(1);
        model.set_vertex_feature(a, "area", 2.0f64).unwrap();
        events.lock().unwrap().clear();

        model.clear();
        assert_eq!(model.graph().vertex_count(), 0);
        assert_eq!(*events.lock().unwrap(), vec![Event::Rebuilt]);

        let b = model.add_vertex(5);
        assert_eq!(b.internal_slot_index(), a.internal_slot_index());
        assert_eq!(model.vertex_feature(b, "area"), None);
    }

    #[test]
    fn test_vertex_features() {
        let (mut model, _) = model();
        let a = model.add_vertex(1);

        assert_eq!(model.set_vertex_feature(a, "area", 4.5f64).unwrap(), None);
        assert_eq!(
            model.set_vertex_feature(a, "area", 5.0f64).unwrap(),
            Some(FeatureValue::Double(4.5))
        );
        assert_eq!(model.vertex_feature(a, "area"), Some(FeatureValue::Double(5.0)));

        assert!(matches!(
            model.set_vertex_feature(a, "volume", 1.0f64),
            Err(ModelError::Feature(FeatureError::NotRegistered { .. }))
        ));
        assert!(matches!(
            model.set_vertex_feature(a, "area", "big"),
            Err(ModelError::Feature(FeatureError::TypeMismatch { .. }))
        ));

        assert_eq!(model.remove_vertex_feature(a, "area"), Some(FeatureValue::Double(5.0)));
        assert_eq!(model.vertex_feature(a, "area"), None);
    }

    #[test]
    fn test_removed_entity_drops_feature_values() {
        let (mut model, _) = model();
        let a = model.add_vertex(1);
        let b = model.add_vertex(2);
        let e = model.add_edge(a, b, ()).unwrap();
        model.set_vertex_feature(a, "area", 1.0f64).unwrap();
        model.set_edge_feature(e, "cost", 3.0f64).unwrap();

        model.remove_vertex(a).unwrap();
        assert!(matches!(
            model.set_vertex_feature(a, "area", 1.0f64),
            Err(ModelError::Graph(GraphError::StaleVertexRef(_)))
        ));

        // slots are reused, values must not come back with them
        let c = model.add_vertex(3);
        let f = model.add_edge(c, b, ()).unwrap();
        assert_eq!(c.internal_slot_index(), a.internal_slot_index());
        assert_eq!(f.internal_slot_index(), e.internal_slot_index());
        assert_eq!(model.vertex_feature(c, "area"), None);
        assert_eq!(model.edge_feature(f, "cost"), None);
    }

    #[test]
    fn test_stale_refs_rejected() {
        let (mut model, _) = model();
        let a = model.add_vertex(1);
        let b = model.add_vertex(2);
        let e = model.add_edge(a, b, ()).unwrap();
        model.remove_edge(e).unwrap();

        assert!(matches!(
            model.remove_edge(e),
            Err(ModelError::Graph(GraphError::StaleEdgeRef(_)))
        ));
        model.remove_vertex(a).unwrap();
        assert!(matches!(
            model.add_edge(a, b, ()),
            Err(ModelError::Graph(GraphError::StaleVertexRef(_)))
        ));
    }

    #[test]
    fn test_remove_listener() {
        let (mut model, events) = model();
        let extra = Arc::new(Mutex::new(Vec::new()));
        let id = model.add_graph_listener(Recorder(Arc::clone(&extra)));
        model.add_vertex(1);
        assert!(model.remove_graph_listener(id));
        assert!(!model.remove_graph_listener(id));
        model.add_vertex(2);

        assert_eq!(extra.lock().unwrap().len(), 1);
        assert_eq!(events.lock().unwrap().len(), 2);
    }
}

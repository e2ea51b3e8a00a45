//! Cell-tracking model
//!
//! Spots are vertices, links are edges going forward in time. The model keeps
//! a per-timepoint index of spots next to the graph and updates it on every
//! structural change, including loads.

use super::index::TimepointIndex;
use super::spot::{Link, Spot};
use crate::config::ModelConfig;
use crate::features::{FeatureRegistry, FeatureValue};
use crate::graph::{EdgeRef, GraphListener, ListenerId, VertexRef};
use crate::model::{Model, ModelResult};
use crate::persistence::RawSummary;
use std::io::{Read, Write};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

/// Spots, links and their features
///
/// Read access goes through `Deref` to the underlying [`Model`]; mutation
/// goes through this type so the timepoint index stays in step.
#[derive(Debug)]
pub struct TrackingModel {
    model: Model<Spot, Link>,
    index: TimepointIndex,
}

impl TrackingModel {
    pub fn new(registry: Arc<FeatureRegistry>) -> Self {
        Self::with_config(registry, ModelConfig::default())
    }

    pub fn with_config(registry: Arc<FeatureRegistry>, config: ModelConfig) -> Self {
        TrackingModel {
            model: Model::with_config(registry, config),
            index: TimepointIndex::new(),
        }
    }

    pub fn add_spot(&mut self, spot: Spot) -> VertexRef {
        let timepoint = spot.timepoint;
        let v = self.model.add_vertex(spot);
        self.index.insert(timepoint, &v);
        v
    }

    pub fn add_link(&mut self, source: VertexRef, target: VertexRef) -> ModelResult<EdgeRef> {
        self.model.add_edge(source, target, Link)
    }

    /// Remove a spot together with its links
    pub fn remove_spot(&mut self, v: VertexRef) -> ModelResult<Spot> {
        let timepoint = self.model.graph().vertex(v)?.timepoint;
        let spot = self.model.remove_vertex(v)?;
        self.index.remove(timepoint, &v);
        Ok(spot)
    }

    pub fn remove_link(&mut self, e: EdgeRef) -> ModelResult<Link> {
        self.model.remove_edge(e)
    }

    pub fn clear(&mut self) {
        self.model.clear();
        self.index.clear();
    }

    /// Spots at `timepoint`, in ascending slot order
    pub fn spots_at(&self, timepoint: i32) -> impl Iterator<Item = VertexRef> + '_ {
        let pool = self.model.graph().vertex_pool();
        self.index
            .slots(timepoint)
            .filter_map(move |slot| pool.ref_at(slot))
    }

    pub fn spot_count_at(&self, timepoint: i32) -> usize {
        self.index.count(timepoint)
    }

    /// Timepoints with at least one spot, ascending
    pub fn timepoints(&self) -> impl Iterator<Item = i32> + '_ {
        self.index.timepoints()
    }

    pub fn set_spot_feature(
        &mut self,
        v: VertexRef,
        key: &str,
        value: impl Into<FeatureValue>,
    ) -> ModelResult<Option<FeatureValue>> {
        self.model.set_vertex_feature(v, key, value)
    }

    pub fn set_link_feature(
        &mut self,
        e: EdgeRef,
        key: &str,
        value: impl Into<FeatureValue>,
    ) -> ModelResult<Option<FeatureValue>> {
        self.model.set_edge_feature(e, key, value)
    }

    pub fn add_graph_listener(&mut self, listener: impl GraphListener + 'static) -> ListenerId {
        self.model.add_graph_listener(listener)
    }

    pub fn remove_graph_listener(&mut self, id: ListenerId) -> bool {
        self.model.remove_graph_listener(id)
    }

    pub fn pause_listeners(&mut self) {
        self.model.pause_listeners();
    }

    pub fn resume_listeners(&mut self) {
        self.model.resume_listeners();
    }

    pub fn load_raw(&mut self, path: impl AsRef<Path>) -> ModelResult<RawSummary> {
        let result = self.model.load_raw(path);
        self.index.rebuild(self.model.graph());
        result
    }

    pub fn read_raw<R: Read>(&mut self, reader: &mut R) -> ModelResult<RawSummary> {
        let result = self.model.read_raw(reader);
        self.index.rebuild(self.model.graph());
        result
    }

    pub fn save_raw(&self, path: impl AsRef<Path>) -> ModelResult<RawSummary> {
        self.model.save_raw(path)
    }

    pub fn write_raw<W: Write>(&self, writer: &mut W) -> ModelResult<RawSummary> {
        self.model.write_raw(writer)
    }
}

impl Deref for TrackingModel {
    type Target = Model<Spot, Link>;

    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{EntityKind, ValueType};
    use std::io::Cursor;

    fn spot(t: i32) -> Spot {
        Spot::new(t, [t as f64, 0.0, 0.0], 1.0)
    }

    #[test]
    fn test_spots_by_timepoint() {
        let mut model = TrackingModel::new(FeatureRegistry::shared());
        let a = model.add_spot(spot(0));
        let b = model.add_spot(spot(1));
        let c = model.add_spot(spot(1));

        assert_eq!(model.timepoints().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(model.spots_at(1).collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(model.spots_at(0).collect::<Vec<_>>(), vec![a]);
        assert_eq!(model.spots_at(7).count(), 0);

        model.remove_spot(a).unwrap();
        assert_eq!(model.timepoints().collect::<Vec<_>>(), vec![1]);
        assert_eq!(model.spot_count_at(1), 2);
    }

    #[test]
    fn test_remove_spot_removes_links() {
        let mut model = TrackingModel::new(FeatureRegistry::shared());
        let a = model.add_spot(spot(0));
        let b = model.add_spot(spot(1));
        model.add_link(a, b).unwrap();

        assert_eq!(model.remove_spot(b).unwrap().timepoint, 1);
        assert_eq!(model.graph().edge_count(), 0);
        assert!(model.remove_spot(b).is_err());
    }

    #[test]
    fn test_index_rebuilt_after_read() {
        let registry = FeatureRegistry::shared();
        registry
            .register_feature(EntityKind::Vertex, "quality", ValueType::Double)
            .unwrap();

        let mut model = TrackingModel::new(Arc::clone(&registry));
        let a = model.add_spot(spot(2));
        let b = model.add_spot(spot(3));
        model.add_link(a, b).unwrap();
        model.set_spot_feature(b, "quality", 0.75f64).unwrap();

        let mut buf = Vec::new();
        model.write_raw(&mut buf).unwrap();

        let mut loaded = TrackingModel::new(registry);
        loaded.add_spot(spot(9));
        loaded.read_raw(&mut Cursor::new(buf)).unwrap();

        assert_eq!(loaded.timepoints().collect::<Vec<_>>(), vec![2, 3]);
        let b2 = loaded.spots_at(3).next().unwrap();
        assert_eq!(loaded.vertex_feature(b2, "quality"), Some(FeatureValue::Double(0.75)));
    }

    #[test]
    fn test_failed_read_leaves_empty_index() {
        let mut model = TrackingModel::new(FeatureRegistry::shared());
        model.add_spot(spot(0));
        assert!(model.read_raw(&mut Cursor::new(b"junk".to_vec())).is_err());
        assert_eq!(model.timepoints().count(), 0);
        assert_eq!(model.graph().vertex_count(), 0);
    }
}

use cellgraph::{
    EntityKind, FeatureRegistry, FeatureValue, ModelConfig, Spot, TrackingModel,
    ValueType, VertexRef,
};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

fn registry() -> Arc<FeatureRegistry> {
    let registry = FeatureRegistry::shared();
    registry
        .register_feature(EntityKind::Vertex, "track-id", ValueType::Int)
        .unwrap();
    registry
        .register_feature(EntityKind::Vertex, "label-text", ValueType::Text)
        .unwrap();
    registry
        .register_feature(EntityKind::Vertex, "shape", ValueType::DoubleArray)
        .unwrap();
    registry
        .register_feature(EntityKind::Edge, "cost", ValueType::Double)
        .unwrap();
    registry
        .register_feature(EntityKind::Edge, "manual", ValueType::Bool)
        .unwrap();
    registry
}

fn timepoint_pairs(model: &TrackingModel) -> Vec<(i32, i32)> {
    let g = model.graph();
    let mut pairs: Vec<(i32, i32)> = g
        .edges()
        .map(|e| {
            let s = g.edge_source(e).unwrap();
            let t = g.edge_target(e).unwrap();
            (g.vertex(s).unwrap().timepoint, g.vertex(t).unwrap().timepoint)
        })
        .collect();
    pairs.sort();
    pairs
}

#[test]
fn test_lineage_scenario_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lineage.raw");
    let registry = registry();

    let mut model = TrackingModel::new(Arc::clone(&registry));
    let spots: Vec<VertexRef> = [0, 1, 1, 2, 2, 3]
        .iter()
        .map(|&t| model.add_spot(Spot::new(t, [0.0; 3], 1.0)))
        .collect();
    for (s, t) in [(0, 1), (0, 2), (2, 3), (4, 5)] {
        model.add_link(spots[s], spots[t]).unwrap();
    }
    model.save_raw(&path).unwrap();

    let mut loaded = TrackingModel::new(registry);
    loaded.load_raw(&path).unwrap();

    assert_eq!(loaded.graph().vertex_count(), 6);
    assert_eq!(loaded.graph().edge_count(), 4);
    assert_eq!(
        timepoint_pairs(&loaded),
        vec![(0, 1), (0, 1), (1, 2), (2, 3)]
    );
    assert!(loaded.graph().verify_ids().is_ok());
}

#[test]
fn test_roundtrip_with_holes_and_all_value_types() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("features.raw");
    let registry = registry();

    let mut model = TrackingModel::new(Arc::clone(&registry));
    let mut spots = Vec::new();
    for i in 0..50 {
        let v = model.add_spot(Spot::new(i % 5, [i as f64, 0.0, 0.0], 1.0).with_label(format!("c{}", i)));
        model.set_spot_feature(v, "track-id", (i / 5) as i64).unwrap();
        if i % 3 == 0 {
            model.set_spot_feature(v, "label-text", format!("cell {}", i)).unwrap();
        }
        model
            .set_spot_feature(v, "shape", vec![i as f64, 0.5, -1.0])
            .unwrap();
        spots.push(v);
    }
    for pair in spots.windows(2) {
        let e = model.add_link(pair[0], pair[1]).unwrap();
        let cost = model.graph().vertex(pair[1]).unwrap().position[0];
        model.set_link_feature(e, "cost", cost).unwrap();
        model.set_link_feature(e, "manual", cost > 20.0).unwrap();
    }

    // punch holes so slots and file IDs diverge
    for v in spots.iter().step_by(7) {
        model.remove_spot(*v).unwrap();
    }
    let vertices = model.graph().vertex_count();
    let edges = model.graph().edge_count();

    // expected values keyed by spot label, which survives the round trip
    let mut expected = HashMap::new();
    for v in model.graph().vertices() {
        let label = model.graph().vertex(v).unwrap().label.clone();
        expected.insert(
            label,
            (
                model.vertex_feature(v, "track-id"),
                model.vertex_feature(v, "label-text"),
                model.vertex_feature(v, "shape"),
            ),
        );
    }

    let written = model.save_raw(&path).unwrap();
    assert_eq!(written.vertices, vertices);
    assert_eq!(written.features.len(), 5);

    let mut loaded = TrackingModel::with_config(
        registry,
        ModelConfig {
            io_buffer_size: 64,
            ..ModelConfig::default()
        },
    );
    let read = loaded.load_raw(&path).unwrap();
    assert_eq!(read.vertices, vertices);
    assert_eq!(read.edges, edges);
    assert!(read.skipped.is_empty());

    let g = loaded.graph();
    for v in g.vertices() {
        let label = g.vertex(v).unwrap().label.clone();
        let (track, text, shape) = expected.remove(&label).unwrap();
        assert_eq!(loaded.vertex_feature(v, "track-id"), track);
        assert_eq!(loaded.vertex_feature(v, "label-text"), text);
        assert_eq!(loaded.vertex_feature(v, "shape"), shape);
    }
    assert!(expected.is_empty());

    for e in g.edges() {
        let target = g.edge_target(e).unwrap();
        let x = g.vertex(target).unwrap().position[0];
        assert_eq!(loaded.edge_feature(e, "cost"), Some(FeatureValue::Double(x)));
        assert_eq!(loaded.edge_feature(e, "manual"), Some(FeatureValue::Bool(x > 20.0)));
    }
}

#[test]
fn test_stable_ids_follow_file_order_after_load() {
    let registry = registry();
    let mut model = TrackingModel::new(Arc::clone(&registry));
    let a = model.add_spot(Spot::new(0, [0.0; 3], 1.0));
    let b = model.add_spot(Spot::new(1, [0.0; 3], 1.0));
    let c = model.add_spot(Spot::new(2, [0.0; 3], 1.0));
    model.add_link(b, c).unwrap();
    model.remove_spot(a).unwrap();

    let mut buf = Vec::new();
    model.write_raw(&mut buf).unwrap();

    let mut loaded = TrackingModel::new(registry);
    loaded.read_raw(&mut buf.as_slice()).unwrap();

    let ids: Vec<u64> = loaded
        .graph()
        .vertices()
        .map(|v| loaded.graph().vertex_id(v).unwrap().0)
        .collect();
    assert_eq!(ids, vec![0, 1]);
    assert_eq!(loaded.graph().id_bimap().vertices().next_id(), 2);
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let model = TrackingModel::new(registry());
    assert!(model.save_raw(dir.path().join("nope").join("x.raw")).is_err());
}

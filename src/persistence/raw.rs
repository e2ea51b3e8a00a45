//! Raw stream writer and reader
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic "CGRW" | version u32
//! vertexCount u32 | { payloadLen u32, payload }*
//! edgeCount u32   | { sourceFileId u32, targetFileId u32, payloadLen u32, payload }*
//! blockCount u32  | { kind u8, keyLen u32, key, valueType u8, bodyLen u32, body }*
//! ```
//!
//! Payloads are bincode. Block bodies are described in [`codec`](super::codec).

use super::codec::{decode_block, encode_block};
use super::file_ids::{FileIdToGraphMap, GraphToFileIdMap};
use super::wire::{len_u32, read_bytes_into, read_string, read_u32, read_u8, write_bytes, write_u32, write_u8};
use super::{RawIoError, RawIoResult, FORMAT_VERSION, MAGIC};
use crate::features::{EntityKind, FeatureRegistry, FeatureStore, ValueType};
use crate::graph::{GraphError, PoolGraph, VertexRef};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};
use tracing::{debug, info, warn};

/// What a read or write went through
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSummary {
    pub vertices: usize,
    pub edges: usize,
    /// Feature blocks written, or read and applied
    pub features: Vec<(EntityKind, String)>,
    /// Feature blocks skipped on read because their key is not registered
    pub skipped: Vec<(EntityKind, String)>,
}

const KINDS: [EntityKind; 2] = [EntityKind::Vertex, EntityKind::Edge];

/// Upper bound on up-front reservation from counts read off the stream
const MAX_PREALLOC: usize = 64 * 1024;

/// Write `graph` and its feature values to `writer`
///
/// Only features registered in `registry` are written, in ascending ID order
/// per kind. Features without values on live entities produce no block.
pub fn write_graph<V, E, W>(
    graph: &PoolGraph<V, E>,
    features: &FeatureStore,
    registry: &FeatureRegistry,
    writer: &mut W,
) -> RawIoResult<RawSummary>
where
    V: Serialize,
    E: Serialize,
    W: Write,
{
    let idmap = GraphToFileIdMap::build(graph);
    let mut summary = RawSummary::default();
    let mut scratch = Vec::new();

    writer.write_all(&MAGIC)?;
    write_u32(writer, FORMAT_VERSION)?;

    // Vertices, in file ID order
    write_u32(writer, idmap.vertex_count())?;
    for (_, record) in graph.vertex_pool().iter() {
        scratch.clear();
        bincode::serialize_into(&mut scratch, &record.payload)?;
        write_bytes(writer, &scratch)?;
        summary.vertices += 1;
    }

    // Edges, endpoints as vertex file IDs
    write_u32(writer, idmap.edge_count())?;
    for (e, record) in graph.edge_pool().iter() {
        let source = idmap
            .vertex_file_id(record.source)
            .ok_or(RawIoError::Graph(GraphError::StaleEdgeRef(e)))?;
        let target = idmap
            .vertex_file_id(record.target)
            .ok_or(RawIoError::Graph(GraphError::StaleEdgeRef(e)))?;
        write_u32(writer, source)?;
        write_u32(writer, target)?;
        scratch.clear();
        bincode::serialize_into(&mut scratch, &record.payload)?;
        write_bytes(writer, &scratch)?;
        summary.edges += 1;
    }

    // Feature blocks are encoded first so the block count can lead
    let mut blocks = Vec::new();
    for kind in KINDS {
        for feature in registry.features(kind) {
            let Some(column) = features.columns(kind).column(feature.id) else {
                continue;
            };
            if let Some(body) = encode_block(column, kind, &idmap)? {
                debug!("Encoded {} feature {:?}: {} bytes", kind, feature.key, body.len());
                blocks.push((kind, feature.key.clone(), feature.value_type, body));
            }
        }
    }

    write_u32(writer, len_u32(blocks.len())?)?;
    for (kind, key, value_type, body) in blocks {
        write_u8(writer, kind.tag())?;
        write_bytes(writer, key.as_bytes())?;
        write_u8(writer, value_type.tag())?;
        write_bytes(writer, &body)?;
        summary.features.push((kind, key));
    }

    writer.flush()?;
    info!(
        "Wrote raw graph: {} vertices, {} edges, {} feature blocks",
        summary.vertices,
        summary.edges,
        summary.features.len()
    );
    Ok(summary)
}

fn read_header<R: Read>(reader: &mut R) -> RawIoResult<()> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(RawIoError::BadMagic(magic));
    }
    let version = read_u32(reader)?;
    if version != FORMAT_VERSION {
        return Err(RawIoError::UnsupportedVersion(version));
    }
    Ok(())
}

/// Read a stream into `graph` and `features`
///
/// Both must be empty; entities get fresh slots and stable IDs in file ID
/// order. Values of registered features replace whole columns, one block at
/// a time, and only after the block decoded cleanly. On error the graph and
/// store are left partially filled; callers clear them.
pub fn read_graph<V, E, R>(
    graph: &mut PoolGraph<V, E>,
    features: &mut FeatureStore,
    registry: &FeatureRegistry,
    reader: &mut R,
) -> RawIoResult<RawSummary>
where
    V: DeserializeOwned,
    E: DeserializeOwned,
    R: Read,
{
    read_header(reader)?;
    let mut summary = RawSummary::default();
    let mut scratch = Vec::new();

    let vertex_count = read_u32(reader)? as usize;
    let mut idmap = FileIdToGraphMap::with_capacity(vertex_count.min(MAX_PREALLOC), 0);
    graph.reserve(vertex_count.min(MAX_PREALLOC), 0);
    for _ in 0..vertex_count {
        read_bytes_into(reader, &mut scratch)?;
        let payload: V = bincode::deserialize(&scratch)?;
        let v = graph.add_vertex(payload);
        idmap.push_vertex(v.internal_slot_index());
    }
    summary.vertices = vertex_count;

    let edge_count = read_u32(reader)? as usize;
    graph.reserve(0, edge_count.min(MAX_PREALLOC));
    let mut source = VertexRef::null();
    let mut target = VertexRef::null();
    for _ in 0..edge_count {
        let source_id = read_u32(reader)?;
        let target_id = read_u32(reader)?;
        read_bytes_into(reader, &mut scratch)?;
        let payload: E = bincode::deserialize(&scratch)?;

        resolve_vertex(graph, &idmap, source_id, &mut source)?;
        resolve_vertex(graph, &idmap, target_id, &mut target)?;
        let e = graph.add_edge(source, target, payload)?;
        idmap.push_edge(e.internal_slot_index());
    }
    summary.edges = edge_count;

    let block_count = read_u32(reader)?;
    for _ in 0..block_count {
        let kind_tag = read_u8(reader)?;
        let kind = EntityKind::from_tag(kind_tag).ok_or(RawIoError::InvalidTag {
            what: "entity kind",
            tag: kind_tag,
        })?;
        let key = read_string(reader)?;
        let type_tag = read_u8(reader)?;
        let value_type = ValueType::from_tag(type_tag).ok_or(RawIoError::InvalidTag {
            what: "value type",
            tag: type_tag,
        })?;
        let mut body = Vec::new();
        read_bytes_into(reader, &mut body)?;

        let Some(feature) = registry.feature(kind, &key) else {
            warn!("Skipping unknown {} feature {:?} ({} bytes)", kind, key, body.len());
            summary.skipped.push((kind, key));
            continue;
        };
        if feature.value_type != value_type {
            return Err(RawIoError::SchemaMismatch {
                kind,
                key,
                expected: feature.value_type,
                found: value_type,
            });
        }

        let column = decode_block(Bytes::from(body), kind, &key, value_type, &idmap)?;
        debug!("Read {} feature {:?}: {} values", kind, key, column.len());
        features.columns_mut(kind).replace_column(feature.id, column);
        summary.features.push((kind, key));
    }

    info!(
        "Read raw graph: {} vertices, {} edges, {} feature blocks ({} skipped)",
        summary.vertices,
        summary.edges,
        summary.features.len(),
        summary.skipped.len()
    );
    Ok(summary)
}

fn resolve_vertex<V, E>(
    graph: &PoolGraph<V, E>,
    idmap: &FileIdToGraphMap,
    file_id: u32,
    r: &mut VertexRef,
) -> RawIoResult<()> {
    idmap
        .vertex_slot(file_id)
        .and_then(|slot| graph.vertex_pool().point(slot, r))
        .map(|_| ())
        .ok_or(RawIoError::UnknownFileId {
            kind: EntityKind::Vertex,
            file_id,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureValue;
    use std::io::Cursor;

    type Graph = PoolGraph<String, f32>;

    fn sample() -> (Graph, FeatureStore, FeatureRegistry) {
        let registry = FeatureRegistry::new();
        let radius = registry
            .register_feature(EntityKind::Vertex, "radius", ValueType::Double)
            .unwrap();
        let mut g = Graph::new();
        let mut store = FeatureStore::new();
        let a = g.add_vertex("a".into());
        let b = g.add_vertex("b".into());
        g.add_edge(a, b, 0.5).unwrap();
        store
            .set(EntityKind::Vertex, "radius", radius.id, ValueType::Double, b.internal_slot_index(), FeatureValue::Double(3.0))
            .unwrap();
        (g, store, registry)
    }

    #[test]
    fn test_write_then_read() {
        let (g, store, registry) = sample();
        let mut out = Vec::new();
        let written = write_graph(&g, &store, &registry, &mut out).unwrap();
        assert_eq!(written.features, vec![(EntityKind::Vertex, "radius".to_string())]);
        assert_eq!(&out[..4], b"CGRW");

        let mut g2 = Graph::new();
        let mut store2 = FeatureStore::new();
        let read = read_graph(&mut g2, &mut store2, &registry, &mut Cursor::new(out)).unwrap();
        assert_eq!(read.vertices, 2);
        assert_eq!(read.edges, 1);

        let e = g2.edges().next().unwrap();
        let target = g2.edge_target(e).unwrap();
        assert_eq!(g2.vertex(target).unwrap(), "b");
        assert_eq!(*g2.edge(e).unwrap(), 0.5);

        let radius = registry.feature(EntityKind::Vertex, "radius").unwrap();
        assert_eq!(
            store2.get(EntityKind::Vertex, radius.id, target.internal_slot_index()),
            Some(FeatureValue::Double(3.0))
        );
    }

    #[test]
    fn test_bad_magic() {
        let mut g = Graph::new();
        let mut store = FeatureStore::new();
        let registry = FeatureRegistry::new();
        let err = read_graph(&mut g, &mut store, &registry, &mut Cursor::new(b"NOPE\x01\0\0\0".to_vec()))
            .unwrap_err();
        assert!(matches!(err, RawIoError::BadMagic(m) if &m == b"NOPE"));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&9u32.to_le_bytes());
        let mut g = Graph::new();
        let err = read_graph(&mut g, &mut FeatureStore::new(), &FeatureRegistry::new(), &mut Cursor::new(bytes))
            .unwrap_err();
        assert!(matches!(err, RawIoError::UnsupportedVersion(9)));
    }

    #[test]
    fn test_truncated_stream() {
        let (g, store, registry) = sample();
        let mut out = Vec::new();
        write_graph(&g, &store, &registry, &mut out).unwrap();
        out.truncate(out.len() - 3);

        let mut g2 = Graph::new();
        let err = read_graph(&mut g2, &mut FeatureStore::new(), &registry, &mut Cursor::new(out)).unwrap_err();
        assert!(matches!(err, RawIoError::Io(_)));
    }

    #[test]
    fn test_edge_with_unknown_endpoint() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes()); // no vertices
        bytes.extend_from_slice(&1u32.to_le_bytes()); // one edge
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&0.5f32.to_le_bytes());

        let mut g = Graph::new();
        let err = read_graph(&mut g, &mut FeatureStore::new(), &FeatureRegistry::new(), &mut Cursor::new(bytes))
            .unwrap_err();
        assert!(matches!(
            err,
            RawIoError::UnknownFileId { kind: EntityKind::Vertex, file_id: 0 }
        ));
    }

    #[test]
    fn test_huge_counts_fail_without_allocating() {
        let mut vertices = MAGIC.to_vec();
        vertices.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        vertices.extend_from_slice(&u32::MAX.to_le_bytes());

        let mut g = Graph::new();
        let err = read_graph(&mut g, &mut FeatureStore::new(), &FeatureRegistry::new(), &mut Cursor::new(vertices))
            .unwrap_err();
        assert!(matches!(err, RawIoError::Io(_)));

        let mut edges = MAGIC.to_vec();
        edges.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        edges.extend_from_slice(&0u32.to_le_bytes());
        edges.extend_from_slice(&u32::MAX.to_le_bytes());

        let mut g = Graph::new();
        let err = read_graph(&mut g, &mut FeatureStore::new(), &FeatureRegistry::new(), &mut Cursor::new(edges))
            .unwrap_err();
        assert!(matches!(err, RawIoError::Io(_)));
    }
}

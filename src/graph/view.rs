//! Read-only graph access for consumers outside the model
//!
//! Views, indices and exporters take a `&impl ReadOnlyGraph` so they can walk
//! the structure but have no way to change it.

use super::store::{GraphResult, PoolGraph};
use super::types::{EdgeId, EdgeRef, VertexId, VertexRef};

pub trait ReadOnlyGraph {
    type Vertex;
    type Edge;

    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn vertices(&self) -> impl Iterator<Item = VertexRef> + '_;

    fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_;

    fn outgoing_edges(&self, v: VertexRef) -> impl Iterator<Item = EdgeRef> + '_;

    fn incoming_edges(&self, v: VertexRef) -> impl Iterator<Item = EdgeRef> + '_;

    fn edge_source(&self, e: EdgeRef) -> GraphResult<VertexRef>;

    fn edge_target(&self, e: EdgeRef) -> GraphResult<VertexRef>;

    fn find_edge(&self, source: VertexRef, target: VertexRef) -> Option<EdgeRef>;

    fn vertex(&self, v: VertexRef) -> GraphResult<&Self::Vertex>;

    fn edge(&self, e: EdgeRef) -> GraphResult<&Self::Edge>;

    fn vertex_id(&self, v: VertexRef) -> Option<VertexId>;

    fn edge_id(&self, e: EdgeRef) -> Option<EdgeId>;
}

impl<V, E> ReadOnlyGraph for PoolGraph<V, E> {
    type Vertex = V;
    type Edge = E;

    fn vertex_count(&self) -> usize {
        PoolGraph::vertex_count(self)
    }

    fn edge_count(&self) -> usize {
        PoolGraph::edge_count(self)
    }

    fn vertices(&self) -> impl Iterator<Item = VertexRef> + '_ {
        PoolGraph::vertices(self)
    }

    fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        PoolGraph::edges(self)
    }

    fn outgoing_edges(&self, v: VertexRef) -> impl Iterator<Item = EdgeRef> + '_ {
        PoolGraph::outgoing_edges(self, v)
    }

    fn incoming_edges(&self, v: VertexRef) -> impl Iterator<Item = EdgeRef> + '_ {
        PoolGraph::incoming_edges(self, v)
    }

    fn edge_source(&self, e: EdgeRef) -> GraphResult<VertexRef> {
        PoolGraph::edge_source(self, e)
    }

    fn edge_target(&self, e: EdgeRef) -> GraphResult<VertexRef> {
        PoolGraph::edge_target(self, e)
    }

    fn find_edge(&self, source: VertexRef, target: VertexRef) -> Option<EdgeRef> {
        PoolGraph::find_edge(self, source, target)
    }

    fn vertex(&self, v: VertexRef) -> GraphResult<&V> {
        PoolGraph::vertex(self, v)
    }

    fn edge(&self, e: EdgeRef) -> GraphResult<&E> {
        PoolGraph::edge(self, e)
    }

    fn vertex_id(&self, v: VertexRef) -> Option<VertexId> {
        PoolGraph::vertex_id(self, v)
    }

    fn edge_id(&self, e: EdgeRef) -> Option<EdgeId> {
        PoolGraph::edge_id(self, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out_degree_sum<G: ReadOnlyGraph>(graph: &G) -> usize {
        graph.vertices().map(|v| graph.outgoing_edges(v).count()).sum()
    }

    #[test]
    fn test_generic_traversal() {
        let mut g: PoolGraph<u8, ()> = PoolGraph::new();
        let a = g.add_vertex(0);
        let b = g.add_vertex(1);
        let c = g.add_vertex(2);
        g.add_edge(a, b, ()).unwrap();
        g.add_edge(a, c, ()).unwrap();

        assert_eq!(out_degree_sum(&g), ReadOnlyGraph::edge_count(&g));
    }
}

//! Weighted search graph consumed by the path enumerator.
//!
//! Vertices carry an opaque caller-supplied label and are identified by
//! dense ids assigned in insertion order. Adjacency lists keep insertion
//! order too, which is what makes enumeration deterministic. Undirected
//! graphs store each edge in both orientations so existence checks and
//! weight lookups never care about direction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::weight::Weight;

/// Identifier of a vertex within one graph.
///
/// Ids are dense: the n-th vertex added gets id `n - 1`. An id is only
/// meaningful for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(usize);

impl VertexId {
    /// Position of this vertex in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Whether edges are one-way or implicitly two-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Directed,
    Undirected,
}

/// A vertex and its caller-supplied label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub label: String,
}

/// A stored edge. Undirected graphs hold one of these per orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<W> {
    pub from: VertexId,
    pub to: VertexId,
    /// `None` marks an unweighted edge; summing searches reject those.
    pub weight: Option<W>,
}

/// An adjacency-list graph with optional integer edge weights.
#[derive(Debug, Clone)]
pub struct Graph<W> {
    kind: GraphKind,
    vertices: Vec<Vertex>,
    /// Outgoing edges per vertex, in insertion order.
    adjacency: Vec<Vec<Edge<W>>>,
}

impl<W: Weight> Graph<W> {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            adjacency: Vec::new(),
        }
    }

    pub fn directed() -> Self {
        Self::new(GraphKind::Directed)
    }

    pub fn undirected() -> Self {
        Self::new(GraphKind::Undirected)
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Add a vertex and return its id.
    pub fn add_vertex(&mut self, label: impl Into<String>) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            id,
            label: label.into(),
        });
        self.adjacency.push(Vec::new());
        id
    }

    /// Add an edge between two existing vertices.
    ///
    /// Inserting the same `(from, to)` pair again replaces the stored
    /// weight in place. Undirected graphs store the mirrored orientation
    /// as well; a self-loop is stored once.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: Option<W>) -> Result<()> {
        if !self.contains(from) {
            return Err(Error::UnknownVertex { id: from });
        }
        if !self.contains(to) {
            return Err(Error::UnknownVertex { id: to });
        }
        self.upsert(Edge { from, to, weight });
        if self.kind == GraphKind::Undirected && from != to {
            self.upsert(Edge {
                from: to,
                to: from,
                weight,
            });
        }
        Ok(())
    }

    fn upsert(&mut self, edge: Edge<W>) {
        let list = &mut self.adjacency[edge.from.index()];
        match list.iter_mut().find(|stored| stored.to == edge.to) {
            Some(stored) => *stored = edge,
            None => list.push(edge),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of stored edge records. An undirected edge counts twice
    /// (once per orientation) except for self-loops.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        id.index() < self.vertices.len()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    pub fn label(&self, id: VertexId) -> Option<&str> {
        self.vertices.get(id.index()).map(|v| v.label.as_str())
    }

    /// First vertex carrying `label`, if any.
    pub fn find_vertex(&self, label: &str) -> Option<VertexId> {
        self.vertices.iter().find(|v| v.label == label).map(|v| v.id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Outgoing edges of a vertex, in insertion order.
    pub fn neighbors(&self, id: VertexId) -> &[Edge<W>] {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn edge(&self, from: VertexId, to: VertexId) -> Option<&Edge<W>> {
        self.neighbors(from).iter().find(|edge| edge.to == to)
    }

    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.edge(from, to).is_some()
    }

    /// Weight of the edge `from -> to`, if the edge exists and is weighted.
    pub fn weight(&self, from: VertexId, to: VertexId) -> Option<W> {
        self.edge(from, to).and_then(|edge| edge.weight)
    }

    /// First stored edge lacking a weight, if any. Used to reject summing
    /// searches over partially weighted graphs up front.
    pub fn unweighted_edge(&self) -> Option<&Edge<W>> {
        self.adjacency
            .iter()
            .flatten()
            .find(|edge| edge.weight.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_ids_follow_insertion_order() {
        let mut graph: Graph<i32> = Graph::directed();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(graph.label(a), Some("a"));
        assert_eq!(graph.find_vertex("b"), Some(b));
        assert_eq!(format!("{a}"), "v0");
    }

    #[test]
    fn test_undirected_edges_are_mirrored() {
        let mut graph: Graph<i32> = Graph::undirected();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_edge(a, b, Some(7)).unwrap();

        assert!(graph.has_edge(a, b));
        assert!(graph.has_edge(b, a));
        assert_eq!(graph.weight(b, a), Some(7));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_directed_edges_are_one_way() {
        let mut graph: Graph<i32> = Graph::directed();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_edge(a, b, None).unwrap();

        assert!(graph.has_edge(a, b));
        assert!(!graph.has_edge(b, a));
    }

    #[test]
    fn test_duplicate_edge_replaces_weight() {
        let mut graph: Graph<i32> = Graph::undirected();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_edge(a, b, Some(1)).unwrap();
        graph.add_edge(a, b, Some(9)).unwrap();

        assert_eq!(graph.weight(a, b), Some(9));
        assert_eq!(graph.weight(b, a), Some(9));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors(a).len(), 1);
    }

    #[test]
    fn test_self_loop_stored_once() {
        let mut graph: Graph<i32> = Graph::undirected();
        let a = graph.add_vertex("a");
        graph.add_edge(a, a, Some(3)).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(a, a));
    }

    #[test]
    fn test_unknown_vertex_rejected() {
        let mut graph: Graph<i32> = Graph::directed();
        let a = graph.add_vertex("a");
        let mut other: Graph<i32> = Graph::directed();
        other.add_vertex("x");
        let stray = other.add_vertex("y");

        let err = graph.add_edge(a, stray, None).unwrap_err();
        assert!(matches!(err, Error::UnknownVertex { id } if id == stray));
    }

    #[test]
    fn test_unweighted_edge_lookup() {
        let mut graph: Graph<i64> = Graph::directed();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_edge(a, b, Some(5)).unwrap();
        assert!(graph.unweighted_edge().is_none());

        graph.add_edge(b, a, None).unwrap();
        let bare = graph.unweighted_edge().unwrap();
        assert_eq!((bare.from, bare.to), (b, a));
    }
}

//! Result types produced by the path enumerator.

use serde::Serialize;

use crate::graph::{Edge, VertexId};

/// Continuation directive returned by path visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Keep enumerating from the current origin.
    Continue,
    /// Abandon the current origin and move on to the next starting vertex.
    /// Point-to-point searches have a single origin, so there this ends
    /// the call.
    NextStart,
    /// Stop the entire enumeration immediately.
    Finished,
}

/// An immutable snapshot of one enumerated path, complete or abandoned.
///
/// Open paths satisfy `edges.len() == vertices.len() - 1`. Cycle records
/// include the closing edge back to the first vertex, so there
/// `edges.len() == vertices.len()` and `total` covers the closing leg.
#[derive(Debug, Clone, Serialize)]
pub struct PathRecord<W> {
    /// Ordinal of this callback within the enumeration call, counting
    /// valid and invalid reports together and starting at zero.
    pub sequence: usize,
    pub vertices: Vec<VertexId>,
    pub edges: Vec<Edge<W>>,
    /// Sum of edge weights when summing is enabled.
    pub total: Option<W>,
    /// True when this record closes a cycle back to its first vertex.
    pub cycle: bool,
}

impl<W> PathRecord<W> {
    pub fn start(&self) -> Option<VertexId> {
        self.vertices.first().copied()
    }

    pub fn end(&self) -> Option<VertexId> {
        self.vertices.last().copied()
    }

    /// Number of vertices on the path.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Counters describing one enumeration call.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PathSummary {
    /// Complete paths reported through `on_valid`.
    pub valid_paths: usize,
    /// Dead ends reported through `on_invalid`.
    pub invalid_paths: usize,
    /// Vertices pushed onto the search stack.
    pub expansions: usize,
    /// Branches cut by the cost bound before being pushed.
    pub pruned: usize,
    /// True when a callback ended the call early via `Finished`.
    pub finished_early: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_record_endpoints() {
        let mut graph: Graph<i32> = Graph::directed();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");

        let record = PathRecord {
            sequence: 0,
            vertices: vec![a, b],
            edges: vec![Edge {
                from: a,
                to: b,
                weight: Some(2),
            }],
            total: Some(2),
            cycle: false,
        };

        assert_eq!(record.start(), Some(a));
        assert_eq!(record.end(), Some(b));
        assert_eq!(record.len(), 2);
        assert_eq!(record.edges.len(), record.len() - 1);
    }

    #[test]
    fn test_summary_defaults_to_zero() {
        let summary = PathSummary::default();
        assert_eq!(summary.valid_paths, 0);
        assert_eq!(summary.invalid_paths, 0);
        assert!(!summary.finished_early);
    }
}

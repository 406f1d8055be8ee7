//! Enumeration options and their validation.

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};
use crate::weight::Weight;

/// Scores a candidate step from one vertex to the next; candidates are
/// tried in ascending score order. Ties keep insertion order.
pub type StepHeuristic<W> = fn(&Graph<W>, VertexId, VertexId) -> i64;

/// Which traversal a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Visit every vertex exactly once from each origin.
    Hamiltonian,
    /// Any simple path from the fixed start to the fixed end.
    PointToPoint,
}

/// Options controlling one enumeration call.
///
/// The default configuration enumerates Hamiltonian paths from every
/// vertex, in insertion order, without weight accumulation.
#[derive(Debug, Clone)]
pub struct PathConfig<W> {
    /// Restrict the origins tried in Hamiltonian mode. Empty means every
    /// vertex is tried, in insertion order.
    pub starting_vertices: Vec<VertexId>,
    /// Fixed origin. Together with `end` this switches to point-to-point
    /// mode; alone it behaves like a single-entry starting set.
    pub start: Option<VertexId>,
    /// Fixed destination; requires `start`.
    pub end: Option<VertexId>,
    /// Report Hamiltonian cycles instead of open paths.
    pub detect_cycles: bool,
    /// Accumulate edge weights into each record's total.
    pub sum_path: bool,
    /// Abandon any partial path whose running total exceeds this bound.
    pub max_cost: Option<W>,
    /// Candidate ordering heuristic; `None` keeps insertion order.
    pub heuristic: Option<StepHeuristic<W>>,
}

impl<W> Default for PathConfig<W> {
    fn default() -> Self {
        Self {
            starting_vertices: Vec::new(),
            start: None,
            end: None,
            detect_cycles: false,
            sum_path: false,
            max_cost: None,
            heuristic: None,
        }
    }
}

impl<W: Weight> PathConfig<W> {
    pub fn mode(&self) -> SearchMode {
        if self.start.is_some() && self.end.is_some() {
            SearchMode::PointToPoint
        } else {
            SearchMode::Hamiltonian
        }
    }

    /// Check the options against a graph before any search work starts.
    pub fn validate(&self, graph: &Graph<W>) -> Result<()> {
        if self.end.is_some() && self.start.is_none() {
            return Err(Error::IncompletePointToPoint);
        }
        if self.detect_cycles && self.end.is_some() {
            return Err(Error::CycleWithEndpoint);
        }
        if self.start.is_some() && !self.starting_vertices.is_empty() {
            return Err(Error::ConflictingStarts);
        }
        if self.max_cost.is_some() && !self.sum_path {
            return Err(Error::BoundWithoutSum);
        }
        for &id in self
            .starting_vertices
            .iter()
            .chain(self.start.iter())
            .chain(self.end.iter())
        {
            if !graph.contains(id) {
                return Err(Error::UnknownVertex { id });
            }
        }
        if self.sum_path {
            if let Some(edge) = graph.unweighted_edge() {
                return Err(Error::MissingWeight {
                    from: edge.from,
                    to: edge.to,
                });
            }
        }
        Ok(())
    }
}

//! Exhaustive backtracking path enumerator.
//!
//! The enumerator walks a graph depth-first with an explicit frame stack
//! (no recursion, so path length is bounded by memory rather than the call
//! stack) and reports every complete path or dead end to a [`PathVisitor`].
//! The visitor's return value steers the search: it can keep going, skip to
//! the next starting vertex, or stop the call outright.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::{PathConfig, SearchMode};
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, VertexId};
use crate::result::{PathRecord, PathSummary, SearchStatus};
use crate::weight::{self, Weight};

/// Receives enumerated paths and steers the search.
///
/// Closures of type `FnMut(&PathRecord<W>) -> SearchStatus` implement this
/// trait with the default dead-end handling, so the common case needs no
/// named type.
pub trait PathVisitor<W: Weight> {
    /// Called for each complete path; the returned status steers the search.
    fn on_valid(&mut self, path: &PathRecord<W>) -> SearchStatus;

    /// Called for each prefix abandoned as a dead end. Defaults to
    /// continuing the search.
    fn on_invalid(&mut self, _path: &PathRecord<W>) -> SearchStatus {
        SearchStatus::Continue
    }
}

impl<W, F> PathVisitor<W> for F
where
    W: Weight,
    F: FnMut(&PathRecord<W>) -> SearchStatus,
{
    fn on_valid(&mut self, path: &PathRecord<W>) -> SearchStatus {
        self(path)
    }
}

/// Enumerate paths through `graph` as selected by `config`.
///
/// In Hamiltonian mode every vertex is an origin unless the configuration
/// restricts the set; in point-to-point mode the single origin is
/// `config.start`. Candidates are tried in adjacency insertion order, or
/// in ascending heuristic order when one is configured.
#[tracing::instrument(
    skip(graph, config, visitor),
    fields(vertices = graph.vertex_count(), mode = ?config.mode())
)]
pub fn find_paths<W, V>(
    graph: &Graph<W>,
    config: &PathConfig<W>,
    visitor: &mut V,
) -> Result<PathSummary>
where
    W: Weight,
    V: PathVisitor<W> + ?Sized,
{
    config.validate(graph)?;

    let origins: Vec<VertexId> = if let Some(start) = config.start {
        vec![start]
    } else if !config.starting_vertices.is_empty() {
        config.starting_vertices.clone()
    } else {
        graph.vertices().map(|vertex| vertex.id).collect()
    };

    let mut enumeration = Enumeration::new(graph, config, visitor);
    for origin in origins {
        if enumeration.run_origin(origin)? == SearchStatus::Finished {
            enumeration.summary.finished_early = true;
            break;
        }
    }

    let summary = enumeration.summary;
    debug!(
        valid = summary.valid_paths,
        invalid = summary.invalid_paths,
        expansions = summary.expansions,
        pruned = summary.pruned,
        "enumeration complete"
    );
    Ok(summary)
}

/// One vertex on the current path plus its untried continuations.
#[derive(Debug, Clone)]
struct Frame<W> {
    vertex: VertexId,
    /// Edge taken into this vertex; `None` on origin frames.
    via: Option<Edge<W>>,
    /// Running weight total up to and including `via`.
    total: Option<W>,
    /// Untried continuations, popped from the back.
    ///
    /// The list is fixed when the frame is created: descendants restore
    /// the visited set on backtrack, so whatever was a legal continuation
    /// then is still legal when its turn comes.
    candidates: SmallVec<[Edge<W>; 8]>,
}

/// What the enumerator finds on arriving at a freshly pushed vertex.
enum Arrival<W> {
    /// The path is complete; a cycle carries its closing edge.
    Complete(Option<Edge<W>>),
    /// A full-length permutation with no edge back to its origin.
    Unclosable,
    /// The path may still grow.
    Partial,
}

/// Mutable state for one enumeration call.
struct Enumeration<'a, W: Weight, V: ?Sized> {
    graph: &'a Graph<W>,
    config: &'a PathConfig<W>,
    visitor: &'a mut V,
    mode: SearchMode,
    visited: Vec<bool>,
    stack: SmallVec<[Frame<W>; 16]>,
    summary: PathSummary,
    sequence: usize,
}

impl<'a, W, V> Enumeration<'a, W, V>
where
    W: Weight,
    V: PathVisitor<W> + ?Sized,
{
    fn new(graph: &'a Graph<W>, config: &'a PathConfig<W>, visitor: &'a mut V) -> Self {
        Self {
            graph,
            config,
            visitor,
            mode: config.mode(),
            visited: vec![false; graph.vertex_count()],
            stack: SmallVec::new(),
            summary: PathSummary::default(),
            sequence: 0,
        }
    }

    /// Exhaust all paths from one origin, or stop early on a visitor
    /// directive. Returns the directive that ended the run.
    fn run_origin(&mut self, origin: VertexId) -> Result<SearchStatus> {
        self.stack.clear();
        self.visited.fill(false);

        let initial_total = if self.config.sum_path {
            Some(W::ZERO)
        } else {
            None
        };
        let status = self.push_vertex(origin, None, initial_total)?;
        if status != SearchStatus::Continue {
            return Ok(status);
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                break;
            };
            match frame.candidates.pop() {
                None => {
                    // Tip exhausted: backtrack.
                    let vertex = frame.vertex;
                    self.stack.pop();
                    self.visited[vertex.index()] = false;
                }
                Some(edge) => {
                    let total = match (frame.total, edge.weight) {
                        (Some(run), Some(step)) => Some(weight::add(run, step)?),
                        (Some(_), None) => {
                            return Err(Error::MissingWeight {
                                from: edge.from,
                                to: edge.to,
                            });
                        }
                        (None, _) => None,
                    };
                    let status = self.push_vertex(edge.to, Some(edge), total)?;
                    if status != SearchStatus::Continue {
                        return Ok(status);
                    }
                }
            }
        }

        Ok(SearchStatus::Continue)
    }

    /// Extend the path by one vertex and classify the new tip. Complete
    /// paths and dead ends are reported immediately; the frame is left on
    /// the stack with no candidates, so the main loop backtracks past it.
    fn push_vertex(
        &mut self,
        vertex: VertexId,
        via: Option<Edge<W>>,
        total: Option<W>,
    ) -> Result<SearchStatus> {
        self.visited[vertex.index()] = true;
        self.summary.expansions += 1;
        self.stack.push(Frame {
            vertex,
            via,
            total,
            candidates: SmallVec::new(),
        });

        match self.classify(vertex) {
            Arrival::Complete(closing) => {
                let total = match (total, closing.and_then(|edge| edge.weight)) {
                    (Some(run), Some(step)) => Some(weight::add(run, step)?),
                    (run, _) => run,
                };
                self.summary.valid_paths += 1;
                let record = self.record(total, closing);
                trace!(sequence = record.sequence, length = record.len(), "path complete");
                Ok(self.visitor.on_valid(&record))
            }
            Arrival::Unclosable => {
                self.summary.invalid_paths += 1;
                let record = self.record(total, None);
                Ok(self.visitor.on_invalid(&record))
            }
            Arrival::Partial => {
                let candidates = self.candidates_for(vertex, total)?;
                if candidates.is_empty() {
                    self.summary.invalid_paths += 1;
                    let record = self.record(total, None);
                    return Ok(self.visitor.on_invalid(&record));
                }
                if let Some(frame) = self.stack.last_mut() {
                    frame.candidates = candidates;
                }
                Ok(SearchStatus::Continue)
            }
        }
    }

    fn classify(&self, vertex: VertexId) -> Arrival<W> {
        match self.mode {
            SearchMode::PointToPoint => {
                if self.config.end == Some(vertex) {
                    Arrival::Complete(None)
                } else {
                    Arrival::Partial
                }
            }
            SearchMode::Hamiltonian => {
                if self.stack.len() < self.graph.vertex_count() {
                    return Arrival::Partial;
                }
                if !self.config.detect_cycles {
                    return Arrival::Complete(None);
                }
                let Some(origin) = self.stack.first().map(|frame| frame.vertex) else {
                    return Arrival::Partial;
                };
                match self.graph.edge(vertex, origin) {
                    Some(edge) => Arrival::Complete(Some(*edge)),
                    None => Arrival::Unclosable,
                }
            }
        }
    }

    /// Legal continuations from `vertex`: unvisited neighbors, minus any
    /// branch the cost bound cuts, ordered for consumption from the back.
    fn candidates_for(
        &mut self,
        vertex: VertexId,
        total: Option<W>,
    ) -> Result<SmallVec<[Edge<W>; 8]>> {
        let graph = self.graph;
        let mut out: SmallVec<[Edge<W>; 8]> = SmallVec::new();
        for edge in graph.neighbors(vertex) {
            if self.visited[edge.to.index()] {
                continue;
            }
            if let (Some(run), Some(bound)) = (total, self.config.max_cost) {
                let step = edge.weight.ok_or(Error::MissingWeight {
                    from: edge.from,
                    to: edge.to,
                })?;
                if weight::add(run, step)? > bound {
                    self.summary.pruned += 1;
                    continue;
                }
            }
            out.push(*edge);
        }
        if let Some(heuristic) = self.config.heuristic {
            // Stable sort, so ties keep insertion order.
            out.sort_by_key(|edge| heuristic(graph, edge.from, edge.to));
        }
        out.reverse();
        Ok(out)
    }

    /// Snapshot the current stack into a record and assign it the next
    /// callback sequence number.
    fn record(&mut self, total: Option<W>, closing: Option<Edge<W>>) -> PathRecord<W> {
        let vertices: Vec<VertexId> = self.stack.iter().map(|frame| frame.vertex).collect();
        let mut edges: Vec<Edge<W>> = self.stack.iter().filter_map(|frame| frame.via).collect();
        let cycle = closing.is_some();
        if let Some(edge) = closing {
            edges.push(edge);
        }
        let sequence = self.sequence;
        self.sequence += 1;
        PathRecord {
            sequence,
            vertices,
            edges,
            total,
            cycle,
        }
    }
}

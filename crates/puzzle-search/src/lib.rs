//! Combinatorial search engines for puzzle solutions.
//!
//! This crate provides the two engines the puzzle-solutions library leans
//! on: an exhaustive backtracking enumerator for paths through small
//! graphs, and a cost-ordered best-first search over game states. A worked
//! spell-battle model shows the state search driving a concrete puzzle.

pub mod combat;
pub mod config;
pub mod error;
pub mod graph;
pub mod pathfinder;
pub mod result;
pub mod search;
pub mod weight;

// Re-export main types
pub use combat::{cheapest_victory, BattleSetup, BattleState, Effect, Spell, Victory};
pub use config::{PathConfig, SearchMode, StepHeuristic};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, GraphKind, Vertex, VertexId};
pub use pathfinder::{find_paths, PathVisitor};
pub use result::{PathRecord, PathSummary, SearchStatus};
pub use search::{best_first, SearchOutcome, SearchState};
pub use weight::Weight;

//! Error types for the puzzle-search crate.

use thiserror::Error;

use crate::graph::VertexId;

/// Main error type for the puzzle-search crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("vertex {id} is not part of the graph")]
    UnknownVertex { id: VertexId },

    #[error("an end vertex was given without a start vertex")]
    IncompletePointToPoint,

    #[error("cycle detection cannot be combined with an end vertex")]
    CycleWithEndpoint,

    #[error("an explicit start vertex conflicts with a custom starting set")]
    ConflictingStarts,

    #[error("a cost bound requires path summing to be enabled")]
    BoundWithoutSum,

    #[error("edge {from} -> {to} has no weight but path summing is enabled")]
    MissingWeight { from: VertexId, to: VertexId },

    #[error("weight arithmetic overflowed during {operation}")]
    WeightOverflow { operation: &'static str },

    #[error("weight division by zero")]
    DivisionByZero,

    #[error("state space exhausted after expanding {expanded} states without reaching a goal")]
    SearchExhausted { expanded: usize },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

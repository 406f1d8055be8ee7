//! Cost-ordered best-first search over arbitrary game states.
//!
//! States are explored cheapest-first, so the first state that satisfies
//! the goal predicate is a minimum-cost solution. Equal costs are broken
//! by creation order, which makes the search fully deterministic for a
//! deterministic successor function.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::hash::Hash;

use tracing::debug;

use crate::error::{Error, Result};
use crate::weight::Weight;

/// A game state explorable by [`best_first`].
///
/// Equality and hashing define de-duplication: a generated state equal to
/// one seen before is discarded. Equal states must report equal costs,
/// which holds whenever `cost` is derived from the compared fields.
pub trait SearchState: Clone + Eq + Hash {
    type Cost: Weight;

    /// Total cost accumulated to reach this state.
    fn cost(&self) -> Self::Cost;
}

/// Result of a search that reached a goal.
#[derive(Debug, Clone)]
pub struct SearchOutcome<S> {
    /// The first goal state dequeued, which is minimal in cost.
    pub goal: S,
    /// Every state from the initial one to the goal, in order.
    pub path: Vec<S>,
    /// States dequeued and expanded.
    pub expanded: usize,
    /// States generated, counting duplicates that were discarded.
    pub generated: usize,
}

/// Heap entry ordered by accumulated cost, then by creation order.
struct OpenEntry<C> {
    cost: C,
    /// Arena slot of the state; doubles as the insertion tiebreak.
    index: usize,
}

impl<C: Weight> PartialEq for OpenEntry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.index == other.index
    }
}

impl<C: Weight> Eq for OpenEntry<C> {}

impl<C: Weight> PartialOrd for OpenEntry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Weight> Ord for OpenEntry<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// A state in the arena, linked back to the state it was expanded from.
struct Node<S> {
    state: S,
    parent: Option<usize>,
}

/// Search from `initial` until `is_goal` accepts a dequeued state.
///
/// `expand` produces the successors of a state; successors equal to an
/// already seen state are discarded. The goal test runs when a state is
/// dequeued, never when it is generated, so the returned goal is reached
/// at minimum cost. Exhausting the space without a goal is an error.
#[tracing::instrument(skip(initial, expand, is_goal))]
pub fn best_first<S, E, G>(initial: S, mut expand: E, mut is_goal: G) -> Result<SearchOutcome<S>>
where
    S: SearchState,
    E: FnMut(&S) -> Vec<S>,
    G: FnMut(&S) -> bool,
{
    let mut arena: Vec<Node<S>> = Vec::new();
    let mut heap: BinaryHeap<Reverse<OpenEntry<S::Cost>>> = BinaryHeap::new();
    let mut seen: HashSet<S> = HashSet::new();

    let mut expanded = 0usize;
    let mut generated = 1usize;
    let mut floor = initial.cost();

    seen.insert(initial.clone());
    heap.push(Reverse(OpenEntry {
        cost: initial.cost(),
        index: 0,
    }));
    arena.push(Node {
        state: initial,
        parent: None,
    });

    while let Some(Reverse(OpenEntry { cost, index })) = heap.pop() {
        debug_assert!(cost >= floor, "dequeued costs must be non-decreasing");
        floor = cost;
        if is_goal(&arena[index].state) {
            let path = reconstruct(&arena, index);
            let goal = arena[index].state.clone();
            debug!(expanded, generated, cost = %goal.cost(), "goal reached");
            return Ok(SearchOutcome {
                goal,
                path,
                expanded,
                generated,
            });
        }

        expanded += 1;
        for successor in expand(&arena[index].state) {
            generated += 1;
            if !seen.insert(successor.clone()) {
                continue;
            }
            heap.push(Reverse(OpenEntry {
                cost: successor.cost(),
                index: arena.len(),
            }));
            arena.push(Node {
                state: successor,
                parent: Some(index),
            });
        }
    }

    Err(Error::SearchExhausted { expanded })
}

fn reconstruct<S: Clone>(arena: &[Node<S>], goal: usize) -> Vec<S> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        path.push(arena[index].state.clone());
        cursor = arena[index].parent;
    }
    path.reverse();
    path
}

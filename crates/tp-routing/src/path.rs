//! Path extraction from a terminal state's back-reference chain.

use std::sync::Arc;

use tp_core::{EdgeId, Instant, VertexId};

use crate::State;

/// A found path, ordered in real time (origin first) for both search
/// directions.
#[derive(Clone, Debug)]
pub struct GraphPath {
    /// `states[0]` is at the trip origin; `states[i + 1]` was reached over
    /// `edges[i]`.
    states: Vec<Arc<State>>,
    edges:  Vec<EdgeId>,
    weight: f64,
}

impl GraphPath {
    /// Walk the chain from `terminal` back to the root.
    pub fn from_state(terminal: &Arc<State>) -> Self {
        let mut states = Vec::with_capacity(terminal.depth() + 1);
        let mut cur = Some(Arc::clone(terminal));
        while let Some(s) = cur {
            cur = s.back_state().cloned();
            states.push(s);
        }
        let mut edges: Vec<EdgeId> = states.iter().filter_map(|s| s.back_edge()).collect();

        // An arrive-by chain is already origin-first, each edge stored on
        // the state at its real-time start.
        if !terminal.is_arrive_by() {
            states.reverse();
            edges.reverse();
        }

        Self { states, edges, weight: terminal.weight() }
    }

    pub fn states(&self) -> &[Arc<State>] {
        &self.states
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.states.iter().map(|s| s.vertex())
    }

    /// Time at the trip origin.
    pub fn start_time(&self) -> Instant {
        self.states.first().map_or(Instant::EPOCH, |s| s.time())
    }

    /// Time at the trip destination.
    pub fn end_time(&self) -> Instant {
        self.states.last().map_or(Instant::EPOCH, |s| s.time())
    }

    pub fn duration_secs(&self) -> i64 {
        self.end_time().since(self.start_time())
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Metres walked over the whole trip.
    pub fn walk_distance_m(&self) -> f64 {
        self.states
            .iter()
            .map(|s| s.walk_distance_m())
            .fold(0.0, f64::max)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

//! Search driver trait and a reference label-setting Dijkstra.
//!
//! # Pluggability
//!
//! Applications drive searches through the [`ShortestPathSearch`] trait, so
//! an A* or a bidirectional search can replace [`DijkstraSearch`] without
//! touching the traversal model.  A driver only needs [`State::initial`],
//! [`Graph::expansion_edges`](tp_graph::Graph::expansion_edges) and
//! [`Traverse::traverse`].
//!
//! # Frontier order
//!
//! Lowest weight first, then earliest time (latest in an arrive-by search),
//! then insertion order, so ties always break the same way.
//!
//! # Dominance
//!
//! States are grouped by `(vertex, mode, renting)`.  Within a group a new
//! state is dropped only if some kept state is no heavier, has walked no
//! further, boarded no more often and is no later in search order.  Walk
//! distance and boardings gate what a state may still traverse, so weight
//! alone cannot prune it.
//!
//! # Cancellation
//!
//! [`DijkstraSearch::max_expansions`] bounds the work of one run.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use log::{debug, trace};
use rustc_hash::FxHashMap;

use tp_core::{TraverseMode, VertexId};

use crate::{GraphPath, RoutingContext, RoutingError, RoutingResult, State, Traverse};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// A found path plus search statistics.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub path:     GraphPath,
    /// States popped from the frontier and expanded.
    pub expanded: usize,
}

/// Pluggable search driver.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; independent runs share nothing
/// but the read-only graph, so one driver may serve many threads.
pub trait ShortestPathSearch: Send + Sync {
    /// # Errors
    ///
    /// [`RoutingError::NoPath`] when the frontier empties before reaching
    /// the target, [`RoutingError::SearchLimitExceeded`] when the driver's
    /// own budget runs out.
    fn search(&self, ctx: &Arc<RoutingContext>) -> RoutingResult<SearchOutcome>;
}

// ── DijkstraSearch ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct DijkstraSearch {
    /// Give up after this many expansions; `None` is unbounded.
    pub max_expansions: Option<usize>,
}

impl DijkstraSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(max_expansions: usize) -> Self {
        Self { max_expansions: Some(max_expansions) }
    }
}

impl ShortestPathSearch for DijkstraSearch {
    fn search(&self, ctx: &Arc<RoutingContext>) -> RoutingResult<SearchOutcome> {
        let graph = &ctx.graph;
        let arrive_by = ctx.arrive_by();
        let no_path = || RoutingError::NoPath { from: ctx.request.from(), to: ctx.request.to() };

        let root = State::initial(ctx);
        let mut labels: FxHashMap<DominanceKey, Vec<Label>> = FxHashMap::default();
        let mut heap: BinaryHeap<Reverse<Frontier>> = BinaryHeap::new();
        let mut seq = 0u64;

        labels.insert(DominanceKey::of(&root), vec![Label::of(&root, arrive_by, seq)]);
        heap.push(Reverse(Frontier::new(root, arrive_by, seq)));

        let mut expanded = 0usize;
        while let Some(Reverse(entry)) = heap.pop() {
            let s = entry.state;

            // Skip entries whose label was evicted by a dominating state.
            let live = labels
                .get(&DominanceKey::of(&s))
                .is_some_and(|kept| kept.iter().any(|l| l.seq == entry.seq));
            if !live {
                continue;
            }
            if s.is_final() {
                debug!(
                    "path found: weight {:.1}, {} edges, {} expansions",
                    s.weight(),
                    s.depth(),
                    expanded
                );
                return Ok(SearchOutcome { path: GraphPath::from_state(&s), expanded });
            }

            if self.max_expansions.is_some_and(|max| expanded >= max) {
                return Err(RoutingError::SearchLimitExceeded { expansions: expanded });
            }
            expanded += 1;

            let edges = graph.expansion_edges(s.vertex(), arrive_by);

            #[cfg(not(feature = "parallel"))]
            let children: Vec<Arc<State>> = edges
                .iter()
                .filter_map(|&e| graph.edge(e).traverse(&s))
                .collect();

            #[cfg(feature = "parallel")]
            let children: Vec<Arc<State>> = {
                use rayon::prelude::*;

                edges
                    .par_iter()
                    .filter_map(|&e| graph.edge(e).traverse(&s))
                    .collect()
            };

            // Heap inserts stay sequential; `collect` keeps edge order so
            // sequence numbers match the single-threaded run.
            for child in children {
                let label = Label::of(&child, arrive_by, seq + 1);
                let kept = labels.entry(DominanceKey::of(&child)).or_default();
                if kept.iter().any(|l| l.dominates(&label)) {
                    continue;
                }
                kept.retain(|l| !label.dominates(l));
                kept.push(label);
                seq += 1;
                trace!("push {:?}", child);
                heap.push(Reverse(Frontier::new(child, arrive_by, seq)));
            }
        }

        debug!("frontier exhausted after {} expansions", expanded);
        Err(no_path())
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
struct DominanceKey {
    vertex:  VertexId,
    mode:    TraverseMode,
    renting: bool,
}

impl DominanceKey {
    fn of(s: &State) -> Self {
        Self { vertex: s.vertex(), mode: s.mode(), renting: s.is_renting() }
    }
}

/// The criteria a state is compared on within its dominance group.
#[derive(Copy, Clone)]
struct Label {
    weight:    f64,
    walk_m:    f64,
    boardings: u16,
    time_key:  i64,
    seq:       u64,
}

impl Label {
    fn of(s: &State, arrive_by: bool, seq: u64) -> Self {
        Self {
            weight: s.weight(),
            walk_m: s.walk_distance_m(),
            boardings: s.num_boardings(),
            time_key: time_key(s, arrive_by),
            seq,
        }
    }

    /// No worse on every criterion.  Equal labels dominate each other, so
    /// the first one kept wins.
    fn dominates(&self, other: &Label) -> bool {
        self.weight <= other.weight
            && self.walk_m <= other.walk_m
            && self.boardings <= other.boardings
            && self.time_key <= other.time_key
    }
}

/// Smaller is better: time in a forward search, negated time in an
/// arrive-by search.
fn time_key(s: &State, arrive_by: bool) -> i64 {
    let t = s.time_seconds();
    if arrive_by { -t } else { t }
}

struct Frontier {
    weight:   f64,
    time_key: i64,
    seq:      u64,
    state:    Arc<State>,
}

impl Frontier {
    fn new(state: Arc<State>, arrive_by: bool, seq: u64) -> Self {
        Self {
            weight: state.weight(),
            time_key: time_key(&state, arrive_by),
            seq,
            state,
        }
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then(self.time_key.cmp(&other.time_key))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

//! Immutable search states and the editor that derives them.
//!
//! # Ownership
//!
//! A [`State`] owns an `Arc` to its parent, so the back-reference chain of
//! a run forms a tree of reference-counted nodes.  An ancestor lives exactly
//! as long as some descendant (or the search frontier) still holds it.  The
//! chain is acyclic by construction: a parent always exists before its child.
//!
//! # Time arithmetic
//!
//! Times are whole epoch seconds ([`Instant`]).  For a child `s` of `p`:
//!
//! ```text
//! s.time_seconds() == p.time_seconds() + s.elapsed_time_since_parent()
//! ```
//!
//! Forward searches only ever move time forward, reverse (arrive-by)
//! searches only backward, so the signed delta is non-negative or
//! non-positive respectively and [`State::abs_delta_since_parent`] is always
//! its magnitude.

use std::fmt;
use std::sync::Arc;

use log::trace;

use tp_core::{EdgeId, Instant, TraverseMode, VertexId};
use tp_graph::Edge;

use crate::RoutingContext;

// ── State ─────────────────────────────────────────────────────────────────────

/// One point along a candidate path.
pub struct State {
    vertex:          VertexId,
    time:            Instant,
    weight:          f64,
    mode:            TraverseMode,
    walk_distance_m: f64,
    num_boardings:   u16,
    renting:         bool,
    depth:           u32,
    back_edge:       Option<EdgeId>,
    back_state:      Option<Arc<State>>,
    ctx:             Arc<RoutingContext>,
}

impl State {
    /// Root state of a search: at the search origin, at the request's
    /// reference time, zero weight, in the request's initial street mode.
    pub fn initial(ctx: &Arc<RoutingContext>) -> Arc<State> {
        let request = &ctx.request;
        Arc::new(State {
            vertex:          ctx.origin(),
            time:            request.date_time(),
            weight:          0.0,
            mode:            request.initial_mode(),
            walk_distance_m: 0.0,
            num_boardings:   0,
            renting:         false,
            depth:           0,
            back_edge:       None,
            back_state:      None,
            ctx:             Arc::clone(ctx),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    #[inline]
    pub fn time(&self) -> Instant {
        self.time
    }

    #[inline]
    pub fn time_seconds(&self) -> i64 {
        self.time.secs()
    }

    #[inline]
    pub fn time_millis(&self) -> i64 {
        self.time.millis()
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn mode(&self) -> TraverseMode {
        self.mode
    }

    /// Metres walked since the root.
    #[inline]
    pub fn walk_distance_m(&self) -> f64 {
        self.walk_distance_m
    }

    #[inline]
    pub fn num_boardings(&self) -> u16 {
        self.num_boardings
    }

    /// `true` while holding a rented bicycle.
    #[inline]
    pub fn is_renting(&self) -> bool {
        self.renting
    }

    #[inline]
    pub fn is_arrive_by(&self) -> bool {
        self.ctx.arrive_by()
    }

    /// Number of ancestors; zero for the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    #[inline]
    pub fn back_state(&self) -> Option<&Arc<State>> {
        self.back_state.as_ref()
    }

    /// Edge traversed to reach this state.
    #[inline]
    pub fn back_edge(&self) -> Option<EdgeId> {
        self.back_edge
    }

    pub fn back_edge_ref(&self) -> Option<&Edge> {
        self.back_edge.map(|e| self.ctx.graph.edge(e))
    }

    #[inline]
    pub fn context(&self) -> &Arc<RoutingContext> {
        &self.ctx
    }

    /// Signed seconds from the parent; zero for the root.
    pub fn elapsed_time_since_parent(&self) -> i64 {
        match &self.back_state {
            Some(p) => self.time.since(p.time),
            None => 0,
        }
    }

    /// Same as [`elapsed_time_since_parent`](Self::elapsed_time_since_parent):
    /// non-negative in forward searches, non-positive in arrive-by searches.
    #[inline]
    pub fn delta_since_parent(&self) -> i64 {
        self.elapsed_time_since_parent()
    }

    #[inline]
    pub fn abs_delta_since_parent(&self) -> i64 {
        self.delta_since_parent().abs()
    }

    /// Seconds between the request's reference time and this state, always
    /// non-negative.
    pub fn elapsed_time_seconds(&self) -> i64 {
        self.time.since(self.ctx.request.date_time()).abs()
    }

    /// `true` at the search target with no rented bicycle in hand.
    pub fn is_final(&self) -> bool {
        self.vertex == self.ctx.target() && !self.renting
    }

    /// This state followed by every ancestor up to the root.
    pub fn chain(&self) -> impl Iterator<Item = &State> + '_ {
        std::iter::successors(Some(self), |s| s.back_state.as_deref())
    }

    /// Start deriving a child reached over `edge`.
    pub fn edit(self: &Arc<Self>, edge: &Edge) -> StateEditor {
        StateEditor::new(self, edge)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("vertex", &self.vertex)
            .field("time", &self.time)
            .field("weight", &self.weight)
            .field("mode", &self.mode)
            .field("walk_distance_m", &self.walk_distance_m)
            .field("num_boardings", &self.num_boardings)
            .field("renting", &self.renting)
            .field("depth", &self.depth)
            .field("back_edge", &self.back_edge)
            .finish()
    }
}

impl Drop for State {
    // Unlink uniquely owned ancestors in a loop; the default recursive drop
    // would overflow the stack on long chains.
    fn drop(&mut self) {
        let mut next = self.back_state.take();
        while let Some(parent) = next {
            match Arc::try_unwrap(parent) {
                Ok(mut p) => next = p.back_state.take(),
                Err(_) => break,
            }
        }
    }
}

// ── StateEditor ───────────────────────────────────────────────────────────────

/// Accumulates the changes of one traversal, then freezes them into a new
/// [`State`].
///
/// Increments are given as magnitudes; the editor applies them in the
/// direction the search runs.  Any invalid increment marks the editor
/// defective and [`make_state`](Self::make_state) then yields `None`.
pub struct StateEditor {
    parent:    Arc<State>,
    edge:      EdgeId,
    vertex:    VertexId,
    time:      Instant,
    weight:    f64,
    mode:      TraverseMode,
    walk_m:    f64,
    boardings: u16,
    renting:   bool,
    defective: bool,
}

impl StateEditor {
    fn new(parent: &Arc<State>, edge: &Edge) -> Self {
        let (_, to) = edge.endpoints(parent.is_arrive_by());
        Self {
            parent:    Arc::clone(parent),
            edge:      edge.id,
            vertex:    to,
            time:      parent.time,
            weight:    parent.weight,
            mode:      parent.mode,
            walk_m:    parent.walk_distance_m,
            boardings: parent.num_boardings,
            renting:   parent.renting,
            defective: false,
        }
    }

    /// Move time by `secs` in the search direction.
    pub fn increment_time_secs(&mut self, secs: i64) {
        if secs < 0 {
            trace!("negative time increment {secs} over {}", self.edge);
            self.defective = true;
            return;
        }
        let signed = if self.parent.is_arrive_by() { -secs } else { secs };
        self.time = self.time.plus_secs(signed);
    }

    pub fn increment_weight(&mut self, weight: f64) {
        if !(weight.is_finite() && weight >= 0.0) {
            trace!("invalid weight increment {weight} over {}", self.edge);
            self.defective = true;
            return;
        }
        self.weight += weight;
    }

    pub fn set_mode(&mut self, mode: TraverseMode) {
        self.mode = mode;
    }

    pub fn increment_walk_distance(&mut self, metres: f64) {
        if metres > 0.0 {
            self.walk_m += metres;
        }
    }

    pub fn increment_boardings(&mut self) {
        self.boardings = self.boardings.saturating_add(1);
    }

    pub fn set_renting(&mut self, renting: bool) {
        self.renting = renting;
    }

    #[inline]
    pub fn mode(&self) -> TraverseMode {
        self.mode
    }

    #[inline]
    pub fn time(&self) -> Instant {
        self.time
    }

    /// Freeze the edits.  `None` if any increment was invalid.
    pub fn make_state(self) -> Option<Arc<State>> {
        if self.defective {
            return None;
        }
        let ctx = Arc::clone(&self.parent.ctx);
        let depth = self.parent.depth + 1;
        Some(Arc::new(State {
            vertex:          self.vertex,
            time:            self.time,
            weight:          self.weight,
            mode:            self.mode,
            walk_distance_m: self.walk_m,
            num_boardings:   self.boardings,
            renting:         self.renting,
            depth,
            back_edge:       Some(self.edge),
            back_state:      Some(self.parent),
            ctx,
        }))
    }
}

//! The state transition: advancing a [`State`] across one [`Edge`].
//!
//! Each [`EdgeKind`] variant has its own rule, selected by a `match` over the
//! closed variant set.  Every rule is a pure function of the input state,
//! the edge and the run's [`RoutingContext`](crate::RoutingContext); the only
//! effect is allocating the new state.
//!
//! `None` means "this edge is not usable from this state" (forbidden mode,
//! no departure, walk limit, ...).  It is the common outcome and not an
//! error.
//!
//! # Rounding
//!
//! Fractional durations are converted to whole seconds with
//! [`round_half_up`] once per edge, after adding the turn penalty.
//!
//! # Direction
//!
//! In an arrive-by search the state sits at `edge.to` and time runs
//! backward.  Variants that change mode or renting status apply the
//! real-time change in reverse, so the search tree still describes a
//! physically valid trip when read forward.

use std::sync::Arc;

use log::trace;

use tp_core::{Instant, TraverseMode, VertexId};
use tp_graph::{Edge, EdgeKind, Graph, StreetEdge, Timetable, VertexKind};

use crate::intersection::TurnCost;
use crate::{RoutingPreferences, State};

/// Convert fractional seconds to whole seconds, halves rounding up.
#[inline]
pub fn round_half_up(secs: f64) -> i64 {
    (secs + 0.5).floor() as i64
}

/// A graph relation that can advance a search state.
pub trait Traverse {
    /// Advance `s0` across `self`.
    ///
    /// # Panics
    ///
    /// If `s0` is not at the vertex this edge departs from in the search
    /// direction.  That is a driver bug, not a recoverable condition.
    fn traverse(&self, s0: &Arc<State>) -> Option<Arc<State>>;
}

impl Traverse for Edge {
    fn traverse(&self, s0: &Arc<State>) -> Option<Arc<State>> {
        let arrive_by = s0.is_arrive_by();
        let (from, _) = self.endpoints(arrive_by);
        assert_eq!(
            s0.vertex(),
            from,
            "state at {} cannot traverse {} ({} -> {})",
            s0.vertex(),
            self.id,
            self.from,
            self.to
        );

        let s1 = match &self.kind {
            EdgeKind::Street(street) => traverse_street(self, street, s0),
            EdgeKind::TransitBoard { mode, departures, .. } => {
                if arrive_by {
                    leave_vehicle(self, *mode, s0)
                } else {
                    board_vehicle(self, *mode, departures, s0)
                }
            }
            EdgeKind::TransitHop { mode, running_secs, .. } => {
                ride_vehicle(self, *mode, *running_secs, s0)
            }
            EdgeKind::TransitAlight { mode, arrivals, .. } => {
                if arrive_by {
                    board_vehicle(self, *mode, arrivals, s0)
                } else {
                    leave_vehicle(self, *mode, s0)
                }
            }
            EdgeKind::Transfer { distance_m, min_transfer_secs } => {
                traverse_transfer(self, *distance_m, *min_transfer_secs, s0)
            }
            EdgeKind::RentalPickup { .. } => {
                if arrive_by { return_bicycle(self, s0) } else { take_bicycle(self, s0) }
            }
            EdgeKind::RentalDropoff { .. } => {
                if arrive_by { take_bicycle(self, s0) } else { return_bicycle(self, s0) }
            }
        };

        if s1.is_none() {
            trace!("{} not traversable from {:?}", self.id, s0);
        }
        s1
    }
}

// ── Street ────────────────────────────────────────────────────────────────────

fn traverse_street(edge: &Edge, street: &StreetEdge, s0: &Arc<State>) -> Option<Arc<State>> {
    let ctx = s0.context();
    let request = &ctx.request;
    let prefs = request.preferences();

    let mode = s0.mode();
    if !mode.is_on_street_non_transit() {
        return None;
    }
    // Effective mode for speed and cost; a pushed bicycle moves on foot.
    let moving = if street.permission.allows(mode) {
        mode
    } else if mode == TraverseMode::Bicycle
        && prefs.allow_bike_walking
        && street.permission.allows(TraverseMode::Walk)
    {
        TraverseMode::Walk
    } else {
        return None;
    };
    if prefs.wheelchair_accessible && !street.wheelchair_accessible {
        return None;
    }

    let base_secs = street.length_m / request.street_speed(moving, street);
    let turn = match s0.back_edge_ref() {
        None => TurnCost::ZERO,
        Some(back) if s0.is_arrive_by() => {
            ctx.cost_model.turn_cost(&ctx.graph, Some(edge), back, moving, prefs)
        }
        Some(back) => ctx.cost_model.turn_cost(&ctx.graph, Some(back), edge, moving, prefs),
    };

    let walking = moving == TraverseMode::Walk;
    if walking && exceeds_walk_limit(s0.walk_distance_m() + street.length_m, prefs) {
        return None;
    }

    let mut s1 = s0.edit(edge);
    if walking {
        s1.increment_walk_distance(street.length_m);
    }
    s1.increment_time_secs(round_half_up(base_secs + turn.time_secs));
    s1.increment_weight(base_secs * request.reluctance(moving) + turn.weight);
    s1.make_state()
}

fn exceeds_walk_limit(walked_m: f64, prefs: &RoutingPreferences) -> bool {
    prefs.max_walk_distance_m.is_some_and(|max| walked_m > max)
}

// ── Transit ───────────────────────────────────────────────────────────────────

/// Get on a vehicle: board in a forward search, reverse-alight in an
/// arrive-by search.  Charges the wait plus the boarding cost.
fn board_vehicle(
    edge:      &Edge,
    mode:      TraverseMode,
    timetable: &Timetable,
    s0:        &Arc<State>,
) -> Option<Arc<State>> {
    let ctx = s0.context();
    let prefs = ctx.request.preferences();
    if !ctx.request.modes().contains(mode) || s0.mode() != TraverseMode::Walk || s0.is_renting() {
        return None;
    }
    let stop = if s0.is_arrive_by() { edge.to } else { edge.from };
    if prefs.wheelchair_accessible && !wheelchair_boarding(&ctx.graph, stop) {
        return None;
    }

    let transfer = s0.num_boardings() > 0;
    let slack = if transfer { prefs.transfer_slack_secs as i64 } else { 0 };
    let vehicle_time: Instant = if s0.is_arrive_by() {
        timetable.last_at_or_before(s0.time().plus_secs(-slack))?
    } else {
        timetable.next_at_or_after(s0.time().plus_secs(slack))?
    };
    let wait_secs = vehicle_time.since(s0.time()).abs();

    let mut s1 = s0.edit(edge);
    s1.increment_time_secs(wait_secs);
    s1.increment_weight(wait_secs as f64 * prefs.wait_reluctance);
    s1.increment_weight(prefs.board_cost);
    if transfer {
        s1.increment_weight(prefs.transfer_penalty);
    }
    s1.increment_boardings();
    s1.set_mode(mode);
    s1.make_state()
}

/// Get off a vehicle: alight in a forward search, reverse-board in an
/// arrive-by search.  Free; the cost was paid when getting on.
fn leave_vehicle(edge: &Edge, mode: TraverseMode, s0: &Arc<State>) -> Option<Arc<State>> {
    if s0.mode() != mode {
        return None;
    }
    let ctx = s0.context();
    let stop = if s0.is_arrive_by() { edge.from } else { edge.to };
    if ctx.request.preferences().wheelchair_accessible && !wheelchair_boarding(&ctx.graph, stop) {
        return None;
    }
    let mut s1 = s0.edit(edge);
    s1.set_mode(TraverseMode::Walk);
    s1.make_state()
}

fn ride_vehicle(
    edge:         &Edge,
    mode:         TraverseMode,
    running_secs: u32,
    s0:           &Arc<State>,
) -> Option<Arc<State>> {
    if s0.mode() != mode {
        return None;
    }
    let mut s1 = s0.edit(edge);
    s1.increment_time_secs(running_secs as i64);
    s1.increment_weight(running_secs as f64);
    s1.make_state()
}

fn wheelchair_boarding(graph: &Graph, stop: VertexId) -> bool {
    matches!(
        graph.get_vertex(stop).map(|v| &v.kind),
        Some(VertexKind::TransitStop { wheelchair_boarding: true })
    )
}

/// A transfer end is step-free unless it is a stop without wheelchair
/// boarding.
fn step_free(graph: &Graph, v: VertexId) -> bool {
    !matches!(
        graph.get_vertex(v).map(|v| &v.kind),
        Some(VertexKind::TransitStop { wheelchair_boarding: false })
    )
}

// ── Transfer ──────────────────────────────────────────────────────────────────

fn traverse_transfer(
    edge:              &Edge,
    distance_m:        f64,
    min_transfer_secs: u32,
    s0:                &Arc<State>,
) -> Option<Arc<State>> {
    if s0.mode() != TraverseMode::Walk || s0.is_renting() {
        return None;
    }
    let ctx = s0.context();
    let prefs = ctx.request.preferences();
    if exceeds_walk_limit(s0.walk_distance_m() + distance_m, prefs) {
        return None;
    }
    if prefs.wheelchair_accessible
        && !(step_free(&ctx.graph, edge.from) && step_free(&ctx.graph, edge.to))
    {
        return None;
    }
    let walk_secs = round_half_up(distance_m / prefs.walk_speed_mps);
    let secs = walk_secs.max(min_transfer_secs as i64);

    let mut s1 = s0.edit(edge);
    s1.increment_walk_distance(distance_m);
    s1.increment_time_secs(secs);
    s1.increment_weight(secs as f64 * prefs.walk_reluctance);
    s1.make_state()
}

// ── Bike rental ───────────────────────────────────────────────────────────────

/// Real-time "walking → riding a rented bicycle".  Forward pickup, or
/// reverse dropoff.
fn take_bicycle(edge: &Edge, s0: &Arc<State>) -> Option<Arc<State>> {
    let ctx = s0.context();
    let prefs = ctx.request.preferences();
    if !prefs.allow_bike_rental || !ctx.request.modes().contains(TraverseMode::Bicycle) {
        return None;
    }
    if s0.is_renting() || s0.mode() != TraverseMode::Walk {
        return None;
    }
    let (secs, cost) = if s0.is_arrive_by() {
        (prefs.bike_rental_dropoff_secs, prefs.bike_rental_dropoff_cost)
    } else {
        (prefs.bike_rental_pickup_secs, prefs.bike_rental_pickup_cost)
    };
    let mut s1 = s0.edit(edge);
    s1.increment_time_secs(secs as i64);
    s1.increment_weight(cost);
    s1.set_mode(TraverseMode::Bicycle);
    s1.set_renting(true);
    s1.make_state()
}

/// Real-time "riding a rented bicycle → walking".  Forward dropoff, or
/// reverse pickup.
fn return_bicycle(edge: &Edge, s0: &Arc<State>) -> Option<Arc<State>> {
    let prefs = s0.context().request.preferences();
    if !s0.is_renting() || s0.mode() != TraverseMode::Bicycle {
        return None;
    }
    let (secs, cost) = if s0.is_arrive_by() {
        (prefs.bike_rental_pickup_secs, prefs.bike_rental_pickup_cost)
    } else {
        (prefs.bike_rental_dropoff_secs, prefs.bike_rental_dropoff_cost)
    };
    let mut s1 = s0.edit(edge);
    s1.increment_time_secs(secs as i64);
    s1.increment_weight(cost);
    s1.set_mode(TraverseMode::Walk);
    s1.set_renting(false);
    s1.make_state()
}

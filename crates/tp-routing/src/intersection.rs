//! Turn penalties at intersections.
//!
//! # Pluggability
//!
//! [`Traverse`](crate::Traverse) consults the context's
//! [`IntersectionTraversalCostModel`] whenever a street edge follows another
//! street edge, so applications can swap in their own turn policy (e.g. a
//! signal-aware model) without touching traversal.
//!
//! # Turn angle
//!
//! The angle is the signed difference between the end bearing of the
//! incoming street and the start bearing of the outgoing one, normalized to
//! `(-180, 180]` with positive values turning right (see
//! [`tp_core::normalize_turn_deg`]).  Both edges are given in real-time
//! order, whatever direction the search runs in.

use tp_core::{normalize_turn_deg, TraverseMode};
use tp_graph::{Edge, Graph, StreetEdge};

use crate::RoutingPreferences;

// ── TurnCost ──────────────────────────────────────────────────────────────────

/// Extra time and weight for one movement through an intersection.
/// Both fields are finite and non-negative.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct TurnCost {
    pub time_secs: f64,
    pub weight:    f64,
}

impl TurnCost {
    pub const ZERO: TurnCost = TurnCost { time_secs: 0.0, weight: 0.0 };

    /// Penalty of `time_secs` seconds, weighted by the request's turn
    /// reluctance.
    pub fn from_secs(time_secs: f64, prefs: &RoutingPreferences) -> Self {
        Self { time_secs, weight: time_secs * prefs.turn_reluctance }
    }
}

/// How a movement through an intersection is classified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TurnKind {
    Straight,
    /// Turn towards the kerb side (right when driving on the right).
    WithTraffic,
    /// Turn across oncoming traffic (left when driving on the right).
    AcrossTraffic,
    UTurn,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Turn-difficulty policy.
///
/// # Contract
///
/// * Returns [`TurnCost::ZERO`] when `incoming` is `None` (start of a path).
/// * Returns [`TurnCost::ZERO`] for colinear edges.
/// * Never fails; the result is always finite and non-negative.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one model is shared by every
/// search thread through [`RoutingContext`](crate::RoutingContext).
pub trait IntersectionTraversalCostModel: Send + Sync {
    fn turn_cost(
        &self,
        graph:    &Graph,
        incoming: Option<&Edge>,
        outgoing: &Edge,
        mode:     TraverseMode,
        prefs:    &RoutingPreferences,
    ) -> TurnCost;
}

/// Both street halves of a movement with a measurable angle, or `None` when
/// there is nothing to penalize.
fn street_pair<'a>(
    incoming: Option<&'a Edge>,
    outgoing: &'a Edge,
) -> Option<(&'a StreetEdge, &'a StreetEdge)> {
    let a = incoming?.as_street()?;
    let b = outgoing.as_street()?;
    // Zero-length links (stop and dock connectors) have no direction.
    if a.length_m <= 0.0 || b.length_m <= 0.0 {
        return None;
    }
    Some((a, b))
}

// ── Simple model ──────────────────────────────────────────────────────────────

/// Angle-band model with fixed per-mode penalties.
///
/// | Mode          | Straight | With traffic | Across traffic | U-turn |
/// |---------------|----------|--------------|----------------|--------|
/// | Car / CMV     | 4 s*     | 8 s          | 20 s           | 30 s   |
/// | Bicycle       | 0 s      | 2 s          | 8 s            | 4 s    |
/// | Walk          | 0 s      | 0 s          | 0 s            | 0 s    |
///
/// \* zero at free-flowing intersections.
///
/// Angles within `colinear_tolerance_deg` of straight are exactly free for
/// every mode.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleIntersectionTraversalCostModel {
    pub drive_on_right:          bool,
    pub colinear_tolerance_deg:  f64,
    /// Half-width of the band still counted as going straight.
    pub straight_band_deg:       f64,
    /// Absolute angle from which a movement counts as a U-turn.
    pub u_turn_deg:              f64,

    pub car_straight_secs:       f64,
    pub car_with_traffic_secs:   f64,
    pub car_across_traffic_secs: f64,
    pub car_u_turn_secs:         f64,

    pub bike_with_traffic_secs:  f64,
    pub bike_across_traffic_secs: f64,
    pub bike_u_turn_secs:        f64,
}

impl Default for SimpleIntersectionTraversalCostModel {
    fn default() -> Self {
        Self {
            drive_on_right:           true,
            colinear_tolerance_deg:   1.0,
            straight_band_deg:        30.0,
            u_turn_deg:               150.0,
            car_straight_secs:        4.0,
            car_with_traffic_secs:    8.0,
            car_across_traffic_secs:  20.0,
            car_u_turn_secs:          30.0,
            bike_with_traffic_secs:   2.0,
            bike_across_traffic_secs: 8.0,
            bike_u_turn_secs:         4.0,
        }
    }
}

impl SimpleIntersectionTraversalCostModel {
    /// Same penalties, mirrored for left-hand traffic.
    pub fn drive_on_left() -> Self {
        Self { drive_on_right: false, ..Self::default() }
    }

    /// Classify a signed turn angle.
    pub fn classify(&self, angle_deg: f64) -> TurnKind {
        let abs = angle_deg.abs();
        if abs <= self.straight_band_deg {
            TurnKind::Straight
        } else if abs >= self.u_turn_deg {
            TurnKind::UTurn
        } else if (angle_deg > 0.0) == self.drive_on_right {
            TurnKind::WithTraffic
        } else {
            TurnKind::AcrossTraffic
        }
    }

    fn penalty_secs(&self, kind: TurnKind, mode: TraverseMode, free_flowing: bool) -> f64 {
        match mode {
            TraverseMode::Car | TraverseMode::CustomMotorVehicle => match kind {
                TurnKind::Straight if free_flowing => 0.0,
                TurnKind::Straight      => self.car_straight_secs,
                TurnKind::WithTraffic   => self.car_with_traffic_secs,
                TurnKind::AcrossTraffic => self.car_across_traffic_secs,
                TurnKind::UTurn         => self.car_u_turn_secs,
            },
            TraverseMode::Bicycle => match kind {
                TurnKind::Straight      => 0.0,
                TurnKind::WithTraffic   => self.bike_with_traffic_secs,
                TurnKind::AcrossTraffic => self.bike_across_traffic_secs,
                TurnKind::UTurn         => self.bike_u_turn_secs,
            },
            _ => 0.0,
        }
    }
}

impl IntersectionTraversalCostModel for SimpleIntersectionTraversalCostModel {
    fn turn_cost(
        &self,
        graph:    &Graph,
        incoming: Option<&Edge>,
        outgoing: &Edge,
        mode:     TraverseMode,
        prefs:    &RoutingPreferences,
    ) -> TurnCost {
        let Some((a, b)) = street_pair(incoming, outgoing) else {
            return TurnCost::ZERO;
        };
        let angle = normalize_turn_deg(a.end_bearing_deg, b.start_bearing_deg);
        if !angle.is_finite() || angle.abs() <= self.colinear_tolerance_deg {
            return TurnCost::ZERO;
        }
        let free_flowing = graph
            .get_vertex(outgoing.from)
            .is_some_and(|v| v.is_free_flowing());
        let secs = self.penalty_secs(self.classify(angle), mode, free_flowing);
        TurnCost::from_secs(secs, prefs)
    }
}

// ── Constant model ────────────────────────────────────────────────────────────

/// The same penalty for every non-colinear street-to-street movement,
/// regardless of mode.  Mostly useful in tests.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantIntersectionTraversalCostModel {
    pub secs:                   f64,
    pub colinear_tolerance_deg: f64,
}

impl ConstantIntersectionTraversalCostModel {
    pub fn new(secs: f64) -> Self {
        Self { secs: secs.max(0.0), colinear_tolerance_deg: 1.0 }
    }
}

impl IntersectionTraversalCostModel for ConstantIntersectionTraversalCostModel {
    fn turn_cost(
        &self,
        _graph:   &Graph,
        incoming: Option<&Edge>,
        outgoing: &Edge,
        _mode:    TraverseMode,
        prefs:    &RoutingPreferences,
    ) -> TurnCost {
        let Some((a, b)) = street_pair(incoming, outgoing) else {
            return TurnCost::ZERO;
        };
        let angle = normalize_turn_deg(a.end_bearing_deg, b.start_bearing_deg);
        if !angle.is_finite() || angle.abs() <= self.colinear_tolerance_deg {
            return TurnCost::ZERO;
        }
        TurnCost::from_secs(self.secs, prefs)
    }
}

//! Directed edges and their closed set of variants.
//!
//! Every edge references its endpoints by `VertexId`; edges never own
//! vertices.  A street that is open in both directions is stored as two
//! independent `Edge`s, each with its own bearings.
//!
//! The behaviour of each variant during a search lives in `tp-routing`
//! (`Traverse for Edge`); this module only holds the immutable data.

use tp_core::{EdgeId, GeoPoint, PatternId, StreetTraversalPermission, TraverseMode, VertexId};

use crate::pattern::Timetable;

// ── Street ────────────────────────────────────────────────────────────────────

/// Default car speed for streets built without an explicit limit, m/s
/// (≈ 40 km/h).
pub const DEFAULT_CAR_SPEED_MPS: f64 = 11.2;

/// A plain street segment.
#[derive(Clone, Debug, PartialEq)]
pub struct StreetEdge {
    pub name:                  String,
    /// Physical length in metres.
    pub length_m:              f64,
    pub permission:            StreetTraversalPermission,
    /// Car speed on this segment in m/s (speed limit or measured speed).
    pub car_speed_mps:         f64,
    pub wheelchair_accessible: bool,
    /// Bearing of the first geometry segment, degrees clockwise from north.
    pub start_bearing_deg:     f64,
    /// Bearing of the last geometry segment.
    pub end_bearing_deg:       f64,
    /// Full polyline including both endpoints.
    pub geometry:              Vec<GeoPoint>,
}

/// Input to [`GraphBuilder::add_street_edge`](crate::GraphBuilder::add_street_edge).
///
/// ```
/// use tp_core::StreetTraversalPermission;
/// use tp_graph::StreetEdgeSpec;
///
/// let spec = StreetEdgeSpec::new("maple", StreetTraversalPermission::ALL)
///     .length_m(120.0)
///     .car_speed_mps(13.4);
/// assert_eq!(spec.length_m, Some(120.0));
/// ```
#[derive(Clone, Debug)]
pub struct StreetEdgeSpec {
    pub name:                  String,
    /// `None` measures the geometry.
    pub length_m:              Option<f64>,
    pub permission:            StreetTraversalPermission,
    pub car_speed_mps:         f64,
    pub wheelchair_accessible: bool,
    /// Intermediate shape points between the two endpoint vertices.
    pub via:                   Vec<GeoPoint>,
}

impl StreetEdgeSpec {
    pub fn new(name: impl Into<String>, permission: StreetTraversalPermission) -> Self {
        Self {
            name:                  name.into(),
            length_m:              None,
            permission,
            car_speed_mps:         DEFAULT_CAR_SPEED_MPS,
            wheelchair_accessible: true,
            via:                   Vec::new(),
        }
    }

    pub fn length_m(mut self, length_m: f64) -> Self {
        self.length_m = Some(length_m);
        self
    }

    pub fn car_speed_mps(mut self, speed: f64) -> Self {
        self.car_speed_mps = speed;
        self
    }

    pub fn wheelchair_accessible(mut self, accessible: bool) -> Self {
        self.wheelchair_accessible = accessible;
        self
    }

    pub fn via(mut self, points: Vec<GeoPoint>) -> Self {
        self.via = points;
        self
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// Variant-specific edge data.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeKind {
    /// Street segment between two intersections (or stop / station links).
    Street(StreetEdge),
    /// Stop → pattern stop: wait for and board the next departure.
    TransitBoard {
        pattern:    PatternId,
        stop_index: u16,
        mode:       TraverseMode,
        departures: Timetable,
    },
    /// Pattern stop → next pattern stop: ride the vehicle.
    TransitHop {
        pattern:      PatternId,
        mode:         TraverseMode,
        running_secs: u32,
    },
    /// Pattern stop → stop: leave the vehicle.
    TransitAlight {
        pattern:    PatternId,
        stop_index: u16,
        mode:       TraverseMode,
        arrivals:   Timetable,
    },
    /// Walking link between two stops.
    Transfer {
        distance_m:        f64,
        min_transfer_secs: u32,
    },
    /// Self-loop on a bike-sharing dock: take a bicycle.
    RentalPickup { network: String },
    /// Self-loop on a bike-sharing dock: return the bicycle.
    RentalDropoff { network: String },
}

/// A directed relation between two vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id:   EdgeId,
    pub from: VertexId,
    pub to:   VertexId,
    pub kind: EdgeKind,
}

impl Edge {
    #[inline]
    pub fn as_street(&self) -> Option<&StreetEdge> {
        match &self.kind {
            EdgeKind::Street(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn is_street(&self) -> bool {
        matches!(self.kind, EdgeKind::Street(_))
    }

    /// Physical length in metres; zero for edges with no extent.
    pub fn distance_m(&self) -> f64 {
        match &self.kind {
            EdgeKind::Street(s) => s.length_m,
            EdgeKind::Transfer { distance_m, .. } => *distance_m,
            _ => 0.0,
        }
    }

    /// Short descriptive name used in logs and itineraries.
    pub fn name(&self) -> &str {
        match &self.kind {
            EdgeKind::Street(s) => &s.name,
            EdgeKind::TransitBoard { .. } => "board",
            EdgeKind::TransitHop { .. } => "ride",
            EdgeKind::TransitAlight { .. } => "alight",
            EdgeKind::Transfer { .. } => "transfer",
            EdgeKind::RentalPickup { network } | EdgeKind::RentalDropoff { network } => network,
        }
    }

    /// `(from, to)` in the order a search running in the given direction
    /// visits them.
    #[inline]
    pub fn endpoints(&self, arrive_by: bool) -> (VertexId, VertexId) {
        if arrive_by { (self.to, self.from) } else { (self.from, self.to) }
    }
}

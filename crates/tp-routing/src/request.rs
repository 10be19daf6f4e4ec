//! Search configuration.
//!
//! A [`RoutingRequest`] is built and validated once against a [`Graph`] by
//! [`RoutingRequestBuilder::build`], then frozen: it has no setters, and a
//! search only ever sees it through a shared [`RoutingContext`].
//!
//! Tunable policy values live in [`RoutingPreferences`], which applications
//! typically load from their own config file (`serde` feature).
//!
//! [`RoutingContext`]: crate::RoutingContext

use log::debug;

use tp_core::{GeoPoint, Instant, TraverseMode, TraverseModeSet, VertexId};
use tp_graph::{Graph, StreetEdge};

use crate::{RequestError, RequestResult};

// ── RoutingPreferences ────────────────────────────────────────────────────────

/// Policy knobs for one search.
///
/// | Field                          | Default | Unit          |
/// |--------------------------------|---------|---------------|
/// | `walk_speed_mps`               | 1.33    | m/s           |
/// | `bike_speed_mps`               | 5.0     | m/s           |
/// | `car_speed_cap_mps`            | 40.0    | m/s           |
/// | `custom_vehicle_speed_mps`     | 11.2    | m/s           |
/// | `walk_reluctance`              | 2.0     | × seconds     |
/// | `wait_reluctance`              | 1.0     | × seconds     |
/// | `turn_reluctance`              | 1.0     | × seconds     |
/// | `board_cost`                   | 600     | weight        |
/// | `transfer_penalty`             | 0       | weight        |
/// | `transfer_slack_secs`          | 120     | s             |
/// | `bike_rental_pickup_secs`      | 60      | s             |
/// | `bike_rental_pickup_cost`      | 120     | weight        |
/// | `bike_rental_dropoff_secs`     | 30      | s             |
/// | `bike_rental_dropoff_cost`     | 30      | weight        |
/// | `allow_bike_walking`           | false   |               |
/// | `allow_bike_rental`            | false   |               |
/// | `max_walk_distance_m`          | None    | m             |
/// | `wheelchair_accessible`        | false   |               |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingPreferences {
    pub walk_speed_mps:           f64,
    pub bike_speed_mps:           f64,
    /// Upper bound applied to each street's own car speed.
    pub car_speed_cap_mps:        f64,
    /// Top speed of `CustomMotorVehicle`; streets slower than this still
    /// limit it.
    pub custom_vehicle_speed_mps: f64,

    /// Multiplier turning walking seconds into weight.
    pub walk_reluctance:          f64,
    /// Multiplier turning seconds spent waiting for a vehicle into weight.
    pub wait_reluctance:          f64,
    /// Multiplier turning turn-penalty seconds into weight.
    pub turn_reluctance:          f64,

    /// Weight added to every boarding.
    pub board_cost:               f64,
    /// Extra weight added to every boarding after the first.
    pub transfer_penalty:         f64,
    /// Minimum seconds between alighting and the next boarding.
    pub transfer_slack_secs:      u32,

    /// Let cyclists push their bicycle along pedestrian-only streets at
    /// walking speed.
    pub allow_bike_walking:       bool,
    pub allow_bike_rental:        bool,
    pub bike_rental_pickup_secs:  u32,
    pub bike_rental_pickup_cost:  f64,
    pub bike_rental_dropoff_secs: u32,
    pub bike_rental_dropoff_cost: f64,

    /// Hard cap on walked metres along a path; `None` is unlimited.
    pub max_walk_distance_m:      Option<f64>,
    /// Only use wheelchair-accessible streets and stops.
    pub wheelchair_accessible:    bool,
}

impl Default for RoutingPreferences {
    fn default() -> Self {
        Self {
            walk_speed_mps:           1.33,
            bike_speed_mps:           5.0,
            car_speed_cap_mps:        40.0,
            custom_vehicle_speed_mps: 11.2,
            walk_reluctance:          2.0,
            wait_reluctance:          1.0,
            turn_reluctance:          1.0,
            board_cost:               600.0,
            transfer_penalty:         0.0,
            transfer_slack_secs:      120,
            allow_bike_walking:       false,
            allow_bike_rental:        false,
            bike_rental_pickup_secs:  60,
            bike_rental_pickup_cost:  120.0,
            bike_rental_dropoff_secs: 30,
            bike_rental_dropoff_cost: 30.0,
            max_walk_distance_m:      None,
            wheelchair_accessible:    false,
        }
    }
}

impl RoutingPreferences {
    /// Check every numeric knob is finite and in range.
    pub fn validate(&self) -> RequestResult<()> {
        let positive = [
            ("walk_speed_mps", self.walk_speed_mps),
            ("bike_speed_mps", self.bike_speed_mps),
            ("car_speed_cap_mps", self.car_speed_cap_mps),
            ("custom_vehicle_speed_mps", self.custom_vehicle_speed_mps),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RequestError::InvalidParameter { name, value });
            }
        }

        let non_negative = [
            ("walk_reluctance", self.walk_reluctance),
            ("wait_reluctance", self.wait_reluctance),
            ("turn_reluctance", self.turn_reluctance),
            ("board_cost", self.board_cost),
            ("transfer_penalty", self.transfer_penalty),
            ("bike_rental_pickup_cost", self.bike_rental_pickup_cost),
            ("bike_rental_dropoff_cost", self.bike_rental_dropoff_cost),
            ("max_walk_distance_m", self.max_walk_distance_m.unwrap_or(0.0)),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(RequestError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

// ── RoutingRequest ────────────────────────────────────────────────────────────

/// A validated, immutable search request.
#[derive(Clone, Debug)]
pub struct RoutingRequest {
    from:      VertexId,
    to:        VertexId,
    date_time: Instant,
    modes:     TraverseModeSet,
    arrive_by: bool,
    prefs:     RoutingPreferences,
}

impl RoutingRequest {
    pub fn builder() -> RoutingRequestBuilder {
        RoutingRequestBuilder::new()
    }

    /// Trip origin (where the traveller starts, in real time).
    #[inline]
    pub fn from(&self) -> VertexId {
        self.from
    }

    /// Trip destination.
    #[inline]
    pub fn to(&self) -> VertexId {
        self.to
    }

    /// Departure time (forward search) or latest arrival time (arrive-by).
    #[inline]
    pub fn date_time(&self) -> Instant {
        self.date_time
    }

    #[inline]
    pub fn time_secs(&self) -> i64 {
        self.date_time.secs()
    }

    #[inline]
    pub fn time_millis(&self) -> i64 {
        self.date_time.millis()
    }

    #[inline]
    pub fn modes(&self) -> TraverseModeSet {
        self.modes
    }

    /// `true` when the search runs backward in time from the destination.
    #[inline]
    pub fn arrive_by(&self) -> bool {
        self.arrive_by
    }

    #[inline]
    pub fn preferences(&self) -> &RoutingPreferences {
        &self.prefs
    }

    /// Mode of the root search state.  Bike-rental trips start on foot.
    pub fn initial_mode(&self) -> TraverseMode {
        if self.prefs.allow_bike_rental {
            return TraverseMode::Walk;
        }
        self.modes.non_transit_mode()
    }

    /// Vertex the search tree is rooted at.
    #[inline]
    pub fn search_origin(&self) -> VertexId {
        if self.arrive_by { self.to } else { self.from }
    }

    /// Vertex the search is looking for.
    #[inline]
    pub fn search_target(&self) -> VertexId {
        if self.arrive_by { self.from } else { self.to }
    }

    /// Speed in m/s of `mode` on `street`.
    pub fn street_speed(&self, mode: TraverseMode, street: &StreetEdge) -> f64 {
        match mode {
            TraverseMode::Bicycle => self.prefs.bike_speed_mps,
            TraverseMode::Car => street.car_speed_mps.min(self.prefs.car_speed_cap_mps),
            TraverseMode::CustomMotorVehicle => {
                street.car_speed_mps.min(self.prefs.custom_vehicle_speed_mps)
            }
            _ => self.prefs.walk_speed_mps,
        }
    }

    /// Multiplier from travel seconds to weight for `mode`.
    #[inline]
    pub fn reluctance(&self, mode: TraverseMode) -> f64 {
        match mode {
            TraverseMode::Walk => self.prefs.walk_reluctance,
            _ => 1.0,
        }
    }
}

// ── RoutingRequestBuilder ─────────────────────────────────────────────────────

/// How an origin or destination is given before validation.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    Vertex(VertexId),
    Label(String),
    /// Snapped to the nearest street or stop vertex.
    Point(GeoPoint),
}

impl Endpoint {
    fn resolve(&self, graph: &Graph) -> RequestResult<VertexId> {
        match self {
            Endpoint::Vertex(v) if graph.contains_vertex(*v) => Ok(*v),
            Endpoint::Vertex(v) => Err(RequestError::VertexNotFound(*v)),
            Endpoint::Label(l) => graph
                .vertex_by_label(l)
                .ok_or_else(|| RequestError::LabelNotFound(l.clone())),
            Endpoint::Point(p) => graph.snap_to_vertex(*p).ok_or(RequestError::NoVertexNear(*p)),
        }
    }
}

/// Fluent builder for [`RoutingRequest`].
///
/// ```rust,ignore
/// let request = RoutingRequest::builder()
///     .from_label("maple_1st")
///     .to_label("maple_2nd")
///     .date_time(Instant::from_secs(1_370_000_000))
///     .mode(TraverseMode::Walk)
///     .build(&graph)?;
/// ```
#[derive(Clone, Debug)]
pub struct RoutingRequestBuilder {
    from:      Option<Endpoint>,
    to:        Option<Endpoint>,
    date_time: Instant,
    modes:     TraverseModeSet,
    arrive_by: bool,
    prefs:     RoutingPreferences,
}

impl Default for RoutingRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingRequestBuilder {
    /// Defaults: walking only, departing at the epoch, default preferences.
    pub fn new() -> Self {
        Self {
            from:      None,
            to:        None,
            date_time: Instant::EPOCH,
            modes:     TraverseModeSet::single(TraverseMode::Walk),
            arrive_by: false,
            prefs:     RoutingPreferences::default(),
        }
    }

    pub fn from(mut self, v: VertexId) -> Self {
        self.from = Some(Endpoint::Vertex(v));
        self
    }

    pub fn to(mut self, v: VertexId) -> Self {
        self.to = Some(Endpoint::Vertex(v));
        self
    }

    pub fn from_label(mut self, label: impl Into<String>) -> Self {
        self.from = Some(Endpoint::Label(label.into()));
        self
    }

    pub fn to_label(mut self, label: impl Into<String>) -> Self {
        self.to = Some(Endpoint::Label(label.into()));
        self
    }

    pub fn from_point(mut self, p: GeoPoint) -> Self {
        self.from = Some(Endpoint::Point(p));
        self
    }

    pub fn to_point(mut self, p: GeoPoint) -> Self {
        self.to = Some(Endpoint::Point(p));
        self
    }

    pub fn date_time(mut self, t: Instant) -> Self {
        self.date_time = t;
        self
    }

    /// Restrict the request to a single mode.
    pub fn mode(mut self, mode: TraverseMode) -> Self {
        self.modes = TraverseModeSet::single(mode);
        self
    }

    pub fn modes(mut self, modes: TraverseModeSet) -> Self {
        self.modes = modes;
        self
    }

    pub fn arrive_by(mut self, arrive_by: bool) -> Self {
        self.arrive_by = arrive_by;
        self
    }

    pub fn preferences(mut self, prefs: RoutingPreferences) -> Self {
        self.prefs = prefs;
        self
    }

    /// Resolve endpoints against `graph` and validate every parameter.
    ///
    /// # Errors
    ///
    /// Any [`RequestError`]: missing or unknown endpoints, an empty mode set,
    /// or an out-of-range preference.
    pub fn build(self, graph: &Graph) -> RequestResult<RoutingRequest> {
        let from = self
            .from
            .as_ref()
            .ok_or(RequestError::MissingEndpoint("origin"))?
            .resolve(graph)?;
        let to = self
            .to
            .as_ref()
            .ok_or(RequestError::MissingEndpoint("destination"))?
            .resolve(graph)?;
        if self.modes.is_empty() {
            return Err(RequestError::EmptyModeSet);
        }
        self.prefs.validate()?;

        debug!(
            "routing request {} -> {} at {} modes={:?} arrive_by={}",
            from, to, self.date_time, self.modes, self.arrive_by
        );

        Ok(RoutingRequest {
            from,
            to,
            date_time: self.date_time,
            modes: self.modes,
            arrive_by: self.arrive_by,
            prefs: self.prefs,
        })
    }
}

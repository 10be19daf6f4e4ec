//! Travel modes and mode sets shared across the graph and routing crates.
//!
//! A [`TraverseMode`] is the means by which a path is currently advancing.
//! Street modes (`Walk`, `Bicycle`, `Car`, `CustomMotorVehicle`) are checked
//! against edge permissions; transit modes are only ever set by boarding a
//! trip pattern.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// The means by which a search state is currently travelling.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TraverseMode {
    /// On foot.
    #[default]
    Walk,
    /// Bicycle (own or rented).
    Bicycle,
    /// Private car.
    Car,
    /// A motor vehicle with its own speed profile that uses car permissions.
    CustomMotorVehicle,
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
}

impl TraverseMode {
    /// Every mode, in bit order of [`TraverseModeSet`].
    pub const ALL: [TraverseMode; 12] = [
        TraverseMode::Walk,
        TraverseMode::Bicycle,
        TraverseMode::Car,
        TraverseMode::CustomMotorVehicle,
        TraverseMode::Tram,
        TraverseMode::Subway,
        TraverseMode::Rail,
        TraverseMode::Bus,
        TraverseMode::Ferry,
        TraverseMode::CableCar,
        TraverseMode::Gondola,
        TraverseMode::Funicular,
    ];

    /// `true` for scheduled public transport modes.
    #[inline]
    pub fn is_transit(self) -> bool {
        !self.is_on_street_non_transit()
    }

    /// `true` for motorised private vehicles.
    #[inline]
    pub fn is_driving(self) -> bool {
        matches!(self, TraverseMode::Car | TraverseMode::CustomMotorVehicle)
    }

    /// `true` for modes that move along street edges under their own power.
    #[inline]
    pub fn is_on_street_non_transit(self) -> bool {
        matches!(
            self,
            TraverseMode::Walk
                | TraverseMode::Bicycle
                | TraverseMode::Car
                | TraverseMode::CustomMotorVehicle
        )
    }

    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Canonical upper-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            TraverseMode::Walk               => "WALK",
            TraverseMode::Bicycle            => "BICYCLE",
            TraverseMode::Car                => "CAR",
            TraverseMode::CustomMotorVehicle => "CUSTOM_MOTOR_VEHICLE",
            TraverseMode::Tram               => "TRAM",
            TraverseMode::Subway             => "SUBWAY",
            TraverseMode::Rail               => "RAIL",
            TraverseMode::Bus                => "BUS",
            TraverseMode::Ferry              => "FERRY",
            TraverseMode::CableCar           => "CABLE_CAR",
            TraverseMode::Gondola            => "GONDOLA",
            TraverseMode::Funicular          => "FUNICULAR",
        }
    }
}

impl fmt::Display for TraverseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraverseMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        TraverseMode::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}

// ── TraverseModeSet ───────────────────────────────────────────────────────────

/// A compact set of [`TraverseMode`]s, one bit per mode.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<TraverseMode>", into = "Vec<TraverseMode>"))]
pub struct TraverseModeSet(u16);

impl TraverseModeSet {
    pub const EMPTY: TraverseModeSet = TraverseModeSet(0);

    pub fn single(mode: TraverseMode) -> Self {
        TraverseModeSet(mode.bit())
    }

    /// Every scheduled transit mode.
    pub fn all_transit() -> Self {
        TraverseMode::ALL.into_iter().filter(|m| m.is_transit()).collect()
    }

    #[inline]
    pub fn contains(self, mode: TraverseMode) -> bool {
        self.0 & mode.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, mode: TraverseMode) {
        self.0 |= mode.bit();
    }

    #[inline]
    pub fn remove(&mut self, mode: TraverseMode) {
        self.0 &= !mode.bit();
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn has_transit(self) -> bool {
        self.iter().any(TraverseMode::is_transit)
    }

    /// The street mode a search starts in.
    ///
    /// Priority: car, custom motor vehicle, bicycle, then walk.  A set with
    /// no street mode (transit only) still starts on foot.
    pub fn non_transit_mode(self) -> TraverseMode {
        [
            TraverseMode::Car,
            TraverseMode::CustomMotorVehicle,
            TraverseMode::Bicycle,
        ]
        .into_iter()
        .find(|&m| self.contains(m))
        .unwrap_or(TraverseMode::Walk)
    }

    pub fn iter(self) -> impl Iterator<Item = TraverseMode> {
        TraverseMode::ALL.into_iter().filter(move |&m| self.contains(m))
    }
}

impl FromIterator<TraverseMode> for TraverseModeSet {
    fn from_iter<I: IntoIterator<Item = TraverseMode>>(iter: I) -> Self {
        let mut set = TraverseModeSet::EMPTY;
        for m in iter {
            set.insert(m);
        }
        set
    }
}

impl From<TraverseMode> for TraverseModeSet {
    fn from(mode: TraverseMode) -> Self {
        TraverseModeSet::single(mode)
    }
}

impl From<Vec<TraverseMode>> for TraverseModeSet {
    fn from(modes: Vec<TraverseMode>) -> Self {
        modes.into_iter().collect()
    }
}

impl From<TraverseModeSet> for Vec<TraverseMode> {
    fn from(set: TraverseModeSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for TraverseModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

//! Trip patterns and the resolved timetables attached to transit edges.
//!
//! A trip pattern is an ordered stop sequence served by trips that all share
//! the same running times between consecutive stops.  Network construction
//! resolves the timetable of every boarding and alighting edge up front, so
//! traversal only does a binary search over sorted instants and never waits
//! on a schedule provider.

use tp_core::{Instant, PatternId, TraverseMode, VertexId};

// ── Timetable ─────────────────────────────────────────────────────────────────

/// Sorted, de-duplicated list of instants at one stop of one pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timetable(Vec<Instant>);

impl Timetable {
    pub fn new(mut times: Vec<Instant>) -> Self {
        times.sort_unstable();
        times.dedup();
        Timetable(times)
    }

    /// Earliest instant at or after `t`.
    #[inline]
    pub fn next_at_or_after(&self, t: Instant) -> Option<Instant> {
        let i = self.0.partition_point(|&x| x < t);
        self.0.get(i).copied()
    }

    /// Latest instant at or before `t`.
    #[inline]
    pub fn last_at_or_before(&self, t: Instant) -> Option<Instant> {
        let i = self.0.partition_point(|&x| x <= t);
        i.checked_sub(1).map(|j| self.0[j])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Instant] {
        &self.0
    }
}

// ── TripPattern ───────────────────────────────────────────────────────────────

/// Input to [`GraphBuilder::add_trip_pattern`](crate::GraphBuilder::add_trip_pattern).
#[derive(Clone, Debug)]
pub struct TripPatternSpec {
    /// Route short name, used in pattern-stop labels and logs.
    pub route:            String,
    pub mode:             TraverseMode,
    /// Street-side `TransitStop` vertices in travel order (at least two).
    pub stops:            Vec<VertexId>,
    /// Departure instants of every trip at the first stop.
    pub first_departures: Vec<Instant>,
    /// Running time between stop `i` and `i + 1`; length `stops.len() - 1`.
    pub running_secs:     Vec<u32>,
}

/// A trip pattern as stored in the graph.
#[derive(Clone, Debug)]
pub struct TripPattern {
    pub id:               PatternId,
    pub route:            String,
    pub mode:             TraverseMode,
    pub stops:            Vec<VertexId>,
    /// On-board vertex for each stop, parallel to `stops`.
    pub pattern_stops:    Vec<VertexId>,
    pub first_departures: Timetable,
    pub running_secs:     Vec<u32>,
}

impl TripPattern {
    /// Seconds from the first stop to stop `stop_index` (no dwell time).
    pub fn offset_secs(&self, stop_index: usize) -> i64 {
        self.running_secs[..stop_index].iter().map(|&s| s as i64).sum()
    }

    /// Timetable at stop `stop_index`: every first-stop departure shifted by
    /// the cumulative running time.  Serves as both the departure and arrival
    /// table since trips do not dwell.
    pub fn times_at(&self, stop_index: usize) -> Timetable {
        let off = self.offset_secs(stop_index);
        Timetable::new(
            self.first_departures
                .as_slice()
                .iter()
                .map(|t| t.plus_secs(off))
                .collect(),
        )
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}

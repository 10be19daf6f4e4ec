//! Graph vertices.

use tp_core::{GeoPoint, PatternId, VertexId};

/// What a vertex represents in the network.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexKind {
    /// A street intersection.  `free_flowing` marks junctions without
    /// conflicting traffic (e.g. a bend in the road split into two segments),
    /// which drivers pass without slowing for a straight-through movement.
    Intersection { free_flowing: bool },
    /// A transit stop on the street side (where passengers wait).
    TransitStop { wheelchair_boarding: bool },
    /// The on-board side of a stop for one trip pattern.
    PatternStop { pattern: PatternId, stop_index: u16 },
    /// A bike-sharing dock.
    BikeRentalStation { capacity: u16 },
}

/// A node of the multimodal graph.  Immutable once the graph is built.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub id:    VertexId,
    /// Unique human-readable identity, e.g. `"maple_1st"` or `"stop:42"`.
    pub label: String,
    pub pos:   GeoPoint,
    pub kind:  VertexKind,
}

impl Vertex {
    #[inline]
    pub fn is_intersection(&self) -> bool {
        matches!(self.kind, VertexKind::Intersection { .. })
    }

    #[inline]
    pub fn is_transit_stop(&self) -> bool {
        matches!(self.kind, VertexKind::TransitStop { .. })
    }

    /// `true` for free-flowing intersections; `false` for every other vertex.
    #[inline]
    pub fn is_free_flowing(&self) -> bool {
        matches!(self.kind, VertexKind::Intersection { free_flowing: true })
    }

    /// Pattern-stop vertices live "inside" vehicles and are not reachable
    /// from a coordinate, so they are kept out of the spatial index.
    #[inline]
    pub fn is_snappable(&self) -> bool {
        !matches!(self.kind, VertexKind::PatternStop { .. })
    }
}

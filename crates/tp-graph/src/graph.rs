//! Graph container and builder.
//!
//! # Data layout
//!
//! Vertices and edges live in `Vec`s indexed by `VertexId` / `EdgeId`, in
//! insertion order, so ids handed out by the builder stay valid after
//! [`GraphBuilder::build`].  Adjacency is stored in **Compressed Sparse Row**
//! form as index arrays, once for outgoing and once for incoming edges:
//!
//! ```text
//! out_adj[ out_start[v] .. out_start[v+1] ]   // EdgeIds leaving v
//! in_adj [ in_start[v]  .. in_start[v+1]  ]   // EdgeIds entering v
//! ```
//!
//! Forward searches expand `out_edges`, arrive-by searches expand `in_edges`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest snappable vertex.
//! Used by request construction to turn coordinates into origin/destination
//! vertices.
//!
//! # Sharing
//!
//! A built `Graph` is never mutated.  Wrap it in an `Arc` and share it across
//! any number of concurrent searches without locking.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use tp_core::{EdgeId, GeoPoint, PatternId, StreetTraversalPermission, VertexId};

use crate::edge::{Edge, EdgeKind, StreetEdge, StreetEdgeSpec};
use crate::pattern::{TripPattern, TripPatternSpec, Timetable};
use crate::vertex::{Vertex, VertexKind};
use crate::{GraphError, GraphResult};

// ── R-tree vertex entry ───────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `VertexId`.
#[derive(Clone)]
struct VertexEntry {
    point: [f64; 2], // [lat, lon]
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-vertex queries within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// The immutable multimodal graph.  Build with [`GraphBuilder`].
pub struct Graph {
    vertices:    Vec<Vertex>,
    edges:       Vec<Edge>,
    patterns:    Vec<TripPattern>,
    labels:      FxHashMap<String, VertexId>,

    out_start:   Vec<u32>,
    out_adj:     Vec<EdgeId>,
    in_start:    Vec<u32>,
    in_adj:      Vec<EdgeId>,

    spatial_idx: RTree<VertexEntry>,
}

impl Graph {
    /// Construct an empty graph with no vertices or edges.
    pub fn empty() -> Self {
        GraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// # Panics
    /// Panics if `id` was not produced by this graph's builder.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    #[inline]
    pub fn get_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    /// # Panics
    /// Panics if `id` was not produced by this graph's builder.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    #[inline]
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        id.index() < self.vertices.len()
    }

    pub fn vertex_by_label(&self, label: &str) -> Option<VertexId> {
        self.labels.get(label).copied()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    pub fn pattern(&self, id: PatternId) -> &TripPattern {
        &self.patterns[id.index()]
    }

    pub fn patterns(&self) -> &[TripPattern] {
        &self.patterns
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// Edges leaving `v`, as a contiguous slice — no heap allocation.
    #[inline]
    pub fn out_edges(&self, v: VertexId) -> &[EdgeId] {
        let start = self.out_start[v.index()] as usize;
        let end   = self.out_start[v.index() + 1] as usize;
        &self.out_adj[start..end]
    }

    /// Edges entering `v`.
    #[inline]
    pub fn in_edges(&self, v: VertexId) -> &[EdgeId] {
        let start = self.in_start[v.index()] as usize;
        let end   = self.in_start[v.index() + 1] as usize;
        &self.in_adj[start..end]
    }

    /// Edges a search in the given direction expands from `v`.
    #[inline]
    pub fn expansion_edges(&self, v: VertexId, arrive_by: bool) -> &[EdgeId] {
        if arrive_by { self.in_edges(v) } else { self.out_edges(v) }
    }

    #[inline]
    pub fn out_degree(&self, v: VertexId) -> usize {
        self.out_edges(v).len()
    }

    #[inline]
    pub fn in_degree(&self, v: VertexId) -> usize {
        self.in_edges(v).len()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest snappable vertex to `pos`; `None` only for an empty index.
    pub fn snap_to_vertex(&self, pos: GeoPoint) -> Option<VertexId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Up to `k` nearest snappable vertices to `pos`, nearest first.
    pub fn k_nearest_vertices(&self, pos: GeoPoint, k: usize) -> Vec<VertexId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`Graph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use tp_core::{GeoPoint, StreetTraversalPermission};
/// use tp_graph::{GraphBuilder, StreetEdgeSpec};
///
/// let mut b = GraphBuilder::new();
/// let a = b.add_intersection("a", GeoPoint::new(45.52, -122.68)).unwrap();
/// let c = b.add_intersection("c", GeoPoint::new(45.53, -122.68)).unwrap();
/// b.add_street_pair(a, c, StreetEdgeSpec::new("main", StreetTraversalPermission::ALL))
///     .unwrap();
/// let g = b.build();
/// assert_eq!(g.vertex_count(), 2);
/// assert_eq!(g.edge_count(), 2); // one directed edge each way
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    vertices: Vec<Vertex>,
    edges:    Vec<Edge>,
    patterns: Vec<TripPattern>,
    labels:   FxHashMap<String, VertexId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of vertices and edges.
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges:    Vec::with_capacity(edges),
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    // ── Vertices ──────────────────────────────────────────────────────────

    /// Add a vertex and return its id (sequential from 0).
    pub fn add_vertex(
        &mut self,
        label: impl Into<String>,
        pos:   GeoPoint,
        kind:  VertexKind,
    ) -> GraphResult<VertexId> {
        let label = label.into();
        if self.labels.contains_key(&label) {
            return Err(GraphError::DuplicateLabel(label));
        }
        let id = VertexId(self.vertices.len() as u32);
        self.labels.insert(label.clone(), id);
        self.vertices.push(Vertex { id, label, pos, kind });
        Ok(id)
    }

    /// Add a regular (signalised / conflicting) street intersection.
    pub fn add_intersection(&mut self, label: impl Into<String>, pos: GeoPoint) -> GraphResult<VertexId> {
        self.add_vertex(label, pos, VertexKind::Intersection { free_flowing: false })
    }

    pub fn add_transit_stop(
        &mut self,
        label:               impl Into<String>,
        pos:                 GeoPoint,
        wheelchair_boarding: bool,
    ) -> GraphResult<VertexId> {
        self.add_vertex(label, pos, VertexKind::TransitStop { wheelchair_boarding })
    }

    /// Add a bike-sharing dock next to `street_vertex`.
    ///
    /// The dock is joined to the street by a zero-length link street in each
    /// direction (pedestrians and bicycles), and carries two self-loop edges:
    /// a pickup (take a bicycle) and a dropoff (return it).
    pub fn add_rental_station(
        &mut self,
        label:         impl Into<String>,
        network:       impl Into<String>,
        street_vertex: VertexId,
        capacity:      u16,
    ) -> GraphResult<VertexId> {
        let pos = self.pos(street_vertex)?;
        let dock = self.add_vertex(label, pos, VertexKind::BikeRentalStation { capacity })?;
        let link = StreetEdgeSpec::new("rental link", StreetTraversalPermission::PEDESTRIAN_AND_BICYCLE)
            .length_m(0.0);
        self.add_street_pair(street_vertex, dock, link)?;

        let network = network.into();
        self.push_edge(dock, dock, EdgeKind::RentalPickup { network: network.clone() });
        self.push_edge(dock, dock, EdgeKind::RentalDropoff { network });
        Ok(dock)
    }

    /// Position of a vertex added earlier.
    pub fn pos(&self, id: VertexId) -> GraphResult<GeoPoint> {
        self.vertices
            .get(id.index())
            .map(|v| v.pos)
            .ok_or(GraphError::VertexNotFound(id))
    }

    // ── Edges ─────────────────────────────────────────────────────────────

    /// Add a **directed** street edge from `from` to `to`.
    ///
    /// Bearings are taken from the first and last geometry segments; with no
    /// `via` points both equal the straight-line bearing between endpoints.
    pub fn add_street_edge(
        &mut self,
        from: VertexId,
        to:   VertexId,
        spec: StreetEdgeSpec,
    ) -> GraphResult<EdgeId> {
        let a = self.pos(from)?;
        let b = self.pos(to)?;

        let mut geometry = Vec::with_capacity(spec.via.len() + 2);
        geometry.push(a);
        geometry.extend(spec.via.iter().copied());
        geometry.push(b);

        let length_m = spec
            .length_m
            .unwrap_or_else(|| geometry.windows(2).map(|w| w[0].distance_m(w[1])).sum());
        if !length_m.is_finite() || length_m < 0.0 {
            return Err(GraphError::InvalidEdge {
                from,
                to,
                reason: format!("length {length_m} m"),
            });
        }
        if !(spec.car_speed_mps.is_finite() && spec.car_speed_mps > 0.0) {
            return Err(GraphError::InvalidEdge {
                from,
                to,
                reason: format!("car speed {} m/s", spec.car_speed_mps),
            });
        }

        let n = geometry.len();
        let start_bearing_deg = geometry[0].bearing_deg(geometry[1]);
        let end_bearing_deg   = geometry[n - 2].bearing_deg(geometry[n - 1]);

        let street = StreetEdge {
            name: spec.name,
            length_m,
            permission: spec.permission,
            car_speed_mps: spec.car_speed_mps,
            wheelchair_accessible: spec.wheelchair_accessible,
            start_bearing_deg,
            end_bearing_deg,
            geometry,
        };
        Ok(self.push_edge(from, to, EdgeKind::Street(street)))
    }

    /// Convenience: add a street open in **both directions**, as two
    /// independent directed edges.  The reverse edge gets the reversed shape.
    pub fn add_street_pair(
        &mut self,
        a:    VertexId,
        b:    VertexId,
        spec: StreetEdgeSpec,
    ) -> GraphResult<(EdgeId, EdgeId)> {
        let mut back = spec.clone();
        back.via.reverse();
        let fwd = self.add_street_edge(a, b, spec)?;
        let rev = self.add_street_edge(b, a, back)?;
        Ok((fwd, rev))
    }

    /// Add a walking transfer between two stops.  `distance_m = None` uses
    /// the straight-line distance.
    pub fn add_transfer(
        &mut self,
        from:              VertexId,
        to:                VertexId,
        distance_m:        Option<f64>,
        min_transfer_secs: u32,
    ) -> GraphResult<EdgeId> {
        let a = self.pos(from)?;
        let b = self.pos(to)?;
        let distance_m = distance_m.unwrap_or_else(|| a.distance_m(b));
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(GraphError::InvalidEdge {
                from,
                to,
                reason: format!("transfer distance {distance_m} m"),
            });
        }
        Ok(self.push_edge(from, to, EdgeKind::Transfer { distance_m, min_transfer_secs }))
    }

    /// Add a trip pattern.  Creates one on-board vertex per stop plus the
    /// board, hop and alight edges connecting them, with resolved timetables.
    pub fn add_trip_pattern(&mut self, spec: TripPatternSpec) -> GraphResult<PatternId> {
        let invalid = |reason: &str| GraphError::InvalidPattern {
            route:  spec.route.clone(),
            reason: reason.to_string(),
        };
        if spec.stops.len() < 2 {
            return Err(invalid("needs at least two stops"));
        }
        if spec.running_secs.len() != spec.stops.len() - 1 {
            return Err(invalid("running_secs must have one entry per stop pair"));
        }
        if !spec.mode.is_transit() {
            return Err(invalid("mode is not a transit mode"));
        }
        if spec.stops.len() > u16::MAX as usize {
            return Err(invalid("too many stops"));
        }
        for &s in &spec.stops {
            let v = self.vertices.get(s.index()).ok_or(GraphError::VertexNotFound(s))?;
            if !v.is_transit_stop() {
                return Err(invalid("stop vertex is not a transit stop"));
            }
        }

        let id = PatternId(self.patterns.len() as u32);
        let mut pattern_stops = Vec::with_capacity(spec.stops.len());
        for (i, &stop) in spec.stops.iter().enumerate() {
            let pos = self.pos(stop)?;
            let label = format!("{}:{}:{}", spec.route, id.0, i);
            pattern_stops.push(self.add_vertex(
                label,
                pos,
                VertexKind::PatternStop { pattern: id, stop_index: i as u16 },
            )?);
        }

        let pattern = TripPattern {
            id,
            route: spec.route,
            mode: spec.mode,
            stops: spec.stops,
            pattern_stops,
            first_departures: Timetable::new(spec.first_departures),
            running_secs: spec.running_secs,
        };

        let last = pattern.stop_count() - 1;
        for i in 0..=last {
            let times = pattern.times_at(i);
            let stop_index = i as u16;
            if i < last {
                self.push_edge(pattern.stops[i], pattern.pattern_stops[i], EdgeKind::TransitBoard {
                    pattern: id,
                    stop_index,
                    mode: pattern.mode,
                    departures: times.clone(),
                });
                self.push_edge(pattern.pattern_stops[i], pattern.pattern_stops[i + 1], EdgeKind::TransitHop {
                    pattern: id,
                    mode: pattern.mode,
                    running_secs: pattern.running_secs[i],
                });
            }
            if i > 0 {
                self.push_edge(pattern.pattern_stops[i], pattern.stops[i], EdgeKind::TransitAlight {
                    pattern: id,
                    stop_index,
                    mode: pattern.mode,
                    arrivals: times,
                });
            }
        }

        log::debug!(
            "added {} pattern {} ({}) with {} stops and {} trips",
            pattern.mode,
            id,
            pattern.route,
            pattern.stop_count(),
            pattern.first_departures.len()
        );
        self.patterns.push(pattern);
        Ok(id)
    }

    fn push_edge(&mut self, from: VertexId, to: VertexId, kind: EdgeKind) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge { id, from, to, kind });
        id
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Consume the builder and produce a [`Graph`].
    ///
    /// Time complexity: O(V + E) for the CSR arrays plus O(V log V) for the
    /// R-tree bulk load.
    pub fn build(self) -> Graph {
        let vertex_count = self.vertices.len();

        let (out_start, out_adj) = csr(vertex_count, &self.edges, |e| e.from);
        let (in_start, in_adj)   = csr(vertex_count, &self.edges, |e| e.to);

        let entries: Vec<VertexEntry> = self
            .vertices
            .iter()
            .filter(|v| v.is_snappable())
            .map(|v| VertexEntry { point: [v.pos.lat, v.pos.lon], id: v.id })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        log::debug!(
            "built graph: {} vertices, {} edges, {} patterns",
            vertex_count,
            self.edges.len(),
            self.patterns.len()
        );

        Graph {
            vertices: self.vertices,
            edges: self.edges,
            patterns: self.patterns,
            labels: self.labels,
            out_start,
            out_adj,
            in_start,
            in_adj,
            spatial_idx,
        }
    }
}

/// Build a CSR row pointer plus edge-id array grouped by `key(edge)`.
/// Within a vertex, edges keep insertion order.
fn csr(vertex_count: usize, edges: &[Edge], key: impl Fn(&Edge) -> VertexId) -> (Vec<u32>, Vec<EdgeId>) {
    let mut start = vec![0u32; vertex_count + 1];
    for e in edges {
        start[key(e).index() + 1] += 1;
    }
    for i in 1..=vertex_count {
        start[i] += start[i - 1];
    }
    debug_assert_eq!(start[vertex_count] as usize, edges.len());

    let mut cursor = start.clone();
    let mut adj = vec![EdgeId::INVALID; edges.len()];
    for e in edges {
        let slot = &mut cursor[key(e).index()];
        adj[*slot as usize] = e.id;
        *slot += 1;
    }
    (start, adj)
}

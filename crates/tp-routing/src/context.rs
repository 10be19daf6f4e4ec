//! Per-search shared context.

use std::fmt;
use std::sync::Arc;

use tp_core::VertexId;
use tp_graph::Graph;

use crate::intersection::{IntersectionTraversalCostModel, SimpleIntersectionTraversalCostModel};
use crate::{RequestError, RequestResult, RoutingRequest};

/// Everything a search run reads but never writes: the graph, the request
/// and the turn-cost policy.
///
/// Every [`State`](crate::State) of a run holds an `Arc` to the same context,
/// so a terminal state alone is enough to reconstruct and interpret a path.
pub struct RoutingContext {
    pub graph:      Arc<Graph>,
    pub request:    RoutingRequest,
    pub cost_model: Arc<dyn IntersectionTraversalCostModel>,
}

impl RoutingContext {
    /// Context with the default [`SimpleIntersectionTraversalCostModel`].
    pub fn new(graph: Arc<Graph>, request: RoutingRequest) -> RequestResult<Arc<Self>> {
        Self::with_cost_model(
            graph,
            request,
            Arc::new(SimpleIntersectionTraversalCostModel::default()),
        )
    }

    /// # Errors
    ///
    /// [`RequestError::VertexNotFound`] if the request was built against a
    /// different graph and its endpoints do not exist in `graph`.
    pub fn with_cost_model(
        graph:      Arc<Graph>,
        request:    RoutingRequest,
        cost_model: Arc<dyn IntersectionTraversalCostModel>,
    ) -> RequestResult<Arc<Self>> {
        for v in [request.from(), request.to()] {
            if !graph.contains_vertex(v) {
                return Err(RequestError::VertexNotFound(v));
            }
        }
        Ok(Arc::new(Self { graph, request, cost_model }))
    }

    /// Root vertex of the search tree.
    #[inline]
    pub fn origin(&self) -> VertexId {
        self.request.search_origin()
    }

    /// Vertex the search stops at.
    #[inline]
    pub fn target(&self) -> VertexId {
        self.request.search_target()
    }

    #[inline]
    pub fn arrive_by(&self) -> bool {
        self.request.arrive_by()
    }
}

impl fmt::Debug for RoutingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingContext")
            .field("vertices", &self.graph.vertex_count())
            .field("edges", &self.graph.edge_count())
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

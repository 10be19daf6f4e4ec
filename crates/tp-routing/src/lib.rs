//! `tp-routing` — the traversal model of the trip planner.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                         |
//! |------------------|------------------------------------------------------------------|
//! | [`request`]      | `RoutingRequest`, `RoutingRequestBuilder`, `RoutingPreferences`  |
//! | [`context`]      | `RoutingContext` — graph + request + cost model, shared per run  |
//! | [`state`]        | `State` (immutable, `Arc`-linked), `StateEditor`                 |
//! | [`traverse`]     | `Traverse` trait, implemented for `tp_graph::Edge`               |
//! | [`intersection`] | `IntersectionTraversalCostModel`, simple and constant models     |
//! | [`path`]         | `GraphPath` — a terminal state's chain in real-time order        |
//! | [`search`]       | `ShortestPathSearch` trait, reference `DijkstraSearch`           |
//! | [`error`]        | `RequestError`, `RoutingError` and their result aliases          |
//!
//! # Search model
//!
//! 1. A [`RoutingRequest`] is built and validated against a graph.
//! 2. A [`RoutingContext`] bundles it with the graph and a turn-cost model.
//! 3. [`State::initial`] roots the search at the origin (the destination in
//!    an arrive-by search).
//! 4. The driver pops the lightest state, calls [`Traverse::traverse`] on
//!    each edge leaving its vertex, and pushes every `Some` result.
//! 5. The first final state popped is turned into a [`GraphPath`].
//!
//! States and edges are never mutated, so one graph serves any number of
//! concurrent searches without locking.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                        |
//! |------------|---------------------------------------------------------------|
//! | `parallel` | `DijkstraSearch` traverses a state's edges on the Rayon pool. |
//! | `serde`    | `RoutingPreferences` (and core types) derive serde traits.    |

pub mod context;
pub mod error;
pub mod intersection;
pub mod path;
pub mod request;
pub mod search;
pub mod state;
pub mod traverse;


pub use context::RoutingContext;
pub use error::{RequestError, RequestResult, RoutingError, RoutingResult};
pub use intersection::{
    ConstantIntersectionTraversalCostModel, IntersectionTraversalCostModel,
    SimpleIntersectionTraversalCostModel, TurnCost, TurnKind,
};
pub use path::GraphPath;
pub use request::{Endpoint, RoutingPreferences, RoutingRequest, RoutingRequestBuilder};
pub use search::{DijkstraSearch, SearchOutcome, ShortestPathSearch};
pub use state::{State, StateEditor};
pub use traverse::{round_half_up, Traverse};

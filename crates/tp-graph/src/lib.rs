//! `tp-graph` — the read-only multimodal graph searched by `tp-routing`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`vertex`]  | `Vertex`, `VertexKind`                                       |
//! | [`edge`]    | `Edge`, `EdgeKind` (street, board, hop, alight, transfer, rental), `StreetEdgeSpec` |
//! | [`pattern`] | `TripPattern`, `TripPatternSpec`, `Timetable`                |
//! | [`graph`]   | `Graph` (CSR out/in adjacency + R-tree), `GraphBuilder`      |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod edge;
pub mod error;
pub mod graph;
pub mod pattern;
pub mod vertex;


pub use edge::{Edge, EdgeKind, StreetEdge, StreetEdgeSpec, DEFAULT_CAR_SPEED_MPS};
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, GraphBuilder};
pub use pattern::{Timetable, TripPattern, TripPatternSpec};
pub use vertex::{Vertex, VertexKind};

//! `tp-core` — foundational types for the trip-planning traversal core.
//!
//! This crate is a dependency of every other `tp-*` crate.  It intentionally
//! has no `tp-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `VertexId`, `EdgeId`, `PatternId`                         |
//! | [`geo`]         | `GeoPoint`, haversine distance, bearings                  |
//! | [`time`]        | `Instant` (epoch seconds / milliseconds)                  |
//! | [`transport`]   | `TraverseMode`, `TraverseModeSet`                         |
//! | [`permission`]  | `StreetTraversalPermission`                               |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod permission;
pub mod time;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, normalize_turn_deg};
pub use ids::{EdgeId, PatternId, VertexId};
pub use permission::StreetTraversalPermission;
pub use time::Instant;
pub use transport::{TraverseMode, TraverseModeSet};

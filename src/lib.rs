//! Exact weighted k-median placement on a line.
//!
//! Given `n` clients on a line, client `i` carrying traffic weight `w[i]`, this
//! crate places `k` servers on client positions so that
//! `Σ w[i] · |i − nearest server|` is minimal.
//!
//! ## Core idea
//! 1. On a line every server in an optimal solution serves a contiguous
//!    segment of clients, and within a segment the best position is the
//!    weighted median. [`SegmentCostTable`] precomputes that cost for all
//!    O(n²) segments.
//! 2. A dynamic program over "first `j` clients served by `t` servers"
//!    combines segment costs into the global optimum in O(k·n²) and is
//!    backtracked into the server positions ([`PlacementTable`]).
//! 3. The same recurrence is a layered DP ([`LayeredProblem`]), so
//!    [`LayeredEngine`] can run it keeping only ≈√k rows alive.
//!
//! ## Quick start
//! ```
//! use line_kmedian::place_servers;
//!
//! let placement = place_servers(3, 1, &[1u64, 1, 1]).unwrap();
//! assert_eq!(placement.min_cost, 2);
//! assert_eq!(placement.servers, vec![1]);
//! ```
//!
//! Client positions are 0-indexed. Ties are broken towards lower indices:
//! the lower weighted median inside a segment and the leftmost split
//! between segments, so results are fully deterministic.
//!
//! ## Features
//! - `tracing` (default): spans and events through the `tracing` crate.
//! - `serde`: `Serialize`/`Deserialize` for [`Placement`], [`Segment`] and
//!   [`Strategy`].
//! - `cli`: the `kserver` binary.

pub mod blocks;
pub mod builder;
pub mod engine;
pub mod error;
pub mod placement;
pub mod segment;
pub mod solver;
pub mod traits;
pub mod weight;

pub use crate::builder::EngineBuilder;
pub use crate::engine::LayeredEngine;
pub use crate::error::PlacementError;
pub use crate::placement::{service_cost, Cut, Placement, PlacementProblem, PlacementTable, Segment};
pub use crate::segment::{SegmentCost, SegmentCostTable};
pub use crate::solver::{place_servers, PlacementSolver, Strategy};
pub use crate::traits::LayeredProblem;
pub use crate::weight::Weight;

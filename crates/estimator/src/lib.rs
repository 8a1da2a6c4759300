//! Mesh analysis and print-cost estimation engine.
//!
//! Synchronous and allocation-light: the server feeds it raw upload bytes on a
//! blocking task and gets back a [`shared::GeometricSummary`] plus a local
//! [`shared::CostBreakdown`]. The only failure that escapes this crate is
//! [`ParseError`]; degenerate geometry is recovered by heuristics inside the
//! analyzer.

mod analyze;
mod cost;
mod error;
pub mod fixtures;
mod mesh;
mod stl;

pub use analyze::{analyze, analyze_payload, GeometryStatus, MeshAnalysis};
pub use cost::estimate_cost;
pub use error::ParseError;
pub use mesh::{BoundingBox, MeshBuffer};
pub use stl::parse_mesh;

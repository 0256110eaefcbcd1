//! Reference data tables: transition matrices, spread curves, LGD defaults
//!
//! Loaded at startup, shared read-only across the simulator, never mutated.

pub mod lgd;
pub mod registry;
pub mod spread_curve;
pub mod transition_matrix;

pub use lgd::Seniority;
pub use registry::{ReferenceData, GLOBAL_DEFAULT_RHO};
pub use spread_curve::SpreadCurve;
pub use transition_matrix::TransitionMatrix;

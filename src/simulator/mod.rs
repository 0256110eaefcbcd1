//! Monte-Carlo simulator: issuer grouping, RNG seeding, revaluation, and
//! the parallel path engine.

pub mod engine;
pub mod issuer_group;
pub mod revaluation;
pub mod rng;

pub use engine::{simulate, CancellationToken, SimulationInputs};
pub use issuer_group::{group_by_issuer, IssuerGroup};

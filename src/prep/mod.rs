//! Data preparation: turn ragged source tables into validated positions.

pub mod aliases;
pub mod diagnostics;
pub mod prepare;

pub use diagnostics::RowDiagnostic;
pub use prepare::{prepare, prepare_all, PrepOutcome, RawRow};

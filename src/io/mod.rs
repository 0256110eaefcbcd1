//! Input ingestion and result output.

pub mod input;
pub mod output;

pub use input::{read_fx_rates, read_position_rows, FxFormat};
pub use output::write_report;

//! Row-level diagnostics for data preparation
//!
//! Records that cannot be repaired are reported here rather than silently
//! dropped or silently defaulted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowDiagnostic {
    /// Zero-based index of the offending row in the input table.
    pub row_index: usize,
    /// Best-effort identifier for the row (issuer/position id if found).
    pub identifier: Option<String>,
    pub reason: String,
}

impl RowDiagnostic {
    pub fn new(row_index: usize, identifier: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            row_index,
            identifier,
            reason: reason.into(),
        }
    }
}

//! Error taxonomy for the IRC engine
//!
//! Input errors surface row-by-row during data preparation and are
//! aggregated into `InvalidRows`. Configuration errors are fatal at load.
//! Runtime errors indicate a broken invariant and abort the run.
//! Cancellation is a distinct outcome, never folded into the error path.

use crate::prep::diagnostics::RowDiagnostic;

#[derive(thiserror::Error, Debug)]
pub enum IrcError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{count} row(s) failed validation")]
    InvalidRows {
        count: usize,
        diagnostics: Vec<RowDiagnostic>,
    },

    #[error("missing FX rate for {from} -> {to}")]
    MissingRate { from: String, to: String },

    #[error("invalid transition matrix '{name}': {reason}")]
    InvalidMatrix { name: String, reason: String },

    #[error("unknown reference currency: {0}")]
    UnknownCurrency(String),

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("run cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type IrcResult<T> = Result<T, IrcError>;

impl IrcError {
    /// Process exit code per the CLI surface's contract: 2 for input-shaped
    /// failures, 1 for everything else. Cancellation is handled separately
    /// by the caller and never reaches this mapping.
    pub fn exit_code(&self) -> i32 {
        match self {
            IrcError::InvalidInput(_)
            | IrcError::InvalidRows { .. }
            | IrcError::MissingRate { .. }
            | IrcError::UnknownCurrency(_) => 2,
            _ => 1,
        }
    }
}

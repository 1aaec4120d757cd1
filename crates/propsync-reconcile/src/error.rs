//! Engine errors.
//!
//! Per-record failures never surface here; they end up in the stage report.
//! Only problems that make the rest of the run meaningless do.

use propsync_sheet::SheetError;
use thiserror::Error;

pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The workbook could not be saved.
    #[error("failed to persist workbook: {0}")]
    Store(#[from] SheetError),

    #[error("no stages requested")]
    NoStages,
}

use attest_core::CheckId;
use attest_report::{ReportError, SealRefused};

/// Orchestration errors.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// The report could not be sealed; it is carried back for inspection.
    #[error("verification refused: {0}")]
    Refused(#[from] SealRefused),

    #[error("check routine for {check} failed: {reason}")]
    Routine { check: CheckId, reason: String },

    #[error("a routine is already registered for check {0}")]
    DuplicateRoutine(CheckId),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),
}

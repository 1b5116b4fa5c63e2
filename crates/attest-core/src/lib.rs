//! Attest Core — Fundamental types shared by the verification report and
//! the orchestrator: the closed check vocabulary, tri-state check outcomes,
//! diagnostic values, and the coverage policy.

pub mod check;
pub mod error;
pub mod policy;
pub mod value;

pub use check::{CheckCategory, CheckId, CheckOutcome, CHECK_COUNT};
pub use error::CoreError;
pub use policy::CoveragePolicy;
pub use value::DiagnosticValue;

//! Attest Report — The aggregated outcome of one attestation attempt.
//!
//! A [`VerificationReport`] starts with every check unevaluated, absorbs
//! failure and pass signals, and is finalized into an immutable
//! [`SealedReport`] carrying the identity-binding fields. Validity is always
//! the AND-fold over the per-check flags.

pub mod collector;
pub mod error;
pub mod observer;
pub mod report;
pub mod sealed;
pub mod view;

pub use collector::{ReportCollector, Signal, SignalSender};
pub use error::{ReportError, SealRefused};
pub use observer::{NoopObserver, ObservedReport, ReportObserver, TracingObserver};
pub use report::{Diagnostic, Transition, VerificationReport};
pub use sealed::{IdentityBinding, SealedReport};
pub use view::ReportView;

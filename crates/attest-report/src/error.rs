use attest_core::{CheckId, CheckOutcome, CoreError, CoveragePolicy, CHECK_COUNT};

use crate::report::VerificationReport;
use crate::view::ReportView;

/// Report lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("report is incomplete, unevaluated checks: {}", format_checks(.0))]
    IncompleteCoverage(Vec<CheckId>),

    #[error("identity binding supplied but the proof check did not pass")]
    UnprovenBinding,

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("report collector is closed")]
    CollectorClosed,

    #[error("report writer task failed: {0}")]
    WriterPanicked(String),

    #[error("malformed report view: {0}")]
    MalformedView(String),
}

fn format_checks(checks: &[CheckId]) -> String {
    checks
        .iter()
        .map(CheckId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A seal that was refused, with the report handed back unchanged.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct SealRefused {
    reason: ReportError,
    policy: CoveragePolicy,
    report: Box<VerificationReport>,
}

impl SealRefused {
    pub(crate) fn new(
        reason: ReportError,
        policy: CoveragePolicy,
        report: VerificationReport,
    ) -> Self {
        Self {
            reason,
            policy,
            report: Box::new(report),
        }
    }

    pub fn reason(&self) -> &ReportError {
        &self.reason
    }

    pub fn policy(&self) -> CoveragePolicy {
        self.policy
    }

    pub fn report(&self) -> &VerificationReport {
        &self.report
    }

    pub fn into_report(self) -> VerificationReport {
        *self.report
    }

    /// Wire form of the refused attempt, always unbound.
    ///
    /// Under [`CoveragePolicy::Strict`] an unevaluated check is emitted as
    /// `false`, so `valid` is `false` whenever coverage was the reason.
    pub fn view(&self) -> ReportView {
        let strict = self.policy == CoveragePolicy::Strict;
        let flags: [bool; CHECK_COUNT] = std::array::from_fn(|i| {
            match self.report.outcome(CheckId::ALL[i]) {
                CheckOutcome::NotEvaluated => !strict,
                outcome => outcome.flag(),
            }
        });
        ReportView::from_flags(flags, None)
    }
}

impl From<SealRefused> for ReportError {
    fn from(refused: SealRefused) -> Self {
        refused.reason
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attest_core::{CheckId, CheckOutcome, CoveragePolicy, DiagnosticValue, CHECK_COUNT};

use crate::error::{ReportError, SealRefused};
use crate::sealed::{IdentityBinding, SealedReport};
use crate::view::ReportView;

/// One recorded failure signal: which check, what was observed, what was
/// expected. Diagnostics are append-only for the life of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Position of this record in the report's diagnostic log.
    pub sequence: u64,
    /// The check that failed.
    pub check: CheckId,
    /// Value observed by the upstream verifier.
    pub actual: DiagnosticValue,
    /// Value the verifier required.
    pub expected: DiagnosticValue,
}

/// Effect of a single signal on a check's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The check moved from not-evaluated to passed.
    Passed,
    /// The check moved to failed for the first time.
    Failed,
    /// The check had already failed; only a diagnostic was appended.
    AlreadyFailed,
    /// The signal did not change the outcome.
    Unchanged,
}

impl Transition {
    /// Whether the signal changed the check's outcome.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// Outcome of the fixed check set for one verification attempt.
///
/// Mutation is limited to recording signals; there is no way to clear a
/// failure. The report performs no I/O of its own: logging is layered on by
/// [`ObservedReport`](crate::ObservedReport).
#[derive(Debug, Clone)]
pub struct VerificationReport {
    attempt: Uuid,
    outcomes: [CheckOutcome; CHECK_COUNT],
    diagnostics: Vec<Diagnostic>,
}

impl VerificationReport {
    /// Create a report with every check not yet evaluated.
    pub fn new() -> Self {
        Self {
            attempt: Uuid::now_v7(),
            outcomes: [CheckOutcome::NotEvaluated; CHECK_COUNT],
            diagnostics: Vec::new(),
        }
    }

    /// Identifier of this verification attempt, for log correlation.
    pub fn attempt(&self) -> Uuid {
        self.attempt
    }

    /// Mark `check` as failed and append a diagnostic.
    pub fn record_failure(
        &mut self,
        check: CheckId,
        actual: impl Into<DiagnosticValue>,
        expected: impl Into<DiagnosticValue>,
    ) -> Transition {
        let slot = &mut self.outcomes[check.index()];
        let transition = if *slot == CheckOutcome::Failed {
            Transition::AlreadyFailed
        } else {
            Transition::Failed
        };
        *slot = slot.on_failure();

        self.diagnostics.push(Diagnostic {
            sequence: self.diagnostics.len() as u64,
            check,
            actual: actual.into(),
            expected: expected.into(),
        });

        transition
    }

    /// Like [`record_failure`](Self::record_failure), but for a check named
    /// at runtime. Unknown names are rejected and leave the report untouched.
    pub fn record_failure_named(
        &mut self,
        name: &str,
        actual: impl Into<DiagnosticValue>,
        expected: impl Into<DiagnosticValue>,
    ) -> Result<Transition, ReportError> {
        let check: CheckId = name.parse()?;
        Ok(self.record_failure(check, actual, expected))
    }

    /// Mark `check` as evaluated and passed. Has no effect on a failed check.
    pub fn record_pass(&mut self, check: CheckId) -> Transition {
        let slot = &mut self.outcomes[check.index()];
        let before = *slot;
        *slot = before.on_pass();
        if before == CheckOutcome::NotEvaluated {
            Transition::Passed
        } else {
            Transition::Unchanged
        }
    }

    pub fn outcome(&self, check: CheckId) -> CheckOutcome {
        self.outcomes[check.index()]
    }

    /// Serialized flag for `check`: `false` only once it has failed.
    pub fn flag(&self, check: CheckId) -> bool {
        self.outcome(check).flag()
    }

    /// Conjunction of every check flag.
    pub fn valid(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::flag)
    }

    pub fn failed_checks(&self) -> Vec<CheckId> {
        self.checks_where(|o| o == CheckOutcome::Failed)
    }

    pub fn unevaluated_checks(&self) -> Vec<CheckId> {
        self.checks_where(|o| o == CheckOutcome::NotEvaluated)
    }

    /// Whether every check has received a verdict.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::is_evaluated)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Serialized view of the current state, with empty identity fields.
    pub fn view(&self) -> ReportView {
        ReportView::new(&self.outcomes, None)
    }

    /// Check whether the report could be sealed with `binding` under `policy`.
    pub fn check_sealable(
        &self,
        binding: Option<&IdentityBinding>,
        policy: CoveragePolicy,
    ) -> Result<(), ReportError> {
        if policy == CoveragePolicy::Strict {
            let missing = self.unevaluated_checks();
            if !missing.is_empty() {
                return Err(ReportError::IncompleteCoverage(missing));
            }
        }
        if binding.is_some() && self.outcome(CheckId::Proof) != CheckOutcome::Passed {
            return Err(ReportError::UnprovenBinding);
        }
        Ok(())
    }

    /// Finalize the report, attaching the identity-binding fields.
    ///
    /// This is the only place the binding is set, and only once the proof
    /// check has passed. Under [`CoveragePolicy::Strict`] every check must
    /// have been evaluated. A refusal returns the report untouched.
    pub fn seal(
        self,
        binding: Option<IdentityBinding>,
        policy: CoveragePolicy,
    ) -> Result<SealedReport, SealRefused> {
        if let Err(reason) = self.check_sealable(binding.as_ref(), policy) {
            return Err(SealRefused::new(reason, policy, self));
        }
        Ok(SealedReport::new(
            self.attempt,
            self.outcomes,
            self.diagnostics,
            binding,
        ))
    }

    fn checks_where(&self, pred: impl Fn(CheckOutcome) -> bool) -> Vec<CheckId> {
        CheckId::ALL
            .iter()
            .copied()
            .filter(|check| pred(self.outcome(*check)))
            .collect()
    }
}

impl Default for VerificationReport {
    fn default() -> Self {
        Self::new()
    }
}

use std::sync::Arc;

use uuid::Uuid;

use attest_core::{CheckId, CoveragePolicy, DiagnosticValue};

use crate::error::{ReportError, SealRefused};
use crate::report::{Diagnostic, Transition, VerificationReport};
use crate::sealed::{IdentityBinding, SealedReport};

/// Side channel notified after each report transition.
///
/// Observers see the result of a transition; they cannot influence it.
pub trait ReportObserver: Send + Sync {
    fn on_failure(&self, _attempt: Uuid, _diagnostic: &Diagnostic, _transition: Transition) {}

    fn on_pass(&self, _attempt: Uuid, _check: CheckId, _transition: Transition) {}

    fn on_sealed(&self, _report: &SealedReport) {}

    fn on_seal_refused(&self, _attempt: Uuid, _error: &ReportError) {}
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReportObserver for NoopObserver {}

/// Emits a `tracing` event for every transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReportObserver for TracingObserver {
    fn on_failure(&self, attempt: Uuid, diagnostic: &Diagnostic, transition: Transition) {
        let repeated = transition == Transition::AlreadyFailed;
        tracing::warn!(
            attempt = %attempt,
            check = %diagnostic.check,
            category = %diagnostic.check.category(),
            actual = %diagnostic.actual,
            expected = %diagnostic.expected,
            repeated,
            "check failed"
        );
    }

    fn on_pass(&self, attempt: Uuid, check: CheckId, transition: Transition) {
        if transition.changed() {
            tracing::debug!(attempt = %attempt, check = %check, "check passed");
        }
    }

    fn on_sealed(&self, report: &SealedReport) {
        let failed = report.failed_checks();
        tracing::info!(
            attempt = %report.attempt(),
            valid = report.valid(),
            failed = failed.len(),
            bound = report.binding().is_some(),
            "verification report sealed"
        );
    }

    fn on_seal_refused(&self, attempt: Uuid, error: &ReportError) {
        tracing::error!(attempt = %attempt, error = %error, "verification report not sealed");
    }
}

impl<O: ReportObserver + ?Sized> ReportObserver for Arc<O> {
    fn on_failure(&self, attempt: Uuid, diagnostic: &Diagnostic, transition: Transition) {
        (**self).on_failure(attempt, diagnostic, transition)
    }

    fn on_pass(&self, attempt: Uuid, check: CheckId, transition: Transition) {
        (**self).on_pass(attempt, check, transition)
    }

    fn on_sealed(&self, report: &SealedReport) {
        (**self).on_sealed(report)
    }

    fn on_seal_refused(&self, attempt: Uuid, error: &ReportError) {
        (**self).on_seal_refused(attempt, error)
    }
}

/// A report with an observer wrapped around its transitions.
///
/// Each call applies the pure transition on the inner report first and only
/// then notifies the observer.
#[derive(Debug)]
pub struct ObservedReport<O> {
    report: VerificationReport,
    observer: O,
}

impl<O: ReportObserver> ObservedReport<O> {
    pub fn new(report: VerificationReport, observer: O) -> Self {
        Self { report, observer }
    }

    pub fn record_failure(
        &mut self,
        check: CheckId,
        actual: impl Into<DiagnosticValue>,
        expected: impl Into<DiagnosticValue>,
    ) -> Transition {
        let transition = self.report.record_failure(check, actual, expected);
        if let Some(diagnostic) = self.report.diagnostics().last() {
            self.observer
                .on_failure(self.report.attempt(), diagnostic, transition);
        }
        transition
    }

    pub fn record_failure_named(
        &mut self,
        name: &str,
        actual: impl Into<DiagnosticValue>,
        expected: impl Into<DiagnosticValue>,
    ) -> Result<Transition, ReportError> {
        let check: CheckId = name.parse()?;
        Ok(self.record_failure(check, actual, expected))
    }

    pub fn record_pass(&mut self, check: CheckId) -> Transition {
        let transition = self.report.record_pass(check);
        self.observer
            .on_pass(self.report.attempt(), check, transition);
        transition
    }

    pub fn report(&self) -> &VerificationReport {
        &self.report
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_inner(self) -> VerificationReport {
        self.report
    }

    /// Seal the inner report and notify the observer of the outcome.
    pub fn seal(
        self,
        binding: Option<IdentityBinding>,
        policy: CoveragePolicy,
    ) -> Result<SealedReport, SealRefused> {
        let attempt = self.report.attempt();
        match self.report.seal(binding, policy) {
            Ok(sealed) => {
                self.observer.on_sealed(&sealed);
                Ok(sealed)
            }
            Err(refused) => {
                self.observer.on_seal_refused(attempt, refused.reason());
                Err(refused)
            }
        }
    }
}

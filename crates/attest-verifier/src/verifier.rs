use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;

use attest_core::{CheckId, CheckOutcome, CoveragePolicy};
use attest_report::{
    ObservedReport, ReportCollector, SealedReport, SignalSender, TracingObserver,
    VerificationReport,
};

use crate::attributes::AttributeChecker;
use crate::error::VerifierError;
use crate::requirements::Requirements;
use crate::routine::CheckRoutine;
use crate::submission::Submission;
use crate::verdict::Verdict;

/// Tunables of an [`AttestationVerifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierOptions {
    /// Treatment of checks nobody evaluated.
    pub policy: CoveragePolicy,
    /// Allowed drift of the proof's current date, in days.
    pub current_date_tolerance_days: i64,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            policy: CoveragePolicy::Strict,
            current_date_tolerance_days: 1,
        }
    }
}

/// Runs every check of one attestation attempt and seals the result.
pub struct AttestationVerifier {
    options: VerifierOptions,
    requirements: Requirements,
    checker: AttributeChecker,
    routines: Vec<Arc<dyn CheckRoutine>>,
}

impl AttestationVerifier {
    pub fn new(options: VerifierOptions, requirements: Requirements) -> Self {
        Self {
            checker: AttributeChecker::new(options.current_date_tolerance_days),
            options,
            requirements,
            routines: Vec::new(),
        }
    }

    /// Register a routine. At most one routine may decide each check.
    pub fn register(&mut self, routine: Arc<dyn CheckRoutine>) -> Result<(), VerifierError> {
        let check = routine.check();
        if self.routines.iter().any(|r| r.check() == check) {
            return Err(VerifierError::DuplicateRoutine(check));
        }
        tracing::debug!(check = %check, "registered check routine");
        self.routines.push(routine);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_routine(
        mut self,
        routine: impl CheckRoutine + 'static,
    ) -> Result<Self, VerifierError> {
        self.register(Arc::new(routine))?;
        Ok(self)
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Checks decided by registered routines.
    pub fn routine_checks(&self) -> Vec<CheckId> {
        self.routines.iter().map(|r| r.check()).collect()
    }

    /// Verify a submission against today's date (UTC).
    pub async fn verify(&self, submission: &Submission) -> Result<SealedReport, VerifierError> {
        self.verify_at(submission, chrono::Utc::now().date_naive()).await
    }

    /// Verify a submission as of `today`.
    ///
    /// Supplied verdicts, routine verdicts, and attribute checks all report
    /// into one collector. The report is read only after the collector has
    /// drained, and the identity binding is attached only if the proof check
    /// passed. A refused seal comes back as [`VerifierError::Refused`] with
    /// the report still attached.
    pub async fn verify_at(
        &self,
        submission: &Submission,
        today: NaiveDate,
    ) -> Result<SealedReport, VerifierError> {
        let report = VerificationReport::new();
        let attempt = report.attempt();
        tracing::info!(
            attempt = %attempt,
            supplied = submission.verdicts.len(),
            routines = self.routines.len(),
            "starting verification"
        );

        let collector = ReportCollector::spawn(ObservedReport::new(report, TracingObserver));
        let tx = collector.sender();

        for (check, verdict) in &submission.verdicts {
            apply(&tx, *check, verdict.clone())?;
        }

        let runs = self.routines.iter().map(|routine| {
            let tx = collector.sender();
            async move {
                let check = routine.check();
                let verdict = match routine.evaluate(submission).await {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        tracing::warn!(
                            attempt = %attempt,
                            check = %check,
                            error = %e,
                            "check routine errored"
                        );
                        Verdict::fail(e.to_string(), "routine verdict")
                    }
                };
                apply(&tx, check, verdict)
            }
        });
        for result in join_all(runs).await {
            result?;
        }

        let disclosures = self
            .checker
            .evaluate(&submission.disclosed, &self.requirements, today);
        for (check, verdict) in disclosures {
            apply(&tx, check, verdict)?;
        }
        drop(tx);

        let observed = collector.finish().await?;

        let binding = match (&submission.identity, observed.report().outcome(CheckId::Proof)) {
            (Some(identity), CheckOutcome::Passed) => Some(identity.clone()),
            (Some(_), outcome) => {
                tracing::warn!(
                    attempt = %attempt,
                    proof = %outcome,
                    "identity binding withheld: proof check did not pass"
                );
                None
            }
            (None, _) => None,
        };

        Ok(observed.seal(binding, self.options.policy)?)
    }
}

fn apply(tx: &SignalSender, check: CheckId, verdict: Verdict) -> Result<(), VerifierError> {
    match verdict {
        Verdict::Pass => tx.pass(check)?,
        Verdict::Fail { actual, expected } => tx.fail(check, actual, expected)?,
    }
    Ok(())
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attest_core::{CheckId, CheckOutcome, CHECK_COUNT};

use crate::report::Diagnostic;
use crate::view::ReportView;

/// Identity-binding values derived by the proof system.
///
/// Both fields are opaque: they are stored and emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityBinding {
    /// Stable identifier of the verified subject.
    pub user_identifier: String,
    /// One-time value marking this use of the attestation.
    pub nullifier: String,
}

impl IdentityBinding {
    pub fn new(user_identifier: impl Into<String>, nullifier: impl Into<String>) -> Self {
        Self {
            user_identifier: user_identifier.into(),
            nullifier: nullifier.into(),
        }
    }
}

/// A finalized, read-only verification report.
#[derive(Debug, Clone)]
pub struct SealedReport {
    attempt: Uuid,
    outcomes: [CheckOutcome; CHECK_COUNT],
    diagnostics: Vec<Diagnostic>,
    binding: Option<IdentityBinding>,
}

impl SealedReport {
    pub(crate) fn new(
        attempt: Uuid,
        outcomes: [CheckOutcome; CHECK_COUNT],
        diagnostics: Vec<Diagnostic>,
        binding: Option<IdentityBinding>,
    ) -> Self {
        Self {
            attempt,
            outcomes,
            diagnostics,
            binding,
        }
    }

    pub fn attempt(&self) -> Uuid {
        self.attempt
    }

    pub fn outcome(&self, check: CheckId) -> CheckOutcome {
        self.outcomes[check.index()]
    }

    pub fn flag(&self, check: CheckId) -> bool {
        self.outcome(check).flag()
    }

    /// Conjunction of every check flag.
    pub fn valid(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::flag)
    }

    pub fn failed_checks(&self) -> Vec<CheckId> {
        CheckId::ALL
            .iter()
            .copied()
            .filter(|check| !self.flag(*check))
            .collect()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics recorded for one check, in the order they were reported.
    pub fn diagnostics_for(&self, check: CheckId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.check == check)
    }

    pub fn binding(&self) -> Option<&IdentityBinding> {
        self.binding.as_ref()
    }

    /// Bound user identifier, or `""` when the report was sealed unbound.
    pub fn user_identifier(&self) -> &str {
        self.binding
            .as_ref()
            .map(|b| b.user_identifier.as_str())
            .unwrap_or("")
    }

    /// Bound nullifier, or `""` when the report was sealed unbound.
    pub fn nullifier(&self) -> &str {
        self.binding
            .as_ref()
            .map(|b| b.nullifier.as_str())
            .unwrap_or("")
    }

    pub fn view(&self) -> ReportView {
        ReportView::new(&self.outcomes, self.binding.as_ref())
    }

    /// Compact JSON form of the report.
    pub fn to_json(&self) -> String {
        self.view().to_json()
    }

    pub fn to_json_pretty(&self) -> String {
        self.view().to_json_pretty()
    }
}

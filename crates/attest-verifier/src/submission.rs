use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use attest_core::CheckId;
use attest_report::IdentityBinding;

use crate::error::VerifierError;
use crate::verdict::Verdict;

/// Attribute values revealed by the proof's public signals.
///
/// Every field is optional: a proof only discloses what the holder chose to
/// reveal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosedAttributes {
    pub scope: Option<String>,
    pub attestation_id: Option<String>,
    /// Date the proof was generated for.
    pub current_date: Option<NaiveDate>,
    pub issuing_state: Option<String>,
    pub name: Option<String>,
    pub passport_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub expiry_date: Option<String>,
    /// Minimum age the proof attests to.
    pub older_than: Option<u32>,
    /// Address the attestation is bound to.
    pub owner_of: Option<String>,
    /// Country codes the proof attests the holder is not a national of.
    pub forbidden_countries_list: Option<Vec<String>>,
}

/// Everything an orchestrator receives for one verification attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Submission {
    /// Verdicts already produced by external verifiers, keyed by check.
    pub verdicts: BTreeMap<CheckId, Verdict>,
    pub disclosed: DisclosedAttributes,
    /// Identity-binding values derived by the proof system.
    pub identity: Option<IdentityBinding>,
}

impl Submission {
    /// Parse a submission from JSON.
    pub fn from_json(json: &str) -> Result<Self, VerifierError> {
        serde_json::from_str(json).map_err(|e| VerifierError::InvalidSubmission(e.to_string()))
    }

    pub fn with_verdict(mut self, check: CheckId, verdict: Verdict) -> Self {
        self.verdicts.insert(check, verdict);
        self
    }

    pub fn with_disclosed(mut self, disclosed: DisclosedAttributes) -> Self {
        self.disclosed = disclosed;
        self
    }

    pub fn with_identity(mut self, identity: IdentityBinding) -> Self {
        self.identity = Some(identity);
        self
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of checks in the fixed vocabulary.
pub const CHECK_COUNT: usize = 21;

/// One independently evaluable verification predicate.
///
/// The set is closed: every report carries exactly these checks, and the
/// serialized field name of each is its wire name (see [`CheckId::as_str`]).
/// Declaration order is the vocabulary order used for serialization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    /// Scope bound into the proof matches the verifier's scope.
    Scope,
    /// Commitment root the proof was generated against is a known root.
    MerkleRootCommitment,
    /// CSCA registry root is a known root.
    MerkleRootCsca,
    /// Attestation id disclosed by the proof matches the expected one.
    AttestationId,
    /// Date bound into the proof is close enough to today.
    CurrentDate,
    IssuingState,
    Name,
    PassportNumber,
    Nationality,
    DateOfBirth,
    Gender,
    ExpiryDate,
    OlderThan,
    OwnerOf,
    BlindedDscCommitment,
    Proof,
    #[serde(rename = "dscProof")]
    DscProof,
    Dsc,
    #[serde(rename = "pubKey")]
    PubKey,
    Ofac,
    ForbiddenCountriesList,
}

impl CheckId {
    /// Every check, in vocabulary order.
    pub const ALL: [CheckId; CHECK_COUNT] = [
        Self::Scope,
        Self::MerkleRootCommitment,
        Self::MerkleRootCsca,
        Self::AttestationId,
        Self::CurrentDate,
        Self::IssuingState,
        Self::Name,
        Self::PassportNumber,
        Self::Nationality,
        Self::DateOfBirth,
        Self::Gender,
        Self::ExpiryDate,
        Self::OlderThan,
        Self::OwnerOf,
        Self::BlindedDscCommitment,
        Self::Proof,
        Self::DscProof,
        Self::Dsc,
        Self::PubKey,
        Self::Ofac,
        Self::ForbiddenCountriesList,
    ];

    /// Stable wire name, used both in logs and as the serialized field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scope => "scope",
            Self::MerkleRootCommitment => "merkle_root_commitment",
            Self::MerkleRootCsca => "merkle_root_csca",
            Self::AttestationId => "attestation_id",
            Self::CurrentDate => "current_date",
            Self::IssuingState => "issuing_state",
            Self::Name => "name",
            Self::PassportNumber => "passport_number",
            Self::Nationality => "nationality",
            Self::DateOfBirth => "date_of_birth",
            Self::Gender => "gender",
            Self::ExpiryDate => "expiry_date",
            Self::OlderThan => "older_than",
            Self::OwnerOf => "owner_of",
            Self::BlindedDscCommitment => "blinded_dsc_commitment",
            Self::Proof => "proof",
            Self::DscProof => "dscProof",
            Self::Dsc => "dsc",
            Self::PubKey => "pubKey",
            Self::Ofac => "ofac",
            Self::ForbiddenCountriesList => "forbidden_countries_list",
        }
    }

    /// Position of this check in [`CheckId::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Which family of verifier produces this check's verdict.
    pub fn category(&self) -> CheckCategory {
        match self {
            Self::Scope | Self::AttestationId | Self::CurrentDate | Self::OwnerOf => {
                CheckCategory::Binding
            }
            Self::MerkleRootCommitment | Self::MerkleRootCsca => CheckCategory::Registry,
            Self::BlindedDscCommitment | Self::DscProof | Self::Dsc | Self::PubKey => {
                CheckCategory::Certificate
            }
            Self::IssuingState
            | Self::Name
            | Self::PassportNumber
            | Self::Nationality
            | Self::DateOfBirth
            | Self::Gender
            | Self::ExpiryDate
            | Self::OlderThan => CheckCategory::Disclosure,
            Self::Proof => CheckCategory::Proof,
            Self::Ofac | Self::ForbiddenCountriesList => CheckCategory::Sanctions,
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|check| check.as_str() == s)
            .ok_or_else(|| CoreError::UnknownCheck(s.to_string()))
    }
}

/// Grouping of checks by the kind of upstream verifier that decides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckCategory {
    /// Values bound into the proof by the verifier (scope, dates, owner).
    Binding,
    /// Membership in a commitment registry.
    Registry,
    /// Document signing certificate chain.
    Certificate,
    /// Selectively disclosed passport attributes.
    Disclosure,
    /// The zero-knowledge proof itself.
    Proof,
    /// Sanctions and denylist screening.
    Sanctions,
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binding => write!(f, "binding"),
            Self::Registry => write!(f, "registry"),
            Self::Certificate => write!(f, "certificate"),
            Self::Disclosure => write!(f, "disclosure"),
            Self::Proof => write!(f, "proof"),
            Self::Sanctions => write!(f, "sanctions"),
        }
    }
}

/// Result of a single check within one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// No verdict has been recorded yet.
    #[default]
    NotEvaluated,
    /// The check was evaluated and passed.
    Passed,
    /// The check failed. Absorbing: no later signal moves it back.
    Failed,
}

impl CheckOutcome {
    /// The serialized boolean. Only `Failed` maps to `false`.
    pub fn flag(&self) -> bool {
        !matches!(self, Self::Failed)
    }

    pub fn is_evaluated(&self) -> bool {
        !matches!(self, Self::NotEvaluated)
    }

    /// Outcome after a pass signal.
    pub fn on_pass(self) -> Self {
        match self {
            Self::NotEvaluated | Self::Passed => Self::Passed,
            Self::Failed => Self::Failed,
        }
    }

    /// Outcome after a failure signal.
    pub fn on_failure(self) -> Self {
        Self::Failed
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEvaluated => write!(f, "not_evaluated"),
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

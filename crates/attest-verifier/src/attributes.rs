use chrono::NaiveDate;

use attest_core::{CheckId, DiagnosticValue};

use crate::requirements::Requirements;
use crate::submission::DisclosedAttributes;
use crate::verdict::Verdict;

/// Compares disclosed attributes against the verifier's requirements.
///
/// Purely a consistency check over public signals: nothing here verifies
/// that the values are actually backed by the proof.
#[derive(Debug, Clone)]
pub struct AttributeChecker {
    /// How many days the proof's current date may differ from today.
    current_date_tolerance_days: i64,
}

impl AttributeChecker {
    pub fn new(current_date_tolerance_days: i64) -> Self {
        Self {
            current_date_tolerance_days: current_date_tolerance_days.max(0),
        }
    }

    /// Checks decided by this checker, in vocabulary order.
    pub const CHECKS: [CheckId; 13] = [
        CheckId::Scope,
        CheckId::AttestationId,
        CheckId::CurrentDate,
        CheckId::IssuingState,
        CheckId::Name,
        CheckId::PassportNumber,
        CheckId::Nationality,
        CheckId::DateOfBirth,
        CheckId::Gender,
        CheckId::ExpiryDate,
        CheckId::OlderThan,
        CheckId::OwnerOf,
        CheckId::ForbiddenCountriesList,
    ];

    /// One verdict per entry of [`AttributeChecker::CHECKS`].
    pub fn evaluate(
        &self,
        disclosed: &DisclosedAttributes,
        requirements: &Requirements,
        today: NaiveDate,
    ) -> Vec<(CheckId, Verdict)> {
        let d = disclosed;
        let r = requirements;
        vec![
            (CheckId::Scope, text_eq(&d.scope, &r.scope)),
            (
                CheckId::AttestationId,
                text_eq(&d.attestation_id, &r.attestation_id),
            ),
            (
                CheckId::CurrentDate,
                self.current_date(d.current_date, r.require_current_date, today),
            ),
            (
                CheckId::IssuingState,
                text_eq(&d.issuing_state, &r.issuing_state),
            ),
            (CheckId::Name, text_eq(&d.name, &r.name)),
            (
                CheckId::PassportNumber,
                text_eq(&d.passport_number, &r.passport_number),
            ),
            (CheckId::Nationality, text_eq(&d.nationality, &r.nationality)),
            (
                CheckId::DateOfBirth,
                text_eq(&d.date_of_birth, &r.date_of_birth),
            ),
            (CheckId::Gender, text_eq(&d.gender, &r.gender)),
            (CheckId::ExpiryDate, text_eq(&d.expiry_date, &r.expiry_date)),
            (CheckId::OlderThan, older_than(d.older_than, r.minimum_age)),
            (CheckId::OwnerOf, text_eq(&d.owner_of, &r.owner_of)),
            (
                CheckId::ForbiddenCountriesList,
                forbidden_countries(
                    d.forbidden_countries_list.as_deref(),
                    &r.forbidden_countries,
                ),
            ),
        ]
    }

    fn current_date(
        &self,
        disclosed: Option<NaiveDate>,
        required: bool,
        today: NaiveDate,
    ) -> Verdict {
        if !required {
            return Verdict::Pass;
        }
        match disclosed {
            None => Verdict::fail(DiagnosticValue::Empty, today),
            Some(date) => {
                let drift = (date - today).num_days().abs();
                Verdict::ensure(drift <= self.current_date_tolerance_days, date, today)
            }
        }
    }
}

impl Default for AttributeChecker {
    fn default() -> Self {
        Self::new(1)
    }
}

fn text_eq(disclosed: &Option<String>, required: &Option<String>) -> Verdict {
    match (disclosed, required) {
        (_, None) => Verdict::Pass,
        (None, Some(expected)) => Verdict::fail(DiagnosticValue::Empty, expected.as_str()),
        (Some(actual), Some(expected)) => Verdict::expect_eq(actual.as_str(), expected.as_str()),
    }
}

fn older_than(disclosed: Option<u32>, minimum: Option<u32>) -> Verdict {
    match (disclosed, minimum) {
        (_, None) => Verdict::Pass,
        (None, Some(min)) => Verdict::fail(DiagnosticValue::Empty, min),
        (Some(age), Some(min)) => Verdict::ensure(age >= min, age, min),
    }
}

fn forbidden_countries(disclosed: Option<&[String]>, required: &[String]) -> Verdict {
    if required.is_empty() {
        return Verdict::Pass;
    }
    let expected = DiagnosticValue::List(required.to_vec());
    match disclosed {
        None => Verdict::fail(DiagnosticValue::Empty, expected),
        Some(list) => {
            let covered = required.iter().all(|c| list.contains(c));
            Verdict::ensure(covered, DiagnosticValue::List(list.to_vec()), expected)
        }
    }
}

//! Integration test: Report lifecycle from construction to serialized output.
//!
//! Exercises attest-report on top of attest-core: fresh reports, failure
//! signals, identity binding at seal time, and the exact wire form.

use attest_core::{CheckId, CheckOutcome, CoveragePolicy, DiagnosticValue, CHECK_COUNT};
use attest_report::{IdentityBinding, ReportError, ReportView, Transition, VerificationReport};
use serde_json::Value;

/// Wire form of a report on which nothing has failed and nothing is bound.
const FRESH_JSON: &str = concat!(
    r#"{"scope":true,"merkle_root_commitment":true,"merkle_root_csca":true,"#,
    r#""attestation_id":true,"current_date":true,"issuing_state":true,"name":true,"#,
    r#""passport_number":true,"nationality":true,"date_of_birth":true,"gender":true,"#,
    r#""expiry_date":true,"older_than":true,"owner_of":true,"blinded_dsc_commitment":true,"#,
    r#""proof":true,"dscProof":true,"dsc":true,"pubKey":true,"ofac":true,"#,
    r#""forbidden_countries_list":true,"valid":true,"user_identifier":"","nullifier":""}"#
);

fn parse(json: &str) -> serde_json::Map<String, Value> {
    match serde_json::from_str::<Value>(json).unwrap() {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn false_flags(map: &serde_json::Map<String, Value>) -> Vec<String> {
    map.iter()
        .filter(|(_, v)| **v == Value::Bool(false))
        .map(|(k, _)| k.clone())
        .collect()
}

// =========================================================================
// Fresh report
// =========================================================================

#[test]
fn test_fresh_report_serializes_all_true() {
    let report = VerificationReport::new();
    assert_eq!(report.view().to_json(), FRESH_JSON);

    let map = parse(&report.view().to_json());
    assert_eq!(map.len(), CHECK_COUNT + 3);
    assert_eq!(map["valid"], Value::Bool(true));
    assert_eq!(map["user_identifier"], Value::String(String::new()));
    assert_eq!(map["nullifier"], Value::String(String::new()));
}

#[test]
fn test_wire_keys_follow_vocabulary_order() {
    let map = parse(&VerificationReport::new().view().to_json());
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    let mut expected: Vec<&str> = CheckId::ALL.iter().map(CheckId::as_str).collect();
    expected.extend(["valid", "user_identifier", "nullifier"]);
    assert_eq!(keys, expected);
}

// =========================================================================
// Failure signals
// =========================================================================

#[test]
fn test_single_failure_flips_only_that_flag() {
    let mut report = VerificationReport::new();
    report.record_failure(CheckId::Proof, "0x00", "0x01");

    assert!(!report.flag(CheckId::Proof));
    assert!(!report.valid());

    let map = parse(&report.view().to_json());
    assert_eq!(false_flags(&map), vec!["proof", "valid"]);
}

#[test]
fn test_second_failure_accumulates() {
    let mut report = VerificationReport::new();
    report.record_failure(CheckId::Proof, "0x00", "0x01");
    report.record_failure(CheckId::Ofac, "listed", "clear");

    assert_eq!(report.failed_checks(), vec![CheckId::Proof, CheckId::Ofac]);
    let map = parse(&report.view().to_json());
    assert_eq!(false_flags(&map), vec!["proof", "ofac", "valid"]);
    let still_true = map.values().filter(|v| **v == Value::Bool(true)).count();
    assert_eq!(still_true, 19);
}

#[test]
fn test_repeated_failure_is_idempotent() {
    let mut once = VerificationReport::new();
    once.record_failure(CheckId::MerkleRootCsca, "0xaa", "0xbb");

    let mut twice = VerificationReport::new();
    let first = twice.record_failure(CheckId::MerkleRootCsca, "0xaa", "0xbb");
    let second = twice.record_failure(CheckId::MerkleRootCsca, 7i64, DiagnosticValue::Empty);
    assert_eq!(first, Transition::Failed);
    assert_eq!(second, Transition::AlreadyFailed);

    assert_eq!(once.view(), twice.view());
    assert_eq!(twice.failed_checks(), vec![CheckId::MerkleRootCsca]);
    // Both calls are kept as diagnostics.
    assert_eq!(twice.diagnostics().len(), 2);
    assert_eq!(twice.diagnostics()[1].actual, DiagnosticValue::Integer(7));
}

#[test]
fn test_failure_after_pass_sticks() {
    let mut report = VerificationReport::new();
    report.record_pass(CheckId::Dsc);
    report.record_failure(CheckId::Dsc, "expired", "valid");
    report.record_pass(CheckId::Dsc);
    assert_eq!(report.outcome(CheckId::Dsc), CheckOutcome::Failed);
    assert!(!report.valid());
}

#[test]
fn test_unknown_check_name_leaves_report_untouched() {
    let mut report = VerificationReport::new();
    let err = report
        .record_failure_named("passport_photo", "x", "y")
        .unwrap_err();
    assert!(err.to_string().contains("passport_photo"));
    assert!(report.valid());
    assert!(report.diagnostics().is_empty());

    let transition = report.record_failure_named("dscProof", "x", "y").unwrap();
    assert_eq!(transition, Transition::Failed);
    assert!(!report.flag(CheckId::DscProof));
}

#[test]
fn test_serialization_is_stable() {
    let mut report = VerificationReport::new();
    report.record_failure(CheckId::Gender, "F", "M");
    assert_eq!(report.view().to_json(), report.view().to_json());
}

// =========================================================================
// Sealing and identity binding
// =========================================================================

#[test]
fn test_identity_fields_pass_through_verbatim() {
    let mut report = VerificationReport::new();
    report.record_pass(CheckId::Proof);
    let sealed = report
        .seal(
            Some(IdentityBinding::new("abc123", "n-001")),
            CoveragePolicy::Lenient,
        )
        .unwrap();

    let map = parse(&sealed.to_json());
    assert_eq!(map["user_identifier"], Value::String("abc123".into()));
    assert_eq!(map["nullifier"], Value::String("n-001".into()));
    assert_eq!(map["valid"], Value::Bool(true));
}

#[test]
fn test_identity_values_are_not_normalized() {
    let odd = "  0xABC\u{00e9}\n";
    let mut report = VerificationReport::new();
    report.record_pass(CheckId::Proof);
    let sealed = report
        .seal(Some(IdentityBinding::new(odd, "")), CoveragePolicy::Lenient)
        .unwrap();
    let back = ReportView::from_json(&sealed.to_json()).unwrap();
    assert_eq!(back.user_identifier(), odd);
    assert_eq!(back.nullifier(), "");
}

#[test]
fn test_strict_seal_requires_full_coverage() {
    let mut report = VerificationReport::new();
    for check in CheckId::ALL {
        if check != CheckId::Ofac && check != CheckId::Dsc {
            report.record_pass(check);
        }
    }
    let refused = report.clone().seal(None, CoveragePolicy::Strict).unwrap_err();
    assert_eq!(
        refused.reason(),
        &ReportError::IncompleteCoverage(vec![CheckId::Dsc, CheckId::Ofac])
    );

    report.record_pass(CheckId::Dsc);
    report.record_failure(CheckId::Ofac, "listed", "clear");
    let sealed = report.seal(None, CoveragePolicy::Strict).unwrap();
    assert!(!sealed.valid());
}

#[test]
fn test_binding_refused_when_proof_failed() {
    let mut report = VerificationReport::new();
    report.record_failure(CheckId::Proof, "0x00", "0x01");
    let err = report
        .seal(
            Some(IdentityBinding::new("abc123", "n-001")),
            CoveragePolicy::Lenient,
        )
        .unwrap_err();
    assert_eq!(err.reason(), &ReportError::UnprovenBinding);
    // The failure is still there to be reported.
    assert!(!err.view().flag(CheckId::Proof));
}

#[test]
fn test_binding_refused_before_proof_evaluated() {
    let refused = VerificationReport::new()
        .seal(
            Some(IdentityBinding::new("abc123", "n-001")),
            CoveragePolicy::Lenient,
        )
        .unwrap_err();
    assert_eq!(refused.reason(), &ReportError::UnprovenBinding);
    assert_eq!(refused.view().user_identifier(), "");
}

#[test]
fn test_strict_refusal_serializes_failures() {
    let mut report = VerificationReport::new();
    report.record_failure(CheckId::Proof, "0x00", "0x01");
    let refused = report.seal(None, CoveragePolicy::Strict).unwrap_err();

    let map = parse(&refused.view().to_json());
    assert_eq!(map["proof"], Value::Bool(false));
    assert_eq!(map["valid"], Value::Bool(false));
    // Nothing else was evaluated, so every other check is reported false too.
    assert_eq!(false_flags(&map).len(), CHECK_COUNT + 1);
    assert_eq!(refused.report().diagnostics()[0].actual, DiagnosticValue::text("0x00"));
}

#[test]
fn test_duplicate_key_rejected() {
    let repeated = FRESH_JSON.replacen(r#""proof":true,"#, r#""proof":false,"proof":true,"#, 1);
    assert!(matches!(
        ReportView::from_json(&repeated),
        Err(ReportError::MalformedView(_))
    ));
}

#[test]
fn test_sealed_output_roundtrips_through_view() {
    let mut report = VerificationReport::new();
    report.record_failure(CheckId::ForbiddenCountriesList, "[]", "[IRN]");
    let sealed = report.seal(None, CoveragePolicy::Lenient).unwrap();

    let view = ReportView::from_json(&sealed.to_json_pretty()).unwrap();
    assert_eq!(view, sealed.view());
    assert!(!view.flag(CheckId::ForbiddenCountriesList));
    assert!(!view.valid());
}

#[test]
fn test_tampered_valid_field_rejected() {
    let mut map = parse(FRESH_JSON);
    map.insert("proof".into(), Value::Bool(false));
    let tampered = Value::Object(map).to_string();
    assert!(matches!(
        ReportView::from_json(&tampered),
        Err(ReportError::MalformedView(_))
    ));
}

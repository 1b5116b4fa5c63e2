//! Integration test: End-to-end verification of a submission.
//!
//! Drives attest-verifier with async check routines, precomputed verdicts
//! and disclosed attributes, and inspects the sealed attest-report output.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use attest_core::{CheckId, CheckOutcome, CoveragePolicy, DiagnosticValue};
use attest_report::{IdentityBinding, NoopObserver, ObservedReport, ReportCollector, VerificationReport};
use attest_verifier::{
    AttestationVerifier, CheckRoutine, Requirements, Submission, Verdict, VerifierError,
    VerifierOptions,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

/// A routine that answers after a delay, standing in for a remote verifier.
struct DelayedRoutine {
    check: CheckId,
    delay: Duration,
    verdict: Verdict,
}

#[async_trait]
impl CheckRoutine for DelayedRoutine {
    fn check(&self) -> CheckId {
        self.check
    }

    async fn evaluate(&self, _submission: &Submission) -> Result<Verdict, VerifierError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.verdict.clone())
    }
}

/// Sanctions screening over the disclosed name.
struct NameScreen {
    listed: Vec<String>,
}

#[async_trait]
impl CheckRoutine for NameScreen {
    fn check(&self) -> CheckId {
        CheckId::Ofac
    }

    async fn evaluate(&self, submission: &Submission) -> Result<Verdict, VerifierError> {
        let name = submission.disclosed.name.clone().unwrap_or_default();
        let hit = self.listed.contains(&name);
        Ok(Verdict::ensure(!hit, name, "not listed"))
    }
}

fn submission_json(proof: &str) -> String {
    format!(
        r#"{{
            "verdicts": {{
                "merkle_root_commitment": {{"verdict": "pass"}},
                "merkle_root_csca": {{"verdict": "pass"}},
                "blinded_dsc_commitment": {{"verdict": "pass"}},
                "proof": {proof},
                "dscProof": {{"verdict": "pass"}},
                "pubKey": {{"verdict": "pass"}}
            }},
            "disclosed": {{
                "scope": "my-app",
                "current_date": "2026-10-14",
                "name": "DOE<<JANE",
                "nationality": "FRA",
                "older_than": 21,
                "forbidden_countries_list": ["IRN", "PRK"]
            }},
            "identity": {{"user_identifier": "abc123", "nullifier": "n-001"}}
        }}"#
    )
}

fn verifier(listed: &[&str]) -> AttestationVerifier {
    let requirements = Requirements::default()
        .with_scope("my-app")
        .with_minimum_age(18)
        .with_forbidden_countries(["IRN", "PRK"]);
    AttestationVerifier::new(VerifierOptions::default(), requirements)
        .with_routine(NameScreen {
            listed: listed.iter().map(|s| s.to_string()).collect(),
        })
        .unwrap()
        .with_routine(DelayedRoutine {
            check: CheckId::Dsc,
            delay: Duration::from_millis(20),
            verdict: Verdict::Pass,
        })
        .unwrap()
}

// =========================================================================
// Full flow
// =========================================================================

#[tokio::test]
async fn test_accepted_attestation_carries_identity() {
    let submission = Submission::from_json(&submission_json(r#"{"verdict": "pass"}"#)).unwrap();
    let sealed = verifier(&[]).verify_at(&submission, today()).await.unwrap();

    assert!(sealed.valid());
    assert!(sealed.failed_checks().is_empty());
    assert!(sealed.diagnostics().is_empty());
    assert_eq!(sealed.binding(), Some(&IdentityBinding::new("abc123", "n-001")));

    let out: Value = serde_json::from_str(&sealed.to_json()).unwrap();
    assert_eq!(out["valid"], Value::Bool(true));
    assert_eq!(out["user_identifier"], "abc123");
    assert_eq!(out["nullifier"], "n-001");
}

#[tokio::test]
async fn test_rejected_proof_and_sanctions_hit() {
    let proof = r#"{"verdict": "fail", "actual": {"type": "text", "value": "0x00"}, "expected": {"type": "text", "value": "0x01"}}"#;
    let submission = Submission::from_json(&submission_json(proof)).unwrap();
    let sealed = verifier(&["DOE<<JANE"])
        .verify_at(&submission, today())
        .await
        .unwrap();

    assert!(!sealed.valid());
    assert_eq!(sealed.failed_checks(), vec![CheckId::Proof, CheckId::Ofac]);
    assert!(sealed.binding().is_none());

    let out: Value = serde_json::from_str(&sealed.to_json()).unwrap();
    assert_eq!(out["proof"], Value::Bool(false));
    assert_eq!(out["ofac"], Value::Bool(false));
    assert_eq!(out["dsc"], Value::Bool(true));
    assert_eq!(out["user_identifier"], "");

    let proof_diag = sealed.diagnostics_for(CheckId::Proof).next().unwrap();
    assert_eq!(proof_diag.actual, DiagnosticValue::text("0x00"));
    assert_eq!(proof_diag.expected, DiagnosticValue::text("0x01"));
}

#[tokio::test]
async fn test_disclosure_mismatch_reported_with_values() {
    let mut submission =
        Submission::from_json(&submission_json(r#"{"verdict": "pass"}"#)).unwrap();
    submission.disclosed.older_than = Some(16);
    submission.disclosed.current_date = NaiveDate::from_ymd_opt(2026, 9, 1);

    let sealed = verifier(&[]).verify_at(&submission, today()).await.unwrap();
    assert_eq!(
        sealed.failed_checks(),
        vec![CheckId::CurrentDate, CheckId::OlderThan]
    );
    let age = sealed.diagnostics_for(CheckId::OlderThan).next().unwrap();
    assert_eq!(age.actual, DiagnosticValue::Integer(16));
    assert_eq!(age.expected, DiagnosticValue::Integer(18));
    // Identity is still bound: only the proof check gates it.
    assert!(sealed.binding().is_some());
}

#[tokio::test]
async fn test_strict_policy_names_every_gap() {
    let mut submission =
        Submission::from_json(&submission_json(r#"{"verdict": "pass"}"#)).unwrap();
    submission.verdicts.remove(&CheckId::PubKey);
    submission.verdicts.remove(&CheckId::MerkleRootCsca);

    let err = verifier(&[]).verify_at(&submission, today()).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("merkle_root_csca"), "{message}");
    assert!(message.contains("pubKey"), "{message}");
}

#[tokio::test]
async fn test_strict_refusal_returns_report() {
    let proof = r#"{"verdict": "fail", "actual": {"type": "text", "value": "0x00"}}"#;
    let mut submission = Submission::from_json(&submission_json(proof)).unwrap();
    submission.verdicts.remove(&CheckId::PubKey);

    let err = verifier(&[]).verify_at(&submission, today()).await.unwrap_err();
    let refused = match err {
        VerifierError::Refused(refused) => refused,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(refused.report().unevaluated_checks(), vec![CheckId::PubKey]);
    assert_eq!(refused.report().failed_checks(), vec![CheckId::Proof]);

    let out: Value = serde_json::from_str(&refused.view().to_json()).unwrap();
    assert_eq!(out["proof"], Value::Bool(false));
    assert_eq!(out["pubKey"], Value::Bool(false));
    assert_eq!(out["dsc"], Value::Bool(true));
    assert_eq!(out["valid"], Value::Bool(false));
    assert_eq!(out["user_identifier"], "");
}

#[tokio::test]
async fn test_lenient_policy_seals_gaps_as_passing() {
    let options = VerifierOptions {
        policy: CoveragePolicy::Lenient,
        ..Default::default()
    };
    let verifier = AttestationVerifier::new(options, Requirements::default().without_current_date());
    let sealed = verifier
        .verify_at(&Submission::default(), today())
        .await
        .unwrap();
    assert!(sealed.valid());
    assert_eq!(sealed.outcome(CheckId::Ofac), CheckOutcome::NotEvaluated);
}

// =========================================================================
// Concurrent signal delivery
// =========================================================================

#[tokio::test]
async fn test_concurrent_failures_collapse_per_check() {
    let collector = ReportCollector::spawn(ObservedReport::new(
        VerificationReport::new(),
        Arc::new(NoopObserver),
    ));

    let mut handles = Vec::new();
    for i in 0..64i64 {
        let tx = collector.sender();
        handles.push(tokio::spawn(async move {
            let check = if i % 2 == 0 {
                CheckId::MerkleRootCsca
            } else {
                CheckId::Dsc
            };
            tx.fail(check, i, DiagnosticValue::Empty).unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let observed = collector.finish().await.unwrap();
    let report = observed.report();
    assert_eq!(
        report.failed_checks(),
        vec![CheckId::MerkleRootCsca, CheckId::Dsc]
    );
    assert_eq!(report.diagnostics().len(), 64);
    let sequences: Vec<u64> = report.diagnostics().iter().map(|d| d.sequence).collect();
    assert_eq!(sequences, (0..64).collect::<Vec<u64>>());
}

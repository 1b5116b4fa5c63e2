//! `attest verify` — Verify a submission and print the aggregated report.

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use std::path::Path;

use attest_core::{CheckId, CoveragePolicy};
use attest_report::{Diagnostic, ReportView, SealedReport};
use attest_verifier::{AttestationVerifier, Submission, VerifierError};

use crate::config::AttestConfig;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Submission JSON (as string or path to file).
    #[arg(short, long)]
    pub submission: String,

    /// Pretty-print the report.
    #[arg(long)]
    pub pretty: bool,

    /// Exit successfully even when the attestation is invalid.
    #[arg(long)]
    pub allow_invalid: bool,

    /// Verify as of this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Override the configured coverage policy (strict, lenient).
    #[arg(long)]
    pub policy: Option<CoveragePolicy>,
}

/// What `verify` prints for one attempt.
struct Rendered {
    view: ReportView,
    accepted: bool,
    summary: String,
}

pub async fn run(args: &VerifyArgs, config: &AttestConfig) -> anyhow::Result<()> {
    // Try reading as file first, then as inline JSON
    let json_str = if Path::new(&args.submission).exists() {
        std::fs::read_to_string(&args.submission)
            .with_context(|| format!("failed to read submission {}", args.submission))?
    } else {
        args.submission.clone()
    };
    let submission = Submission::from_json(&json_str)?;

    let mut options = config.verifier_options();
    if let Some(policy) = args.policy {
        options.policy = policy;
    }
    let verifier = AttestationVerifier::new(options, config.requirements.clone());
    let verified = match args.today {
        Some(today) => verifier.verify_at(&submission, today).await,
        None => verifier.verify(&submission).await,
    };
    let rendered = render(verified)?;

    if args.pretty {
        println!("{}", rendered.view.to_json_pretty());
    } else {
        println!("{}", rendered.view.to_json());
    }

    if rendered.accepted {
        eprintln!("Attestation is VALID");
        return Ok(());
    }

    eprintln!("Attestation is INVALID");
    eprint!("{}", rendered.summary);

    if args.allow_invalid {
        Ok(())
    } else {
        anyhow::bail!("attestation rejected")
    }
}

/// Turn a verification result into printable output. A refused seal still
/// yields its report; any other error is returned.
fn render(verified: Result<SealedReport, VerifierError>) -> anyhow::Result<Rendered> {
    match verified {
        Ok(sealed) => Ok(Rendered {
            view: sealed.view(),
            accepted: sealed.valid(),
            summary: failure_summary(&sealed.failed_checks(), sealed.diagnostics()),
        }),
        Err(VerifierError::Refused(refused)) => {
            let report = refused.report();
            let mut summary = failure_summary(&report.failed_checks(), report.diagnostics());
            if refused.policy() == CoveragePolicy::Strict {
                for check in report.unevaluated_checks() {
                    summary.push_str(&format!("  [MISSING] {check}\n"));
                }
            }
            summary.push_str(&format!("  refused: {}\n", refused.reason()));
            Ok(Rendered {
                view: refused.view(),
                accepted: false,
                summary,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// One line per failed check, followed by its recorded diagnostics.
fn failure_summary(failed: &[CheckId], diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for check in failed {
        out.push_str(&format!("  [FAIL] {check}\n"));
        for diag in diagnostics.iter().filter(|d| d.check == *check) {
            out.push_str(&format!(
                "         actual: {}, expected: {}\n",
                diag.actual, diag.expected
            ));
        }
    }
    out
}

use async_trait::async_trait;

use attest_core::CheckId;

use crate::error::VerifierError;
use crate::submission::Submission;
use crate::verdict::Verdict;

/// An external verification routine deciding one check.
///
/// Implementations bridge to the real verifiers: proof verification,
/// certificate-chain validation, registry inclusion, sanctions screening.
/// An `Err` is treated as a failure of the routine's check.
#[async_trait]
pub trait CheckRoutine: Send + Sync {
    /// The check this routine decides.
    fn check(&self) -> CheckId;

    /// Evaluate the check for one submission.
    async fn evaluate(&self, submission: &Submission) -> Result<Verdict, VerifierError>;
}

/// Adapts a synchronous closure into a [`CheckRoutine`].
pub struct FnRoutine<F> {
    check: CheckId,
    f: F,
}

impl<F> FnRoutine<F>
where
    F: Fn(&Submission) -> Result<Verdict, VerifierError> + Send + Sync,
{
    pub fn new(check: CheckId, f: F) -> Self {
        Self { check, f }
    }
}

#[async_trait]
impl<F> CheckRoutine for FnRoutine<F>
where
    F: Fn(&Submission) -> Result<Verdict, VerifierError> + Send + Sync,
{
    fn check(&self) -> CheckId {
        self.check
    }

    async fn evaluate(&self, submission: &Submission) -> Result<Verdict, VerifierError> {
        (self.f)(submission)
    }
}

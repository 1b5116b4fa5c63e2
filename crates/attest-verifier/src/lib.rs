//! Attest Verifier — Drives the checks of one attestation attempt.
//!
//! External verifiers (proof, certificate chain, registry inclusion,
//! sanctions) plug in as [`CheckRoutine`]s or hand in precomputed
//! [`Verdict`]s. Disclosed passport attributes are compared against the
//! verifier's [`Requirements`]. Every verdict is funnelled into a single
//! report, which is sealed with the identity binding only when the proof
//! check passed.

pub mod attributes;
pub mod error;
pub mod requirements;
pub mod routine;
pub mod submission;
pub mod verdict;
pub mod verifier;

pub use attributes::AttributeChecker;
pub use error::VerifierError;
pub use requirements::Requirements;
pub use routine::{CheckRoutine, FnRoutine};
pub use submission::{DisclosedAttributes, Submission};
pub use verdict::Verdict;
pub use verifier::{AttestationVerifier, VerifierOptions};

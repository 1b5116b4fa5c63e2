//! Cross-crate integration tests for the Attest workspace. See `tests/`.

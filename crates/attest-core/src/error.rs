/// Core protocol errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("unknown check: {0}")]
    UnknownCheck(String),

    #[error("unknown coverage policy: {0}")]
    UnknownPolicy(String),
}

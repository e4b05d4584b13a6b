use thiserror::Error;

/// Errors raised while building or naming a weight representation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactorError {
    #[error("Unsupported factorization: {0}")]
    UnsupportedKind(String),

    #[error("Rank mismatch: {0}")]
    RankMismatch(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Empty factorization: {0}")]
    Empty(&'static str),
}

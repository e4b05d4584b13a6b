use specconv_einsum::SymbolExhausted;
use specconv_factor::FactorError;
use thiserror::Error;

/// Errors raised while selecting, building or running a contraction
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unsupported weight kind: {0}")]
    UnsupportedWeightKind(String),

    #[error("Unsupported operator type: {0}")]
    UnsupportedOperatorType(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Index labels exhausted: {0}")]
    IndexExhausted(#[from] SymbolExhausted),

    #[error("{builder} contraction expects {expected} factors, got {got}")]
    FactorCountMismatch {
        builder: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Input of order {order} is too small, at least {required} axes are needed")]
    OrderTooSmall { order: usize, required: usize },

    #[error("Invalid weight: {0}")]
    Factor(FactorError),

    #[error("Contraction failed: {0}")]
    Execution(anyhow::Error),
}

impl From<anyhow::Error> for ContractError {
    /// Label exhaustion raised behind the engine boundary keeps its own category
    fn from(err: anyhow::Error) -> Self {
        let exhausted = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<SymbolExhausted>())
            .copied();
        match exhausted {
            Some(exhausted) => ContractError::IndexExhausted(exhausted),
            None => ContractError::Execution(err),
        }
    }
}

impl From<FactorError> for ContractError {
    fn from(err: FactorError) -> Self {
        match err {
            FactorError::UnsupportedKind(name) => ContractError::UnsupportedWeightKind(name),
            other => ContractError::Factor(other),
        }
    }
}

pub type ContractResult<T> = std::result::Result<T, ContractError>;

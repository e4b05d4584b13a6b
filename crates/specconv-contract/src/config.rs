//! Contraction configuration
//!
//! String spellings are matched case-insensitively, so layer configs written
//! as `"Factorized"` or `"block_diagonal"` are accepted.

use crate::error::{ContractError, ContractResult};
use std::fmt;
use std::str::FromStr;

/// How a factorized weight enters the contraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Implementation {
    /// Materialize the dense weight, then run the dense contraction
    #[default]
    Reconstructed,
    /// Contract the input directly against the factors
    Factorized,
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Implementation::Reconstructed => f.write_str("reconstructed"),
            Implementation::Factorized => f.write_str("factorized"),
        }
    }
}

impl FromStr for Implementation {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reconstructed" => Ok(Implementation::Reconstructed),
            "factorized" => Ok(Implementation::Factorized),
            _ => Err(ContractError::InvalidConfiguration(format!(
                "got implementation '{}', expected 'reconstructed' or 'factorized'",
                s
            ))),
        }
    }
}

/// Structure of the per-mode weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperatorType {
    /// One weight entry per mode, no mixing across modes
    #[default]
    Diagonal,
    /// The last spatial axis gets a separate output index mixed by the weight
    BlockDiagonal,
    /// The weight drops its last axis and broadcasts along it
    Vector,
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorType::Diagonal => f.write_str("diagonal"),
            OperatorType::BlockDiagonal => f.write_str("block-diagonal"),
            OperatorType::Vector => f.write_str("vector"),
        }
    }
}

impl FromStr for OperatorType {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diagonal" => Ok(OperatorType::Diagonal),
            "block-diagonal" | "block_diagonal" | "blockdiagonal" => Ok(OperatorType::BlockDiagonal),
            "vector" => Ok(OperatorType::Vector),
            _ => Err(ContractError::UnsupportedOperatorType(s.to_string())),
        }
    }
}

/// Options fixed when a layer picks its contraction
///
/// # Examples
///
/// ```
/// use specconv_contract::{ContractionConfig, Implementation, OperatorType};
///
/// let config = ContractionConfig::new()
///     .with_implementation(Implementation::Factorized)
///     .with_separable(true);
/// assert_eq!(config.operator_type, OperatorType::Diagonal);
///
/// let parsed = ContractionConfig::parse("Factorized", true, "diagonal").unwrap();
/// assert_eq!(parsed, config);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractionConfig {
    pub implementation: Implementation,
    /// Keep input and output channels on the same axis (no channel mixing)
    pub separable: bool,
    pub operator_type: OperatorType,
}

impl ContractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from string-valued layer options
    ///
    /// # Errors
    ///
    /// [`ContractError::InvalidConfiguration`] for an unknown implementation,
    /// [`ContractError::UnsupportedOperatorType`] for an unknown operator type.
    pub fn parse(implementation: &str, separable: bool, operator_type: &str) -> ContractResult<Self> {
        Ok(Self {
            implementation: implementation.parse()?,
            separable,
            operator_type: operator_type.parse()?,
        })
    }

    pub fn with_implementation(mut self, implementation: Implementation) -> Self {
        self.implementation = implementation;
        self
    }

    pub fn with_separable(mut self, separable: bool) -> Self {
        self.separable = separable;
        self
    }

    pub fn with_operator_type(mut self, operator_type: OperatorType) -> Self {
        self.operator_type = operator_type;
        self
    }
}

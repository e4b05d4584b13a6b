//! Kind tags of weight representations

use crate::error::FactorError;
use std::fmt;
use std::str::FromStr;

/// Storage form of a factorized weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FactorizationKind {
    /// Full tensor wrapped as a factorized weight
    Dense,
    /// Canonical Polyadic: rank weights plus one factor matrix per axis
    Cp,
    /// Core tensor plus one factor matrix per axis
    Tucker,
    /// Chain of 3-way cores
    Tt,
}

impl FactorizationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FactorizationKind::Dense => "Dense",
            FactorizationKind::Cp => "CP",
            FactorizationKind::Tucker => "Tucker",
            FactorizationKind::Tt => "TT",
        }
    }
}

impl fmt::Display for FactorizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactorizationKind {
    type Err = FactorError;

    /// Case-insensitive; a `complex` prefix is accepted and ignored
    ///
    /// ```
    /// use specconv_factor::FactorizationKind;
    ///
    /// assert_eq!("ComplexCP".parse(), Ok(FactorizationKind::Cp));
    /// assert_eq!("tensor-train".parse(), Ok(FactorizationKind::Tt));
    /// assert!("hierarchical".parse::<FactorizationKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let name = lowered.strip_prefix("complex").unwrap_or(&lowered);
        let name = name.trim_start_matches(['-', '_']);

        match name {
            "dense" => Ok(FactorizationKind::Dense),
            "cp" | "parafac" | "candecomp" => Ok(FactorizationKind::Cp),
            "tucker" => Ok(FactorizationKind::Tucker),
            "tt" | "tensor-train" | "tensor_train" | "tensortrain" => Ok(FactorizationKind::Tt),
            _ => Err(FactorError::UnsupportedKind(s.to_string())),
        }
    }
}

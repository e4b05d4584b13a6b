//! Execution hints

use crate::planner::PathStrategy;

/// Execution hints for einsum evaluation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecHints {
    /// How multi-operand equations are split into pairwise steps
    pub path: PathStrategy,
}

impl ExecHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path strategy
    pub fn with_path(mut self, path: PathStrategy) -> Self {
        self.path = path;
        self
    }
}

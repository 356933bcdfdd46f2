// ABOUTME: Document activation and view mode enumerations
// ABOUTME: Shared between the session state machine and the presentation layer

use serde::{Deserialize, Serialize};

/// How a document tab was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationMode {
    /// Preview tab, replaced by the next soft open
    #[default]
    Soft,
    /// Pinned tab, survives soft opens
    Hard,
}

impl ActivationMode {
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::Soft)
    }
}

/// Global editor presentation toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Visual,
    #[default]
    Code,
}

impl ViewMode {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Visual => Self::Code,
            Self::Code => Self::Visual,
        }
    }
}

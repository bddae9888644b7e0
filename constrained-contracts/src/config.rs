//! Verification configuration

use serde::{Deserialize, Serialize};

use crate::contract::ContractKind;
use crate::errors::{ContractError, ContractResult};

/// Controls which kinds of conditions are checked at runtime
///
/// Disabled conditions are skipped entirely; their constraints are not
/// evaluated and wrapped functions call straight through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Master switch
    pub enabled: bool,

    pub preconditions: bool,

    pub postconditions: bool,

    pub invariants: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preconditions: true,
            postconditions: true,
            invariants: true,
        }
    }
}

impl VerificationConfig {
    /// Configuration with every check turned off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON; missing fields default to enabled
    pub fn from_json(json: &str) -> ContractResult<Self> {
        serde_json::from_str(json).map_err(|e| ContractError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> ContractResult<String> {
        serde_json::to_string(self).map_err(|e| ContractError::Config(e.to_string()))
    }

    /// Whether conditions of `kind` are checked
    pub fn is_checked(&self, kind: ContractKind) -> bool {
        self.enabled
            && match kind {
                ContractKind::Precondition => self.preconditions,
                ContractKind::Postcondition => self.postconditions,
                ContractKind::Invariant => self.invariants,
            }
    }
}

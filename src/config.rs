//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tunables shared by the insight engine and the protocol simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How many related insights `related_default` returns.
    pub related_limit: usize,
    /// How many actions `top_impact_actions_default` returns.
    pub top_actions_limit: usize,
    /// Distance from the causal threshold still reported as optimal.
    pub status_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            related_limit: 3,
            top_actions_limit: 3,
            status_tolerance: 0.0,
        }
    }
}

impl EngineConfig {
    /// Validate configuration.
    ///
    /// This must be called before constructing an engine from a config.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.related_limit == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: "related_limit must be > 0".to_string(),
            });
        }
        if self.top_actions_limit == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: "top_actions_limit must be > 0".to_string(),
            });
        }
        if !self.status_tolerance.is_finite() || self.status_tolerance < 0.0 {
            return Err(ValidationError::InvalidConfig {
                reason: "status_tolerance must be finite and >= 0".to_string(),
            });
        }
        Ok(())
    }
}

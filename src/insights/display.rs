//! Display-enriched insight results.
//!
//! These are query results, never persisted. Each field is derived from the
//! canonical insight record by `InsightEngine::enhance`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::certainty::CertaintyBand;
use crate::insight::{CausalStatus, Insight};

/// Derived display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFields {
    /// Band the raw certainty falls in.
    pub certainty_band: CertaintyBand,
    /// Human-readable band label.
    pub certainty_label: String,
    /// `"{p}% your data, {100-p}% population"`.
    pub evidence_label: String,
    /// Certainty at or above the high-certainty cut.
    pub is_high_certainty: bool,
    /// Personal weight at or above `PERSONALIZED_THRESHOLD`.
    pub is_personalized: bool,
    /// Category metadata copied from the catalog.
    pub category_label: String,
    /// `#RRGGBB` accent color.
    pub color: String,
    /// Gradient token pair.
    pub gradient: String,
    /// Icon name.
    pub icon: String,

    /// Label of the cause variable type, when the insight names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_type_label: Option<String>,
    /// Status recomputed from the causal params and the engine's tolerance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causal_status: Option<CausalStatus>,
}

/// An insight together with its derived display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightWithDisplay {
    /// The canonical record the display fields were derived from.
    #[serde(flatten)]
    pub insight: Insight,
    /// Fields derived by the engine.
    #[serde(flatten)]
    pub display: DisplayFields,
}

/// Per-persona certainty distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertaintyCounts {
    /// Insights belonging to the persona.
    pub total: usize,
    /// Threshold key (`"0.80"`) → count of insights with certainty at or
    /// above it.
    pub by_threshold: BTreeMap<String, usize>,
}

impl CertaintyCounts {
    /// Count for a threshold key, 0 if the key is not reported.
    #[must_use]
    pub fn at(&self, key: &str) -> usize {
        self.by_threshold.get(key).copied().unwrap_or(0)
    }
}

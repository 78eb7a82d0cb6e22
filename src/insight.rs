//! Insight records.
//!
//! An insight is a claimed causal relationship between a behavior or marker
//! and an outcome, attached to one persona. Insights are loaded once and never
//! mutated; display fields are derived separately by the insight engine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, VariableType};
use crate::certainty::Certainty;
use crate::error::ValidationError;
use crate::id::{InsightId, PersonaId};

/// Evidentiary support behind an insight.
///
/// Deserialization runs the same range check as [`Evidence::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EvidenceRepr")]
pub struct Evidence {
    /// Fraction of support from the subject's own data (vs. population priors).
    pub personal_weight: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvidenceRepr {
    personal_weight: f64,
}

impl TryFrom<EvidenceRepr> for Evidence {
    type Error = ValidationError;

    fn try_from(repr: EvidenceRepr) -> Result<Self, Self::Error> {
        Self::new(repr.personal_weight)
    }
}

impl Evidence {
    /// Creates evidence with a validated personal weight.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PersonalWeightOutOfRange` if the weight is NaN
    /// or outside [0.0, 1.0].
    pub fn new(personal_weight: f64) -> Result<Self, ValidationError> {
        if personal_weight.is_nan() || !(0.0..=1.0).contains(&personal_weight) {
            return Err(ValidationError::PersonalWeightOutOfRange {
                value: personal_weight,
            });
        }
        Ok(Self { personal_weight })
    }

    /// Personal share as a whole percentage, rounded half up.
    #[must_use]
    pub fn personal_percent(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.personal_weight.clamp(0.0, 1.0) * 100.0).round() as u8;
        pct
    }
}

/// Where the current value sits relative to the causal threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CausalStatus {
    /// At the threshold, within tolerance.
    AtOptimal,
    /// Above the threshold.
    AboveOptimal,
    /// Below the threshold.
    BelowOptimal,
}

impl fmt::Display for CausalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtOptimal => write!(f, "at_optimal"),
            Self::AboveOptimal => write!(f, "above_optimal"),
            Self::BelowOptimal => write!(f, "below_optimal"),
        }
    }
}

/// Threshold model attached to an insight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalParams {
    /// Threshold on the cause variable.
    pub theta: f64,
    /// Effect size per unit while below `theta`.
    pub effect_below: f64,
    /// Effect size per unit while above `theta`.
    pub effect_above: f64,
    /// The subject's current value of the cause variable.
    pub current_value: f64,
    /// Status as authored in the fixture.
    pub status: CausalStatus,
}

impl CausalParams {
    /// Recomputes the status from `current_value` and `theta`.
    ///
    /// Values within `tolerance` of the threshold count as optimal.
    #[must_use]
    pub fn derive_status(&self, tolerance: f64) -> CausalStatus {
        let diff = self.current_value - self.theta;
        if diff.abs() <= tolerance {
            CausalStatus::AtOptimal
        } else if diff > 0.0 {
            CausalStatus::AboveOptimal
        } else {
            CausalStatus::BelowOptimal
        }
    }

    /// Effect size on the side of the threshold the current value lies on.
    #[must_use]
    pub fn effect_at_current(&self) -> f64 {
        if self.current_value < self.theta {
            self.effect_below
        } else {
            self.effect_above
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, v) in [
            ("causal_params.theta", self.theta),
            ("causal_params.effect_below", self.effect_below),
            ("causal_params.effect_above", self.effect_above),
            ("causal_params.current_value", self.current_value),
        ] {
            if !v.is_finite() {
                return Err(ValidationError::NonFinite {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A causal insight about one persona.
///
/// # Examples
///
/// ```
/// use vitalsim::{Category, Certainty, Insight};
///
/// let insight = Insight::builder()
///     .id("i1")
///     .persona_id("sarah")
///     .category(Category::Sleep)
///     .certainty(Certainty::new(0.87).unwrap())
///     .personal_weight(0.7)
///     .data_source("oura")
///     .build()
///     .unwrap();
///
/// assert_eq!(insight.persona_id.as_str(), "sarah");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Unique insight id.
    pub id: InsightId,
    /// Persona the insight belongs to.
    pub persona_id: PersonaId,
    /// Health domain.
    pub category: Category,

    /// Short headline.
    #[serde(default)]
    pub title: String,

    /// Strength of the causal claim.
    pub certainty: Certainty,
    /// Personal vs. population support.
    pub evidence: Evidence,

    /// Devices or logs the insight draws on.
    #[serde(default)]
    pub data_sources: Vec<String>,

    /// Marks speculative, not yet confirmed insights.
    #[serde(default)]
    pub holdout_preview: bool,

    /// Kind of variable identified as the cause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_type: Option<VariableType>,

    /// Threshold model for the cause variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causal_params: Option<CausalParams>,

    /// When the insight was computed, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Insight {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> InsightBuilder {
        InsightBuilder::new()
    }

    /// Returns true if the two insights share at least one data source.
    #[must_use]
    pub fn shares_data_source(&self, other: &Self) -> bool {
        self.data_sources
            .iter()
            .any(|s| other.data_sources.contains(s))
    }

    /// Re-checks the invariants a builder enforces.
    ///
    /// Used for records that arrive through `serde` rather than the builder.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.id.validate()?;
        self.persona_id.validate()?;
        Evidence::new(self.evidence.personal_weight)?;
        if let Some(params) = &self.causal_params {
            params.validate()?;
        }
        Ok(())
    }
}

/// Builder for creating Insight instances.
#[derive(Debug, Default)]
pub struct InsightBuilder {
    id: Option<InsightId>,
    persona_id: Option<PersonaId>,
    category: Option<Category>,
    title: Option<String>,
    certainty: Option<Certainty>,
    personal_weight: Option<f64>,
    data_sources: Vec<String>,
    holdout_preview: bool,
    cause_type: Option<VariableType>,
    causal_params: Option<CausalParams>,
    generated_at: Option<DateTime<Utc>>,
}

impl InsightBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the insight id.
    #[must_use]
    pub fn id(mut self, id: impl Into<InsightId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the owning persona.
    #[must_use]
    pub fn persona_id(mut self, persona_id: impl Into<PersonaId>) -> Self {
        self.persona_id = Some(persona_id.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the headline.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the certainty.
    #[must_use]
    pub fn certainty(mut self, certainty: Certainty) -> Self {
        self.certainty = Some(certainty);
        self
    }

    /// Sets the personal evidence weight; checked in `build`.
    #[must_use]
    pub fn personal_weight(mut self, weight: f64) -> Self {
        self.personal_weight = Some(weight);
        self
    }

    /// Adds one data source.
    #[must_use]
    pub fn data_source(mut self, source: impl Into<String>) -> Self {
        self.data_sources.push(source.into());
        self
    }

    /// Replaces the data-source list.
    #[must_use]
    pub fn data_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the insight as a holdout preview.
    #[must_use]
    pub fn holdout_preview(mut self, holdout_preview: bool) -> Self {
        self.holdout_preview = holdout_preview;
        self
    }

    /// Sets the cause variable type.
    #[must_use]
    pub fn cause_type(mut self, cause_type: VariableType) -> Self {
        self.cause_type = Some(cause_type);
        self
    }

    /// Attaches a threshold model.
    #[must_use]
    pub fn causal_params(mut self, params: CausalParams) -> Self {
        self.causal_params = Some(params);
        self
    }

    /// Sets the generation timestamp.
    #[must_use]
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Builds the Insight.
    /// Returns `ValidationError` if required fields are missing or invalid.
    pub fn build(self) -> Result<Insight, ValidationError> {
        let missing = |field: &str| ValidationError::MissingField {
            field: field.to_string(),
        };

        let id = self.id.ok_or_else(|| missing("id"))?;
        let persona_id = self.persona_id.ok_or_else(|| missing("persona_id"))?;
        let category = self.category.ok_or_else(|| missing("category"))?;
        let certainty = self.certainty.ok_or_else(|| missing("certainty"))?;
        let personal_weight = self
            .personal_weight
            .ok_or_else(|| missing("evidence.personal_weight"))?;

        let insight = Insight {
            id,
            persona_id,
            category,
            title: self.title.unwrap_or_default(),
            certainty,
            evidence: Evidence::new(personal_weight)?,
            data_sources: self.data_sources,
            holdout_preview: self.holdout_preview,
            cause_type: self.cause_type,
            causal_params: self.causal_params,
            generated_at: self.generated_at,
        };
        insight.validate()?;
        Ok(insight)
    }
}

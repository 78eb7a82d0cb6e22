//! Insight filter criteria.
//!
//! `InsightFilter` provides a fluent API for building the criteria passed to
//! `InsightEngine::filter`. Every criterion is optional and all set criteria
//! are combined with logical AND.

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::id::PersonaId;
use crate::insight::Insight;

/// Filter criteria over insights.
///
/// # Example
/// ```
/// use vitalsim::{Category, InsightFilter};
///
/// let filter = InsightFilter::new()
///     .persona("sarah")
///     .category(Category::Sleep)
///     .min_certainty(0.7);
/// assert!(filter.persona_id.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightFilter {
    /// Only insights of this persona.
    pub persona_id: Option<PersonaId>,
    /// Allowed categories. Empty means unconstrained.
    pub categories: Vec<Category>,
    /// Inclusive lower bound on certainty.
    pub min_certainty: Option<f64>,
    /// Inclusive upper bound on certainty.
    pub max_certainty: Option<f64>,
    /// Exact match on the holdout-preview flag.
    pub has_holdout_preview: Option<bool>,
    /// Data sources of which at least one must be shared. Empty means
    /// unconstrained.
    pub data_sources: Vec<String>,
}

impl InsightFilter {
    /// A filter with no criteria; matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one persona.
    #[must_use]
    pub fn persona(mut self, persona_id: impl Into<PersonaId>) -> Self {
        self.persona_id = Some(persona_id.into());
        self
    }

    /// Adds one allowed category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Replaces the allowed category set.
    #[must_use]
    pub fn categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Inclusive lower certainty bound.
    #[must_use]
    pub fn min_certainty(mut self, min: f64) -> Self {
        self.min_certainty = Some(min);
        self
    }

    /// Inclusive upper certainty bound.
    #[must_use]
    pub fn max_certainty(mut self, max: f64) -> Self {
        self.max_certainty = Some(max);
        self
    }

    /// Requires the holdout-preview flag to equal `has_preview`.
    #[must_use]
    pub fn holdout_preview(mut self, has_preview: bool) -> Self {
        self.has_holdout_preview = Some(has_preview);
        self
    }

    /// Requires at least one shared data source.
    #[must_use]
    pub fn data_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if the insight satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, insight: &Insight) -> bool {
        if let Some(persona_id) = &self.persona_id {
            if &insight.persona_id != persona_id {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(&insight.category) {
            return false;
        }
        let certainty = insight.certainty.value();
        if let Some(min) = self.min_certainty {
            if certainty < min {
                return false;
            }
        }
        if let Some(max) = self.max_certainty {
            if certainty > max {
                return false;
            }
        }
        if let Some(wanted) = self.has_holdout_preview {
            if insight.holdout_preview != wanted {
                return false;
            }
        }
        if !self.data_sources.is_empty()
            && !insight
                .data_sources
                .iter()
                .any(|s| self.data_sources.contains(s))
        {
            return false;
        }
        true
    }
}

//! Insight filtering, ranking and enrichment.

use tracing::debug;

use crate::catalog::CategoryCatalog;
use crate::certainty::{threshold_key, CertaintyBand, BAND_COUNT_THRESHOLDS};
use crate::config::EngineConfig;
use crate::error::{ConfigurationError, ValidationError};
use crate::id::PersonaId;
use crate::insight::Insight;
use crate::view::ViewState;

use super::display::{CertaintyCounts, DisplayFields, InsightWithDisplay};
use super::filter::InsightFilter;

/// Personal weight at or above which an insight counts as personalized.
pub const PERSONALIZED_THRESHOLD: f64 = 0.5;

/// Stateless engine over a caller-supplied insight collection.
///
/// The engine owns only its metadata catalog and configuration. Insight
/// slices are borrowed per call and never mutated.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    catalog: CategoryCatalog,
    config: EngineConfig,
}

impl InsightEngine {
    /// Creates an engine with a validated configuration.
    pub fn new(catalog: CategoryCatalog, config: EngineConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    /// Engine over the built-in catalog and default configuration.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Metadata catalog used for display fields.
    #[must_use]
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Insights matching every set criterion, in input order.
    pub fn filter<'a>(&self, insights: &'a [Insight], criteria: &InsightFilter) -> Vec<&'a Insight> {
        let out: Vec<&Insight> = insights.iter().filter(|i| criteria.matches(i)).collect();
        debug!(input = insights.len(), matched = out.len(), "filtered insights");
        out
    }

    /// Derives display fields from the insight's canonical fields.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the catalog has no entry for the
    /// insight's category or cause type.
    pub fn enhance(&self, insight: &Insight) -> Result<InsightWithDisplay, ConfigurationError> {
        let meta = self.catalog.category(insight.category)?;
        let cause_type_label = match insight.cause_type {
            Some(t) => Some(self.catalog.variable_type(t)?.label.clone()),
            None => None,
        };

        let causal_status = insight
            .causal_params
            .map(|p| p.derive_status(self.config.status_tolerance));
        let band = CertaintyBand::from_value(insight.certainty.value());
        let personal = insight.evidence.personal_percent();

        Ok(InsightWithDisplay {
            insight: insight.clone(),
            display: DisplayFields {
                certainty_band: band,
                certainty_label: band.label().to_string(),
                evidence_label: format!(
                    "{personal}% your data, {}% population",
                    100 - personal
                ),
                is_high_certainty: insight.certainty.is_high(),
                is_personalized: insight.evidence.personal_weight >= PERSONALIZED_THRESHOLD,
                category_label: meta.label.clone(),
                color: meta.color.clone(),
                gradient: meta.gradient.clone(),
                icon: meta.icon.clone(),
                cause_type_label,
                causal_status,
            },
        })
    }

    /// A persona's insights at or above `certainty_threshold`, enhanced and
    /// sorted by descending certainty. Ties keep input order.
    pub fn ranked_for_persona(
        &self,
        insights: &[Insight],
        persona_id: &PersonaId,
        certainty_threshold: f64,
    ) -> Result<Vec<InsightWithDisplay>, ConfigurationError> {
        let mut ranked = insights
            .iter()
            .filter(|i| &i.persona_id == persona_id && i.certainty.meets(certainty_threshold))
            .map(|i| self.enhance(i))
            .collect::<Result<Vec<_>, _>>()?;

        // sort_by is stable
        ranked.sort_by(|a, b| {
            b.insight
                .certainty
                .value()
                .total_cmp(&a.insight.certainty.value())
        });

        debug!(
            persona = %persona_id,
            threshold = certainty_threshold,
            ranked = ranked.len(),
            "ranked insights"
        );
        Ok(ranked)
    }

    /// `ranked_for_persona` for the view's persona and slider.
    pub fn for_view(
        &self,
        insights: &[Insight],
        view: &ViewState,
    ) -> Result<Vec<InsightWithDisplay>, ConfigurationError> {
        self.ranked_for_persona(insights, &view.persona_id, view.certainty_threshold())
    }

    /// Mean certainty of a persona's insights; 0 when there are none.
    #[must_use]
    pub fn average_certainty(&self, insights: &[Insight], persona_id: &PersonaId) -> f64 {
        let (sum, count) = insights
            .iter()
            .filter(|i| &i.persona_id == persona_id)
            .fold((0.0_f64, 0_usize), |(sum, n), i| (sum + i.certainty.value(), n + 1));
        if count == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / count as f64;
        mean
    }

    /// Insights of the same persona that share a category or a data source
    /// with `insight`, excluding itself, in input order.
    pub fn related<'a>(
        &self,
        insight: &Insight,
        insights: &'a [Insight],
        limit: usize,
    ) -> Vec<&'a Insight> {
        insights
            .iter()
            .filter(|other| {
                other.persona_id == insight.persona_id
                    && other.id != insight.id
                    && (other.category == insight.category || other.shares_data_source(insight))
            })
            .take(limit)
            .collect()
    }

    /// `related` with the configured limit.
    pub fn related_default<'a>(&self, insight: &Insight, insights: &'a [Insight]) -> Vec<&'a Insight> {
        self.related(insight, insights, self.config.related_limit)
    }

    /// Counts a persona's insights at or above each fixed threshold.
    #[must_use]
    pub fn counts_by_certainty_band(
        &self,
        insights: &[Insight],
        persona_id: &PersonaId,
    ) -> CertaintyCounts {
        let owned: Vec<f64> = insights
            .iter()
            .filter(|i| &i.persona_id == persona_id)
            .map(|i| i.certainty.value())
            .collect();

        let by_threshold = BAND_COUNT_THRESHOLDS
            .iter()
            .map(|&t| (threshold_key(t), owned.iter().filter(|&&c| c >= t).count()))
            .collect();

        CertaintyCounts {
            total: owned.len(),
            by_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, VariableType};
    use crate::certainty::Certainty;
    use crate::insight::{CausalParams, CausalStatus};

    fn insight(id: &str, persona: &str, category: Category, certainty: f64) -> Insight {
        Insight::builder()
            .id(id)
            .persona_id(persona)
            .category(category)
            .certainty(Certainty::new(certainty).unwrap())
            .personal_weight(0.72)
            .build()
            .unwrap()
    }

    #[test]
    fn test_enhance_derives_labels() {
        let engine = InsightEngine::standard();
        let out = engine
            .enhance(&insight("i1", "sarah", Category::Sleep, 0.85))
            .unwrap();
        assert_eq!(out.display.certainty_label, "High");
        assert_eq!(out.display.evidence_label, "72% your data, 28% population");
        assert!(out.display.is_high_certainty);
        assert!(out.display.is_personalized);
        assert_eq!(out.display.category_label, "Sleep");
        assert!(out.display.color.starts_with('#'));
        assert!(out.display.cause_type_label.is_none());
    }

    #[test]
    fn test_enhance_is_idempotent() {
        let engine = InsightEngine::standard();
        let i = Insight::builder()
            .id("i1")
            .persona_id("sarah")
            .category(Category::Metabolic)
            .certainty(Certainty::new(0.61).unwrap())
            .personal_weight(0.5)
            .cause_type(VariableType::Behavior)
            .build()
            .unwrap();
        let once = engine.enhance(&i).unwrap();
        let twice = engine.enhance(&once.insight).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.display.cause_type_label.as_deref(), Some("Behavior"));
        assert!(once.display.is_personalized);
        assert!(!once.display.is_high_certainty);
    }

    #[test]
    fn test_average_certainty_zero_without_matches() {
        let engine = InsightEngine::standard();
        assert!(engine.average_certainty(&[], &PersonaId::new("x")).abs() < f64::EPSILON);
        let insights = vec![
            insight("i1", "sarah", Category::Sleep, 0.6),
            insight("i2", "sarah", Category::Sleep, 0.8),
            insight("i3", "marcus", Category::Sleep, 0.1),
        ];
        let avg = engine.average_certainty(&insights, &PersonaId::new("sarah"));
        assert!((avg - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_counts_cover_every_threshold() {
        let engine = InsightEngine::standard();
        let insights = vec![
            insight("i1", "sarah", Category::Sleep, 0.95),
            insight("i2", "sarah", Category::Sleep, 0.75),
            insight("i3", "sarah", Category::Sleep, 0.5),
        ];
        let counts = engine.counts_by_certainty_band(&insights, &PersonaId::new("sarah"));
        assert_eq!(counts.total, 3);
        assert_eq!(counts.by_threshold.len(), BAND_COUNT_THRESHOLDS.len());
        assert_eq!(counts.at("0.60"), 2);
        assert_eq!(counts.at("0.75"), 2);
        assert_eq!(counts.at("0.80"), 1);
        assert_eq!(counts.at("0.95"), 1);

        let none = engine.counts_by_certainty_band(&insights, &PersonaId::new("nobody"));
        assert_eq!(none.total, 0);
        assert!(none.by_threshold.values().all(|&n| n == 0));
    }

    #[test]
    fn test_status_tolerance_drives_causal_status() {
        let params = CausalParams {
            theta: 19.5,
            effect_below: -0.8,
            effect_above: 4.2,
            current_value: 21.0,
            status: CausalStatus::AboveOptimal,
        };
        let i = Insight::builder()
            .id("i1")
            .persona_id("sarah")
            .category(Category::Metabolic)
            .certainty(Certainty::new(0.89).unwrap())
            .personal_weight(0.7)
            .causal_params(params)
            .build()
            .unwrap();

        let strict = InsightEngine::standard().enhance(&i).unwrap();
        assert_eq!(strict.display.causal_status, Some(CausalStatus::AboveOptimal));

        let config = EngineConfig {
            status_tolerance: 5.0,
            ..EngineConfig::default()
        };
        let lenient = InsightEngine::new(CategoryCatalog::standard(), config).unwrap();
        let out = lenient.enhance(&i).unwrap();
        assert_eq!(out.display.causal_status, Some(CausalStatus::AtOptimal));
        // The authored status is left untouched.
        assert_eq!(
            out.insight.causal_params.map(|p| p.status),
            Some(CausalStatus::AboveOptimal)
        );

        let plain = insight("i2", "sarah", Category::Sleep, 0.7);
        assert!(lenient.enhance(&plain).unwrap().display.causal_status.is_none());
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = EngineConfig {
            related_limit: 0,
            ..EngineConfig::default()
        };
        assert!(InsightEngine::new(CategoryCatalog::standard(), config).is_err());
    }
}

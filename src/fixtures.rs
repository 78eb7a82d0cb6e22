//! Fixture loading.
//!
//! Personas, insights and protocols arrive as hand-authored camelCase JSON.
//! Records are parsed into loosely-typed rows first so that an unknown
//! category surfaces as a `ConfigurationError` rather than a generic parse
//! failure, then validated once. After loading, nothing is mutated.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::{Category, CategoryCatalog, VariableType};
use crate::certainty::Certainty;
use crate::error::{FixtureError, ValidationError, VitalsResult};
use crate::id::{ActionId, InsightId, PersonaId, ProtocolId};
use crate::insight::{CausalParams, Evidence, Insight};
use crate::persona::Persona;
use crate::protocol::{ActionSchedule, Baseline, Protocol, ProtocolAction, ProtocolState, Trigger};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureFile {
    #[serde(default)]
    personas: Vec<Persona>,
    #[serde(default)]
    insights: Vec<InsightRow>,
    #[serde(default)]
    protocols: Vec<ProtocolRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvidenceRow {
    personal_weight: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightRow {
    id: InsightId,
    persona_id: PersonaId,
    category: String,
    #[serde(default)]
    title: String,
    certainty: f64,
    evidence: EvidenceRow,
    #[serde(default)]
    data_sources: Vec<String>,
    #[serde(default)]
    holdout_preview: Option<bool>,
    #[serde(default)]
    cause_type: Option<String>,
    #[serde(default)]
    causal_params: Option<CausalParams>,
    #[serde(default)]
    generated_at: Option<DateTime<Utc>>,
}

impl InsightRow {
    fn into_insight(self, catalog: &CategoryCatalog) -> VitalsResult<Insight> {
        let category: Category = self.category.parse()?;
        catalog.category(category)?;
        let cause_type = match self.cause_type.as_deref() {
            Some(name) => {
                let t: VariableType = name.parse()?;
                catalog.variable_type(t)?;
                Some(t)
            }
            None => None,
        };

        let insight = Insight {
            id: self.id,
            persona_id: self.persona_id,
            category,
            title: self.title,
            certainty: Certainty::new(self.certainty)?,
            evidence: Evidence::new(self.evidence.personal_weight)?,
            data_sources: self.data_sources,
            holdout_preview: self.holdout_preview.unwrap_or(false),
            cause_type,
            causal_params: self.causal_params,
            generated_at: self.generated_at,
        };
        insight.validate()?;
        Ok(insight)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionRow {
    id: ActionId,
    label: String,
    category: String,
    impact: f64,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    schedule: Option<ActionSchedule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProtocolRow {
    id: ProtocolId,
    persona_id: PersonaId,
    name: String,
    outcome: String,
    baseline: Baseline,
    #[serde(default)]
    actions: Vec<ActionRow>,
    #[serde(default)]
    states: Vec<ProtocolState>,
    #[serde(default)]
    triggers: Vec<Trigger>,
}

impl ProtocolRow {
    fn into_protocol(self, catalog: &CategoryCatalog) -> VitalsResult<Protocol> {
        let actions = self
            .actions
            .into_iter()
            .map(|row| -> VitalsResult<ProtocolAction> {
                let category: Category = row.category.parse()?;
                catalog.category(category)?;
                Ok(ProtocolAction {
                    id: row.id,
                    label: row.label,
                    category,
                    impact: row.impact,
                    is_active: row.is_active,
                    schedule: row.schedule,
                })
            })
            .collect::<VitalsResult<Vec<_>>>()?;

        let protocol = Protocol {
            id: self.id,
            persona_id: self.persona_id,
            name: self.name,
            outcome: self.outcome,
            baseline: self.baseline,
            actions,
            states: self.states,
            triggers: self.triggers,
        };
        protocol.validate()?;
        for dangling in protocol.dangling_references() {
            warn!(protocol = %protocol.id, "{dangling}");
        }
        Ok(protocol)
    }
}

/// Immutable fixture data, validated at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSet {
    /// Personas in file order.
    pub personas: Vec<Persona>,
    /// Insights in file order.
    pub insights: Vec<Insight>,
    /// Protocols in file order.
    pub protocols: Vec<Protocol>,
}

impl FixtureSet {
    /// Parses and validates fixtures against the built-in catalog.
    pub fn from_json_str(json: &str) -> VitalsResult<Self> {
        Self::from_json_str_with_catalog(json, &CategoryCatalog::standard())
    }

    /// Parses and validates fixtures against `catalog`.
    ///
    /// # Errors
    ///
    /// - `FixtureError::Parse` for malformed JSON
    /// - `ConfigurationError` for categories or variable types without metadata
    /// - `ValidationError` for out-of-range values, empty or duplicate ids
    pub fn from_json_str_with_catalog(json: &str, catalog: &CategoryCatalog) -> VitalsResult<Self> {
        let file: FixtureFile = serde_json::from_str(json)?;
        Self::from_file(file, catalog)
    }

    /// Loads fixtures from any JSON byte stream using the standard catalog.
    ///
    /// # Errors
    ///
    /// Same as [`FixtureSet::from_json_str`].
    pub fn from_reader<R: Read>(reader: R) -> VitalsResult<Self> {
        let file: FixtureFile = serde_json::from_reader(reader)?;
        Self::from_file(file, &CategoryCatalog::standard())
    }

    /// Loads fixtures from a JSON file using the standard catalog.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Io` if the file cannot be read, otherwise the
    /// same errors as [`FixtureSet::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> VitalsResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading fixture file");
        let file = std::fs::File::open(path).map_err(FixtureError::from)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    // Every loader funnels through here, so the load event is logged once.
    fn from_file(file: FixtureFile, catalog: &CategoryCatalog) -> VitalsResult<Self> {
        let mut seen = HashSet::new();
        for persona in &file.personas {
            persona.validate()?;
            if !seen.insert(persona.id.clone()) {
                return Err(ValidationError::DuplicateId {
                    kind: "persona".to_string(),
                    id: persona.id.to_string(),
                }
                .into());
            }
        }

        let insights = file
            .insights
            .into_iter()
            .map(|row| row.into_insight(catalog))
            .collect::<VitalsResult<Vec<_>>>()?;
        let mut seen = HashSet::new();
        for insight in &insights {
            if !seen.insert(&insight.id) {
                return Err(ValidationError::DuplicateId {
                    kind: "insight".to_string(),
                    id: insight.id.to_string(),
                }
                .into());
            }
        }

        let protocols = file
            .protocols
            .into_iter()
            .map(|row| row.into_protocol(catalog))
            .collect::<VitalsResult<Vec<_>>>()?;

        info!(
            personas = file.personas.len(),
            insights = insights.len(),
            protocols = protocols.len(),
            "fixtures loaded"
        );

        Ok(Self {
            personas: file.personas,
            insights,
            protocols,
        })
    }

    /// Persona by id.
    #[must_use]
    pub fn persona(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id.as_str() == id)
    }

    /// Protocol by id.
    #[must_use]
    pub fn protocol(&self, id: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|p| p.id.as_str() == id)
    }

    /// Protocols owned by a persona, in load order.
    pub fn protocols_for<'a>(&'a self, persona_id: &'a PersonaId) -> impl Iterator<Item = &'a Protocol> + 'a {
        self.protocols.iter().filter(move |p| &p.persona_id == persona_id)
    }

    /// Insights owned by a persona, in load order.
    pub fn insights_for<'a>(&'a self, persona_id: &'a PersonaId) -> impl Iterator<Item = &'a Insight> + 'a {
        self.insights.iter().filter(move |i| &i.persona_id == persona_id)
    }
}

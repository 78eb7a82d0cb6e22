//! Protocol records: actions, states and trigger rules.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::error::ValidationError;
use crate::id::{ActionId, PersonaId, ProtocolId, StateId};

/// Outcome value with no actions engaged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Outcome metric value.
    pub value: f64,
}

/// When and how often an action is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSchedule {
    /// Preferred time of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<NaiveTime>,
    /// Free-form cadence such as `"daily"` or `"3x/week"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// Length of one session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// A recommendable behavior with a signed impact on the outcome metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolAction {
    /// Unique within the protocol.
    pub id: ActionId,
    /// Display label.
    pub label: String,
    /// Health domain.
    pub category: Category,
    /// Signed change to the outcome, in the outcome metric's units.
    pub impact: f64,
    /// Whether the action is engaged when the caller has not toggled it.
    #[serde(default)]
    pub is_active: bool,
    /// Optional timing hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ActionSchedule>,
}

impl ProtocolAction {
    /// Creates an action that is off by default.
    #[must_use]
    pub fn new(id: impl Into<ActionId>, label: impl Into<String>, category: Category, impact: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            impact,
            is_active: false,
            schedule: None,
        }
    }

    /// Sets the default engagement.
    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Attaches a schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: ActionSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }
}

/// A physiological or contextual condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolState {
    /// Unique within the protocol.
    pub id: StateId,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Whether the condition currently holds.
    pub is_active: bool,
}

impl ProtocolState {
    /// Creates an unlabeled state.
    #[must_use]
    pub fn new(id: impl Into<StateId>, is_active: bool) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            is_active,
        }
    }
}

/// Rule: when every `if` state is active, recommend the `then` actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// States that must all be active. Empty fires always.
    #[serde(rename = "if", default)]
    pub when: Vec<StateId>,
    /// Actions recommended when the trigger fires.
    #[serde(rename = "then", default)]
    pub then: Vec<ActionId>,
}

impl Trigger {
    /// Builds a trigger from any id-like iterables.
    #[must_use]
    pub fn new<W, T>(when: W, then: T) -> Self
    where
        W: IntoIterator,
        W::Item: Into<StateId>,
        T: IntoIterator,
        T::Item: Into<ActionId>,
    {
        Self {
            when: when.into_iter().map(Into::into).collect(),
            then: then.into_iter().map(Into::into).collect(),
        }
    }
}

/// A trigger reference that names no state or action of its protocol.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DanglingReference {
    State { trigger: usize, id: StateId },
    Action { trigger: usize, id: ActionId },
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State { trigger, id } => write!(f, "trigger #{trigger} references unknown state '{id}'"),
            Self::Action { trigger, id } => write!(f, "trigger #{trigger} references unknown action '{id}'"),
        }
    }
}

/// A named bundle of actions intended to move one outcome metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    /// Unique protocol id.
    pub id: ProtocolId,
    /// Owning persona.
    pub persona_id: PersonaId,
    /// Display name.
    pub name: String,
    /// Outcome metric name, e.g. `"HRV"`.
    pub outcome: String,
    /// Outcome value with nothing engaged.
    pub baseline: Baseline,
    /// Actions in display order.
    #[serde(default)]
    pub actions: Vec<ProtocolAction>,
    /// Conditions the triggers read.
    #[serde(default)]
    pub states: Vec<ProtocolState>,
    /// Recommendation rules.
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

impl Protocol {
    /// Creates an empty protocol.
    #[must_use]
    pub fn new(
        id: impl Into<ProtocolId>,
        persona_id: impl Into<PersonaId>,
        name: impl Into<String>,
        outcome: impl Into<String>,
        baseline: f64,
    ) -> Self {
        Self {
            id: id.into(),
            persona_id: persona_id.into(),
            name: name.into(),
            outcome: outcome.into(),
            baseline: Baseline { value: baseline },
            actions: Vec::new(),
            states: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Appends an action.
    #[must_use]
    pub fn with_action(mut self, action: ProtocolAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Appends a state.
    #[must_use]
    pub fn with_state(mut self, state: ProtocolState) -> Self {
        self.states.push(state);
        self
    }

    /// Appends a trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Looks up an action by id.
    #[must_use]
    pub fn action(&self, id: &str) -> Option<&ProtocolAction> {
        self.actions.iter().find(|a| a.id.as_str() == id)
    }

    /// Ids of all actions, in protocol order.
    pub fn action_ids(&self) -> impl Iterator<Item = &ActionId> {
        self.actions.iter().map(|a| &a.id)
    }

    /// Ids of the states currently active.
    #[must_use]
    pub fn active_state_ids(&self) -> HashSet<&StateId> {
        self.states
            .iter()
            .filter(|s| s.is_active)
            .map(|s| &s.id)
            .collect()
    }

    /// Checks load-time invariants.
    ///
    /// Dangling trigger references are not checked here; see
    /// [`Protocol::dangling_references`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.id.validate()?;
        self.persona_id.validate()?;
        if !self.baseline.value.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "baseline.value".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for action in &self.actions {
            action.id.validate()?;
            if !action.impact.is_finite() {
                return Err(ValidationError::NonFinite {
                    field: format!("actions[{}].impact", action.id),
                });
            }
            if !seen.insert(action.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    kind: "action".to_string(),
                    id: action.id.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for state in &self.states {
            state.id.validate()?;
            if !seen.insert(state.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    kind: "state".to_string(),
                    id: state.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Trigger references to states or actions this protocol does not define.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let states: HashSet<&str> = self.states.iter().map(|s| s.id.as_str()).collect();
        let actions: HashSet<&str> = self.actions.iter().map(|a| a.id.as_str()).collect();

        let mut out = Vec::new();
        for (idx, trigger) in self.triggers.iter().enumerate() {
            for id in trigger.when.iter().filter(|id| !states.contains(id.as_str())) {
                out.push(DanglingReference::State {
                    trigger: idx,
                    id: id.clone(),
                });
            }
            for id in trigger.then.iter().filter(|id| !actions.contains(id.as_str())) {
                out.push(DanglingReference::Action {
                    trigger: idx,
                    id: id.clone(),
                });
            }
        }
        out
    }
}

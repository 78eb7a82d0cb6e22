//! Synthetic subjects whose data the dashboards demonstrate.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::PersonaId;

/// A synthetic subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Unique persona id.
    pub id: PersonaId,
    /// Display name.
    pub name: String,

    /// Short description of what the persona is working on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

impl Persona {
    /// Creates a persona without a focus.
    #[must_use]
    pub fn new(id: impl Into<PersonaId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            focus: None,
        }
    }

    /// Sets the focus area.
    #[must_use]
    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }

    /// Rejects an empty id.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.id.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_focus_is_optional_in_json() {
        let p: Persona = serde_json::from_str(r#"{"id":"sarah","name":"Sarah"}"#).unwrap();
        assert_eq!(p, Persona::new("sarah", "Sarah"));
        let json = serde_json::to_string(&p.clone().with_focus("sleep")).unwrap();
        assert!(json.contains("\"focus\":\"sleep\""));
    }

    #[test]
    fn test_persona_rejects_empty_id() {
        assert!(Persona::new("", "Nobody").validate().is_err());
    }
}

//! Snapshot of the caller's current view selection.
//!
//! The engines are stateless. A UI layer keeps its selections wherever it
//! likes and hands a `ViewState` to each engine call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{ActionId, PersonaId};

/// Current persona, certainty slider and action toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Persona being viewed.
    pub persona_id: PersonaId,

    /// Certainty slider position, 0..=100.
    certainty_slider: u8,

    /// Explicit per-action toggle overrides.
    #[serde(default)]
    pub toggles: HashMap<ActionId, bool>,
}

impl ViewState {
    /// Largest slider position.
    pub const MAX_SLIDER: u8 = 100;

    /// Creates a view for a persona with the slider at `certainty_slider`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::SliderOutOfRange` if the slider exceeds 100.
    pub fn new(
        persona_id: impl Into<PersonaId>,
        certainty_slider: u8,
    ) -> Result<Self, ValidationError> {
        Self::check_slider(certainty_slider)?;
        Ok(Self {
            persona_id: persona_id.into(),
            certainty_slider,
            toggles: HashMap::new(),
        })
    }

    fn check_slider(value: u8) -> Result<(), ValidationError> {
        if value > Self::MAX_SLIDER {
            return Err(ValidationError::SliderOutOfRange { value });
        }
        Ok(())
    }

    /// Moves the certainty slider.
    pub fn with_certainty_slider(mut self, value: u8) -> Result<Self, ValidationError> {
        Self::check_slider(value)?;
        self.certainty_slider = value;
        Ok(self)
    }

    /// Records an explicit toggle for an action.
    #[must_use]
    pub fn with_toggle(mut self, action_id: impl Into<ActionId>, on: bool) -> Self {
        self.toggles.insert(action_id.into(), on);
        self
    }

    /// Slider position, 0 to 100.
    #[must_use]
    pub const fn certainty_slider(&self) -> u8 {
        self.certainty_slider
    }

    /// Slider position as a [0, 1] certainty threshold.
    #[must_use]
    pub fn certainty_threshold(&self) -> f64 {
        f64::from(self.certainty_slider) / 100.0
    }

    /// Re-checks the slider range for views that arrive through `serde`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.persona_id.validate()?;
        Self::check_slider(self.certainty_slider)
    }
}

//! # vitalsim - Insight ranking and protocol simulation
//!
//! vitalsim is the computational core behind a health-insights dashboard. It
//! ranks and enriches causal insights for a persona, and projects what a
//! protocol's outcome metric would be under a chosen set of actions.
//!
//! ## Core Concepts
//!
//! - **Insight**: A claimed causal relationship with a [0, 1] certainty
//! - **Protocol**: A bundle of actions with signed impacts on one outcome metric
//! - **Trigger**: A rule recommending actions when a set of states is active
//! - **ViewState**: The caller's current selection, passed explicitly per call
//!
//! Both engines are pure. They hold no global state and never mutate their
//! inputs, so fixtures can be shared across threads freely.
//!
//! ## Usage
//!
//! ```
//! use std::collections::HashSet;
//! use vitalsim::{ActionId, Category, Protocol, ProtocolAction, ProtocolSimulator};
//!
//! let protocol = Protocol::new("p1", "sarah", "Metabolic reset", "Glucose score", 60.0)
//!     .with_action(ProtocolAction::new("a1", "Post-meal walk", Category::Activity, 8.0))
//!     .with_action(ProtocolAction::new("a2", "Late snack", Category::Nutrition, -3.0))
//!     .with_action(ProtocolAction::new("a3", "Fiber first", Category::Nutrition, 5.0));
//!
//! let active: HashSet<ActionId> = ["a1", "a3"].into_iter().map(ActionId::from).collect();
//! let result = ProtocolSimulator::new(&protocol).simulate(&active);
//!
//! assert_eq!(result.predicted_value, 73.0);
//! assert_eq!(result.max_possible_delta, 10.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Records
pub mod catalog;
pub mod certainty;
pub mod error;
pub mod id;
pub mod insight;
pub mod persona;

// Engines
pub mod config;
pub mod insights;
pub mod protocol;
pub mod view;

// Data source adapter
pub mod fixtures;

// Re-export primary types at crate root for convenience
pub use catalog::{Category, CategoryCatalog, CategoryMeta, VariableType, VariableTypeMeta};
pub use certainty::{Certainty, CertaintyBand, BAND_COUNT_THRESHOLDS, HIGH_CERTAINTY_THRESHOLD};
pub use config::EngineConfig;
pub use error::{ConfigurationError, FixtureError, ValidationError, VitalsError, VitalsResult};
pub use fixtures::FixtureSet;
pub use id::{ActionId, InsightId, PersonaId, ProtocolId, StateId};
pub use insight::{CausalParams, CausalStatus, Evidence, Insight, InsightBuilder};
pub use insights::{CertaintyCounts, DisplayFields, InsightEngine, InsightFilter, InsightWithDisplay};
pub use persona::Persona;
pub use protocol::{
    ActionSchedule, ActionWithState, Baseline, DanglingReference, Protocol, ProtocolAction,
    ProtocolSimulator, ProtocolState, SimulatorResult, Trigger, TriggerMatch,
};
pub use view::ViewState;

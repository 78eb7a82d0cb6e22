//! Protocol model, trigger evaluation and what-if simulation.
//!
//! Protocols are immutable fixtures. The simulator borrows one and derives
//! recommendations and projections from it without writing anything back.

/// Protocol records.
pub mod model;
/// What-if simulation.
pub mod simulator;
/// Trigger evaluation.
pub mod triggers;

pub use model::{
    ActionSchedule, Baseline, DanglingReference, Protocol, ProtocolAction, ProtocolState, Trigger,
};
pub use simulator::{ActionWithState, ProtocolSimulator, SimulatorResult};
pub use triggers::{MatchOutput, TriggerMatch, TriggerMatcher};

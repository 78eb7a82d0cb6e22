//! Trigger evaluation.
//!
//! A trigger fires when every state it names is active. References to states
//! the protocol does not define are never active, so such triggers never
//! fire; references to unknown actions are dropped from the match.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::id::{ActionId, StateId};

use super::model::{Protocol, Trigger};

/// Outcome of evaluating one trigger.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutput {
    NoMatch,
    Match(TriggerMatch),
}

/// A fired trigger and the known actions it recommends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMatch {
    /// Position of the trigger in the protocol.
    pub trigger_index: usize,
    /// Known actions recommended, in trigger order.
    pub action_ids: Vec<ActionId>,
}

/// Evaluates a protocol's triggers against its current states.
pub struct TriggerMatcher<'a> {
    protocol: &'a Protocol,
    active_states: HashSet<&'a StateId>,
    known_actions: HashSet<&'a ActionId>,
}

impl<'a> TriggerMatcher<'a> {
    /// Indexes the protocol's active states and known actions.
    #[must_use]
    pub fn new(protocol: &'a Protocol) -> Self {
        Self {
            protocol,
            active_states: protocol.active_state_ids(),
            known_actions: protocol.action_ids().collect(),
        }
    }

    /// Returns true if every condition state is active. An empty condition
    /// list always fires.
    #[must_use]
    pub fn fires(&self, trigger: &Trigger) -> bool {
        trigger.when.iter().all(|s| self.active_states.contains(s))
    }

    /// Evaluates one trigger at position `index`.
    pub fn evaluate(&self, index: usize, trigger: &Trigger) -> MatchOutput {
        if !self.fires(trigger) {
            return MatchOutput::NoMatch;
        }
        MatchOutput::Match(TriggerMatch {
            trigger_index: index,
            action_ids: trigger
                .then
                .iter()
                .filter(|id| self.known_actions.contains(id))
                .cloned()
                .collect(),
        })
    }

    /// Every trigger that fires, in protocol order.
    #[must_use]
    pub fn fired(&self) -> Vec<TriggerMatch> {
        self.protocol
            .triggers
            .iter()
            .enumerate()
            .filter_map(|(idx, t)| match self.evaluate(idx, t) {
                MatchOutput::Match(m) => Some(m),
                MatchOutput::NoMatch => None,
            })
            .collect()
    }

    /// Union of the actions recommended by all firing triggers.
    #[must_use]
    pub fn recommended_ids(&self) -> HashSet<&'a ActionId> {
        self.protocol
            .triggers
            .iter()
            .filter(|t| self.fires(t))
            .flat_map(|t| t.then.iter())
            .collect()
    }
}

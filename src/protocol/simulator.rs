//! What-if simulation over a protocol's action model.
//!
//! The outcome model is linear and additive: the predicted value is the
//! baseline plus the sum of the engaged actions' impacts, with no interaction
//! terms. Every percentage uses the all-actions sum as its denominator and
//! resolves to 0 when that sum is not positive.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::id::ActionId;
use crate::view::ViewState;

use super::model::{Protocol, ProtocolAction};
use super::triggers::{TriggerMatch, TriggerMatcher};

/// Result of a what-if simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorResult {
    /// Baseline plus the engaged actions' impacts.
    pub predicted_value: f64,
    /// Protocol baseline.
    pub baseline_value: f64,
    /// `predicted_value - baseline_value`.
    pub delta_from_baseline: f64,
    /// Size of the caller's active set, unknown ids included.
    pub active_actions_count: usize,
    /// Signed sum of every action's impact.
    pub max_possible_delta: f64,
    /// Not clamped; exceeds 100 when negative-impact actions are left out.
    pub percent_of_max: f64,
}

/// An action with its effective toggle and its share of the impact ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionWithState {
    /// The underlying action.
    #[serde(flatten)]
    pub action: ProtocolAction,
    /// Effective engagement after overrides.
    pub is_toggled: bool,
    /// `impact / max_possible_delta * 100`, or 0.
    pub contribution_percent: f64,
}

/// `part / whole * 100`, or 0 when `whole` is not positive.
fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Stateless simulator borrowing one immutable protocol.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use vitalsim::{ActionId, Category, Protocol, ProtocolAction, ProtocolSimulator};
///
/// let protocol = Protocol::new("p1", "sarah", "HRV", "HRV", 60.0)
///     .with_action(ProtocolAction::new("a1", "Walk", Category::Activity, 8.0))
///     .with_action(ProtocolAction::new("a2", "Wine", Category::Nutrition, -3.0));
///
/// let active: HashSet<ActionId> = [ActionId::new("a1")].into_iter().collect();
/// let result = ProtocolSimulator::new(&protocol).simulate(&active);
/// assert_eq!(result.predicted_value, 68.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProtocolSimulator<'a> {
    protocol: &'a Protocol,
    config: EngineConfig,
}

impl<'a> ProtocolSimulator<'a> {
    /// Simulator with the default configuration.
    #[must_use]
    pub fn new(protocol: &'a Protocol) -> Self {
        Self::with_config(protocol, EngineConfig::default())
    }

    /// Simulator with an explicit configuration.
    #[must_use]
    pub fn with_config(protocol: &'a Protocol, config: EngineConfig) -> Self {
        Self { protocol, config }
    }

    /// The borrowed protocol.
    #[must_use]
    pub fn protocol(&self) -> &'a Protocol {
        self.protocol
    }

    /// Signed sum of every action's impact, engaged or not.
    #[must_use]
    pub fn max_impact(&self) -> f64 {
        self.protocol.actions.iter().map(|a| a.impact).sum()
    }

    /// Sum of impacts over the protocol's actions present in `active`.
    /// Ids the protocol does not define are ignored.
    #[must_use]
    pub fn current_impact(&self, active: &HashSet<ActionId>) -> f64 {
        self.protocol
            .actions
            .iter()
            .filter(|a| active.contains(&a.id))
            .map(|a| a.impact)
            .sum()
    }

    /// Baseline plus `current_impact(active)`.
    #[must_use]
    pub fn predicted_outcome(&self, active: &HashSet<ActionId>) -> f64 {
        self.protocol.baseline.value + self.current_impact(active)
    }

    /// Projects the outcome for an explicit active set.
    #[must_use]
    pub fn simulate(&self, active: &HashSet<ActionId>) -> SimulatorResult {
        let baseline = self.protocol.baseline.value;
        let predicted = self.predicted_outcome(active);
        let delta = predicted - baseline;
        let max = self.max_impact();

        let result = SimulatorResult {
            predicted_value: predicted,
            baseline_value: baseline,
            delta_from_baseline: delta,
            active_actions_count: active.len(),
            max_possible_delta: max,
            percent_of_max: percent_of(delta, max),
        };
        debug!(
            protocol = %self.protocol.id,
            active = active.len(),
            predicted = result.predicted_value,
            percent_of_max = result.percent_of_max,
            "simulated protocol"
        );
        result
    }

    /// Effective engaged set: an explicit override wins, otherwise the
    /// action's configured default applies. Overrides for unknown ids are
    /// ignored.
    #[must_use]
    pub fn active_action_ids(&self, overrides: &HashMap<ActionId, bool>) -> HashSet<ActionId> {
        self.protocol
            .actions
            .iter()
            .filter(|a| overrides.get(&a.id).copied().unwrap_or(a.is_active))
            .map(|a| a.id.clone())
            .collect()
    }

    /// Simulates the view's effective toggles.
    #[must_use]
    pub fn simulate_view(&self, view: &ViewState) -> SimulatorResult {
        self.simulate(&self.active_action_ids(&view.toggles))
    }

    /// Every action with its effective toggle and contribution percent, in
    /// protocol order.
    #[must_use]
    pub fn actions_with_state(&self, overrides: &HashMap<ActionId, bool>) -> Vec<ActionWithState> {
        let max = self.max_impact();
        self.protocol
            .actions
            .iter()
            .map(|a| ActionWithState {
                action: a.clone(),
                is_toggled: overrides.get(&a.id).copied().unwrap_or(a.is_active),
                contribution_percent: percent_of(a.impact, max),
            })
            .collect()
    }

    /// Actions recommended by the triggers that currently fire, in protocol
    /// order, each at most once.
    #[must_use]
    pub fn recommended_actions(&self) -> Vec<&'a ProtocolAction> {
        let recommended = TriggerMatcher::new(self.protocol).recommended_ids();
        let protocol = self.protocol;
        let out: Vec<&ProtocolAction> = protocol
            .actions
            .iter()
            .filter(|a| recommended.contains(&a.id))
            .collect();
        debug!(
            protocol = %protocol.id,
            recommended = out.len(),
            "evaluated triggers"
        );
        out
    }

    /// Triggers that currently fire and the known actions they name.
    #[must_use]
    pub fn fired_triggers(&self) -> Vec<TriggerMatch> {
        TriggerMatcher::new(self.protocol).fired()
    }

    /// Percentage of the protocol's actions present in `completed`; 0 for a
    /// protocol without actions.
    #[must_use]
    pub fn adherence(&self, completed: &HashSet<ActionId>) -> f64 {
        let total = self.protocol.actions.len();
        if total == 0 {
            return 0.0;
        }
        let done = self
            .protocol
            .actions
            .iter()
            .filter(|a| completed.contains(&a.id))
            .count();
        #[allow(clippy::cast_precision_loss)]
        let pct = 100.0 * done as f64 / total as f64;
        pct
    }

    /// Actions by descending impact, ties in protocol order, truncated to
    /// `limit`.
    #[must_use]
    pub fn top_impact_actions(&self, limit: usize) -> Vec<&'a ProtocolAction> {
        let protocol = self.protocol;
        let mut sorted: Vec<&ProtocolAction> = protocol.actions.iter().collect();
        sorted.sort_by(|a, b| b.impact.total_cmp(&a.impact));
        sorted.truncate(limit);
        sorted
    }

    /// `top_impact_actions` with the configured limit.
    #[must_use]
    pub fn top_impact_actions_default(&self) -> Vec<&'a ProtocolAction> {
        self.top_impact_actions(self.config.top_actions_limit)
    }
}

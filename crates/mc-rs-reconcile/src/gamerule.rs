//! Game rules. The one kind whose live value can be read back.

use mc_rs_command::RuleValue;
use serde::{Deserialize, Serialize};

use crate::client::GameRuleCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Tracked};

#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct GameRule {
    pub name: String,
    /// `true`/`false` or a base-10 integer.
    pub value: String,
}

impl GameRule {
    pub fn name(&self) -> &str {
        self.name.trim()
    }
}

/// Values compare by what the server stores, so `"TRUE"` equals the
/// `"true"` read back by a refresh.
impl PartialEq for GameRule {
    fn eq(&self, other: &Self) -> bool {
        if self.name() != other.name() {
            return false;
        }
        match (RuleValue::parse(&self.value), RuleValue::parse(&other.value)) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.value.trim() == other.value.trim(),
        }
    }
}

pub struct GameRuleReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: GameRuleCommands> GameRuleReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn set(&self, desired: &GameRule) -> Result<Applied<Tracked<GameRule>>, ReconcileError> {
        non_empty("name", &desired.name)?;
        let value = RuleValue::parse(&desired.value)?;
        self.client
            .set_rule(desired.name(), value)
            .await
            .map_err(|e| ReconcileError::command("set gamerule", e))?;
        let stored = GameRule {
            name: desired.name().to_string(),
            value: value.to_string(),
        };
        Ok(Applied::new(Tracked::new(desired.name(), stored)))
    }
}

impl<C: GameRuleCommands> Reconciler for GameRuleReconciler<'_, C> {
    type Desired = GameRule;
    type State = Tracked<GameRule>;

    const KIND: &'static str = "gamerule";

    async fn materialize(&self, desired: &GameRule) -> Result<Applied<Self::State>, ReconcileError> {
        self.set(desired).await
    }

    /// Replace the stored value with the one the server reports.
    async fn refresh(&self, state: &Self::State) -> Result<Applied<Self::State>, ReconcileError> {
        let live = self
            .client
            .read_rule(state.desired.name())
            .await
            .map_err(|e| ReconcileError::command("read gamerule", e))?;
        let mut refreshed = state.clone();
        refreshed.desired.value = live;
        Ok(Applied::new(refreshed))
    }

    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &GameRule,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.set(desired).await
    }

    /// Reset to the registered default. A rule without one cannot be torn
    /// down.
    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        self.client
            .reset_rule(state.desired.name())
            .await
            .map_err(|e| ReconcileError::command("reset gamerule", e))?;
        Ok(Applied::new(()))
    }

    fn requires_replacement(state: &Self::State, desired: &GameRule) -> bool {
        state.desired.name() != desired.name()
    }

    fn desired(state: &Self::State) -> &GameRule {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Player bans.

use serde::{Deserialize, Serialize};

use crate::client::BanCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Tracked};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ban {
    pub player: String,
    #[serde(default)]
    pub reason: Option<String>,
}

pub struct BanReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: BanCommands> BanReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn ban(&self, desired: &Ban) -> Result<Applied<Tracked<Ban>>, ReconcileError> {
        non_empty("player", &desired.player)?;
        let player = desired.player.trim();
        self.client
            .ban(player, desired.reason.as_deref())
            .await
            .map_err(|e| ReconcileError::command("ban player", e))?;
        Ok(Applied::new(Tracked::new(player, desired.clone())))
    }
}

impl<C: BanCommands> Reconciler for BanReconciler<'_, C> {
    type Desired = Ban;
    type State = Tracked<Ban>;

    const KIND: &'static str = "ban";

    async fn materialize(&self, desired: &Ban) -> Result<Applied<Self::State>, ReconcileError> {
        self.ban(desired).await
    }

    /// Re-issue the ban so the new reason is recorded.
    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &Ban,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.ban(desired).await
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        self.client
            .pardon(state.desired.player.trim())
            .await
            .map_err(|e| ReconcileError::command("pardon player", e))?;
        Ok(Applied::new(()))
    }

    fn requires_replacement(state: &Self::State, desired: &Ban) -> bool {
        state.desired.player.trim() != desired.player.trim()
    }

    fn desired(state: &Self::State) -> &Ban {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

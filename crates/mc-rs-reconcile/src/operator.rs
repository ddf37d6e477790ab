//! Operator grants.

use serde::{Deserialize, Serialize};

use crate::client::OperatorCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Tracked};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub player: String,
}

pub struct OperatorReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: OperatorCommands> OperatorReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn grant(&self, desired: &Operator) -> Result<Applied<Tracked<Operator>>, ReconcileError> {
        non_empty("player", &desired.player)?;
        let player = desired.player.trim();
        self.client
            .op(player)
            .await
            .map_err(|e| ReconcileError::command("op player", e))?;
        Ok(Applied::new(Tracked::new(player, desired.clone())))
    }
}

impl<C: OperatorCommands> Reconciler for OperatorReconciler<'_, C> {
    type Desired = Operator;
    type State = Tracked<Operator>;

    const KIND: &'static str = "op";

    async fn materialize(&self, desired: &Operator) -> Result<Applied<Self::State>, ReconcileError> {
        self.grant(desired).await
    }

    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &Operator,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.grant(desired).await
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        self.client
            .deop(state.desired.player.trim())
            .await
            .map_err(|e| ReconcileError::command("deop player", e))?;
        Ok(Applied::new(()))
    }

    fn requires_replacement(state: &Self::State, desired: &Operator) -> bool {
        state.desired.player.trim() != desired.player.trim()
    }

    fn desired(state: &Self::State) -> &Operator {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::RecordingTransport;
    use crate::CommandClient;

    #[tokio::test]
    async fn op_then_deop() {
        let client = CommandClient::new(RecordingTransport::new());
        let r = OperatorReconciler::new(&client);
        let state = r
            .materialize(&Operator {
                player: " alice ".into(),
            })
            .await
            .unwrap()
            .value;
        assert_eq!(state.id, "alice");
        r.tear_down(&state).await.unwrap();
        assert_eq!(client.transport().sent(), vec!["op alice", "deop alice"]);
    }
}

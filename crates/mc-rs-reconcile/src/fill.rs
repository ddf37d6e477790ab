//! Hollow region fills.

use mc_rs_command::{block::AIR, Coord};
use serde::{Deserialize, Serialize};

use crate::client::BlockCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Tracked};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub material: String,
    pub start: Coord,
    pub end: Coord,
}

impl Fill {
    /// `material|x,y,z->x,y,z`
    pub fn id(&self) -> String {
        let (s, e) = (self.start, self.end);
        format!(
            "{}|{},{},{}->{},{},{}",
            self.material.trim(),
            s.x,
            s.y,
            s.z,
            e.x,
            e.y,
            e.z
        )
    }
}

pub struct FillReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: BlockCommands> FillReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn fill(&self, desired: &Fill) -> Result<Applied<Tracked<Fill>>, ReconcileError> {
        non_empty("material", &desired.material)?;
        self.client
            .fill(desired.material.trim(), desired.start, desired.end)
            .await
            .map_err(|e| ReconcileError::command("fill region", e))?;
        Ok(Applied::new(Tracked::new(desired.id(), desired.clone())))
    }
}

impl<C: BlockCommands> Reconciler for FillReconciler<'_, C> {
    type Desired = Fill;
    type State = Tracked<Fill>;

    const KIND: &'static str = "fill";

    async fn materialize(&self, desired: &Fill) -> Result<Applied<Self::State>, ReconcileError> {
        self.fill(desired).await
    }

    /// Re-fills with the new material; the identity follows the material.
    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &Fill,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.fill(desired).await
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        let Fill { start, end, .. } = state.desired;
        self.client
            .fill(AIR, start, end)
            .await
            .map_err(|e| ReconcileError::command("clear region", e))?;
        Ok(Applied::new(()))
    }

    fn requires_replacement(state: &Self::State, desired: &Fill) -> bool {
        state.desired.start != desired.start || state.desired.end != desired.end
    }

    fn desired(state: &Self::State) -> &Fill {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Locks the world at daytime.

use serde::{Deserialize, Serialize};

use crate::client::DayLockCommands;
use crate::{Applied, ReconcileError, Reconciler, Tracked, Warning, WarningKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLock {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

const DAYLOCK_ID: &str = "default";

pub struct DayLockReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: DayLockCommands> DayLockReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn set(&self, desired: &DayLock) -> Result<Applied<Tracked<DayLock>>, ReconcileError> {
        self.client
            .set_day_lock(desired.enabled)
            .await
            .map_err(|e| ReconcileError::command("set day lock", e))?;
        Ok(Applied::new(Tracked::new(DAYLOCK_ID, desired.clone())))
    }
}

impl<C: DayLockCommands> Reconciler for DayLockReconciler<'_, C> {
    type Desired = DayLock;
    type State = Tracked<DayLock>;

    const KIND: &'static str = "daylock";

    async fn materialize(&self, desired: &DayLock) -> Result<Applied<Self::State>, ReconcileError> {
        self.set(desired).await
    }

    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &DayLock,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.set(desired).await
    }

    /// Unlock. The object is gone either way, so failure is only a warning.
    async fn tear_down(&self, _state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        let warnings = match self.client.set_day_lock(false).await {
            Ok(()) => Vec::new(),
            Err(e) => vec![Warning::from_error(WarningKind::Restore, "unlock daylight cycle", &e)],
        };
        Ok(Applied::with_warnings((), warnings))
    }

    fn requires_replacement(_state: &Self::State, _desired: &DayLock) -> bool {
        false
    }

    fn desired(state: &Self::State) -> &DayLock {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

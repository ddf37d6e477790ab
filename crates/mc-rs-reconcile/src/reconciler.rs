//! The lifecycle every object kind implements.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Applied, ReconcileError};

/// Brings one declared object into existence on the server and keeps it
/// there.
///
/// `State` is what the host persists between runs: the identity plus the
/// declaration that produced it and any captured snapshot. The host treats
/// it as opaque.
#[allow(async_fn_in_trait)]
pub trait Reconciler {
    type Desired: Clone + PartialEq + Serialize + DeserializeOwned;
    type State: Clone + Serialize + DeserializeOwned;

    const KIND: &'static str;

    async fn materialize(
        &self,
        desired: &Self::Desired,
    ) -> Result<Applied<Self::State>, ReconcileError>;

    /// Re-read the object. Kinds without a reliable query return the stored
    /// state unchanged, so drift is not detected for them.
    async fn refresh(&self, state: &Self::State) -> Result<Applied<Self::State>, ReconcileError> {
        Ok(Applied::new(state.clone()))
    }

    async fn reconcile(
        &self,
        state: &Self::State,
        desired: &Self::Desired,
    ) -> Result<Applied<Self::State>, ReconcileError>;

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError>;

    /// Whether moving from `state` to `desired` needs tear-down and
    /// materialize instead of [`Reconciler::reconcile`].
    fn requires_replacement(state: &Self::State, desired: &Self::Desired) -> bool;

    fn desired(state: &Self::State) -> &Self::Desired;

    fn identity(state: &Self::State) -> &str;
}

/// Stored state for kinds whose identity is all they add to the
/// declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracked<D> {
    pub id: String,
    pub desired: D,
}

impl<D> Tracked<D> {
    pub fn new(id: impl Into<String>, desired: D) -> Self {
        Self {
            id: id.into(),
            desired,
        }
    }
}

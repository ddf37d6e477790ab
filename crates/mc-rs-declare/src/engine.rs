//! Kind dispatch: maps a stored `kind` tag to its reconciler and runs one
//! lifecycle operation on untyped state.

use mc_rs_reconcile::ban::BanReconciler;
use mc_rs_reconcile::block::{BlockReconciler, StairsReconciler};
use mc_rs_reconcile::daylock::DayLockReconciler;
use mc_rs_reconcile::entity::{EntityKind, EntityReconciler};
use mc_rs_reconcile::fill::FillReconciler;
use mc_rs_reconcile::gamemode::GameModeReconciler;
use mc_rs_reconcile::gamerule::GameRuleReconciler;
use mc_rs_reconcile::membership::MembershipReconciler;
use mc_rs_reconcile::operator::OperatorReconciler;
use mc_rs_reconcile::structure::{BedReconciler, ChestReconciler};
use mc_rs_reconcile::team::TeamReconciler;
use mc_rs_reconcile::{CommandClient, ReconcileError, Reconciler, Transport, Warning};
use serde_json::Value;

use crate::error::HostError;

/// Reconciler types named by [`for_kind!`].
pub(crate) mod r {
    pub use mc_rs_reconcile::ban::BanReconciler;
    pub use mc_rs_reconcile::block::{BlockReconciler, StairsReconciler};
    pub use mc_rs_reconcile::daylock::DayLockReconciler;
    pub use mc_rs_reconcile::entity::{Entity, EntityReconciler, Sheep, Villager, Zombie};
    pub use mc_rs_reconcile::fill::FillReconciler;
    pub use mc_rs_reconcile::gamemode::GameModeReconciler;
    pub use mc_rs_reconcile::gamerule::GameRuleReconciler;
    pub use mc_rs_reconcile::membership::MembershipReconciler;
    pub use mc_rs_reconcile::operator::OperatorReconciler;
    pub use mc_rs_reconcile::structure::{BedReconciler, ChestReconciler};
    pub use mc_rs_reconcile::team::TeamReconciler;
}

/// A reconciler that can be built from a shared command client.
pub trait Bind<'c>: Reconciler + Sized {
    type Client;

    fn bind(client: &'c Self::Client) -> Self;
}

macro_rules! bind_reconcilers {
    ($($r:ident),* $(,)?) => {
        $(
            impl<'c, T: Transport> Bind<'c> for $r<'c, CommandClient<T>> {
                type Client = CommandClient<T>;

                fn bind(client: &'c CommandClient<T>) -> Self {
                    $r::new(client)
                }
            }
        )*
    };
}

bind_reconcilers!(
    BlockReconciler,
    StairsReconciler,
    FillReconciler,
    BedReconciler,
    ChestReconciler,
    TeamReconciler,
    MembershipReconciler,
    GameRuleReconciler,
    GameModeReconciler,
    DayLockReconciler,
    OperatorReconciler,
    BanReconciler,
);

impl<'c, T: Transport, K: EntityKind> Bind<'c> for EntityReconciler<'c, CommandClient<T>, K> {
    type Client = CommandClient<T>;

    fn bind(client: &'c CommandClient<T>) -> Self {
        EntityReconciler::new(client)
    }
}

/// Call the generic function `$func::<R>(args)` with `R` the reconciler for
/// `$kind` over `$client`, then apply any trailing tokens (such as
/// `.await`) inside each arm.
macro_rules! for_kind {
    ($kind:expr, $client:ty, $func:ident ( $($arg:expr),* ) $($suffix:tt)*) => {
        match $kind {
            "block" => $func::<$crate::engine::r::BlockReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "stairs" => $func::<$crate::engine::r::StairsReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "fill" => $func::<$crate::engine::r::FillReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "bed" => $func::<$crate::engine::r::BedReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "chest" => $func::<$crate::engine::r::ChestReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "entity" => $func::<$crate::engine::r::EntityReconciler<'_, $client, $crate::engine::r::Entity>>($($arg),*) $($suffix)*,
            "sheep" => $func::<$crate::engine::r::EntityReconciler<'_, $client, $crate::engine::r::Sheep>>($($arg),*) $($suffix)*,
            "zombie" => $func::<$crate::engine::r::EntityReconciler<'_, $client, $crate::engine::r::Zombie>>($($arg),*) $($suffix)*,
            "villager" => $func::<$crate::engine::r::EntityReconciler<'_, $client, $crate::engine::r::Villager>>($($arg),*) $($suffix)*,
            "team" => $func::<$crate::engine::r::TeamReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "team_member" => $func::<$crate::engine::r::MembershipReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "gamerule" => $func::<$crate::engine::r::GameRuleReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "gamemode" => $func::<$crate::engine::r::GameModeReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "daylock" => $func::<$crate::engine::r::DayLockReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "op" => $func::<$crate::engine::r::OperatorReconciler<'_, $client>>($($arg),*) $($suffix)*,
            "ban" => $func::<$crate::engine::r::BanReconciler<'_, $client>>($($arg),*) $($suffix)*,
            other => Err($crate::error::HostError::UnknownKind(other.to_string())),
        }
    };
}

pub(crate) use for_kind;

/// How a tracked object relates to its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drift {
    Replace,
    Update,
    InSync,
}

pub fn classify<R: Reconciler>(state: &Value, desired: &Value) -> Result<Drift, HostError> {
    let state: R::State = serde_json::from_value(state.clone())?;
    let desired: R::Desired = serde_json::from_value(desired.clone())?;
    Ok(if R::requires_replacement(&state, &desired) {
        Drift::Replace
    } else if *R::desired(&state) != desired {
        Drift::Update
    } else {
        Drift::InSync
    })
}

/// One lifecycle call on untyped data.
#[derive(Debug, Clone, Copy)]
pub enum Op<'v> {
    Create(&'v Value),
    Update { state: &'v Value, desired: &'v Value },
    Refresh(&'v Value),
    Delete(&'v Value),
}

#[derive(Debug)]
pub struct Executed {
    /// New state to store; `None` after a delete.
    pub state: Option<Value>,
    pub warnings: Vec<Warning>,
}

pub async fn execute<'c, R: Bind<'c>>(
    client: &'c R::Client,
    address: &str,
    op: Op<'_>,
) -> Result<Executed, HostError> {
    let r = R::bind(client);
    let fail = |source: ReconcileError| HostError::Reconcile {
        address: address.to_string(),
        source,
    };
    let applied = match op {
        Op::Create(desired) => {
            let desired: R::Desired = serde_json::from_value(desired.clone())?;
            r.materialize(&desired).await.map_err(fail)?
        }
        Op::Update { state, desired } => {
            let state: R::State = serde_json::from_value(state.clone())?;
            let desired: R::Desired = serde_json::from_value(desired.clone())?;
            r.reconcile(&state, &desired).await.map_err(fail)?
        }
        Op::Refresh(state) => {
            let state: R::State = serde_json::from_value(state.clone())?;
            r.refresh(&state).await.map_err(fail)?
        }
        Op::Delete(state) => {
            let state: R::State = serde_json::from_value(state.clone())?;
            let done = r.tear_down(&state).await.map_err(fail)?;
            return Ok(Executed {
                state: None,
                warnings: done.warnings,
            });
        }
    };
    Ok(Executed {
        state: Some(serde_json::to_value(&applied.value)?),
        warnings: applied.warnings,
    })
}

//! Executes planned steps against the server, saving state after each one.

use mc_rs_reconcile::{CommandClient, ReconcileError, Transport, Warning};
use tracing::{info, warn};

use crate::engine::{execute, for_kind, Executed, Op};
use crate::error::HostError;
use crate::plan::{Action, Step};
use crate::state::StateStore;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub steps: usize,
    pub warnings: usize,
}

impl Summary {
    fn report(&mut self, address: &str, warnings: &[Warning]) {
        for w in warnings {
            warn!("{address}: {w}");
        }
        self.warnings += warnings.len();
    }
}

async fn run_op<T: Transport>(
    client: &CommandClient<T>,
    kind: &str,
    address: &str,
    op: Op<'_>,
) -> Result<Executed, HostError> {
    for_kind!(kind, CommandClient<T>, execute(client, address, op).await)
}

fn tracked_state(store: &StateStore, address: &str) -> Result<(String, serde_json::Value), HostError> {
    store
        .get(address)
        .map(|o| (o.kind.clone(), o.state.clone()))
        .ok_or_else(|| HostError::NotTracked(address.to_string()))
}

async fn delete<T: Transport>(
    client: &CommandClient<T>,
    store: &mut StateStore,
    address: &str,
    summary: &mut Summary,
) -> Result<(), HostError> {
    let (kind, state) = tracked_state(store, address)?;
    let done = run_op(client, &kind, address, Op::Delete(&state)).await?;
    summary.report(address, &done.warnings);
    store.remove(address);
    store.save()
}

fn record(
    store: &mut StateStore,
    step: &Step,
    done: Executed,
    summary: &mut Summary,
) -> Result<(), HostError> {
    summary.report(&step.address, &done.warnings);
    if let Some(state) = done.state {
        store.upsert(&step.address, &step.kind, state);
    }
    store.save()
}

/// Run `steps` in order, stopping at the first hard error. Every completed
/// step is already saved when an error is returned.
pub async fn apply<T: Transport>(
    client: &CommandClient<T>,
    store: &mut StateStore,
    steps: &[Step],
) -> Result<Summary, HostError> {
    let mut summary = Summary::default();
    for step in steps {
        let address = step.address.as_str();
        info!("{} {address} ({})", step.action, step.kind);
        match step.action {
            Action::Create => {
                let done = run_op(client, &step.kind, address, Op::Create(&step.desired)).await?;
                record(store, step, done, &mut summary)?;
            }
            Action::Update => {
                let (_, state) = tracked_state(store, address)?;
                let op = Op::Update {
                    state: &state,
                    desired: &step.desired,
                };
                let done = run_op(client, &step.kind, address, op).await?;
                record(store, step, done, &mut summary)?;
            }
            Action::Refresh => {
                let (_, state) = tracked_state(store, address)?;
                let done = run_op(client, &step.kind, address, Op::Refresh(&state)).await?;
                record(store, step, done, &mut summary)?;
            }
            Action::Replace => {
                delete(client, store, address, &mut summary).await?;
                let done = run_op(client, &step.kind, address, Op::Create(&step.desired)).await?;
                record(store, step, done, &mut summary)?;
            }
            Action::Delete => delete(client, store, address, &mut summary).await?,
        }
        summary.steps += 1;
    }
    Ok(summary)
}

/// Re-read every tracked object.
pub async fn refresh_all<T: Transport>(
    client: &CommandClient<T>,
    store: &mut StateStore,
) -> Result<Summary, HostError> {
    let mut summary = Summary::default();
    let tracked = store.objects().to_vec();
    for object in tracked {
        info!("refresh {} ({})", object.address, object.kind);
        let done = run_op(client, &object.kind, &object.address, Op::Refresh(&object.state)).await?;
        summary.report(&object.address, &done.warnings);
        if let Some(state) = done.state {
            store.upsert(&object.address, &object.kind, state);
        }
        store.save()?;
        summary.steps += 1;
    }
    Ok(summary)
}

/// Tear down everything tracked, newest first.
pub async fn destroy_all<T: Transport>(
    client: &CommandClient<T>,
    store: &mut StateStore,
) -> Result<Summary, HostError> {
    let mut summary = Summary::default();
    let addresses: Vec<String> = store.objects().iter().map(|o| o.address.clone()).collect();
    for address in addresses.iter().rev() {
        info!("delete {address}");
        delete(client, store, address, &mut summary).await?;
        summary.steps += 1;
    }
    Ok(summary)
}

/// Log the rollback warnings carried by a partial failure.
pub fn log_failure(err: &HostError) {
    if let HostError::Reconcile {
        address,
        source: ReconcileError::PartialFailure { compensation, .. },
    } = err
    {
        for w in compensation {
            warn!("{address}: {w}");
        }
    }
}

//! Diff declarations against tracked state.

use std::fmt;

use mc_rs_rcon::RconClient;
use mc_rs_reconcile::CommandClient;
use serde_json::Value;

use crate::engine::{classify, for_kind, Drift};
use crate::error::HostError;
use crate::resources::Declaration;
use crate::state::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    /// Tear down, then create.
    Replace,
    Refresh,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Replace => "replace",
            Action::Refresh => "refresh",
            Action::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub address: String,
    /// The declared kind; for deletes, the tracked kind.
    pub kind: String,
    pub action: Action,
    /// Declared attributes; `Null` for deletes.
    pub desired: Value,
}

/// Deletes of undeclared objects first, then one step per declaration in
/// declaration order.
pub fn plan(declared: &[Declaration], store: &StateStore) -> Result<Vec<Step>, HostError> {
    let mut steps: Vec<Step> = store
        .objects()
        .iter()
        .filter(|o| !declared.iter().any(|d| d.address == o.address))
        .map(|o| Step {
            address: o.address.clone(),
            kind: o.kind.clone(),
            action: Action::Delete,
            desired: Value::Null,
        })
        .collect();

    for decl in declared {
        let (kind, desired) = decl.split()?;
        let action = match store.get(&decl.address) {
            None => Action::Create,
            Some(tracked) if tracked.kind != kind => Action::Replace,
            Some(tracked) => {
                let drift = for_kind!(
                    kind.as_str(),
                    CommandClient<RconClient>,
                    classify(&tracked.state, &desired)
                )?;
                match drift {
                    Drift::Replace => Action::Replace,
                    Drift::Update => Action::Update,
                    Drift::InSync => Action::Refresh,
                }
            }
        };
        steps.push(Step {
            address: decl.address.clone(),
            kind,
            action,
            desired,
        });
    }
    Ok(steps)
}

/// Human-readable plan, one line per step plus a totals line.
pub fn render(steps: &[Step]) -> String {
    let mut out = String::new();
    let count = |a: Action| steps.iter().filter(|s| s.action == a).count();
    for step in steps {
        let symbol = match step.action {
            Action::Create => "+",
            Action::Update => "~",
            Action::Replace => "-/+",
            Action::Refresh => "=",
            Action::Delete => "-",
        };
        out.push_str(&format!("{symbol:>3} {} ({})\n", step.address, step.kind));
    }
    out.push_str(&format!(
        "Plan: {} to create, {} to update, {} to replace, {} to delete.\n",
        count(Action::Create),
        count(Action::Update),
        count(Action::Replace),
        count(Action::Delete),
    ));
    out
}

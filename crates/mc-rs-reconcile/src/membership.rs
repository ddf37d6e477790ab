//! Team membership for exactly one target: a player, a raw selector, or a
//! summoned entity addressed by its marker.

use mc_rs_command::selector::selector_by_marker;
use mc_rs_command::{Marker, ValidationError};
use serde::{Deserialize, Serialize};

use crate::client::MembershipCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Tracked, Warning, WarningKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub team: String,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
    /// Marker of a summoned entity.
    #[serde(default)]
    pub entity_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipTarget {
    Player(String),
    Selector(String),
    Entity(Marker),
}

impl MembershipTarget {
    /// The single non-blank target of `m`.
    pub fn pick(m: &Membership) -> Result<Self, ValidationError> {
        let set = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let mut targets: Vec<MembershipTarget> = [
            set(&m.player).map(MembershipTarget::Player),
            set(&m.selector).map(MembershipTarget::Selector),
            set(&m.entity_id).map(|s| MembershipTarget::Entity(Marker::from_stored(s))),
        ]
        .into_iter()
        .flatten()
        .collect();
        match targets.len() {
            0 => Err(ValidationError::NoMembershipTarget),
            1 => Ok(targets.remove(0)),
            n => Err(ValidationError::MultipleMembershipTargets(n)),
        }
    }

    pub fn from_parts(kind: &str, value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        match kind {
            "player" => Some(MembershipTarget::Player(value.to_string())),
            "selector" => Some(MembershipTarget::Selector(value.to_string())),
            "entity" => Some(MembershipTarget::Entity(Marker::from_stored(value))),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MembershipTarget::Player(_) => "player",
            MembershipTarget::Selector(_) => "selector",
            MembershipTarget::Entity(_) => "entity",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            MembershipTarget::Player(v) | MembershipTarget::Selector(v) => v,
            MembershipTarget::Entity(m) => m.as_str(),
        }
    }

    /// The target as it appears in a `team join`/`team leave` command.
    pub fn to_target(&self) -> String {
        match self {
            MembershipTarget::Player(v) | MembershipTarget::Selector(v) => v.clone(),
            MembershipTarget::Entity(m) => selector_by_marker(m),
        }
    }
}

/// `team|kind|value`
pub fn membership_id(team: &str, target: &MembershipTarget) -> String {
    format!("{team}|{}|{}", target.kind(), target.value())
}

/// Recover the target from a stored identity.
pub fn parse_membership_id(id: &str) -> Option<MembershipTarget> {
    let mut parts = id.splitn(3, '|');
    let (_team, kind, value) = (parts.next()?, parts.next()?, parts.next()?);
    MembershipTarget::from_parts(kind, value)
}

pub struct MembershipReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: MembershipCommands> MembershipReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn join(
        &self,
        desired: &Membership,
    ) -> Result<Applied<Tracked<Membership>>, ReconcileError> {
        non_empty("team", &desired.team)?;
        let team = desired.team.trim();
        let target = MembershipTarget::pick(desired)?;
        self.client
            .join_team(team, &[target.to_target().as_str()])
            .await
            .map_err(|e| ReconcileError::command("join team", e))?;
        Ok(Applied::new(Tracked::new(
            membership_id(team, &target),
            desired.clone(),
        )))
    }
}

impl<C: MembershipCommands> Reconciler for MembershipReconciler<'_, C> {
    type Desired = Membership;
    type State = Tracked<Membership>;

    const KIND: &'static str = "team_member";

    async fn materialize(
        &self,
        desired: &Membership,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.join(desired).await
    }

    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &Membership,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.join(desired).await
    }

    /// Leave using the stored fields, falling back to the identity when the
    /// fields no longer name exactly one target.
    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        let target = MembershipTarget::pick(&state.desired)
            .ok()
            .or_else(|| parse_membership_id(&state.id));
        let Some(target) = target else {
            return Ok(Applied::with_warnings(
                (),
                vec![Warning::new(
                    WarningKind::Compensation,
                    format!("no membership target recoverable from {:?}", state.id),
                )],
            ));
        };
        self.client
            .leave_team(&[target.to_target().as_str()])
            .await
            .map_err(|e| ReconcileError::command("leave team", e))?;
        Ok(Applied::new(()))
    }

    fn requires_replacement(state: &Self::State, desired: &Membership) -> bool {
        state.desired != *desired
    }

    fn desired(state: &Self::State) -> &Membership {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

// ============================================================================
// Tests
// ============================================================================

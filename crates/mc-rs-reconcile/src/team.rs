//! Scoreboard teams.

use mc_rs_command::team::display_or_name;
use mc_rs_command::{CollisionRule, NametagVisibility, TeamColor, TeamOption};
use serde::{Deserialize, Serialize};

use crate::client::TeamCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Tracked, Warning, WarningKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub color: Option<TeamColor>,
    #[serde(default)]
    pub friendly_fire: Option<bool>,
    #[serde(default)]
    pub see_friendly_invisibles: Option<bool>,
    #[serde(default)]
    pub nametag_visibility: Option<NametagVisibility>,
    #[serde(default)]
    pub collision_rule: Option<CollisionRule>,
}

impl Team {
    pub fn name(&self) -> &str {
        self.name.trim()
    }

    /// The display text, defaulting to the bare name.
    pub fn display(&self) -> &str {
        display_or_name(self.name(), self.display_name.as_deref())
    }

    /// Every option that is set, display name excluded.
    pub fn options(&self) -> Vec<TeamOption> {
        let mut options = Vec::new();
        if let Some(c) = self.color {
            options.push(TeamOption::Color(c));
        }
        if let Some(b) = self.friendly_fire {
            options.push(TeamOption::FriendlyFire(b));
        }
        if let Some(b) = self.see_friendly_invisibles {
            options.push(TeamOption::SeeFriendlyInvisibles(b));
        }
        if let Some(v) = self.nametag_visibility {
            options.push(TeamOption::NametagVisibility(v));
        }
        if let Some(r) = self.collision_rule {
            options.push(TeamOption::CollisionRule(r));
        }
        options
    }
}

pub struct TeamReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: TeamCommands> TeamReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn apply_options(&self, team: &Team) -> Result<(), ReconcileError> {
        for option in team.options() {
            self.client
                .modify_team(team.name(), &option)
                .await
                .map_err(|e| {
                    ReconcileError::command(format!("set team {}", option.attribute()), e)
                })?;
        }
        Ok(())
    }
}

impl<C: TeamCommands> Reconciler for TeamReconciler<'_, C> {
    type Desired = Team;
    type State = Tracked<Team>;

    const KIND: &'static str = "team";

    /// Create the team, then apply each set option. If an option fails the
    /// team is removed again.
    async fn materialize(&self, desired: &Team) -> Result<Applied<Self::State>, ReconcileError> {
        non_empty("name", &desired.name)?;
        let name = desired.name();
        self.client
            .create_team(name, desired.display())
            .await
            .map_err(|e| ReconcileError::command("create team", e))?;

        if let Err(err) = self.apply_options(desired).await {
            let (action, source) = match err {
                ReconcileError::Command { action, source } => (action, source),
                other => return Err(other),
            };
            let mut compensation = Vec::new();
            if let Err(e) = self.client.remove_team(name).await {
                compensation.push(Warning::from_error(
                    WarningKind::Compensation,
                    &format!("remove team {name}"),
                    &e,
                ));
            }
            return Err(ReconcileError::partial(action, source, compensation));
        }
        Ok(Applied::new(Tracked::new(name, desired.clone())))
    }

    async fn reconcile(
        &self,
        state: &Self::State,
        desired: &Team,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        if state.desired.display() != desired.display() {
            let option = TeamOption::DisplayName(desired.display().to_string());
            self.client
                .modify_team(desired.name(), &option)
                .await
                .map_err(|e| ReconcileError::command("set team displayName", e))?;
        }
        self.apply_options(desired).await?;
        Ok(Applied::new(Tracked::new(desired.name(), desired.clone())))
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        self.client
            .remove_team(state.desired.name())
            .await
            .map_err(|e| ReconcileError::command("remove team", e))?;
        Ok(Applied::new(()))
    }

    fn requires_replacement(state: &Self::State, desired: &Team) -> bool {
        state.desired.name() != desired.name()
    }

    fn desired(state: &Self::State) -> &Team {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

// ============================================================================
// Tests
// ============================================================================

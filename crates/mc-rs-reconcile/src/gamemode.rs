//! Default or per-player game mode, restored to its previous value on
//! tear-down.

use mc_rs_command::GameMode;
use serde::{Deserialize, Serialize};

use crate::client::{ClientError, GameModeCommands};
use crate::{Applied, ReconcileError, Reconciler, Warning, WarningKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameModeSetting {
    pub mode: GameMode,
    /// Unset for the server default.
    #[serde(default)]
    pub player: Option<String>,
}

impl GameModeSetting {
    pub fn player(&self) -> Option<&str> {
        self.player.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// `default` or `player:<name>`
    pub fn id(&self) -> String {
        match self.player() {
            Some(p) => format!("player:{p}"),
            None => "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameModeState {
    pub id: String,
    pub desired: GameModeSetting,
    /// The mode in effect before this object first changed it.
    pub previous_mode: Option<GameMode>,
}

pub struct GameModeReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: GameModeCommands> GameModeReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn current(&self, setting: &GameModeSetting) -> Result<GameMode, ClientError> {
        match setting.player() {
            Some(p) => self.client.user_game_mode(p).await,
            None => self.client.default_game_mode().await,
        }
    }

    async fn apply(&self, setting: &GameModeSetting, mode: GameMode) -> Result<(), ClientError> {
        match setting.player() {
            Some(p) => self.client.set_user_game_mode(p, mode).await,
            None => self.client.set_default_game_mode(mode).await,
        }
    }

    /// Read the current mode, keeping `fallback` with a warning on failure.
    async fn snapshot(
        &self,
        setting: &GameModeSetting,
        fallback: Option<GameMode>,
        warnings: &mut Vec<Warning>,
    ) -> Option<GameMode> {
        match self.current(setting).await {
            Ok(mode) => Some(mode),
            Err(e) => {
                warnings.push(Warning::from_error(
                    WarningKind::Snapshot,
                    &format!("read {} game mode", setting.id()),
                    &e,
                ));
                fallback
            }
        }
    }

    async fn set(
        &self,
        desired: &GameModeSetting,
        fallback: Option<GameMode>,
    ) -> Result<Applied<GameModeState>, ReconcileError> {
        let mut warnings = Vec::new();
        let previous_mode = self.snapshot(desired, fallback, &mut warnings).await;
        self.apply(desired, desired.mode)
            .await
            .map_err(|e| ReconcileError::command("set game mode", e))?;
        Ok(Applied::with_warnings(
            GameModeState {
                id: desired.id(),
                desired: desired.clone(),
                previous_mode,
            },
            warnings,
        ))
    }
}

impl<C: GameModeCommands> Reconciler for GameModeReconciler<'_, C> {
    type Desired = GameModeSetting;
    type State = GameModeState;

    const KIND: &'static str = "gamemode";

    async fn materialize(
        &self,
        desired: &GameModeSetting,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.set(desired, None).await
    }

    /// Re-read the live mode. A failed read keeps the stored state.
    async fn refresh(&self, state: &Self::State) -> Result<Applied<Self::State>, ReconcileError> {
        match self.current(&state.desired).await {
            Ok(mode) => {
                let mut refreshed = state.clone();
                refreshed.desired.mode = mode;
                Ok(Applied::new(refreshed))
            }
            Err(e) => Ok(Applied::with_warnings(
                state.clone(),
                vec![Warning::from_error(
                    WarningKind::Refresh,
                    &format!("read {} game mode", state.id),
                    &e,
                )],
            )),
        }
    }

    async fn reconcile(
        &self,
        state: &Self::State,
        desired: &GameModeSetting,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.set(desired, state.previous_mode).await
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        let Some(previous) = state.previous_mode else {
            return Ok(Applied::new(()));
        };
        let warnings = match self.apply(&state.desired, previous).await {
            Ok(()) => Vec::new(),
            Err(e) => vec![Warning::from_error(
                WarningKind::Restore,
                &format!("restore {} game mode to {previous}", state.id),
                &e,
            )],
        };
        Ok(Applied::with_warnings((), warnings))
    }

    fn requires_replacement(state: &Self::State, desired: &GameModeSetting) -> bool {
        state.desired.player() != desired.player()
    }

    fn desired(state: &Self::State) -> &GameModeSetting {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::transport::TransportError;

    /// Implements only the game-mode capability.
    struct FakeModes {
        current: Mutex<GameMode>,
        fail_reads: bool,
        fail_sets: Mutex<bool>,
        sets: Mutex<Vec<(Option<String>, GameMode)>>,
    }

    impl FakeModes {
        fn new(current: GameMode) -> Self {
            Self {
                current: Mutex::new(current),
                fail_reads: false,
                fail_sets: Mutex::new(false),
                sets: Mutex::new(Vec::new()),
            }
        }

        fn failure() -> ClientError {
            ClientError::Transport(TransportError::ErrorReply {
                command: "fake".into(),
                reply: "no".into(),
            })
        }

        fn record(&self, player: Option<&str>, mode: GameMode) -> Result<(), ClientError> {
            if *self.fail_sets.lock().unwrap() {
                return Err(Self::failure());
            }
            self.sets
                .lock()
                .unwrap()
                .push((player.map(str::to_string), mode));
            *self.current.lock().unwrap() = mode;
            Ok(())
        }

        fn read(&self) -> Result<GameMode, ClientError> {
            if self.fail_reads {
                return Err(Self::failure());
            }
            Ok(*self.current.lock().unwrap())
        }
    }

    impl GameModeCommands for FakeModes {
        async fn default_game_mode(&self) -> Result<GameMode, ClientError> {
            self.read()
        }

        async fn user_game_mode(&self, _player: &str) -> Result<GameMode, ClientError> {
            self.read()
        }

        async fn set_default_game_mode(&self, mode: GameMode) -> Result<(), ClientError> {
            self.record(None, mode)
        }

        async fn set_user_game_mode(&self, player: &str, mode: GameMode) -> Result<(), ClientError> {
            self.record(Some(player), mode)
        }
    }

    fn alice(mode: GameMode) -> GameModeSetting {
        GameModeSetting {
            mode,
            player: Some("alice".into()),
        }
    }

    #[tokio::test]
    async fn snapshot_then_restore() {
        let fake = FakeModes::new(GameMode::Adventure);
        let r = GameModeReconciler::new(&fake);
        let applied = r.materialize(&alice(GameMode::Creative)).await.unwrap();
        assert!(applied.warnings.is_empty());
        let state = applied.value;
        assert_eq!(state.id, "player:alice");
        assert_eq!(state.previous_mode, Some(GameMode::Adventure));

        let done = r.tear_down(&state).await.unwrap();
        assert!(done.warnings.is_empty());
        assert_eq!(
            *fake.sets.lock().unwrap(),
            vec![
                (Some("alice".to_string()), GameMode::Creative),
                (Some("alice".to_string()), GameMode::Adventure),
            ]
        );
    }

    #[tokio::test]
    async fn failed_restore_is_a_warning() {
        let fake = FakeModes::new(GameMode::Survival);
        let r = GameModeReconciler::new(&fake);
        let state = r.materialize(&alice(GameMode::Spectator)).await.unwrap().value;
        *fake.fail_sets.lock().unwrap() = true;
        let done = r.tear_down(&state).await.unwrap();
        assert_eq!(done.warnings.len(), 1);
        assert_eq!(done.warnings[0].kind, WarningKind::Restore);
    }

    #[tokio::test]
    async fn failed_snapshot_still_sets_mode() {
        let mut fake = FakeModes::new(GameMode::Survival);
        fake.fail_reads = true;
        let r = GameModeReconciler::new(&fake);
        let setting = GameModeSetting {
            mode: GameMode::Creative,
            player: None,
        };
        let applied = r.materialize(&setting).await.unwrap();
        assert_eq!(applied.value.id, "default");
        assert_eq!(applied.value.previous_mode, None);
        assert_eq!(applied.warnings[0].kind, WarningKind::Snapshot);
        assert_eq!(*fake.sets.lock().unwrap(), vec![(None, GameMode::Creative)]);

        // Nothing was captured, so tear-down sends nothing.
        r.tear_down(&applied.value).await.unwrap();
        assert_eq!(fake.sets.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_failure_keeps_state() {
        let mut fake = FakeModes::new(GameMode::Survival);
        let state = GameModeState {
            id: "player:alice".into(),
            desired: alice(GameMode::Creative),
            previous_mode: Some(GameMode::Survival),
        };
        let live = GameModeReconciler::new(&fake).refresh(&state).await.unwrap();
        assert_eq!(live.value.desired.mode, GameMode::Survival);

        fake.fail_reads = true;
        let kept = GameModeReconciler::new(&fake).refresh(&state).await.unwrap();
        assert_eq!(kept.value, state);
        assert_eq!(kept.warnings[0].kind, WarningKind::Refresh);
    }

    #[test]
    fn player_change_replaces() {
        let state = GameModeState {
            id: "player:alice".into(),
            desired: alice(GameMode::Creative),
            previous_mode: None,
        };
        type R<'a> = GameModeReconciler<'a, FakeModes>;
        assert!(!R::requires_replacement(&state, &alice(GameMode::Survival)));
        let bob = GameModeSetting {
            mode: GameMode::Creative,
            player: Some("bob".into()),
        };
        assert!(R::requires_replacement(&state, &bob));
    }
}

//! Command clients narrowed to what each reconciler needs.
//!
//! Every reconciler depends on exactly one capability trait, so tests can
//! substitute a fake that implements only that capability.
//! [`CommandClient`] implements all of them over a [`Transport`].

use mc_rs_command::{
    block, entity, player, team, BlockPlacement, Coord, GameMode, Marker, RuleError, RuleRegistry,
    RuleValue, TeamOption, ValidationError,
};
use thiserror::Error;
use tracing::debug;

use crate::transport::{Transport, TransportError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unexpected reply to {command:?}: {reply:?}")]
    UnexpectedReply { command: String, reply: String },

    #[error("server reported unknown game mode id {0}")]
    UnknownGameModeId(i32),
}

#[allow(async_fn_in_trait)]
pub trait BlockCommands {
    async fn set_block(&self, block: &BlockPlacement) -> Result<(), ClientError>;
    async fn clear_block(&self, at: Coord) -> Result<(), ClientError>;
    async fn fill(&self, material: &str, from: Coord, to: Coord) -> Result<(), ClientError>;
}

#[allow(async_fn_in_trait)]
pub trait EntityCommands {
    async fn summon(
        &self,
        entity_type: &str,
        at: Coord,
        marker: &Marker,
        extra_nbt: &[String],
    ) -> Result<(), ClientError>;
    async fn kill_marked(&self, entity_type: &str, marker: &Marker) -> Result<(), ClientError>;
    async fn clear_marked_items(
        &self,
        entity_type: &str,
        marker: &Marker,
    ) -> Result<(), ClientError>;
}

#[allow(async_fn_in_trait)]
pub trait TeamCommands {
    async fn create_team(&self, name: &str, display: &str) -> Result<(), ClientError>;
    async fn remove_team(&self, name: &str) -> Result<(), ClientError>;
    async fn modify_team(&self, name: &str, option: &TeamOption) -> Result<(), ClientError>;
}

#[allow(async_fn_in_trait)]
pub trait MembershipCommands {
    async fn join_team(&self, team: &str, targets: &[&str]) -> Result<(), ClientError>;
    async fn leave_team(&self, targets: &[&str]) -> Result<(), ClientError>;
}

#[allow(async_fn_in_trait)]
pub trait GameRuleCommands {
    async fn set_rule(&self, name: &str, value: RuleValue) -> Result<(), ClientError>;
    async fn reset_rule(&self, name: &str) -> Result<(), ClientError>;
    /// The live value as text, extracted from the query reply.
    async fn read_rule(&self, name: &str) -> Result<String, ClientError>;
}

#[allow(async_fn_in_trait)]
pub trait GameModeCommands {
    async fn default_game_mode(&self) -> Result<GameMode, ClientError>;
    async fn user_game_mode(&self, player: &str) -> Result<GameMode, ClientError>;
    async fn set_default_game_mode(&self, mode: GameMode) -> Result<(), ClientError>;
    async fn set_user_game_mode(&self, player: &str, mode: GameMode) -> Result<(), ClientError>;
}

#[allow(async_fn_in_trait)]
pub trait DayLockCommands {
    async fn set_day_lock(&self, enabled: bool) -> Result<(), ClientError>;
}

#[allow(async_fn_in_trait)]
pub trait OperatorCommands {
    async fn op(&self, player: &str) -> Result<(), ClientError>;
    async fn deop(&self, player: &str) -> Result<(), ClientError>;
}

#[allow(async_fn_in_trait)]
pub trait BanCommands {
    async fn ban(&self, player: &str, reason: Option<&str>) -> Result<(), ClientError>;
    async fn pardon(&self, player: &str) -> Result<(), ClientError>;
}

/// Formats commands and sends them one at a time, awaiting each reply.
pub struct CommandClient<T> {
    transport: T,
    rules: &'static RuleRegistry,
}

impl<T: Transport> CommandClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_rules(transport, RuleRegistry::vanilla())
    }

    pub fn with_rules(transport: T, rules: &'static RuleRegistry) -> Self {
        Self { transport, rules }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn run(&self, command: &str) -> Result<String, ClientError> {
        debug!("sending command: {command}");
        Ok(self.transport.send(command).await?)
    }

    async fn query_game_mode(&self, command: &str) -> Result<GameMode, ClientError> {
        let reply = self.run(command).await?;
        parse_game_mode(command, &reply)
    }
}

/// Parse a `data get` reply such as
/// `alice has the following entity data: 1`.
pub fn parse_game_mode(command: &str, reply: &str) -> Result<GameMode, ClientError> {
    let unexpected = || ClientError::UnexpectedReply {
        command: command.to_string(),
        reply: reply.to_string(),
    };
    let (_, tail) = reply.rsplit_once(':').ok_or_else(unexpected)?;
    let id: i32 = tail
        .trim()
        .trim_end_matches('}')
        .trim()
        .parse()
        .map_err(|_| unexpected())?;
    GameMode::from_id(id).ok_or(ClientError::UnknownGameModeId(id))
}

impl<T: Transport> BlockCommands for CommandClient<T> {
    async fn set_block(&self, b: &BlockPlacement) -> Result<(), ClientError> {
        self.run(&block::set_block(b)).await.map(drop)
    }

    async fn clear_block(&self, at: Coord) -> Result<(), ClientError> {
        self.run(&block::clear_block(at)).await.map(drop)
    }

    async fn fill(&self, material: &str, from: Coord, to: Coord) -> Result<(), ClientError> {
        self.run(&block::fill(material, from, to)).await.map(drop)
    }
}

impl<T: Transport> EntityCommands for CommandClient<T> {
    async fn summon(
        &self,
        entity_type: &str,
        at: Coord,
        marker: &Marker,
        extra_nbt: &[String],
    ) -> Result<(), ClientError> {
        self.run(&entity::summon(entity_type, at, marker, extra_nbt))
            .await
            .map(drop)
    }

    async fn kill_marked(&self, entity_type: &str, marker: &Marker) -> Result<(), ClientError> {
        self.run(&entity::kill_marked(entity_type, marker))
            .await
            .map(drop)
    }

    async fn clear_marked_items(
        &self,
        entity_type: &str,
        marker: &Marker,
    ) -> Result<(), ClientError> {
        self.run(&entity::clear_marked_items(entity_type, marker))
            .await
            .map(drop)
    }
}

impl<T: Transport> TeamCommands for CommandClient<T> {
    async fn create_team(&self, name: &str, display: &str) -> Result<(), ClientError> {
        self.run(&team::team_add(name, display)).await.map(drop)
    }

    async fn remove_team(&self, name: &str) -> Result<(), ClientError> {
        self.run(&team::team_remove(name)).await.map(drop)
    }

    async fn modify_team(&self, name: &str, option: &TeamOption) -> Result<(), ClientError> {
        self.run(&team::team_modify(name, option)).await.map(drop)
    }
}

impl<T: Transport> MembershipCommands for CommandClient<T> {
    async fn join_team(&self, name: &str, targets: &[&str]) -> Result<(), ClientError> {
        let command =
            team::team_join(name, targets).ok_or(ValidationError::NoMembershipTarget)?;
        self.run(&command).await.map(drop)
    }

    async fn leave_team(&self, targets: &[&str]) -> Result<(), ClientError> {
        let command = team::team_leave(targets).ok_or(ValidationError::NoMembershipTarget)?;
        self.run(&command).await.map(drop)
    }
}

impl<T: Transport> GameRuleCommands for CommandClient<T> {
    async fn set_rule(&self, name: &str, value: RuleValue) -> Result<(), ClientError> {
        let command = self.rules.set(name, value)?;
        self.run(&command).await.map(drop)
    }

    async fn reset_rule(&self, name: &str) -> Result<(), ClientError> {
        let command = self.rules.reset_to_default(name)?;
        self.run(&command).await.map(drop)
    }

    async fn read_rule(&self, name: &str) -> Result<String, ClientError> {
        let reply = self.run(&self.rules.query(name)).await?;
        Ok(RuleRegistry::parse_reply(&reply))
    }
}

impl<T: Transport> GameModeCommands for CommandClient<T> {
    async fn default_game_mode(&self) -> Result<GameMode, ClientError> {
        self.query_game_mode(&player::query_default_gamemode()).await
    }

    async fn user_game_mode(&self, name: &str) -> Result<GameMode, ClientError> {
        self.query_game_mode(&player::query_player_gamemode(name))
            .await
    }

    async fn set_default_game_mode(&self, mode: GameMode) -> Result<(), ClientError> {
        self.run(&player::default_gamemode(mode)).await.map(drop)
    }

    async fn set_user_game_mode(&self, name: &str, mode: GameMode) -> Result<(), ClientError> {
        self.run(&player::gamemode(mode, name)).await.map(drop)
    }
}

impl<T: Transport> DayLockCommands for CommandClient<T> {
    async fn set_day_lock(&self, enabled: bool) -> Result<(), ClientError> {
        if enabled {
            self.run(&player::time_set_day()).await?;
        }
        let command = self.rules.set_bool("doDaylightCycle", !enabled)?;
        self.run(&command).await.map(drop)
    }
}

impl<T: Transport> OperatorCommands for CommandClient<T> {
    async fn op(&self, name: &str) -> Result<(), ClientError> {
        self.run(&player::op(name)).await.map(drop)
    }

    async fn deop(&self, name: &str) -> Result<(), ClientError> {
        self.run(&player::deop(name)).await.map(drop)
    }
}

impl<T: Transport> BanCommands for CommandClient<T> {
    async fn ban(&self, name: &str, reason: Option<&str>) -> Result<(), ClientError> {
        self.run(&player::ban(name, reason)).await.map(drop)
    }

    async fn pardon(&self, name: &str) -> Result<(), ClientError> {
        self.run(&player::pardon(name)).await.map(drop)
    }
}

// ============================================================================
// Tests
// ============================================================================

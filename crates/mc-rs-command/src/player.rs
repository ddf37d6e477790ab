//! Server-wide and per-player settings: game modes, operators, bans, time.

use crate::types::GameMode;

/// `gamemode <mode> <player>`
pub fn gamemode(mode: GameMode, player: &str) -> String {
    format!("gamemode {mode} {player}")
}

/// `defaultgamemode <mode>`
pub fn default_gamemode(mode: GameMode) -> String {
    format!("defaultgamemode {mode}")
}

/// Query the world default mode; the reply ends in `{worldDefaultGameMode:<id>}`.
pub fn query_default_gamemode() -> String {
    "data get storage minecraft:server worldDefaultGameMode".to_string()
}

/// Query a player's mode; the reply ends in `: <id>`.
pub fn query_player_gamemode(player: &str) -> String {
    format!("data get entity {player} playerGameType")
}

pub fn op(player: &str) -> String {
    format!("op {player}")
}

pub fn deop(player: &str) -> String {
    format!("deop {player}")
}

/// `ban <player> [<reason>]`; an empty reason is omitted.
pub fn ban(player: &str, reason: Option<&str>) -> String {
    match reason.map(str::trim) {
        Some(r) if !r.is_empty() => format!("ban {player} {r}"),
        _ => format!("ban {player}"),
    }
}

pub fn pardon(player: &str) -> String {
    format!("pardon {player}")
}

pub fn time_set_day() -> String {
    "time set day".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes() {
        assert_eq!(
            gamemode(GameMode::Creative, "alice"),
            "gamemode creative alice"
        );
        assert_eq!(
            default_gamemode(GameMode::Adventure),
            "defaultgamemode adventure"
        );
        assert_eq!(
            query_player_gamemode("alice"),
            "data get entity alice playerGameType"
        );
    }

    #[test]
    fn grants_and_bans() {
        assert_eq!(op("Steve"), "op Steve");
        assert_eq!(deop("Steve"), "deop Steve");
        assert_eq!(ban("Griefer", None), "ban Griefer");
        assert_eq!(ban("Griefer", Some("")), "ban Griefer");
        assert_eq!(
            ban("Griefer", Some("broke the spawn")),
            "ban Griefer broke the spawn"
        );
        assert_eq!(pardon("Griefer"), "pardon Griefer");
    }
}

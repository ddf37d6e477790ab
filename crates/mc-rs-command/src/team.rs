//! Scoreboard team commands.

use crate::selector::{escape_quotes, text_component};
use crate::types::{CollisionRule, NametagVisibility, TeamColor};

/// A single `team modify` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamOption {
    DisplayName(String),
    Color(TeamColor),
    FriendlyFire(bool),
    SeeFriendlyInvisibles(bool),
    NametagVisibility(NametagVisibility),
    CollisionRule(CollisionRule),
}

impl TeamOption {
    pub fn attribute(&self) -> &'static str {
        match self {
            TeamOption::DisplayName(_) => "displayName",
            TeamOption::Color(_) => "color",
            TeamOption::FriendlyFire(_) => "friendlyFire",
            TeamOption::SeeFriendlyInvisibles(_) => "seeFriendlyInvisibles",
            TeamOption::NametagVisibility(_) => "nametagVisibility",
            TeamOption::CollisionRule(_) => "collisionRule",
        }
    }

    fn value(&self) -> String {
        match self {
            TeamOption::DisplayName(display) => text_component(display),
            TeamOption::Color(c) => c.to_string(),
            TeamOption::FriendlyFire(b) | TeamOption::SeeFriendlyInvisibles(b) => b.to_string(),
            TeamOption::NametagVisibility(v) => v.to_string(),
            TeamOption::CollisionRule(r) => r.to_string(),
        }
    }
}

/// The display text for a team: the supplied value, or the bare name when
/// none (or only whitespace) was given.
pub fn display_or_name<'a>(name: &'a str, display: Option<&'a str>) -> &'a str {
    match display {
        Some(d) if !d.trim().is_empty() => d,
        _ => name,
    }
}

/// `team add <name> "<display>"`
pub fn team_add(name: &str, display: &str) -> String {
    format!("team add {name} \"{}\"", escape_quotes(display))
}

/// `team remove <name>`
pub fn team_remove(name: &str) -> String {
    format!("team remove {name}")
}

/// `team modify <name> <attribute> <value>`
pub fn team_modify(name: &str, option: &TeamOption) -> String {
    format!("team modify {name} {} {}", option.attribute(), option.value())
}

/// `team join <team> <targets...>`, or `None` with no targets.
pub fn team_join(team: &str, targets: &[&str]) -> Option<String> {
    if targets.is_empty() {
        return None;
    }
    Some(format!("team join {team} {}", targets.join(" ")))
}

/// `team leave <targets...>`, or `None` with no targets.
pub fn team_leave(targets: &[&str]) -> Option<String> {
    if targets.is_empty() {
        return None;
    }
    Some(format!("team leave {}", targets.join(" ")))
}

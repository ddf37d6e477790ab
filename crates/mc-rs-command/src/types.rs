//! Typed command parameters: coordinates and the closed token sets the
//! server accepts for block states, modes, and team options.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// An integer block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position shifted by `(dx, dy, dz)`.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Declares a closed set of server tokens.
///
/// Parsing trims the input and matches case-insensitively; rendering always
/// produces the canonical token. Serde goes through the same parser so that
/// declarations are validated on load.
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const TOKENS: &'static [&'static str] = &[$($token),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ValidationError::InvalidChoice {
                        field: $field,
                        expected: Self::TOKENS,
                        got: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(v: $name) -> Self {
                v.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

token_enum! {
    /// Horizontal facing used by stairs and beds.
    Direction("direction") {
        North => "north",
        South => "south",
        East => "east",
        West => "west",
    }
}

impl Direction {
    /// Unit step `(dx, dz)` one block in this direction.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

token_enum! {
    StairHalf("half") {
        Top => "top",
        Bottom => "bottom",
    }
}

token_enum! {
    StairShape("shape") {
        Straight => "straight",
        InnerLeft => "inner_left",
        InnerRight => "inner_right",
        OuterLeft => "outer_left",
        OuterRight => "outer_right",
    }
}

token_enum! {
    BedPart("part") {
        Foot => "foot",
        Head => "head",
    }
}

token_enum! {
    ChestSize("size") {
        Single => "single",
        Double => "double",
    }
}

token_enum! {
    /// The `type` block state of a chest half.
    ChestType("type") {
        Single => "single",
        Left => "left",
        Right => "right",
    }
}

token_enum! {
    /// Game modes in server id order (0..=3).
    GameMode("mode") {
        Survival => "survival",
        Creative => "creative",
        Adventure => "adventure",
        Spectator => "spectator",
    }
}

impl GameMode {
    /// Map a numeric id reported by the server. Ids outside the table are `None`.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(GameMode::Survival),
            1 => Some(GameMode::Creative),
            2 => Some(GameMode::Adventure),
            3 => Some(GameMode::Spectator),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            GameMode::Survival => 0,
            GameMode::Creative => 1,
            GameMode::Adventure => 2,
            GameMode::Spectator => 3,
        }
    }
}

token_enum! {
    TeamColor("color") {
        Black => "black",
        DarkBlue => "dark_blue",
        DarkGreen => "dark_green",
        DarkAqua => "dark_aqua",
        DarkRed => "dark_red",
        DarkPurple => "dark_purple",
        Gold => "gold",
        Gray => "gray",
        DarkGray => "dark_gray",
        Blue => "blue",
        Green => "green",
        Aqua => "aqua",
        Red => "red",
        LightPurple => "light_purple",
        Yellow => "yellow",
        White => "white",
        Reset => "reset",
    }
}

token_enum! {
    NametagVisibility("nametag_visibility") {
        Always => "always",
        Never => "never",
        HideForOtherTeams => "hideForOtherTeams",
        HideForOwnTeam => "hideForOwnTeam",
    }
}

token_enum! {
    CollisionRule("collision_rule") {
        Always => "always",
        Never => "never",
        PushOtherTeams => "pushOtherTeams",
        PushOwnTeam => "pushOwnTeam",
    }
}

token_enum! {
    /// Wool colors in dye id order (0..=15).
    DyeColor("color") {
        White => "white",
        Orange => "orange",
        Magenta => "magenta",
        LightBlue => "light_blue",
        Yellow => "yellow",
        Lime => "lime",
        Pink => "pink",
        Gray => "gray",
        LightGray => "light_gray",
        Cyan => "cyan",
        Purple => "purple",
        Blue => "blue",
        Brown => "brown",
        Green => "green",
        Red => "red",
        Black => "black",
    }
}

impl DyeColor {
    pub fn id(self) -> u8 {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_trimmed_and_case_insensitive() {
        assert_eq!(" North ".parse::<Direction>().unwrap(), Direction::North);
        assert_eq!("RED".parse::<TeamColor>().unwrap(), TeamColor::Red);
        assert_eq!(
            "hideforownteam".parse::<NametagVisibility>().unwrap(),
            NametagVisibility::HideForOwnTeam
        );
        assert_eq!(NametagVisibility::HideForOwnTeam.as_str(), "hideForOwnTeam");
    }

    #[test]
    fn invalid_choice_lists_tokens() {
        let err = "up".parse::<Direction>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "direction must be one of north|south|east|west (got \"up\")"
        );
    }

    #[test]
    fn direction_steps() {
        assert_eq!(Direction::North.step(), (0, -1));
        assert_eq!(Direction::South.step(), (0, 1));
        assert_eq!(Direction::East.step(), (1, 0));
        assert_eq!(Direction::West.step(), (-1, 0));
    }

    #[test]
    fn gamemode_id_table_is_closed() {
        for mode in GameMode::ALL {
            assert_eq!(GameMode::from_id(mode.id()), Some(*mode));
        }
        assert_eq!(GameMode::from_id(4), None);
        assert_eq!(GameMode::from_id(-1), None);
    }

    #[test]
    fn dye_ids() {
        assert_eq!(DyeColor::White.id(), 0);
        assert_eq!(DyeColor::LightBlue.id(), 3);
        assert_eq!(DyeColor::Black.id(), 15);
    }

    #[test]
    fn coord_display_and_offset() {
        let c = Coord::new(-3, 64, 7);
        assert_eq!(c.to_string(), "-3 64 7");
        assert_eq!(c.offset(1, 0, -1), Coord::new(-2, 64, 6));
    }

    #[test]
    fn serde_uses_tokens() {
        let json = serde_json::to_string(&StairShape::InnerLeft).unwrap();
        assert_eq!(json, "\"inner_left\"");
        let back: StairShape = serde_json::from_str("\"Outer_Right\"").unwrap();
        assert_eq!(back, StairShape::OuterRight);
        assert!(serde_json::from_str::<StairShape>("\"spiral\"").is_err());
    }
}

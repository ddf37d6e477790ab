//! Command text formatting for the remote console.
//!
//! Every function here is pure: typed, already-validated parameters in,
//! exact command text out. Sending is the caller's job.

pub mod block;
pub mod entity;
pub mod error;
pub mod gamerule;
pub mod player;
pub mod selector;
pub mod team;
pub mod types;

pub use block::BlockPlacement;
pub use error::ValidationError;
pub use gamerule::{RuleError, RuleRegistry, RuleValue};
pub use selector::Marker;
pub use team::TeamOption;
pub use types::{
    BedPart, ChestSize, ChestType, CollisionRule, Coord, Direction, DyeColor, GameMode,
    NametagVisibility, StairHalf, StairShape, TeamColor,
};

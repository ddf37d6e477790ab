//! Input validation errors raised before any command text is produced.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be one of {} (got {got:?})", .expected.join("|"))]
    InvalidChoice {
        field: &'static str,
        expected: &'static [&'static str],
        got: String,
    },

    #[error("`{0}` cannot be empty or whitespace")]
    Empty(&'static str),

    #[error("value {0:?} is neither an integer nor true/false")]
    RuleValue(String),

    #[error("exactly one of `player`, `selector`, or `entity_id` must be set")]
    NoMembershipTarget,

    #[error("only one of `player`, `selector`, or `entity_id` may be set (got {0})")]
    MultipleMembershipTargets(usize),

    #[error("health must be a positive finite number (got {0})")]
    Health(f32),

    #[error("invalid data tag: {0}")]
    DataTag(String),
}

use mc_rs_command::{RuleError, ValidationError};
use thiserror::Error;

use crate::client::ClientError;
use crate::outcome::Warning;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Rejected before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("{action} failed: {source}")]
    Command {
        action: String,
        #[source]
        source: ClientError,
    },

    /// A later step failed after earlier ones took effect. `source` is the
    /// failing step; `compensation` lists rollback steps that also failed.
    #[error("{action} failed: {source} ({} compensation warning(s))", .compensation.len())]
    PartialFailure {
        action: String,
        #[source]
        source: ClientError,
        compensation: Vec<Warning>,
    },
}

impl ReconcileError {
    /// Wrap a client failure, keeping pre-send rejections in their own
    /// variants.
    pub fn command(action: impl Into<String>, err: ClientError) -> Self {
        match err {
            ClientError::Validation(e) => ReconcileError::Validation(e),
            ClientError::Rule(e) => ReconcileError::Rule(e),
            source => ReconcileError::Command {
                action: action.into(),
                source,
            },
        }
    }

    pub fn partial(action: impl Into<String>, source: ClientError, compensation: Vec<Warning>) -> Self {
        ReconcileError::PartialFailure {
            action: action.into(),
            source,
            compensation,
        }
    }

    /// True when nothing reached the server.
    pub fn is_validation(&self) -> bool {
        matches!(self, ReconcileError::Validation(_) | ReconcileError::Rule(_))
    }
}

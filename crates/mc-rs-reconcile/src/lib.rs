//! Declarative server objects reconciled over a command transport.
//!
//! Each object kind has a [`Reconciler`] that can materialize a declaration,
//! refresh stored state, apply a changed declaration, and tear the object
//! down again. Reconcilers talk to the server only through the capability
//! traits in [`client`], and every command is awaited before the next one
//! is sent.

pub mod ban;
pub mod block;
pub mod client;
pub mod daylock;
pub mod entity;
pub mod error;
pub mod fill;
pub mod gamemode;
pub mod gamerule;
pub mod membership;
pub mod operator;
pub mod outcome;
pub mod reconciler;
pub mod structure;
pub mod team;
pub mod transport;

pub use client::{ClientError, CommandClient};
pub use error::ReconcileError;
pub use outcome::{Applied, Warning, WarningKind};
pub use reconciler::{Reconciler, Tracked};
pub use transport::{Transport, TransportError};

use mc_rs_command::ValidationError;

pub(crate) fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

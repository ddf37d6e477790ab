use mc_rs_rcon::RconError;
use mc_rs_reconcile::ReconcileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid state data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RCON: {0}")]
    Rcon(#[from] RconError),

    #[error("{address}: {source}")]
    Reconcile {
        address: String,
        #[source]
        source: ReconcileError,
    },

    #[error("unknown resource kind {0:?}")]
    UnknownKind(String),

    #[error("{0:?} is not tracked in state")]
    NotTracked(String),

    #[error("resource {0:?} is declared more than once")]
    DuplicateAddress(String),

    #[error("no RCON password: set [rcon] password or MC_RS_RCON_PASSWORD")]
    MissingPassword,
}

//! RCON (Remote Console) client.
//!
//! Implements the client side of the Source RCON protocol over TCP, as
//! spoken by Minecraft Java servers.

pub mod client;
pub mod codec;
pub mod error;

pub use client::RconClient;
pub use error::RconError;

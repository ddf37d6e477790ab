//! The one seam to the remote server: send a command, get its reply.

use mc_rs_rcon::{RconClient, RconError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Rcon(#[from] RconError),

    #[error("server rejected {command:?}: {reply}")]
    ErrorReply { command: String, reply: String },
}

/// A request/response command channel.
///
/// Implementations must not retry. A reply that the server uses to signal
/// a rejected command is reported as [`TransportError::ErrorReply`].
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, command: &str) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, command: &str) -> Result<String, TransportError> {
        (**self).send(command).await
    }
}

impl Transport for RconClient {
    async fn send(&self, command: &str) -> Result<String, TransportError> {
        let reply = self.send_command(command).await?;
        check_reply(command, reply)
    }
}

/// Vanilla servers answer a command they cannot parse with a normal reply
/// packet, so rejection has to be detected from the text.
pub fn check_reply(command: &str, reply: String) -> Result<String, TransportError> {
    if is_error_reply(&reply) {
        return Err(TransportError::ErrorReply {
            command: command.to_string(),
            reply,
        });
    }
    Ok(reply)
}

fn is_error_reply(reply: &str) -> bool {
    let reply = reply.trim_start();
    reply.starts_with("Unknown or incomplete command")
        || reply.starts_with("Unknown command")
        || reply.contains("<--[HERE]")
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use super::{Transport, TransportError};

    /// Records every command; commands matching a scripted prefix fail or
    /// get a canned reply.
    #[derive(Default)]
    pub struct RecordingTransport {
        sent: Mutex<Vec<String>>,
        failures: Mutex<Vec<String>>,
        replies: Mutex<Vec<(String, String)>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail every command starting with `prefix`.
        pub fn fail_on(self, prefix: &str) -> Self {
            self.failures.lock().unwrap().push(prefix.to_string());
            self
        }

        /// Answer commands starting with `prefix` with `reply`.
        pub fn reply_to(self, prefix: &str, reply: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push((prefix.to_string(), reply.to_string()));
            self
        }

        pub fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for RecordingTransport {
        async fn send(&self, command: &str) -> Result<String, TransportError> {
            self.sent.lock().unwrap().push(command.to_string());
            if self
                .failures
                .lock()
                .unwrap()
                .iter()
                .any(|p| command.starts_with(p.as_str()))
            {
                return Err(TransportError::ErrorReply {
                    command: command.to_string(),
                    reply: "scripted failure".into(),
                });
            }
            let reply = self
                .replies
                .lock()
                .unwrap()
                .iter()
                .find(|(p, _)| command.starts_with(p.as_str()))
                .map(|(_, r)| r.clone())
                .unwrap_or_default();
            Ok(reply)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_errors_are_rejections() {
        let err = check_reply(
            "gamerule nope",
            "Unknown or incomplete command, see below for error\ngamerule nope<--[HERE]".into(),
        )
        .unwrap_err();
        assert!(matches!(err, TransportError::ErrorReply { ref command, .. } if command == "gamerule nope"));

        assert!(check_reply("x", "Incorrect argument for command\nx 1<--[HERE]".into()).is_err());
    }

    #[test]
    fn ordinary_replies_pass_through() {
        assert_eq!(
            check_reply("gamerule keepInventory", "Gamerule keepInventory is currently set to: false".into()).unwrap(),
            "Gamerule keepInventory is currently set to: false"
        );
        assert_eq!(check_reply("op alice", String::new()).unwrap(), "");
    }

    #[tokio::test]
    async fn recording_transport_scripts() {
        let t = fake::RecordingTransport::new()
            .fail_on("kill")
            .reply_to("gamerule", "true");
        assert_eq!(t.send("gamerule doFireTick").await.unwrap(), "true");
        assert!(t.send("kill @e").await.is_err());
        assert_eq!(t.send("say hi").await.unwrap(), "");
        assert_eq!(t.sent(), vec!["gamerule doFireTick", "kill @e", "say hi"]);
    }
}

//! Authenticated RCON session.
//!
//! One command in, one reply out. Calls are serialized through a mutex so a
//! reply is always read before the next command is written.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::codec::{
    read_packet, write_packet, Packet, AUTH_FAILED_ID, MAX_COMMAND_PAYLOAD, MAX_RESPONSE_PAYLOAD,
    PACKET_TYPE_AUTH_RESPONSE, PACKET_TYPE_COMMAND, PACKET_TYPE_LOGIN, PACKET_TYPE_RESPONSE,
};
use crate::RconError;

struct Session {
    /// `None` once an exchange was cut short; the stream may hold a stale
    /// or partial reply and cannot be reused.
    stream: Option<TcpStream>,
    next_id: i32,
}

impl Session {
    fn stream(&mut self) -> Result<&mut TcpStream, RconError> {
        self.stream.as_mut().ok_or(RconError::SessionClosed)
    }

    fn next_request_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = if self.next_id == i32::MAX {
            1
        } else {
            self.next_id + 1
        };
        id
    }
}

pub struct RconClient {
    session: Mutex<Session>,
    timeout: Duration,
}

/// Split `host:port`, rejecting a missing or non-numeric port.
pub fn split_address(address: &str) -> Result<(&str, u16), RconError> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| RconError::InvalidAddress(address.to_string()))?;
    if host.is_empty() {
        return Err(RconError::InvalidAddress(address.to_string()));
    }
    let port = port
        .parse::<u16>()
        .map_err(|_| RconError::InvalidPort(port.to_string()))?;
    Ok((host, port))
}

impl RconClient {
    /// Connect to `host:port` and log in with `password`.
    ///
    /// `timeout` bounds the connect, the login, and every later command.
    pub async fn connect(
        address: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, RconError> {
        let (host, port) = split_address(address)?;
        let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| RconError::Timeout(timeout))??;
        stream.set_nodelay(true)?;

        let client = Self {
            session: Mutex::new(Session {
                stream: Some(stream),
                next_id: 1,
            }),
            timeout,
        };
        client.authenticate(password).await?;
        info!("RCON session established with {address}");
        Ok(client)
    }

    async fn authenticate(&self, password: &str) -> Result<(), RconError> {
        let mut session = self.session.lock().await;
        let id = session.next_request_id();
        let stream = session.stream()?;
        tokio::time::timeout(self.timeout, login(stream, id, password))
            .await
            .map_err(|_| RconError::Timeout(self.timeout))?
    }

    /// Send one command and return the server's reply text.
    ///
    /// Any failure after the command was written closes the session, and
    /// every later call returns [`RconError::SessionClosed`].
    pub async fn send_command(&self, command: &str) -> Result<String, RconError> {
        if command.len() > MAX_COMMAND_PAYLOAD {
            return Err(RconError::CommandTooLong {
                len: command.len(),
                limit: MAX_COMMAND_PAYLOAD,
            });
        }
        let mut session = self.session.lock().await;
        let id = session.next_request_id();
        let stream = session.stream()?;
        let result = match tokio::time::timeout(self.timeout, exchange(stream, id, command)).await {
            Ok(result) => result,
            Err(_) => Err(RconError::Timeout(self.timeout)),
        };
        match result {
            Ok(reply) => {
                debug!("RCON reply to request {id}: {reply:?}");
                Ok(reply)
            }
            Err(e) => {
                warn!("RCON session closed after request {id}: {e}");
                session.stream = None;
                Err(e)
            }
        }
    }
}

async fn login(stream: &mut TcpStream, id: i32, password: &str) -> Result<(), RconError> {
    write_packet(stream, &Packet::new(id, PACKET_TYPE_LOGIN, password)).await?;
    loop {
        let reply = read_packet(stream, MAX_RESPONSE_PAYLOAD).await?;
        match reply.packet_type {
            // Some servers send an empty response before the auth result.
            PACKET_TYPE_RESPONSE => continue,
            PACKET_TYPE_AUTH_RESPONSE if reply.request_id == AUTH_FAILED_ID => {
                return Err(RconError::AuthFailed);
            }
            PACKET_TYPE_AUTH_RESPONSE if reply.request_id == id => return Ok(()),
            PACKET_TYPE_AUTH_RESPONSE => {
                return Err(RconError::ResponseIdMismatch {
                    expected: id,
                    got: reply.request_id,
                });
            }
            other => return Err(RconError::UnexpectedPacketType(other)),
        }
    }
}

async fn exchange(stream: &mut TcpStream, id: i32, command: &str) -> Result<String, RconError> {
    write_packet(stream, &Packet::new(id, PACKET_TYPE_COMMAND, command)).await?;
    let reply = read_packet(stream, MAX_RESPONSE_PAYLOAD).await?;
    if reply.packet_type != PACKET_TYPE_RESPONSE {
        return Err(RconError::UnexpectedPacketType(reply.packet_type));
    }
    if reply.request_id != id {
        return Err(RconError::ResponseIdMismatch {
            expected: id,
            got: reply.request_id,
        });
    }
    Ok(reply.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    const PASSWORD: &str = "hunter2";

    /// Minimal server: authenticates and answers each command with `echo:<cmd>`.
    async fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            loop {
                let pkt = match read_packet(&mut stream, MAX_RESPONSE_PAYLOAD).await {
                    Ok(p) => p,
                    Err(_) => return,
                };
                if pkt.body == "slow" {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
                let reply = match pkt.packet_type {
                    PACKET_TYPE_LOGIN if pkt.body == PASSWORD => {
                        Packet::new(pkt.request_id, PACKET_TYPE_AUTH_RESPONSE, "")
                    }
                    PACKET_TYPE_LOGIN => Packet::new(AUTH_FAILED_ID, PACKET_TYPE_AUTH_RESPONSE, ""),
                    _ => Packet::new(
                        pkt.request_id,
                        PACKET_TYPE_RESPONSE,
                        format!("echo:{}", pkt.body),
                    ),
                };
                if write_packet(&mut stream, &reply).await.is_err() {
                    return;
                }
            }
        });
        addr.to_string()
    }

    #[test]
    fn address_parsing() {
        assert_eq!(split_address("localhost:25575").unwrap(), ("localhost", 25575));
        assert!(matches!(
            split_address("localhost"),
            Err(RconError::InvalidAddress(_))
        ));
        assert!(matches!(
            split_address("localhost:abc"),
            Err(RconError::InvalidPort(p)) if p == "abc"
        ));
        assert!(matches!(
            split_address(":25575"),
            Err(RconError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn login_and_command_roundtrip() {
        let addr = spawn_server().await;
        let client = RconClient::connect(&addr, PASSWORD, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(client.send_command("list").await.unwrap(), "echo:list");
        assert_eq!(
            client.send_command("time set day").await.unwrap(),
            "echo:time set day"
        );
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let addr = spawn_server().await;
        let result = RconClient::connect(&addr, "nope", Duration::from_secs(5)).await;
        assert!(matches!(result, Err(RconError::AuthFailed)));
    }

    #[tokio::test]
    async fn oversized_command_never_sent() {
        let addr = spawn_server().await;
        let client = RconClient::connect(&addr, PASSWORD, Duration::from_secs(5))
            .await
            .unwrap();
        let long = "x".repeat(MAX_COMMAND_PAYLOAD + 1);
        assert!(matches!(
            client.send_command(&long).await,
            Err(RconError::CommandTooLong { .. })
        ));
        assert_eq!(client.send_command("ok").await.unwrap(), "echo:ok");
    }

    #[tokio::test]
    async fn late_reply_closes_session() {
        let addr = spawn_server().await;
        let client = RconClient::connect(&addr, PASSWORD, Duration::from_millis(200))
            .await
            .unwrap();
        assert!(matches!(
            client.send_command("slow").await,
            Err(RconError::Timeout(_))
        ));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(matches!(
            client.send_command("list").await,
            Err(RconError::SessionClosed)
        ));
    }
}

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::HostError;

pub const PASSWORD_ENV: &str = "MC_RS_RCON_PASSWORD";

#[derive(Debug, Default, Deserialize)]
pub struct DeclareConfig {
    #[serde(default)]
    pub rcon: RconSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub state: StateSection,
}

#[derive(Debug, Deserialize)]
pub struct RconSection {
    #[serde(default = "default_rcon_address")]
    pub address: String,
    #[serde(default)]
    pub password: String,
    /// Bound on connecting and on each command/reply pair.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_rcon_address() -> String {
    "127.0.0.1:25575".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RconSection {
    fn default() -> Self {
        Self {
            address: default_rcon_address(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RconSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured password, or `env` when the file leaves it empty.
    pub fn resolve_password(&self, env: Option<String>) -> Result<String, HostError> {
        if !self.password.is_empty() {
            return Ok(self.password.clone());
        }
        env.filter(|p| !p.is_empty())
            .ok_or(HostError::MissingPassword)
    }

    pub fn password(&self) -> Result<String, HostError> {
        self.resolve_password(std::env::var(PASSWORD_ENV).ok())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StateSection {
    #[serde(default = "default_state_path")]
    pub path: String,
}

fn default_state_path() -> String {
    "mc-rs-declare.state.json".into()
}

impl Default for StateSection {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

impl DeclareConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HostError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [rcon]
            address = "mc.example.net:25575"
            password = "hunter2"
            timeout_secs = 3

            [logging]
            level = "debug"

            [state]
            path = "/var/lib/mc/state.json"
        "#;
        let config: DeclareConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rcon.address, "mc.example.net:25575");
        assert_eq!(config.rcon.timeout(), Duration::from_secs(3));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.state.path, "/var/lib/mc/state.json");
    }

    #[test]
    fn sections_default_when_absent() {
        let config: DeclareConfig = toml::from_str("").unwrap();
        assert_eq!(config.rcon.address, "127.0.0.1:25575");
        assert_eq!(config.rcon.timeout_secs, 10);
        assert!(config.rcon.password.is_empty());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.state.path, "mc-rs-declare.state.json");
    }

    #[test]
    fn password_falls_back_to_env() {
        let mut rcon = RconSection::default();
        assert_eq!(
            rcon.resolve_password(Some("from-env".into())).unwrap(),
            "from-env"
        );
        assert!(matches!(
            rcon.resolve_password(None),
            Err(HostError::MissingPassword)
        ));
        assert!(matches!(
            rcon.resolve_password(Some(String::new())),
            Err(HostError::MissingPassword)
        ));

        rcon.password = "from-file".into();
        assert_eq!(
            rcon.resolve_password(Some("from-env".into())).unwrap(),
            "from-file"
        );
    }
}

use anyhow::Context;
use generals_online::ServerOptions;
use serde::{Deserialize, Serialize};

use crate::network::DEFAULT_PORT;


#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub options: ServerOptions,
}

fn default_port() -> u16 { DEFAULT_PORT }

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            options: ServerOptions::default(),
        }
    }
}

pub fn read_config_file(filename: &str) -> anyhow::Result<ServerConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Failed to read config file '{filename}'."))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file '{filename}'."))
}


#[cfg(test)]
mod tests {
    use generals_online::{AlliancePolicy, GuestDeparturePolicy, ReadinessPolicy};

    use super::*;

    #[test]
    fn parse_full_config() {
        let config: ServerConfig = serde_yaml::from_str(
            "
port: 9000
options:
  rules:
    alliance_policy: Random
    readiness_policy: AllReady
    guest_departure_policy: KeepRunning
  rejection_feedback: false
",
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.options.rules.alliance_policy, AlliancePolicy::Random);
        assert_eq!(config.options.rules.readiness_policy, ReadinessPolicy::AllReady);
        assert_eq!(
            config.options.rules.guest_departure_policy,
            GuestDeparturePolicy::KeepRunning
        );
        assert!(!config.options.rejection_feedback);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: ServerConfig = serde_yaml::from_str("port: 9001").unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.options, ServerOptions::default());
    }
}

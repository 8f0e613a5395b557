use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CymolError;

pub const RCSB_HOST: &str = "www.rcsb.org";
pub const EUTILS_HOST: &str = "eutils.ncbi.nlm.nih.gov";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Endpoint {
    pub fn new(host: &str) -> Self {
        Self {
            scheme: default_scheme(),
            host: host.to_string(),
            port: None,
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(match self.scheme.as_str() {
            "https" => 443,
            _ => 80,
        })
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port())
    }
}

/// What happens to a structure load whose request never produced a body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportErrorPolicy {
    #[default]
    Surface,
    Silent,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub rcsb: Option<Endpoint>,
    #[serde(default)]
    pub eutils: Option<Endpoint>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub transport_errors: Option<TransportErrorPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub rcsb: Endpoint,
    pub eutils: Endpoint,
    /// `None` means requests may take as long as the server does.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    pub transport_errors: TransportErrorPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rcsb: Endpoint::new(RCSB_HOST),
            eutils: Endpoint::new(EUTILS_HOST),
            timeout_secs: None,
            user_agent: default_user_agent(),
            transport_errors: TransportErrorPolicy::default(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ClientConfig, CymolError> {
        let Some(path) = path else {
            return Ok(ClientConfig::default());
        };
        let config_path = PathBuf::from(path);
        let content = fs::read_to_string(&config_path)
            .map_err(|_| CymolError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| CymolError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ClientConfig, CymolError> {
        let defaults = ClientConfig::default();
        for endpoint in [&config.rcsb, &config.eutils].into_iter().flatten() {
            if endpoint.host.trim().is_empty() {
                return Err(CymolError::ConfigParse("endpoint host is empty".to_string()));
            }
            if !matches!(endpoint.scheme.as_str(), "http" | "https") {
                return Err(CymolError::ConfigParse(format!(
                    "unsupported scheme: {}",
                    endpoint.scheme
                )));
            }
        }
        if config.timeout_secs == Some(0) {
            return Err(CymolError::ConfigParse(
                "timeout_secs must be positive; omit it to disable the timeout".to_string(),
            ));
        }

        Ok(ClientConfig {
            rcsb: config.rcsb.unwrap_or(defaults.rcsb),
            eutils: config.eutils.unwrap_or(defaults.eutils),
            timeout_secs: config.timeout_secs,
            user_agent: config.user_agent.unwrap_or(defaults.user_agent),
            transport_errors: config.transport_errors.unwrap_or(defaults.transport_errors),
        })
    }
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_user_agent() -> String {
    format!("cymol-db/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let resolved = ConfigLoader::resolve_config(Config::default()).unwrap();
        assert_eq!(resolved, ClientConfig::default());
        assert_eq!(resolved.rcsb.base_url(), "http://www.rcsb.org:80");
        assert_eq!(resolved.timeout_secs, None);
        assert_eq!(resolved.transport_errors, TransportErrorPolicy::Surface);
    }

    #[test]
    fn port_follows_scheme_unless_given() {
        let mut endpoint = Endpoint::new(RCSB_HOST);
        assert_eq!(endpoint.port(), 80);
        endpoint.scheme = "https".to_string();
        assert_eq!(endpoint.port(), 443);
        endpoint.port = Some(8080);
        assert_eq!(endpoint.base_url(), "https://www.rcsb.org:8080");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = Config {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(ConfigLoader::resolve_config(config).is_err());
    }
}

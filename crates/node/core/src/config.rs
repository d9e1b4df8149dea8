//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments (applied after Figment load)
//! 2. Config file (TOML)
//! 3. Environment variables (`SLUICE_` prefix, `__` between nested keys)
//! 4. Defaults

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use eyre::{Result, WrapErr};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::args::{BrokerArgs, ServerArgs};
use crate::constants::{
    DEFAULT_BROKER_ADDRESS, DEFAULT_BROKER_TIMEOUT_SECS, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_ROLE, ENV_PREFIX, ENV_SEPARATOR,
};

/// gRPC server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host. Also the address announced to the broker.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Serve the gRPC reflection service.
    pub reflection: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            reflection: true,
        }
    }
}

/// Service broker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Register with the broker at startup.
    pub enabled: bool,

    /// Broker address (`host:port` or URL).
    pub address: String,

    /// Role announced with the service.
    pub role: String,

    /// Seconds allowed to connect to the broker and for each call.
    pub connect_timeout_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: DEFAULT_BROKER_ADDRESS.to_string(),
            role: DEFAULT_ROLE.to_string(),
            connect_timeout_secs: DEFAULT_BROKER_TIMEOUT_SECS,
        }
    }
}

impl BrokerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Server configuration.
    pub server: ServerConfig,

    /// Broker configuration.
    pub broker: BrokerConfig,
}

impl NodeConfig {
    /// Load configuration from defaults, environment, and config file.
    /// CLI overrides should be applied separately after loading.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(NodeConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR));

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment.extract().wrap_err("Failed to load configuration")
    }

    /// Apply explicitly given CLI arguments on top of the loaded values.
    pub fn apply_args(&mut self, server: &ServerArgs, broker: &BrokerArgs) {
        if let Some(host) = &server.host {
            self.server.host = host.clone();
        }
        if let Some(port) = server.port {
            self.server.port = port;
        }
        if server.no_reflection {
            self.server.reflection = false;
        }

        if let Some(address) = &broker.address {
            self.broker.address = address.clone();
        }
        if let Some(role) = &broker.role {
            self.broker.role = role.clone();
        }
        if let Some(secs) = broker.connect_timeout_secs {
            self.broker.connect_timeout_secs = secs;
        }
        if broker.no_broker {
            self.broker.enabled = false;
        }
    }

    /// Get the gRPC server socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .wrap_err_with(|| format!("Invalid bind host: {}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

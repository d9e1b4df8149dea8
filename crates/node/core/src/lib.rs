//! Node infrastructure for Sluice services.
//!
//! - [`args`] - CLI argument groups
//! - [`config`] - layered configuration loading
//! - [`constants`] - default values
//! - [`logging`] - logging initialization

pub mod args;
pub mod config;
pub mod constants;
pub mod logging;

pub use config::{BrokerConfig, NodeConfig, ServerConfig};

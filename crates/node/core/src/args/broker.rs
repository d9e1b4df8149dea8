//! Broker registration CLI arguments.

use clap::Args;

/// Broker configuration overrides.
#[derive(Debug, Args, Clone, Default)]
#[command(next_help_heading = "Broker")]
pub struct BrokerArgs {
    /// Broker address (`host:port` or URL).
    #[arg(long = "broker", value_name = "ADDRESS")]
    pub address: Option<String>,

    /// Role announced with the service.
    #[arg(long = "broker.role", value_name = "ROLE")]
    pub role: Option<String>,

    /// Seconds allowed to connect to the broker and for each call.
    #[arg(long = "broker.timeout", value_name = "SECS")]
    pub connect_timeout_secs: Option<u64>,

    /// Disable broker registration.
    #[arg(long = "no-broker")]
    pub no_broker: bool,
}

//! gRPC server CLI arguments.

use clap::Args;

/// Server configuration overrides.
#[derive(Debug, Args, Clone, Default)]
#[command(next_help_heading = "Server")]
pub struct ServerArgs {
    /// Bind host. Also the address announced to the broker.
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Bind port.
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Do not serve the gRPC reflection service.
    #[arg(long = "no-reflection")]
    pub no_reflection: bool,
}

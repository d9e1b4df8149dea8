//! Command line interface.

use std::path::PathBuf;

use clap::Parser;
use sluice_node_core::args::{BrokerArgs, LogArgs, ServerArgs};

/// Sluice - streaming aggregate stage
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "PATH", env = "SLUICE_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) logs: LogArgs,

    #[command(flatten)]
    pub(crate) server: ServerArgs,

    #[command(flatten)]
    pub(crate) broker: BrokerArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "sluice",
            "--port",
            "7004",
            "--no-reflection",
            "--broker",
            "broker:50051",
            "--broker.role",
            "canary",
            "-vv",
        ]);
        assert_eq!(cli.server.port, Some(7004));
        assert!(cli.server.no_reflection);
        assert_eq!(cli.broker.address.as_deref(), Some("broker:50051"));
        assert_eq!(cli.broker.role.as_deref(), Some("canary"));
        assert!(!cli.broker.no_broker);
        assert_eq!(cli.logs.verbosity, 2);
        assert!(cli.config.is_none());
    }
}

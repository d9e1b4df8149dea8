//! Logging configuration for Sluice services.

use crate::args::LogArgs;
use eyre::Result;
use tracing_subscriber::EnvFilter;

/// Build the log filter from command line arguments.
///
/// The filter is built with the following precedence:
/// 1. If `--quiet` is set, only errors are shown
/// 2. Otherwise, start with the `RUST_LOG` env var if set
/// 3. Without `RUST_LOG`, use the level picked by the verbosity flags
///    (info, `-v` debug, `-vv` and up trace)
/// 4. Apply any custom filter from `--log.filter`
pub fn build_filter(args: &LogArgs) -> EnvFilter {
    if args.quiet {
        return EnvFilter::new("error");
    }

    let base_level = match args.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));

    if let Some(custom_filter) = &args.filter {
        for directive in custom_filter.split(',') {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
    }

    filter
}

/// Initialize logging based on command line arguments.
pub fn init_logging(args: &LogArgs) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(build_filter(args));

    let result = if args.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| eyre::eyre!(e))
}

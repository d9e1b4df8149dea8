//! Constants used throughout the Sluice node.

// =============================================================================
// Server
// =============================================================================

/// Default bind address for the gRPC server.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for the aggregate service.
pub const DEFAULT_PORT: u16 = 6004;

// =============================================================================
// Broker
// =============================================================================

/// Default address of the service broker.
pub const DEFAULT_BROKER_ADDRESS: &str = "127.0.0.1:50051";

/// Role announced to the broker unless configured otherwise.
pub const DEFAULT_ROLE: &str = "default";

/// Default time allowed to connect to the broker, in seconds.
pub const DEFAULT_BROKER_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// Configuration
// =============================================================================

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SLUICE_";

/// Separator between nested keys in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

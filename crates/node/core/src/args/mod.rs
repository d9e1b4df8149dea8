//! CLI argument groups.
//!
//! Every value is optional on the command line; only flags the user actually
//! passes override the loaded configuration.

mod broker;
mod log;
mod server;

pub use broker::BrokerArgs;
pub use log::LogArgs;
pub use server::ServerArgs;

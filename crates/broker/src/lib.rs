//! Service broker client for Sluice.
//!
//! Services announce their gRPC endpoint to the broker at startup so other
//! pipeline stages can discover them. Registration never gates serving:
//! [`spawn_registration`] runs it in the background and only logs failures.

mod client;
mod error;
mod registration;

pub use client::{BrokerClient, DEFAULT_CONNECT_TIMEOUT, normalize_broker_url};
pub use error::BrokerError;
pub use registration::{spawn_registration, withdraw_registration};

// Re-export generated types for external use
pub mod proto {
    pub mod broker {
        tonic::include_proto!("broker.v1");
    }
}

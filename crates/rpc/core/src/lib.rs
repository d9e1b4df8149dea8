//! RPC trait definitions for Sluice services.
//!
//! This crate defines the seams between a service binary and its
//! transports:
//!
//! - [`RpcServer`] abstracts over the server that exposes the service
//! - [`ServiceRegistrar`] abstracts over the registry the service announces
//!   itself to at startup

use std::net::SocketAddr;

use async_trait::async_trait;

/// RPC server capability for services.
///
/// Implementations can use different protocols while maintaining a
/// consistent lifecycle.
#[async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait RpcServer: Send + Sync {
    /// Start the RPC server and begin accepting connections.
    ///
    /// This method should be called in a spawned task as it will run
    /// until the server is stopped.
    async fn start(&self) -> eyre::Result<()>;

    /// Stop the RPC server gracefully.
    ///
    /// This signals the server to stop accepting new connections and
    /// wait for existing calls to complete.
    async fn stop(&self) -> eyre::Result<()>;

    /// Get the address the server is listening on.
    fn address(&self) -> SocketAddr;

    /// Check if the server is running.
    fn is_running(&self) -> bool;
}

/// Identity of a service interface in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Fully-qualified gRPC service name, e.g. `pipeline.v1.AggregateService`.
    pub interface_name: String,
    pub role: String,
}

/// A service endpoint announced to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistration {
    pub info: ServiceInfo,
    pub url: String,
    pub port: u16,
}

/// Client side of a service registry.
///
/// Registration is fire-and-forget from the service's point of view: callers
/// log failures and keep serving.
#[async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait ServiceRegistrar: Send + Sync {
    /// Announce an endpoint.
    async fn register(&self, registration: &ServiceRegistration) -> eyre::Result<()>;

    /// Withdraw a previously announced interface.
    async fn unregister(&self, info: &ServiceInfo) -> eyre::Result<()>;
}

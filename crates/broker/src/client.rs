//! Unary broker client.

use std::time::Duration;

use async_trait::async_trait;
use sluice_rpc_core::{ServiceInfo, ServiceRegistrar, ServiceRegistration};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use crate::BrokerError;
use crate::proto::broker::{
    self as pb, RegisterServiceRequest, UnregisterServiceRequest,
    broker_service_client::BrokerServiceClient,
};

/// Default time allowed to connect to the broker and for each call.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Prefix `http://` to addresses given without a scheme.
pub fn normalize_broker_url(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}

/// Client for the broker's registration calls.
///
/// A fresh connection is opened per call; registration happens once at
/// startup and once at shutdown.
#[derive(Debug, Clone)]
pub struct BrokerClient {
    endpoint: Endpoint,
}

impl BrokerClient {
    /// Create a client for the broker at `address` (`host:port` or a URL).
    ///
    /// `timeout` bounds both establishing the connection and each call.
    pub fn new(address: &str, timeout: Duration) -> Result<Self, BrokerError> {
        let url = normalize_broker_url(address);
        let endpoint = Endpoint::from_shared(url.clone())
            .map_err(|source| BrokerError::InvalidEndpoint {
                address: url,
                source,
            })?
            .connect_timeout(timeout)
            .timeout(timeout);

        Ok(Self { endpoint })
    }

    /// The broker URL this client connects to.
    pub fn url(&self) -> String {
        self.endpoint.uri().to_string()
    }

    async fn connect(&self) -> Result<BrokerServiceClient<Channel>, BrokerError> {
        let channel = self.endpoint.connect().await?;
        Ok(BrokerServiceClient::new(channel))
    }

    /// Announce a service endpoint.
    pub async fn register_service(
        &self,
        registration: &ServiceRegistration,
    ) -> Result<(), BrokerError> {
        let request = RegisterServiceRequest {
            info: Some(pb::ServiceInfo {
                interface_name: registration.info.interface_name.clone(),
                role: registration.info.role.clone(),
            }),
            url: registration.url.clone(),
            port: i32::from(registration.port),
        };

        debug!(broker = %self.url(), ?request, "Registering service");
        self.connect().await?.register_service(request).await?;
        Ok(())
    }

    /// Withdraw a service interface.
    pub async fn unregister_service(&self, info: &ServiceInfo) -> Result<(), BrokerError> {
        let request = UnregisterServiceRequest {
            interface_name: info.interface_name.clone(),
            role: info.role.clone(),
        };

        debug!(broker = %self.url(), ?request, "Unregistering service");
        self.connect().await?.unregister_service(request).await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceRegistrar for BrokerClient {
    async fn register(&self, registration: &ServiceRegistration) -> eyre::Result<()> {
        Ok(self.register_service(registration).await?)
    }

    async fn unregister(&self, info: &ServiceInfo) -> eyre::Result<()> {
        Ok(self.unregister_service(info).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize_broker_url("127.0.0.1:50051"), "http://127.0.0.1:50051");
    }

    #[test]
    fn test_normalize_keeps_scheme() {
        assert_eq!(normalize_broker_url("http://broker:50051"), "http://broker:50051");
        assert_eq!(normalize_broker_url("https://broker:443"), "https://broker:443");
    }

    #[test]
    fn test_client_url() {
        let client = BrokerClient::new("localhost:50051", DEFAULT_CONNECT_TIMEOUT).unwrap();
        assert!(client.url().starts_with("http://localhost:50051"));
    }

    #[test]
    fn test_invalid_address() {
        let result = BrokerClient::new("not a host", DEFAULT_CONNECT_TIMEOUT);
        assert_matches!(result, Err(BrokerError::InvalidEndpoint { .. }));
    }
}

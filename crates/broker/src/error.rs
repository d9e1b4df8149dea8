use thiserror::Error;

/// Errors talking to the service broker.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Invalid broker address {address}: {source}")]
    InvalidEndpoint {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("Broker connection failed: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Broker rejected request: {0}")]
    Rpc(#[from] tonic::Status),
}

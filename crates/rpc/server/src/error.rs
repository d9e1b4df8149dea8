//! Errors that end an aggregate call.

use thiserror::Error;
use tonic::Status;

/// Fatal errors for a single call. Other calls are unaffected.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The transport failed while reading the next request.
    #[error("Receive failed: {0}")]
    Receive(Status),

    /// The client went away before every result was handed over.
    #[error("Client disconnected before all results were sent")]
    Disconnected,
}

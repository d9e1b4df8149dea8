//! Aggregate service implementation.

use sluice_metrics::ConnectionMetrics;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{Instrument, debug, info_span, warn};

use crate::StreamError;
use crate::ingest::{ResponseTx, run_batch, run_incremental};
use crate::proto::pipeline::{
    AggregateBatchRequest, AggregateBatchResponse, AggregateRequest, AggregateResponse,
    aggregate_service_server::AggregateService,
};

/// Label attached to every connection's metrics summary.
pub const METRICS_LABEL: &str = "aggregate-service";

/// Capacity of each call's response channel.
pub const DEFAULT_RESPONSE_BUFFER: usize = 128;

/// Aggregate service handler.
///
/// Each call is served by its own task, which owns the call's accumulator
/// and metrics record until the call ends.
#[derive(Debug, Clone)]
pub struct AggregateHandler {
    response_buffer: usize,
}

impl Default for AggregateHandler {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_BUFFER)
    }
}

impl AggregateHandler {
    /// Create a handler whose response channels hold `response_buffer`
    /// messages.
    pub fn new(response_buffer: usize) -> Self {
        Self {
            response_buffer: response_buffer.max(1),
        }
    }
}

/// Report how a call ended. Receive failures are forwarded to the client.
async fn finish<T>(outcome: Result<(), StreamError>, responses: &ResponseTx<T>) {
    match outcome {
        Ok(()) => debug!("Call completed"),
        Err(StreamError::Receive(status)) => {
            warn!(code = ?status.code(), message = status.message(), "Call aborted on receive");
            // The client may already be gone.
            let _ = responses.send(Err(status)).await;
        }
        Err(StreamError::Disconnected) => debug!("Client disconnected during flush"),
    }
}

#[tonic::async_trait]
impl AggregateService for AggregateHandler {
    type AggregateStream = ReceiverStream<Result<AggregateResponse, Status>>;

    async fn aggregate(
        &self,
        request: Request<Streaming<AggregateRequest>>,
    ) -> Result<Response<Self::AggregateStream>, Status> {
        let span = info_span!("aggregate", mode = "incremental", peer = ?request.remote_addr());
        let requests = request.into_inner();
        let (tx, rx) = mpsc::channel(self.response_buffer);

        tokio::spawn(
            async move {
                let mut metrics = ConnectionMetrics::new(METRICS_LABEL);
                let outcome = run_incremental(requests, &tx, &mut metrics).await;
                finish(outcome, &tx).await;
            }
            .instrument(span),
        );

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    type AggregateBatchStream = ReceiverStream<Result<AggregateBatchResponse, Status>>;

    async fn aggregate_batch(
        &self,
        request: Request<Streaming<AggregateBatchRequest>>,
    ) -> Result<Response<Self::AggregateBatchStream>, Status> {
        let span = info_span!("aggregate", mode = "batch", peer = ?request.remote_addr());
        let requests = request.into_inner();
        let (tx, rx) = mpsc::channel(self.response_buffer);

        tokio::spawn(
            async move {
                let mut metrics = ConnectionMetrics::new(METRICS_LABEL);
                let outcome = run_batch(requests, &tx, &mut metrics).await;
                finish(outcome, &tx).await;
            }
            .instrument(span),
        );

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_buffer_is_never_zero() {
        assert_eq!(AggregateHandler::new(0).response_buffer, 1);
        assert_eq!(AggregateHandler::default().response_buffer, DEFAULT_RESPONSE_BUFFER);
    }
}

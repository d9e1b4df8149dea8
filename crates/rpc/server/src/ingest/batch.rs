//! Batches of events per request, one combined response.

use std::pin::pin;
use std::time::Instant;

use sluice_aggregate::{Accumulator, EnrichedEvent};
use sluice_metrics::ConnectionMetrics;
use tokio_stream::{Stream, StreamExt};
use tonic::Status;

use super::ResponseTx;
use crate::StreamError;
use crate::proto::pipeline::{AggregateBatchRequest, AggregateBatchResponse};

/// Run the batch aggregate loop until the request stream ends.
///
/// Empty batches are skipped. Processing time is recorded once per batch
/// against the batch size. Exactly one response is sent, even when it holds
/// no results.
pub async fn run_batch<S>(
    requests: S,
    responses: &ResponseTx<AggregateBatchResponse>,
    metrics: &mut ConnectionMetrics,
) -> Result<(), StreamError>
where
    S: Stream<Item = Result<AggregateBatchRequest, Status>>,
{
    let mut requests = pin!(requests);
    let mut accumulator = Accumulator::new();

    loop {
        let recv_start = Instant::now();
        let request = match requests.next().await {
            Some(Ok(request)) => request,
            Some(Err(status)) => return Err(StreamError::Receive(status)),
            None => break,
        };
        metrics.record_recv(recv_start.elapsed());

        if request.events.is_empty() {
            continue;
        }

        let process_start = Instant::now();
        let events: Vec<EnrichedEvent> = request.events.into_iter().map(Into::into).collect();
        let considered = accumulator.observe_batch(&events);
        metrics.record_processing_count(process_start.elapsed(), considered as u64);
    }

    let response = AggregateBatchResponse {
        results: accumulator.flush().into_iter().map(Into::into).collect(),
    };

    let send_start = Instant::now();
    responses
        .send(Ok(response))
        .await
        .map_err(|_| StreamError::Disconnected)?;
    metrics.record_send(send_start.elapsed());

    metrics.emit_summary();
    Ok(())
}

//! One event per request, one result per response.

use std::pin::pin;
use std::time::Instant;

use sluice_aggregate::{Accumulator, EnrichedEvent};
use sluice_metrics::ConnectionMetrics;
use tokio_stream::{Stream, StreamExt};
use tonic::Status;

use super::ResponseTx;
use crate::StreamError;
use crate::proto::pipeline::{AggregateRequest, AggregateResponse};

/// Run the incremental aggregate loop until the request stream ends.
///
/// Each result is sent as its own response, work-items first.
pub async fn run_incremental<S>(
    requests: S,
    responses: &ResponseTx<AggregateResponse>,
    metrics: &mut ConnectionMetrics,
) -> Result<(), StreamError>
where
    S: Stream<Item = Result<AggregateRequest, Status>>,
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

        let process_start = Instant::now();
        let enriched = request.event.map(EnrichedEvent::from);
        if let Some(enriched) = enriched.filter(|e| e.passed_rules) {
            accumulator.observe(&enriched.event);
        }
        metrics.record_processing(process_start.elapsed());
    }

    for result in accumulator.flush() {
        let response = AggregateResponse {
            result: Some(result.into()),
        };

        let send_start = Instant::now();
        responses
            .send(Ok(response))
            .await
            .map_err(|_| StreamError::Disconnected)?;
        metrics.record_send(send_start.elapsed());
    }

    metrics.emit_summary();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::pipeline::{AggregateResult, EnrichedEvent as PbEnriched, ParsedEvent};
    use assert_matches::assert_matches;
    use tokio::sync::mpsc;

    fn request(kind: &str, value: i64, passed_rules: bool) -> Result<AggregateRequest, Status> {
        Ok(AggregateRequest {
            event: Some(PbEnriched {
                event: Some(ParsedEvent {
                    r#type: kind.to_string(),
                    value,
                    ..Default::default()
                }),
                metadata: Default::default(),
                passed_rules,
            }),
        })
    }

    fn work_item(payload: &str) -> Result<AggregateRequest, Status> {
        Ok(AggregateRequest {
            event: Some(PbEnriched {
                event: Some(ParsedEvent {
                    r#type: "work-item".to_string(),
                    user: payload.to_string(),
                    ..Default::default()
                }),
                metadata: Default::default(),
                passed_rules: true,
            }),
        })
    }

    async fn drain(
        rx: &mut mpsc::Receiver<Result<AggregateResponse, Status>>,
    ) -> Vec<AggregateResult> {
        let mut results = Vec::new();
        while let Some(response) = rx.recv().await {
            results.push(response.unwrap().result.unwrap());
        }
        results
    }

    #[tokio::test]
    async fn test_click_example() {
        let requests = tokio_stream::iter(vec![
            request("click", 10, true),
            request("click", 20, true),
            request("view", 5, false),
        ]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut metrics = ConnectionMetrics::new("test");

        run_incremental(requests, &tx, &mut metrics).await.unwrap();
        drop(tx);

        let results = drain(&mut rx).await;
        assert_eq!(
            results,
            vec![AggregateResult {
                key: "click".to_string(),
                count: 2,
                sum: 30,
                avg: 15.0,
            }]
        );
        assert_eq!(metrics.events_processed(), 3);
    }

    #[tokio::test]
    async fn test_empty_wrapper_is_discarded_but_timed() {
        let requests = tokio_stream::iter(vec![
            Ok(AggregateRequest { event: None }),
            request("click", 1, true),
        ]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut metrics = ConnectionMetrics::new("test");

        run_incremental(requests, &tx, &mut metrics).await.unwrap();
        drop(tx);

        assert_eq!(drain(&mut rx).await.len(), 1);
        assert_eq!(metrics.events_processed(), 2);
    }

    #[tokio::test]
    async fn test_work_items_sent_first() {
        let requests = tokio_stream::iter(vec![
            request("click", 4, true),
            work_item(r#"{"id":"w1","eigenvalues":[1.0,2.0],"score":3.0}"#),
            work_item("garbage"),
            request("view", 2, true),
        ]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut metrics = ConnectionMetrics::new("test");

        run_incremental(requests, &tx, &mut metrics).await.unwrap();
        drop(tx);

        let results = drain(&mut rx).await;
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0],
            AggregateResult {
                key: "w1".to_string(),
                count: 0,
                sum: 8,
                avg: 7.8500000000000005,
            }
        );
    }

    #[tokio::test]
    async fn test_receive_error_skips_flush() {
        let requests = tokio_stream::iter(vec![
            request("click", 1, true),
            Err(Status::unavailable("connection reset")),
            request("click", 2, true),
        ]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut metrics = ConnectionMetrics::new("test");

        let outcome = run_incremental(requests, &tx, &mut metrics).await;
        drop(tx);

        assert_matches!(outcome, Err(StreamError::Receive(status)) if status.code() == tonic::Code::Unavailable);
        assert!(rx.recv().await.is_none());
        assert_eq!(metrics.events_processed(), 1);
    }

    #[tokio::test]
    async fn test_send_error_aborts() {
        let requests = tokio_stream::iter(vec![request("click", 1, true), request("view", 1, true)]);
        let (tx, rx) = mpsc::channel(16);
        drop(rx);
        let mut metrics = ConnectionMetrics::new("test");

        let outcome = run_incremental(requests, &tx, &mut metrics).await;
        assert_matches!(outcome, Err(StreamError::Disconnected));
        assert!(metrics.send_time().is_zero());
    }

    #[tokio::test]
    async fn test_empty_stream_sends_nothing() {
        let requests = tokio_stream::iter(Vec::<Result<AggregateRequest, Status>>::new());
        let (tx, mut rx) = mpsc::channel(16);
        let mut metrics = ConnectionMetrics::new("test");

        run_incremental(requests, &tx, &mut metrics).await.unwrap();
        drop(tx);

        assert!(rx.recv().await.is_none());
        assert!(metrics.summary().is_none());
    }
}

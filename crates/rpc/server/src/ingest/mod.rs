//! Ingestion loops driving one accumulator per call.
//!
//! Both loops move through the same phases: receive requests until the
//! client half-closes, flush the accumulator, emit the metrics summary. A
//! receive or send failure ends the call at once; nothing is flushed after
//! a failure.

mod batch;
mod incremental;

pub use batch::run_batch;
pub use incremental::run_incremental;

use tokio::sync::mpsc;
use tonic::Status;

/// Sending half of a call's response stream.
pub(crate) type ResponseTx<T> = mpsc::Sender<Result<T, Status>>;

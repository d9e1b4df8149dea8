//! gRPC server for the Sluice aggregate stage.
//!
//! This crate exposes the aggregation engine over the `pipeline.v1`
//! `AggregateService`:
//!
//! - `Aggregate` - one event per request, one result per response
//! - `AggregateBatch` - batches of events per request, one combined response
//!
//! Every call runs on its own task with its own accumulator and metrics
//! record; calls share no state.
//!
//! # Usage
//!
//! ```ignore
//! use sluice_rpc_server::{GrpcServer, GrpcServerConfig};
//! use sluice_rpc_core::RpcServer;
//!
//! let server = GrpcServer::with_config(GrpcServerConfig {
//!     addr: "127.0.0.1:6004".parse()?,
//!     reflection: true,
//! });
//! server.start().await?;
//! ```

mod convert;
mod error;
mod ingest;
mod service;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{info, warn};

pub use sluice_rpc_core::RpcServer;

pub use error::StreamError;
pub use ingest::{run_batch, run_incremental};
pub use service::{AggregateHandler, DEFAULT_RESPONSE_BUFFER, METRICS_LABEL};

// Re-export generated types for external use
pub mod proto {
    pub mod pipeline {
        tonic::include_proto!("pipeline.v1");
    }

    /// File descriptor set for gRPC reflection.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("pipeline_descriptor");
}

/// Fully-qualified name of the aggregate service, as announced to the broker.
pub const AGGREGATE_SERVICE_NAME: &str = proto::pipeline::aggregate_service_server::SERVICE_NAME;

/// Configuration for the gRPC server.
#[derive(Debug, Clone)]
pub struct GrpcServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,

    /// Serve the gRPC reflection service alongside the aggregate service.
    pub reflection: bool,
}

impl Default for GrpcServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 6004)),
            reflection: true,
        }
    }
}

/// gRPC server hosting the aggregate service.
pub struct GrpcServer {
    config: GrpcServerConfig,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    local_addr: watch::Sender<Option<SocketAddr>>,
    running: AtomicBool,
}

impl GrpcServer {
    /// Create a new gRPC server with the given address.
    pub fn new(addr: SocketAddr) -> Arc<Self> {
        Self::with_config(GrpcServerConfig {
            addr,
            ..Default::default()
        })
    }

    /// Create a new gRPC server with the given configuration.
    pub fn with_config(config: GrpcServerConfig) -> Arc<Self> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Arc::new(Self {
            config,
            shutdown_tx,
            shutdown_rx,
            local_addr: watch::Sender::new(None),
            running: AtomicBool::new(false),
        })
    }

    /// Wait until the listener is bound and return its local address.
    ///
    /// Pending until [`RpcServer::start`] has bound the socket; resolves at
    /// once while the server is listening.
    pub async fn listening(&self) -> Option<SocketAddr> {
        let mut rx = self.local_addr.subscribe();
        let addr = rx.wait_for(Option::is_some).await.ok().and_then(|addr| *addr);
        addr
    }
}

impl std::fmt::Debug for GrpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcServer")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish()
    }
}

#[async_trait]
impl RpcServer for GrpcServer {
    async fn start(&self) -> eyre::Result<()> {
        let aggregate_server = proto::pipeline::aggregate_service_server::AggregateServiceServer::new(
            AggregateHandler::default(),
        );

        // Enable gRPC reflection for tools like grpcurl
        let reflection_service = if self.config.reflection {
            Some(
                tonic_reflection::server::Builder::configure()
                    .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
                    .build_v1()?,
            )
        } else {
            None
        };

        let listener = TcpListener::bind(self.config.addr).await?;
        let local_addr = listener.local_addr()?;

        info!(addr = %local_addr, "Starting gRPC server");
        self.running.store(true, Ordering::SeqCst);
        self.local_addr.send_replace(Some(local_addr));

        let mut shutdown_rx = self.shutdown_rx.clone();

        let result = Server::builder()
            .add_service(aggregate_server)
            .add_optional_service(reflection_service)
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                shutdown_rx.changed().await.ok();
            })
            .await;

        self.running.store(false, Ordering::SeqCst);
        self.local_addr.send_replace(None);

        match result {
            Ok(()) => {
                info!("gRPC server stopped");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "gRPC server error");
                Err(e.into())
            }
        }
    }

    async fn stop(&self) -> eyre::Result<()> {
        info!("Stopping gRPC server");
        self.shutdown_tx.send(true)?;
        Ok(())
    }

    fn address(&self) -> SocketAddr {
        self.config.addr
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

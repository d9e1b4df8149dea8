//! Sluice aggregate service binary.

mod cli;

use clap::Parser;
use color_eyre::eyre;
use sluice_broker::{BrokerClient, spawn_registration, withdraw_registration};
use sluice_node_core::{NodeConfig, logging};
use sluice_rpc_core::{RpcServer, ServiceInfo, ServiceRegistration};
use sluice_rpc_server::{AGGREGATE_SERVICE_NAME, GrpcServer, GrpcServerConfig};
use tracing::{error, info, warn};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init_logging(&cli.logs)?;

    let mut config = NodeConfig::load(cli.config.as_deref())?;
    config.apply_args(&cli.server, &cli.broker);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Sluice aggregate service");

    let server = GrpcServer::with_config(GrpcServerConfig {
        addr: config.bind_addr()?,
        reflection: config.server.reflection,
    });

    let info = ServiceInfo {
        interface_name: AGGREGATE_SERVICE_NAME.to_string(),
        role: config.broker.role.clone(),
    };

    let broker = if config.broker.enabled {
        match BrokerClient::new(&config.broker.address, config.broker.connect_timeout()) {
            Ok(client) => {
                let server = server.clone();
                spawn_registration(
                    client.clone(),
                    ServiceRegistration {
                        info: info.clone(),
                        url: config.server.host.clone(),
                        port: config.server.port,
                    },
                    async move {
                        server.listening().await;
                    },
                );
                Some(client)
            }
            Err(e) => {
                warn!(address = %config.broker.address, error = %e, "Broker unavailable, continuing without registration");
                None
            }
        }
    } else {
        info!("Broker registration disabled");
        None
    };

    let mut handle = tokio::spawn({
        let server = server.clone();
        async move { server.start().await }
    });

    let served = tokio::select! {
        result = &mut handle => Some(result),
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            None
        }
    };

    let result = match served {
        Some(result) => result,
        None => {
            server.stop().await?;
            handle.await
        }
    };

    if let Some(client) = &broker {
        withdraw_registration(client, &info).await;
    }

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!(error = %e, "gRPC server failed");
            Err(e)
        }
        Err(e) => Err(eyre::eyre!("gRPC server task failed: {e}")),
    }
}

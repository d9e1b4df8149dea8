//! Fire-and-forget registration helpers.

use sluice_rpc_core::{ServiceInfo, ServiceRegistrar, ServiceRegistration};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Register on a background task once `ready` resolves.
///
/// `ready` is typically the server's listener coming up. Failures are logged
/// and otherwise ignored. The handle resolves to whether registration
/// succeeded.
pub fn spawn_registration<R, F>(
    registrar: R,
    registration: ServiceRegistration,
    ready: F,
) -> JoinHandle<bool>
where
    R: ServiceRegistrar + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        ready.await;
        match registrar.register(&registration).await {
            Ok(()) => {
                info!(
                    interface = %registration.info.interface_name,
                    url = %registration.url,
                    port = registration.port,
                    "Registered with broker"
                );
                true
            }
            Err(error) => {
                warn!(
                    interface = %registration.info.interface_name,
                    error = %error,
                    "Failed to register with broker"
                );
                false
            }
        }
    })
}

/// Unregister, logging instead of returning failures.
pub async fn withdraw_registration<R>(registrar: &R, info: &ServiceInfo) -> bool
where
    R: ServiceRegistrar + ?Sized,
{
    match registrar.unregister(info).await {
        Ok(()) => {
            info!(interface = %info.interface_name, "Unregistered from broker");
            true
        }
        Err(error) => {
            warn!(interface = %info.interface_name, error = %error, "Failed to unregister from broker");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FlakyRegistrar {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ServiceRegistrar for FlakyRegistrar {
        async fn register(&self, _registration: &ServiceRegistration) -> eyre::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                eyre::bail!("broker unavailable");
            }
            Ok(())
        }

        async fn unregister(&self, _info: &ServiceInfo) -> eyre::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                eyre::bail!("broker unavailable");
            }
            Ok(())
        }
    }

    fn registration() -> ServiceRegistration {
        ServiceRegistration {
            info: ServiceInfo {
                interface_name: "pipeline.v1.AggregateService".to_string(),
                role: "default".to_string(),
            },
            url: "127.0.0.1".to_string(),
            port: 6004,
        }
    }

    #[tokio::test]
    async fn test_registration_success() {
        let registrar = Arc::new(FlakyRegistrar::default());
        let ok = spawn_registration(registrar.clone(), registration(), async {}).await.unwrap();
        assert!(ok);
        assert_eq!(registrar.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_registration_failure_is_not_fatal() {
        let registrar = Arc::new(FlakyRegistrar {
            fail: true,
            ..Default::default()
        });
        let ok = spawn_registration(registrar.clone(), registration(), async {}).await.unwrap();
        assert!(!ok);
        assert_eq!(registrar.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_registration_waits_for_ready() {
        let registrar = Arc::new(FlakyRegistrar::default());
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = spawn_registration(registrar.clone(), registration(), async move {
            let _ = ready_rx.await;
        });

        tokio::task::yield_now().await;
        assert_eq!(registrar.calls.load(Ordering::SeqCst), 0);

        ready_tx.send(()).unwrap();
        assert!(handle.await.unwrap());
        assert_eq!(registrar.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_withdraw_failure_is_logged() {
        let registrar = FlakyRegistrar {
            fail: true,
            ..Default::default()
        };
        assert!(!withdraw_registration(&registrar, &registration().info).await);
    }
}

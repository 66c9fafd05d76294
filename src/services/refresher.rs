use std::time::Duration;

use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

use crate::config::AppSettings;
use crate::error::{AppError, AppResult};
use crate::session::{FtpSession, RemoteSession};
use crate::usage::{SnapshotStore, build_snapshot};

/// Background task keeping the published snapshot fresh: one refresh
/// cycle right away, then one per interval, until shutdown. Cycles run
/// on a single task and therefore never overlap.
pub struct UsageRefresher {
    settings: AppSettings,
    store: SnapshotStore,
}

impl UsageRefresher {
    pub fn new(settings: AppSettings, store: SnapshotStore) -> Self {
        Self { settings, store }
    }

    /// Spawns the refresh loop. Once `shutdown` fires the task exits
    /// after the in-flight cycle, if any; it never publishes a partial
    /// snapshot on the way out.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let interval = Duration::from_secs(self.settings.usage.refresh_interval_secs);
        tokio::spawn(async move {
            info!("usage refresher started, interval {}s", interval.as_secs());
            loop {
                match self.refresh_once().await {
                    Ok(tenants) => info!("snapshot refreshed, {} tenants", tenants),
                    Err(e) => warn!("refresh cycle failed, keeping previous snapshot: {}", e),
                }
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = sleep(interval) => {}
                }
            }
            info!("usage refresher stopped");
        })
    }

    /// One refresh cycle: fresh FTP session, full walk, atomic publish.
    /// The blocking FTP work runs off the async runtime and the whole
    /// cycle is bounded by the configured timeout.
    async fn refresh_once(&self) -> AppResult<usize> {
        let ftp = self.settings.ftp.clone();
        let capacity_gb = self.settings.usage.total_capacity_gb;
        let cycle_timeout = Duration::from_secs(self.settings.usage.refresh_timeout_secs);

        let cycle = tokio::task::spawn_blocking(move || {
            let mut session = FtpSession::connect(&ftp.host, &ftp.user, &ftp.password)?;
            let snapshot = build_snapshot(&mut session, &ftp.root_path, capacity_gb)?;
            if let Err(e) = session.quit() {
                warn!("ftp quit failed after completed walk: {}", e);
            }
            Ok::<_, AppError>(snapshot)
        });

        let snapshot = timeout(cycle_timeout, cycle)
            .await
            .map_err(|_| {
                AppError::Remote(format!(
                    "refresh timed out after {}s",
                    cycle_timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::Internal(format!("refresh task failed: {}", e)))??;

        let tenants = snapshot.sizes_mb.len();
        self.store.publish(snapshot);
        Ok(tenants)
    }
}

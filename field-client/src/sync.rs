//! Sync drainer — resubmits queued verification events once connectivity returns
//!
//! ```text
//! SyncWorker
//!   ├── Startup: drain whatever queued up while the process was down
//!   ├── Listen: connectivity transitions to Online → drain
//!   └── Periodic: safety-net drain while online
//! ```
//!
//! A drain reads the full pending list and resubmits each event
//! independently: any definitive server reply (success or business
//! rejection) retires the event, a transport failure leaves it queued for
//! the next pass. The batch is not atomic: a crash mid-drain leaves every
//! event either removed or intact. Delivery is at-least-once; deduplication
//! is the server's concern.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use shared::request::VerifySubmission;

use crate::connectivity::{ConnectivityMonitor, ConnectivityState};
use crate::error::ClientResult;
use crate::remote::{RemoteError, RemoteVerifier};
use crate::store::VerifyStorage;

/// Result of a drain pass
#[derive(Debug, Clone, Copy, Default)]
pub struct DrainReport {
    /// Events acknowledged and removed
    pub drained: usize,
    /// Events left queued after transport failures
    pub remaining: usize,
}

/// Resubmits pending events and removes acknowledged ones
pub struct SyncDrainer {
    storage: VerifyStorage,
    remote: Arc<dyn RemoteVerifier>,
    // Serializes overlapping drain invocations.
    drain_lock: Mutex<()>,
}

impl SyncDrainer {
    pub fn new(storage: VerifyStorage, remote: Arc<dyn RemoteVerifier>) -> Self {
        Self {
            storage,
            remote,
            drain_lock: Mutex::new(()),
        }
    }

    /// Resubmit every pending event once. Transport failures skip to the
    /// next entry instead of aborting the pass; draining an empty queue is
    /// a no-op.
    pub async fn drain(&self) -> ClientResult<DrainReport> {
        let _guard = self.drain_lock.lock().await;

        let events = self.storage.list_events()?;
        if events.is_empty() {
            return Ok(DrainReport::default());
        }

        tracing::info!(pending = events.len(), "Draining pending verification events");

        let mut report = DrainReport::default();
        for event in events {
            let submission = VerifySubmission::from_event(&event);
            match self.remote.submit(&submission).await {
                Ok(outcome) => {
                    self.storage.remove_event(&event.id)?;
                    report.drained += 1;
                    tracing::debug!(
                        event_id = %event.id,
                        label_id = %event.label_id,
                        result = ?outcome.result,
                        "Pending event acknowledged"
                    );
                }
                Err(RemoteError::Rejected { status, ref body }) => {
                    // A business rejection is definitive; keeping the event
                    // would resubmit it forever.
                    self.storage.remove_event(&event.id)?;
                    report.drained += 1;
                    tracing::warn!(
                        event_id = %event.id,
                        label_id = %event.label_id,
                        status,
                        body = %body,
                        "Server rejected pending event, retiring it"
                    );
                }
                Err(e) => {
                    report.remaining += 1;
                    tracing::warn!(
                        event_id = %event.id,
                        label_id = %event.label_id,
                        error = %e,
                        "Resubmission failed, leaving event queued"
                    );
                }
            }
        }

        Ok(report)
    }
}

/// Background task that triggers drains on connectivity transitions and on a
/// periodic timer
pub struct SyncWorker {
    drainer: Arc<SyncDrainer>,
    monitor: ConnectivityMonitor,
    shutdown: CancellationToken,
    drain_interval: Duration,
}

impl SyncWorker {
    pub fn new(
        drainer: Arc<SyncDrainer>,
        monitor: ConnectivityMonitor,
        shutdown: CancellationToken,
        drain_interval: Duration,
    ) -> Self {
        Self {
            drainer,
            monitor,
            shutdown,
            drain_interval,
        }
    }

    /// Run the sync worker until cancelled
    pub async fn run(self) {
        tracing::info!("SyncWorker started");

        let mut transitions = self.monitor.subscribe();

        // Startup drain: events may have queued up before this process ran.
        if self.monitor.is_online() {
            self.try_drain().await;
        }

        let mut interval = tokio::time::interval(self.drain_interval);
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("SyncWorker shutting down");
                    break;
                }

                changed = transitions.changed() => {
                    match changed {
                        Ok(()) => {
                            let state = *transitions.borrow_and_update();
                            if state == ConnectivityState::Online {
                                self.try_drain().await;
                            }
                        }
                        Err(_) => {
                            tracing::info!("Connectivity channel closed, SyncWorker stopping");
                            break;
                        }
                    }
                }

                _ = interval.tick() => {
                    if self.monitor.is_online() {
                        self.try_drain().await;
                    }
                }
            }
        }

        tracing::info!("SyncWorker stopped");
    }

    async fn try_drain(&self) {
        match self.drainer.drain().await {
            Ok(report) if report.drained > 0 || report.remaining > 0 => {
                tracing::info!(
                    drained = report.drained,
                    remaining = report.remaining,
                    "Drain pass finished"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Drain pass failed: {e}"),
        }
    }
}

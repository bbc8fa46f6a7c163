//! Verification orchestrator
//!
//! Decides, per attempt, whether to resolve against the authoritative server
//! or against the local cache. The online path returns the server's reply
//! verbatim and touches no local state; the offline path evaluates the
//! configured policy against the cached binding and durably queues the
//! attempt for later reconciliation. Every call completes with a definitive
//! outcome; only storage failure is surfaced as an error.

use std::sync::Arc;

use shared::models::{PendingEvent, VerifyStatus};
use shared::normalize::normalize_serial;
use shared::request::{VerifyRequest, VerifySubmission};
use shared::response::VerifyOutcome;

use crate::config::{ClientConfig, VerifyPolicy};
use crate::connectivity::ConnectivityMonitor;
use crate::error::ClientResult;
use crate::remote::RemoteVerifier;
use crate::store::VerifyStorage;

/// Offline-first verification engine
pub struct VerifyEngine {
    config: ClientConfig,
    storage: VerifyStorage,
    remote: Arc<dyn RemoteVerifier>,
    monitor: ConnectivityMonitor,
}

impl VerifyEngine {
    pub fn new(
        config: ClientConfig,
        storage: VerifyStorage,
        remote: Arc<dyn RemoteVerifier>,
        monitor: ConnectivityMonitor,
    ) -> Self {
        Self {
            config,
            storage,
            remote,
            monitor,
        }
    }

    /// Resolve a verification attempt.
    ///
    /// Online: the server's reply is authoritative and returned as-is.
    /// Otherwise the offline policy decides, and the attempt is queued for
    /// the sync drainer. Reconciliation never blocks this call.
    pub async fn verify(&self, req: VerifyRequest) -> ClientResult<VerifyOutcome> {
        if self.monitor.is_online() {
            let submission = VerifySubmission::from_request(&req, shared::util::now_millis());
            match self.remote.submit(&submission).await {
                Ok(outcome) => {
                    tracing::debug!(
                        label_id = %req.label_id,
                        result = ?outcome.result,
                        "Verified against server"
                    );
                    return Ok(outcome);
                }
                Err(e) => {
                    tracing::warn!(
                        label_id = %req.label_id,
                        error = %e,
                        "Remote check failed, falling back to offline policy"
                    );
                }
            }
        }

        self.offline_verify(req)
    }

    /// Opportunistically refresh the cached binding for a label, e.g. right
    /// after a scan while the device is still online. Transport failures are
    /// absorbed; returns whether the cache was updated.
    pub async fn warm_cache(&self, label_id: &str) -> ClientResult<bool> {
        match self.remote.fetch_label(label_id).await {
            Ok(Some(record)) => {
                self.storage.put_label(&record)?;
                tracing::debug!(label_id, "Label cache warmed");
                Ok(true)
            }
            Ok(None) => {
                tracing::debug!(label_id, "Label unknown to server, cache not warmed");
                Ok(false)
            }
            Err(e) => {
                tracing::debug!(label_id, error = %e, "Label prefetch skipped");
                Ok(false)
            }
        }
    }

    /// Evaluate the offline policy and queue the attempt for reconciliation
    fn offline_verify(&self, req: VerifyRequest) -> ClientResult<VerifyOutcome> {
        let record = self.storage.get_label(&req.label_id)?;
        let observed_norm = req
            .observed_serial_raw
            .as_deref()
            .map(normalize_serial);

        let expected = record
            .as_ref()
            .and_then(|r| r.expected_serial_norm.clone());

        let (result, message) = match (&record, self.config.policy) {
            (None, _) => (
                VerifyStatus::Warn,
                "Offline: label not in cache, queued for server check".to_string(),
            ),
            (Some(_), VerifyPolicy::ExistenceOnly) => (
                VerifyStatus::Pass,
                "Offline: label present in local cache".to_string(),
            ),
            (Some(_), VerifyPolicy::ValueMatch) => match &expected {
                Some(exp) if *exp == observed_norm.clone().unwrap_or_default() => (
                    VerifyStatus::Pass,
                    "Offline: match confirmed".to_string(),
                ),
                Some(exp) => (
                    VerifyStatus::Fail,
                    format!("Offline: mismatch, expected {exp}"),
                ),
                // Cached under an existence-only deployment; nothing to
                // compare against, the server settles it.
                None => (
                    VerifyStatus::Warn,
                    "Offline: cached record has no bound serial, queued for server check"
                        .to_string(),
                ),
            },
        };

        let event = PendingEvent {
            id: String::new(),
            sequence: 0,
            label_id: req.label_id.clone(),
            actor: req.actor.clone(),
            observed_serial_raw: req.observed_serial_raw.clone(),
            observed_serial_norm: observed_norm.clone(),
            expected_serial_norm: expected.clone(),
            method: req.method,
            result,
            notes: req.notes.clone(),
            is_offline_event: true,
            created_at: shared::util::now_millis(),
        };
        let event = self.storage.enqueue_event(event)?;

        tracing::info!(
            label_id = %req.label_id,
            event_id = %event.id,
            result = ?result,
            "Offline verification queued"
        );

        Ok(VerifyOutcome {
            result,
            message,
            expected_serial: expected,
            observed_serial_norm: observed_norm,
        })
    }
}

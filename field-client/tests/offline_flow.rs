//! End-to-end flows over a real database file

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use common::RecordingRemote;
use field_client::{
    ClientConfig, ConnectivityMonitor, ConnectivityState, SyncDrainer, SyncWorker, VerifyEngine,
    VerifyPolicy, VerifyStorage,
};
use shared::models::{LabelRecord, VerifyMethod, VerifyStatus};
use shared::request::VerifyRequest;

fn seeded_record(label_id: &str, expected: &str) -> LabelRecord {
    LabelRecord {
        label_id: label_id.to_string(),
        expected_serial_norm: Some(expected.to_string()),
        device_model: Some("Infusion Pump".to_string()),
        device_serial_raw: Some(expected.to_string()),
        cached_at: shared::util::now_millis(),
    }
}

#[tokio::test]
async fn offline_pass_is_queued_and_drained() {
    let dir = tempfile::tempdir().unwrap();
    let storage = VerifyStorage::open(dir.path().join("field.redb")).unwrap();
    let remote = Arc::new(RecordingRemote::new());
    let monitor = ConnectivityMonitor::new(ConnectivityState::Offline);
    let config = ClientConfig::new("http://localhost:8000").with_policy(VerifyPolicy::ValueMatch);

    storage.put_label(&seeded_record("L1", "ABC123")).unwrap();

    let engine = VerifyEngine::new(config, storage.clone(), remote.clone(), monitor.clone());

    // Whitespace-collapsing normalization makes "ABC 123" match "ABC123".
    let outcome = engine
        .verify(
            VerifyRequest::new("L1", "staff-7")
                .with_observed("ABC 123")
                .with_method(VerifyMethod::Scan),
        )
        .await
        .unwrap();

    assert_eq!(outcome.result, VerifyStatus::Pass);
    assert_eq!(outcome.observed_serial_norm.as_deref(), Some("ABC123"));

    let events = storage.list_events().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].result, VerifyStatus::Pass);
    // No server contact while offline.
    assert_eq!(remote.submission_count(), 0);

    // Connectivity returns; the drain retires the queued event.
    monitor.set_online();
    let drainer = SyncDrainer::new(storage.clone(), remote.clone());
    let report = drainer.drain().await.unwrap();

    assert_eq!(report.drained, 1);
    assert!(storage.list_events().unwrap().is_empty());

    let submissions = remote.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    assert!(submissions[0].is_offline_event);
    assert_eq!(submissions[0].result, Some(VerifyStatus::Pass));
}

#[tokio::test]
async fn queue_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("field.redb");
    let remote = Arc::new(RecordingRemote::new());

    {
        let storage = VerifyStorage::open(&db_path).unwrap();
        let monitor = ConnectivityMonitor::new(ConnectivityState::Offline);
        let config = ClientConfig::new("http://localhost:8000");
        let engine = VerifyEngine::new(config, storage, remote.clone(), monitor);

        let outcome = engine
            .verify(VerifyRequest::new("L9", "staff-1").with_observed("SN-123"))
            .await
            .unwrap();
        assert_eq!(outcome.result, VerifyStatus::Warn);
    }

    // Simulated restart: reopen the same file.
    let storage = VerifyStorage::open(&db_path).unwrap();
    let events = storage.list_events().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].label_id, "L9");

    let drainer = SyncDrainer::new(storage.clone(), remote);
    drainer.drain().await.unwrap();
    assert_eq!(storage.pending_count().unwrap(), 0);
}

#[tokio::test]
async fn worker_reconciles_backlog_after_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let storage = VerifyStorage::open(dir.path().join("field.redb")).unwrap();
    let remote = Arc::new(RecordingRemote::new());
    let monitor = ConnectivityMonitor::new(ConnectivityState::Offline);
    let config = ClientConfig::new("http://localhost:8000");

    let engine = VerifyEngine::new(config, storage.clone(), remote.clone(), monitor.clone());
    for label in ["L1", "L2", "L3"] {
        engine
            .verify(VerifyRequest::new(label, "staff-2").with_observed("SN-1"))
            .await
            .unwrap();
    }
    assert_eq!(storage.pending_count().unwrap(), 3);

    let drainer = Arc::new(SyncDrainer::new(storage.clone(), remote.clone()));
    let shutdown = CancellationToken::new();
    let worker = SyncWorker::new(
        drainer,
        monitor.clone(),
        shutdown.clone(),
        Duration::from_secs(3600),
    );
    let handle = tokio::spawn(worker.run());

    monitor.set_online();

    let mut drained = false;
    for _ in 0..200 {
        if storage.pending_count().unwrap() == 0 {
            drained = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(drained, "worker never drained the backlog");
    assert_eq!(remote.submission_count(), 3);

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn transport_failures_keep_events_for_the_next_pass() {
    let dir = tempfile::tempdir().unwrap();
    let storage = VerifyStorage::open(dir.path().join("field.redb")).unwrap();
    let remote = Arc::new(RecordingRemote::new());
    remote.fail_label("L2");
    let monitor = ConnectivityMonitor::new(ConnectivityState::Offline);
    let config = ClientConfig::new("http://localhost:8000");

    let engine = VerifyEngine::new(config, storage.clone(), remote.clone(), monitor);
    for label in ["L1", "L2", "L3"] {
        engine
            .verify(VerifyRequest::new(label, "staff-4").with_observed("SN-1"))
            .await
            .unwrap();
    }

    let drainer = SyncDrainer::new(storage.clone(), remote.clone());
    let report = drainer.drain().await.unwrap();
    assert_eq!(report.drained, 2);
    assert_eq!(report.remaining, 1);

    // The failing label clears up; the next pass retires the leftover.
    remote.failing.lock().unwrap().clear();
    let report = drainer.drain().await.unwrap();
    assert_eq!(report.drained, 1);
    assert!(storage.list_events().unwrap().is_empty());
}

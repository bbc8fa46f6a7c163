// field-client/examples/offline_flow.rs
// Verify one label against a running server, falling back to the local cache.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use field_client::{
    ClientConfig, ConnectivityMonitor, HttpVerifyService, SyncDrainer, SyncWorker, VerifyEngine,
};
use shared::models::VerifyMethod;
use shared::request::VerifyRequest;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <label_id> <observed_serial> [actor]", args[0]);
        println!("  Example: {} L-0042 'SN 12345' nurse-3", args[0]);
        return Ok(());
    }
    let label_id = args[1].as_str();
    let observed = args[2].as_str();
    let actor = args.get(3).cloned().unwrap_or_else(|| "field-demo".to_string());

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./field-data".to_string());
    std::fs::create_dir_all(&work_dir)?;
    let config = ClientConfig::from_env().with_work_dir(work_dir);

    let storage = field_client::VerifyStorage::open(config.db_path())?;
    let remote = Arc::new(HttpVerifyService::new(&config)?);
    let monitor = ConnectivityMonitor::default();

    // Background reconciliation for anything queued while offline.
    let drainer = Arc::new(SyncDrainer::new(storage.clone(), remote.clone()));
    let shutdown = CancellationToken::new();
    tokio::spawn(
        SyncWorker::new(
            drainer,
            monitor.clone(),
            shutdown.clone(),
            Duration::from_secs(config.drain_interval_secs),
        )
        .run(),
    );

    let engine = VerifyEngine::new(config, storage.clone(), remote, monitor);

    // Warm the cache while we can; harmless when offline.
    engine.warm_cache(label_id).await?;

    let outcome = engine
        .verify(
            VerifyRequest::new(label_id, actor)
                .with_observed(observed)
                .with_method(VerifyMethod::Manual),
        )
        .await?;

    tracing::info!(result = ?outcome.result, message = %outcome.message, "Verification finished");
    tracing::info!(pending = storage.pending_count()?, "Events awaiting sync");

    shutdown.cancel();
    Ok(())
}

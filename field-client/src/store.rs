//! redb-based storage for the label cache and the pending-event queue
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `labels` | `label_id` | `LabelRecord` | offline lookup cache |
//! | `pending_events` | `event id` | `PendingEvent` | unacknowledged attempts |
//! | `counters` | `&str` | `u64` | enqueue sequence |
//!
//! # Durability
//!
//! redb commits are atomic and immediately durable (copy-on-write with an
//! atomic root swap), so a crash leaves every event either fully enqueued or
//! absent, never partially written. Field devices lose power mid-shift; the
//! pending queue has to survive that.
//!
//! Both the verification engine and the sync drainer hold clones of the same
//! [`VerifyStorage`]; redb serializes write transactions, so concurrent
//! enqueues each persist with a distinct id and sequence, and removing an
//! id that a racing drain already removed is a no-op.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use shared::models::{LabelRecord, PendingEvent};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Table for cached label bindings: key = label_id, value = JSON-serialized LabelRecord
const LABELS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("labels");

/// Table for queued verification events: key = event id, value = JSON-serialized PendingEvent
const EVENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("pending_events");

/// Table for counters: key = "event_seq", value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const EVENT_SEQUENCE_KEY: &str = "event_seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable store backing the offline cache and the pending-event queue
#[derive(Clone)]
pub struct VerifyStorage {
    db: Arc<Database>,
}

impl VerifyStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LABELS_TABLE)?;
            let _ = write_txn.open_table(EVENTS_TABLE)?;

            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(EVENT_SEQUENCE_KEY)?.is_none() {
                counters.insert(EVENT_SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LABELS_TABLE)?;
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            counters.insert(EVENT_SEQUENCE_KEY, 0u64)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Label Cache ==========

    /// Point lookup of a cached label binding
    pub fn get_label(&self, label_id: &str) -> StorageResult<Option<LabelRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LABELS_TABLE)?;

        match table.get(label_id)? {
            Some(value) => {
                let record: LabelRecord = serde_json::from_slice(value.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Upsert a label binding snapshot; last write wins, no versioning
    pub fn put_label(&self, record: &LabelRecord) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(LABELS_TABLE)?;
            let value = serde_json::to_vec(record)?;
            table.insert(record.label_id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Pending-Event Queue ==========

    /// Persist a verification event for later resubmission.
    ///
    /// Assigns a uuid id when the event carries none, plus the next queue
    /// sequence, both inside the same write transaction as the insert.
    /// Returns the event as persisted.
    pub fn enqueue_event(&self, mut event: PendingEvent) -> StorageResult<PendingEvent> {
        if event.id.is_empty() {
            event.id = Uuid::new_v4().to_string();
        }

        let txn = self.db.begin_write()?;
        {
            let mut counters = txn.open_table(COUNTERS_TABLE)?;
            let next = counters
                .get(EVENT_SEQUENCE_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0)
                + 1;
            counters.insert(EVENT_SEQUENCE_KEY, next)?;
            event.sequence = next;

            let mut events = txn.open_table(EVENTS_TABLE)?;
            let value = serde_json::to_vec(&event)?;
            events.insert(event.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;

        Ok(event)
    }

    /// All pending events in enqueue order
    pub fn list_events(&self) -> StorageResult<Vec<PendingEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let event: PendingEvent = serde_json::from_slice(value.value())?;
            events.push(event);
        }

        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    /// Remove an acknowledged event; removing an absent id is a no-op
    pub fn remove_event(&self, id: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(EVENTS_TABLE)?;
            table.remove(id)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Number of events currently queued
    pub fn pending_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;
        Ok(table.len()?)
    }
}

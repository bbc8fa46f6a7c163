//! Offline-first verification engine for field asset checks
//!
//! Decides, for each verification attempt, whether to resolve it against the
//! authoritative server or against a local cache, records unresolved attempts
//! durably, and reconciles them once connectivity returns.
//!
//! ```text
//! VerifyEngine ──online──► RemoteVerifier (HTTP)
//!      │ fallback                ▲
//!      ▼                        │ resubmit
//! VerifyStorage ◄── drain ── SyncDrainer ◄── SyncWorker
//!  (labels + pending queue)                    ▲
//!                                              │ Online transitions
//!                                   ConnectivityMonitor
//! ```
//!
//! Delivery to the server is at-least-once: a pending event is removed only
//! after a definitive server reply, so a lost acknowledgment can produce a
//! duplicate submission. Idempotency is left to the server.

pub mod config;
pub mod connectivity;
pub mod engine;
pub mod error;
pub mod remote;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use config::{ClientConfig, VerifyPolicy};
pub use connectivity::{ConnectivityMonitor, ConnectivityState};
pub use engine::VerifyEngine;
pub use error::{ClientError, ClientResult};
pub use remote::{HttpVerifyService, RemoteError, RemoteResult, RemoteVerifier};
pub use store::{StorageError, StorageResult, VerifyStorage};
pub use sync::{DrainReport, SyncDrainer, SyncWorker};

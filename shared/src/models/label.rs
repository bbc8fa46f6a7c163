//! Cached label binding

use serde::{Deserialize, Serialize};

/// Reference snapshot of a label's authoritative device binding, fetched
/// opportunistically while online and used for offline lookups.
///
/// Last write wins per `label_id`; records are never deleted, stale entries
/// are superseded by the next successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRecord {
    pub label_id: String,
    /// Normalized serial the label is bound to. Absent in existence-only
    /// deployments, where the server never discloses the binding.
    pub expected_serial_norm: Option<String>,
    pub device_model: Option<String>,
    pub device_serial_raw: Option<String>,
    /// When this snapshot was written (Unix millis)
    pub cached_at: i64,
}

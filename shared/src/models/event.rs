//! Pending verification events

use serde::{Deserialize, Serialize};

/// How the candidate input was captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerifyMethod {
    Scan,
    #[default]
    Manual,
    Ocr,
}

/// Outcome of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerifyStatus {
    Pass,
    Fail,
    Warn,
}

/// A verification attempt that has not yet been acknowledged by the server.
///
/// Presence in the pending-event store means unacknowledged work; absence
/// means the event was either never created or has been acknowledged, the
/// store carries no history. Events are immutable once written and are
/// removed only by the sync drainer after a definitive server reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingEvent {
    /// Locally generated id (uuid v4). Assigned at enqueue when empty.
    pub id: String,
    /// Enqueue order, assigned by the store. Carries no external meaning;
    /// the server treats each event independently.
    #[serde(default)]
    pub sequence: u64,
    pub label_id: String,
    /// Identity of the staff member who performed the check
    pub actor: String,
    pub observed_serial_raw: Option<String>,
    /// Locally normalized observed value at decision time
    pub observed_serial_norm: Option<String>,
    /// Cached expectation the offline decision compared against
    pub expected_serial_norm: Option<String>,
    pub method: VerifyMethod,
    /// Result computed by the offline policy
    pub result: VerifyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_offline_event: bool,
    /// Client clock at creation (Unix millis)
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_and_status_wire_names() {
        assert_eq!(serde_json::to_string(&VerifyMethod::Ocr).unwrap(), "\"OCR\"");
        assert_eq!(serde_json::to_string(&VerifyMethod::Scan).unwrap(), "\"SCAN\"");
        assert_eq!(serde_json::to_string(&VerifyStatus::Pass).unwrap(), "\"PASS\"");
        assert_eq!(serde_json::to_string(&VerifyStatus::Warn).unwrap(), "\"WARN\"");

        let status: VerifyStatus = serde_json::from_str("\"FAIL\"").unwrap();
        assert_eq!(status, VerifyStatus::Fail);
    }

    #[test]
    fn pending_event_roundtrip() {
        let event = PendingEvent {
            id: "evt-1".to_string(),
            sequence: 7,
            label_id: "L1".to_string(),
            actor: "staff-3".to_string(),
            observed_serial_raw: Some(" sn-001 ".to_string()),
            observed_serial_norm: Some("SN-001".to_string()),
            expected_serial_norm: Some("SN-001".to_string()),
            method: VerifyMethod::Scan,
            result: VerifyStatus::Pass,
            notes: None,
            is_offline_event: true,
            created_at: 1700000000000,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("notes"));

        let back: PendingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "evt-1");
        assert_eq!(back.sequence, 7);
        assert_eq!(back.result, VerifyStatus::Pass);
        assert!(back.is_offline_event);
    }
}

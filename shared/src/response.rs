//! Verification outcome

use serde::{Deserialize, Serialize};

use crate::models::VerifyStatus;

/// Outcome of a verification attempt, returned to the caller and used as the
/// server's wire reply. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub result: VerifyStatus,
    pub message: String,
    /// Expected normalized serial, populated on mismatches and when the
    /// binding is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_serial_norm: Option<String>,
}

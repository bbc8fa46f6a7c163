//! Verification request types

use serde::{Deserialize, Serialize};

use crate::models::{PendingEvent, VerifyMethod, VerifyStatus};

/// A verification attempt as captured in the field, before resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub label_id: String,
    /// Raw serial as scanned, typed or OCR'd; absent when the deployment
    /// only checks label existence
    pub observed_serial_raw: Option<String>,
    pub method: VerifyMethod,
    /// Identity of the staff member performing the check
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VerifyRequest {
    pub fn new(label_id: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            label_id: label_id.into(),
            observed_serial_raw: None,
            method: VerifyMethod::default(),
            actor: actor.into(),
            notes: None,
        }
    }

    pub fn with_observed(mut self, raw: impl Into<String>) -> Self {
        self.observed_serial_raw = Some(raw.into());
        self
    }

    pub fn with_method(mut self, method: VerifyMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Wire form of a verification attempt POSTed to the server.
///
/// Built either from a fresh [`VerifyRequest`] (online path) or from a queued
/// [`PendingEvent`] during drain. Resubmissions carry the locally computed
/// result fields for server-side audit; the server ignores fields it does
/// not use and recomputes the authoritative outcome itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySubmission {
    pub label_id: String,
    pub observed_serial_raw: Option<String>,
    pub actor: String,
    pub method: VerifyMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_offline_event: bool,
    /// Client clock at capture time (Unix millis)
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<VerifyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_serial_norm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_serial_norm: Option<String>,
}

impl VerifySubmission {
    /// Submission for a live online attempt
    pub fn from_request(req: &VerifyRequest, created_at: i64) -> Self {
        Self {
            label_id: req.label_id.clone(),
            observed_serial_raw: req.observed_serial_raw.clone(),
            actor: req.actor.clone(),
            method: req.method,
            notes: req.notes.clone(),
            is_offline_event: false,
            created_at,
            result: None,
            observed_serial_norm: None,
            expected_serial_norm: None,
        }
    }

    /// Resubmission of a queued event. The locally generated event id stays
    /// local; the server assigns its own row ids.
    pub fn from_event(event: &PendingEvent) -> Self {
        Self {
            label_id: event.label_id.clone(),
            observed_serial_raw: event.observed_serial_raw.clone(),
            actor: event.actor.clone(),
            method: event.method,
            notes: event.notes.clone(),
            is_offline_event: event.is_offline_event,
            created_at: event.created_at,
            result: Some(event.result),
            observed_serial_norm: event.observed_serial_norm.clone(),
            expected_serial_norm: event.expected_serial_norm.clone(),
        }
    }
}

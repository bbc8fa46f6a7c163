//! Scripted remote for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use shared::models::{LabelRecord, VerifyStatus};
use shared::request::VerifySubmission;
use shared::response::VerifyOutcome;

use crate::remote::{RemoteError, RemoteResult, RemoteVerifier};

/// How the scripted server answers a submission
#[derive(Debug, Clone, Copy)]
pub enum SubmitMode {
    /// Definitive reply echoing the submitted result (Pass when absent)
    Ack,
    /// Transport-level failure
    Transport,
    /// Definitive business rejection
    Reject,
}

/// In-memory [`RemoteVerifier`] with per-label scripted behavior
pub struct ScriptedRemote {
    default_mode: SubmitMode,
    overrides: Mutex<HashMap<String, SubmitMode>>,
    submissions: Mutex<Vec<VerifySubmission>>,
    labels: Mutex<HashMap<String, LabelRecord>>,
}

impl ScriptedRemote {
    pub fn new(default_mode: SubmitMode) -> Self {
        Self {
            default_mode,
            overrides: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            labels: Mutex::new(HashMap::new()),
        }
    }

    /// Remote that acknowledges everything
    pub fn acking() -> Self {
        Self::new(SubmitMode::Ack)
    }

    /// Override the behavior for one label
    pub fn set_mode(&self, label_id: &str, mode: SubmitMode) {
        self.overrides
            .lock()
            .unwrap()
            .insert(label_id.to_string(), mode);
    }

    /// Make a label fetchable
    pub fn insert_label(&self, record: LabelRecord) {
        self.labels
            .lock()
            .unwrap()
            .insert(record.label_id.clone(), record);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Everything submitted so far
    pub fn submissions(&self) -> Vec<VerifySubmission> {
        self.submissions.lock().unwrap().clone()
    }

    fn mode_for(&self, label_id: &str) -> SubmitMode {
        self.overrides
            .lock()
            .unwrap()
            .get(label_id)
            .copied()
            .unwrap_or(self.default_mode)
    }
}

#[async_trait]
impl RemoteVerifier for ScriptedRemote {
    async fn submit(&self, submission: &VerifySubmission) -> RemoteResult<VerifyOutcome> {
        self.submissions.lock().unwrap().push(submission.clone());

        match self.mode_for(&submission.label_id) {
            SubmitMode::Ack => Ok(VerifyOutcome {
                result: submission.result.unwrap_or(VerifyStatus::Pass),
                message: "Server verification complete".to_string(),
                expected_serial: submission.expected_serial_norm.clone(),
                observed_serial_norm: submission.observed_serial_norm.clone(),
            }),
            SubmitMode::Transport => Err(RemoteError::Transport("connection refused".to_string())),
            SubmitMode::Reject => Err(RemoteError::Rejected {
                status: 422,
                body: "label inactive".to_string(),
            }),
        }
    }

    async fn fetch_label(&self, label_id: &str) -> RemoteResult<Option<LabelRecord>> {
        match self.mode_for(label_id) {
            SubmitMode::Transport => {
                Err(RemoteError::Transport("connection refused".to_string()))
            }
            _ => Ok(self.labels.lock().unwrap().get(label_id).cloned()),
        }
    }
}

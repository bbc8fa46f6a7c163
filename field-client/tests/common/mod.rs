//! Test helpers shared by integration tests

use std::sync::Mutex;

use async_trait::async_trait;

use field_client::{RemoteError, RemoteResult, RemoteVerifier};
use shared::models::{LabelRecord, VerifyStatus};
use shared::request::VerifySubmission;
use shared::response::VerifyOutcome;

/// Remote that acknowledges every submission and records what it saw.
/// Labels in `failing` get transport errors instead.
#[derive(Default)]
pub struct RecordingRemote {
    pub submissions: Mutex<Vec<VerifySubmission>>,
    pub failing: Mutex<Vec<String>>,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_label(&self, label_id: &str) {
        self.failing.lock().unwrap().push(label_id.to_string());
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteVerifier for RecordingRemote {
    async fn submit(&self, submission: &VerifySubmission) -> RemoteResult<VerifyOutcome> {
        if self
            .failing
            .lock()
            .unwrap()
            .contains(&submission.label_id)
        {
            return Err(RemoteError::Transport("network unreachable".to_string()));
        }

        self.submissions.lock().unwrap().push(submission.clone());
        Ok(VerifyOutcome {
            result: submission.result.unwrap_or(VerifyStatus::Pass),
            message: "Server verification complete".to_string(),
            expected_serial: submission.expected_serial_norm.clone(),
            observed_serial_norm: submission.observed_serial_norm.clone(),
        })
    }

    async fn fetch_label(&self, _label_id: &str) -> RemoteResult<Option<LabelRecord>> {
        Ok(None)
    }
}

//! Remote verification client
//!
//! The authoritative check lives behind the [`RemoteVerifier`] trait so tests
//! can script the server's behavior; [`HttpVerifyService`] is the production
//! implementation.
//!
//! Reply classification drives the whole engine: a definitive application
//! reply (a parsed outcome or an explicit rejection) acknowledges the
//! attempt, while transport-level failures (timeouts, connection errors,
//! 5xx) mean the attempt must be retried later.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use shared::models::LabelRecord;
use shared::request::VerifySubmission;
use shared::response::VerifyOutcome;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Remote call error type
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network failure, timeout or server-side outage; retry later
    #[error("Transport error: {0}")]
    Transport(String),

    /// Definitive business rejection from the server
    #[error("Server rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Server answered but the body was not a verification reply. Captive
    /// portals answer 2xx with arbitrary HTML, so this is not definitive.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Authoritative verification endpoint, as consumed by the engine
#[async_trait]
pub trait RemoteVerifier: Send + Sync {
    /// Submit a verification attempt. Any `Ok` reply is definitive; a
    /// [`RemoteError::Rejected`] is also definitive for drain purposes.
    async fn submit(&self, submission: &VerifySubmission) -> RemoteResult<VerifyOutcome>;

    /// Fetch a label's authoritative binding to warm the local cache.
    /// `Ok(None)` means the label is unknown or inactive.
    async fn fetch_label(&self, label_id: &str) -> RemoteResult<Option<LabelRecord>>;
}

/// Label fetch reply, mirroring the server's `/api/labels/{id}` shape
#[derive(Debug, serde::Deserialize)]
struct LabelReply {
    bound_serial_norm: Option<String>,
    #[serde(default)]
    device: Option<DeviceReply>,
}

#[derive(Debug, serde::Deserialize)]
struct DeviceReply {
    model: Option<String>,
    serial_raw: Option<String>,
}

/// HTTP client for the verification server
pub struct HttpVerifyService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpVerifyService {
    /// Create a new service from configuration; the configured timeout bounds
    /// every remote check
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn classify_status(status: StatusCode) -> Option<RemoteError> {
        if status.is_success() {
            return None;
        }
        if status.is_server_error() {
            return Some(RemoteError::Transport(format!(
                "server error status {status}"
            )));
        }
        // Filled in by the caller once the body is read
        Some(RemoteError::Rejected {
            status: status.as_u16(),
            body: String::new(),
        })
    }
}

#[async_trait]
impl RemoteVerifier for HttpVerifyService {
    async fn submit(&self, submission: &VerifySubmission) -> RemoteResult<VerifyOutcome> {
        let url = format!("{}/api/verify", self.base_url);
        let mut request = self.client.post(&url).json(submission);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        match Self::classify_status(status) {
            Some(RemoteError::Rejected { status, .. }) => {
                let body = response.text().await.unwrap_or_default();
                Err(RemoteError::Rejected { status, body })
            }
            Some(err) => Err(err),
            None => response
                .json::<VerifyOutcome>()
                .await
                .map_err(|e| RemoteError::InvalidResponse(e.to_string())),
        }
    }

    async fn fetch_label(&self, label_id: &str) -> RemoteResult<Option<LabelRecord>> {
        let url = format!("{}/api/labels/{}", self.base_url, label_id);
        let mut request = self.client.get(&url);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        match Self::classify_status(status) {
            Some(RemoteError::Rejected { status, .. }) => {
                let body = response.text().await.unwrap_or_default();
                return Err(RemoteError::Rejected { status, body });
            }
            Some(err) => return Err(err),
            None => {}
        }

        let reply: LabelReply = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        let (device_model, device_serial_raw) = match reply.device {
            Some(device) => (device.model, device.serial_raw),
            None => (None, None),
        };

        Ok(Some(LabelRecord {
            label_id: label_id.to_string(),
            expected_serial_norm: reply.bound_serial_norm,
            device_model,
            device_serial_raw,
            cached_at: shared::util::now_millis(),
        }))
    }
}

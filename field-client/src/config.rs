//! Client configuration

use std::path::PathBuf;

/// Offline decision procedure used when the server cannot be reached.
///
/// The offline fallback approximates server semantics without being able to
/// run them; which approximation is acceptable differs per deployment, so the
/// policy is configuration rather than a hardcoded comparison rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyPolicy {
    /// A cached record for the label is sufficient for a pass
    ExistenceOnly,
    /// The normalized observed serial must match the cached binding
    #[default]
    ValueMatch,
}

/// Engine configuration
///
/// # Environment variables
///
/// All settings can be supplied through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SERVER_URL | http://localhost:8000 | Verification server base URL |
/// | WORK_DIR | /var/lib/field-verify | Directory holding the local database |
/// | REQUEST_TIMEOUT_SECS | 30 | Remote check timeout (seconds) |
/// | VERIFY_POLICY | value_match | `value_match` or `existence_only` |
/// | DRAIN_INTERVAL_SECS | 300 | Periodic safety-net drain interval |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Verification server base URL
    pub server_url: String,
    /// Caller-supplied identity token, forwarded as a Bearer header
    pub token: Option<String>,
    /// Remote check timeout in seconds; exceeding it counts as a transport failure
    pub timeout_secs: u64,
    /// Directory holding the local database file
    pub work_dir: String,
    /// Offline decision policy
    pub policy: VerifyPolicy,
    /// Periodic drain interval in seconds (safety net alongside
    /// connectivity-transition drains)
    pub drain_interval_secs: u64,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: None,
            timeout_secs: 30,
            work_dir: "/var/lib/field-verify".to_string(),
            policy: VerifyPolicy::default(),
            drain_interval_secs: 300,
        }
    }

    /// Load configuration from environment variables, with defaults for
    /// anything unset
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".into()),
        );
        config.token = std::env::var("VERIFY_TOKEN").ok();
        config.timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        config.work_dir =
            std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/field-verify".into());
        config.policy = match std::env::var("VERIFY_POLICY").as_deref() {
            Ok("existence_only") => VerifyPolicy::ExistenceOnly,
            _ => VerifyPolicy::ValueMatch,
        };
        config.drain_interval_secs = std::env::var("DRAIN_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);
        config
    }

    /// Set the identity token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the remote check timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the working directory
    pub fn with_work_dir(mut self, dir: impl Into<String>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Set the offline verification policy
    pub fn with_policy(mut self, policy: VerifyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the periodic drain interval
    pub fn with_drain_interval(mut self, seconds: u64) -> Self {
        self.drain_interval_secs = seconds;
        self
    }

    /// Path of the local database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("field.redb")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

//! Shared types for the field verification engine
//!
//! Domain models, wire types and serial normalization used by the
//! field-client engine and any server-side crate that speaks the same
//! protocol.

pub mod models;
pub mod normalize;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use models::{LabelRecord, PendingEvent, VerifyMethod, VerifyStatus};
pub use normalize::normalize_serial;
pub use request::{VerifyRequest, VerifySubmission};
pub use response::VerifyOutcome;

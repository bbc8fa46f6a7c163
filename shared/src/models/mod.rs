//! Domain models

pub mod event;
pub mod label;

pub use event::{PendingEvent, VerifyMethod, VerifyStatus};
pub use label::LabelRecord;

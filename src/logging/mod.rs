//! Structured logging setup for the batch driver.

mod format;

pub use format::{StructuredLogger, UserSummary};

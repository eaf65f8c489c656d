//! Log output for the batch driver. Diagnostics go to stderr so stdout stays
//! free for piping; run summaries are written as JSON lines to their own file.

use crate::config::LogConfig;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Per-user outcome line for the end-of-run summary
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary<'a> {
    pub user: &'a str,
    pub weeks: usize,
    pub insider_weeks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber. RUST_LOG wins over `config.level`.
    /// JSON lines carry the enclosing `user` span so batch logs can be grouped.
    /// Returns false when a subscriber was already installed.
    pub fn init(config: &LogConfig) -> bool {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.level));
        let registry = tracing_subscriber::registry().with(filter);
        let installed = if config.json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .try_init()
        };
        installed.is_ok()
    }

    /// Append `record` to `w` as one JSON object followed by a newline.
    pub fn write_json_line(record: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        serde_json::to_writer(&mut *w, record)?;
        w.write_all(b"\n")
    }
}

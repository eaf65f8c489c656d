//! Activity-log events: one row of a logon or file log, attributed to a user.
//! Rows are kept as raw text; timestamps are parsed later during bucketing.

mod reader;

pub use reader::filter_events;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used by every log and incident file: `MM/DD/YYYY HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// Raw timestamp text, unvalidated
    pub timestamp: String,
    pub user: String,
    /// Workstation / PC the event happened on
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        user: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            user: user.into(),
            resource: resource.into(),
            activity: None,
            filename: None,
        }
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Parsed timestamp, or `None` when the raw text is malformed
    pub fn parsed_ts(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    pub fn is_logon(&self) -> bool {
        self.activity
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case("logon"))
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

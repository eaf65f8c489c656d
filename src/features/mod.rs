//! Weekly behavioral feature extraction from raw activity events.

mod aggregate;
mod frame;
mod pipeline;
mod primary;
mod week;

pub use aggregate::{
    after_hours_counts, count_weekly, distinct_weekly, exe_file_counts, other_pc_counts,
};
pub use frame::{FeatureFrame, FrameRow};
pub use pipeline::{FeatureExtractor, UserEvents};
pub use primary::resolve_primary;
pub use week::{enumerate_weeks, ParseWeekError, Stamp, WeekBucket, WeekIndex};

use serde::{Deserialize, Serialize};

/// Which weekly metric a table holds. The serialized name is the output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    #[serde(rename = "num_exe_files")]
    ExeFiles,
    #[serde(rename = "num_other_pc")]
    OtherPcs,
    #[serde(rename = "after_hours_logons")]
    AfterHoursLogons,
}

/// Event log a metric is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Logon,
    File,
}

impl MetricKind {
    pub fn column_name(&self) -> &'static str {
        match self {
            MetricKind::ExeFiles => "num_exe_files",
            MetricKind::OtherPcs => "num_other_pc",
            MetricKind::AfterHoursLogons => "after_hours_logons",
        }
    }

    pub fn source(&self) -> SourceKind {
        match self {
            MetricKind::ExeFiles => SourceKind::File,
            MetricKind::OtherPcs | MetricKind::AfterHoursLogons => SourceKind::Logon,
        }
    }
}

/// One (user, week) row of a metric table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWeekRecord {
    pub user: String,
    pub week: WeekBucket,
    pub value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insider: Option<u8>,
}

/// Dense weekly series of one metric for one user, ordered by week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyTable {
    pub user: String,
    pub metric: MetricKind,
    pub rows: Vec<UserWeekRecord>,
}

impl WeeklyTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn weeks(&self) -> impl Iterator<Item = WeekBucket> + '_ {
        self.rows.iter().map(|r| r.week)
    }

    pub fn values(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.value).collect()
    }
}

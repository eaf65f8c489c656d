//! Merge per-metric weekly tables onto one shared week index.

use super::week::WeekBucket;
use super::{MetricKind, WeeklyTable};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRow {
    pub week: WeekBucket,
    /// One value per metric, in `FeatureFrame::metrics` order
    pub values: Vec<u64>,
    pub insider: Option<u8>,
}

/// One user's metrics side by side, one row per week of the union window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFrame {
    pub user: String,
    pub metrics: Vec<MetricKind>,
    pub rows: Vec<FrameRow>,
}

impl FeatureFrame {
    /// Union window runs from the earliest to the latest week of any table.
    /// Weeks outside a metric's own window read as 0 for that metric.
    pub fn merge(user: &str, tables: &[WeeklyTable]) -> Self {
        let metrics: Vec<MetricKind> = tables.iter().map(|t| t.metric).collect();
        let first = tables.iter().filter_map(|t| t.rows.first()).map(|r| r.week).min();
        let last = tables.iter().filter_map(|t| t.rows.last()).map(|r| r.week).max();

        let weeks = match (first, last) {
            (Some(first), Some(last)) => WeekBucket::range(first, last),
            _ => Vec::new(),
        };

        let lookups: Vec<BTreeMap<WeekBucket, u64>> = tables
            .iter()
            .map(|t| t.rows.iter().map(|r| (r.week, r.value)).collect())
            .collect();

        let rows = weeks
            .into_iter()
            .map(|week| FrameRow {
                week,
                values: lookups
                    .iter()
                    .map(|l| l.get(&week).copied().unwrap_or(0))
                    .collect(),
                insider: None,
            })
            .collect();

        Self {
            user: user.to_string(),
            metrics,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column of one metric, aligned with `rows`
    pub fn column(&self, metric: MetricKind) -> Option<Vec<u64>> {
        let i = self.metrics.iter().position(|m| *m == metric)?;
        Some(self.rows.iter().map(|r| r.values[i]).collect())
    }
}

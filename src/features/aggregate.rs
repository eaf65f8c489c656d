//! Per-week metric aggregation over a user's week index.
//!
//! Every bucket of the index gets a value; weeks with nothing qualifying
//! report 0 so the output is a dense series.

use super::primary::resolve_primary;
use super::week::{enumerate_weeks, Stamp, WeekBucket, WeekIndex};
use super::{MetricKind, UserWeekRecord, WeeklyTable};
use crate::config::BusinessHours;
use crate::events::Event;
use std::collections::{BTreeMap, BTreeSet};

/// Number of events per bucket that satisfy `predicate`.
pub fn count_weekly<F>(
    events: &[Event],
    index: &WeekIndex,
    mut predicate: F,
) -> BTreeMap<WeekBucket, u64>
where
    F: FnMut(&Event, &Stamp) -> bool,
{
    let mut counts: BTreeMap<WeekBucket, u64> =
        index.buckets().iter().map(|w| (*w, 0)).collect();
    for (event, stamp) in index.stamped(events) {
        if predicate(event, &stamp) {
            *counts.entry(stamp.week).or_insert(0) += 1;
        }
    }
    counts
}

/// Number of distinct keys per bucket; events where `key` is `None` do not count.
pub fn distinct_weekly<'a, F>(
    events: &'a [Event],
    index: &'a WeekIndex,
    mut key: F,
) -> BTreeMap<WeekBucket, u64>
where
    F: FnMut(&'a Event) -> Option<&'a str>,
{
    let mut seen: BTreeMap<WeekBucket, BTreeSet<&'a str>> =
        index.buckets().iter().map(|w| (*w, BTreeSet::new())).collect();
    for (event, stamp) in index.stamped(events) {
        if let Some(k) = key(event) {
            seen.entry(stamp.week).or_default().insert(k);
        }
    }
    seen.into_iter().map(|(w, s)| (w, s.len() as u64)).collect()
}

/// Weekly count of file events whose filename ends with `suffix`.
pub fn exe_file_counts(user: &str, events: &[Event], suffix: &str) -> WeeklyTable {
    let index = enumerate_weeks(events);
    let counts = count_weekly(events, &index, |e, _| {
        e.filename.as_deref().is_some_and(|f| f.ends_with(suffix))
    });
    WeeklyTable::from_counts(user, MetricKind::ExeFiles, counts)
}

/// Weekly count of distinct PCs other than the user's primary one.
pub fn other_pc_counts(user: &str, events: &[Event]) -> WeeklyTable {
    let Ok(primary) = resolve_primary(events) else {
        return WeeklyTable::empty(user, MetricKind::OtherPcs);
    };
    let index = enumerate_weeks(events);
    let counts = distinct_weekly(events, &index, |e| {
        (e.resource != primary).then_some(e.resource.as_str())
    });
    WeeklyTable::from_counts(user, MetricKind::OtherPcs, counts)
}

/// Weekly count of logons outside business hours.
pub fn after_hours_counts(user: &str, events: &[Event], hours: &BusinessHours) -> WeeklyTable {
    let index = enumerate_weeks(events);
    let counts = count_weekly(events, &index, |e, stamp| {
        e.is_logon() && hours.is_after_hours(stamp.at.time())
    });
    WeeklyTable::from_counts(user, MetricKind::AfterHoursLogons, counts)
}

impl WeeklyTable {
    pub fn empty(user: &str, metric: MetricKind) -> Self {
        Self {
            user: user.to_string(),
            metric,
            rows: Vec::new(),
        }
    }

    /// Rows in chronological order; the map's ordering is the week order.
    pub fn from_counts(
        user: &str,
        metric: MetricKind,
        counts: BTreeMap<WeekBucket, u64>,
    ) -> Self {
        let rows = counts
            .into_iter()
            .map(|(week, value)| UserWeekRecord {
                user: user.to_string(),
                week,
                value,
                insider: None,
            })
            .collect();
        Self {
            user: user.to_string(),
            metric,
            rows,
        }
    }
}

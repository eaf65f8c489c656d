//! Weekly bucketing: `%Y-%W` week keys and the contiguous week index for a user.
//!
//! Weeks start on Monday. Week 0 holds the days of a year before its first
//! Monday, so a calendar week straddling New Year splits into the last week of
//! one year and week 0 of the next (unless 1 January is a Monday). Ordering is
//! always numeric on `(year, week)`.

use crate::events::Event;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekBucket {
    year: i32,
    week: u32,
}

impl WeekBucket {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let yday = date.ordinal0();
        let wday = date.weekday().num_days_from_monday();
        Self {
            year: date.year(),
            week: (yday + 7 - wday) / 7,
        }
    }

    pub fn from_datetime(ts: NaiveDateTime) -> Self {
        Self::from_date(ts.date())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// First day of the bucket: 1 January for week 0, otherwise its Monday.
    pub fn start_date(&self) -> Option<NaiveDate> {
        let jan1 = NaiveDate::from_yo_opt(self.year, 1)?;
        if self.week == 0 {
            return Some(jan1);
        }
        let to_first_monday = (7 - jan1.weekday().num_days_from_monday()) % 7;
        let first_monday = jan1 + Duration::days(i64::from(to_first_monday));
        Some(first_monday + Duration::weeks(i64::from(self.week - 1)))
    }

    /// The bucket that follows this one: whichever starts first of the next
    /// Monday and the next 1 January.
    pub fn next(&self) -> Option<WeekBucket> {
        let start = self.start_date()?;
        let next_monday =
            start + Duration::days(i64::from(7 - start.weekday().num_days_from_monday()));
        let next_jan1 = NaiveDate::from_yo_opt(self.year + 1, 1)?;
        Some(Self::from_date(next_monday.min(next_jan1)))
    }

    /// Every bucket from `first` to `last` inclusive, in order.
    pub fn range(first: WeekBucket, last: WeekBucket) -> Vec<WeekBucket> {
        let mut out = Vec::new();
        let mut current = Some(first);
        while let Some(bucket) = current {
            if bucket > last {
                break;
            }
            out.push(bucket);
            current = bucket.next();
        }
        out
    }
}

impl fmt::Display for WeekBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.week)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWeekError(String);

impl fmt::Display for ParseWeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid week bucket {:?}, expected YYYY-WW", self.0)
    }
}

impl std::error::Error for ParseWeekError {}

impl FromStr for WeekBucket {
    type Err = ParseWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseWeekError(s.to_string());
        let (year, week) = s.split_once('-').ok_or_else(err)?;
        let year = year.parse::<i32>().map_err(|_| err())?;
        let week = week.parse::<u32>().map_err(|_| err())?;
        if week > 53 {
            return Err(err());
        }
        Ok(Self { year, week })
    }
}

impl Serialize for WeekBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parsed timestamp of one event together with its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub at: NaiveDateTime,
    pub week: WeekBucket,
}

/// Contiguous week buckets spanning a user's events, plus each event's bucket.
#[derive(Debug, Clone, Default)]
pub struct WeekIndex {
    buckets: Vec<WeekBucket>,
    stamps: Vec<Option<Stamp>>,
}

impl WeekIndex {
    /// All buckets from the earliest to the latest event, gap-free and ordered
    pub fn buckets(&self) -> &[WeekBucket] {
        &self.buckets
    }

    /// Per-event assignment, aligned with the events the index was built from.
    /// `None` marks an event whose timestamp did not parse.
    pub fn stamps(&self) -> &[Option<Stamp>] {
        &self.stamps
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Events that parsed, paired with their stamp
    pub fn stamped<'a>(
        &'a self,
        events: &'a [Event],
    ) -> impl Iterator<Item = (&'a Event, Stamp)> + 'a {
        events
            .iter()
            .zip(self.stamps.iter())
            .filter_map(|(e, s)| s.map(|s| (e, s)))
    }
}

/// Bucket every event and enumerate the full week window between the first
/// and last parseable event. Unparseable timestamps are skipped.
pub fn enumerate_weeks(events: &[Event]) -> WeekIndex {
    let stamps: Vec<Option<Stamp>> = events
        .iter()
        .map(|e| {
            e.parsed_ts().map(|at| Stamp {
                at,
                week: WeekBucket::from_datetime(at),
            })
        })
        .collect();

    let unparsed = stamps.iter().filter(|s| s.is_none()).count();
    if unparsed > 0 {
        debug!(unparsed, total = events.len(), "skipped unparseable timestamps");
    }

    let weeks = stamps.iter().flatten().map(|s| s.week);
    let bounds = weeks.fold(None, |acc: Option<(WeekBucket, WeekBucket)>, w| match acc {
        None => Some((w, w)),
        Some((lo, hi)) => Some((lo.min(w), hi.max(w))),
    });

    let buckets = match bounds {
        Some((first, last)) => WeekBucket::range(first, last),
        None => Vec::new(),
    };
    WeekIndex { buckets, stamps }
}

//! Ground-truth labeling: find a user's incident file and mark the weeks it covers.

mod locate;

pub use locate::{is_incident_file, list_insider_users, locate_incident_file};

use crate::error::{FeatureError, Result};
use crate::events::parse_timestamp;
use crate::features::{FeatureFrame, WeekBucket, WeeklyTable};
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Weeks in which a user performed a labeled malicious action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentWeeks {
    weeks: BTreeSet<WeekBucket>,
}

impl IncidentWeeks {
    pub fn new(weeks: impl IntoIterator<Item = WeekBucket>) -> Self {
        Self {
            weeks: weeks.into_iter().collect(),
        }
    }

    /// Read an incident file (no header, ragged rows) and bucket the timestamp
    /// at `timestamp_column` of each row. Malformed rows are skipped.
    pub fn load(path: &Path, timestamp_column: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| FeatureError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut record = StringRecord::new();
        let mut weeks = BTreeSet::new();
        let mut skipped = 0usize;
        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is_io_error() => {
                    return Err(FeatureError::Read {
                        path: path.to_path_buf(),
                        source: e,
                    })
                }
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            }
            match record.get(timestamp_column).and_then(parse_timestamp) {
                Some(ts) => {
                    weeks.insert(WeekBucket::from_datetime(ts));
                }
                None => skipped += 1,
            }
        }
        debug!(path = %path.display(), weeks = weeks.len(), skipped, "loaded incident weeks");
        Ok(Self { weeks })
    }

    pub fn contains(&self, week: &WeekBucket) -> bool {
        self.weeks.contains(week)
    }

    pub fn label(&self, week: &WeekBucket) -> u8 {
        u8::from(self.contains(week))
    }

    pub fn weeks(&self) -> impl Iterator<Item = &WeekBucket> {
        self.weeks.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

/// Label every row of `table`: 1 when its week appears in the incident file,
/// otherwise 0. No incident file means every row is 0.
pub fn join_labels(
    mut table: WeeklyTable,
    incident_file: Option<&Path>,
    timestamp_column: usize,
) -> Result<WeeklyTable> {
    let incidents = match incident_file {
        Some(path) => IncidentWeeks::load(path, timestamp_column)?,
        None => IncidentWeeks::default(),
    };
    apply_to_table(&mut table, &incidents);
    Ok(table)
}

pub fn apply_to_table(table: &mut WeeklyTable, incidents: &IncidentWeeks) {
    for row in &mut table.rows {
        row.insider = Some(incidents.label(&row.week));
    }
}

pub fn apply_to_frame(frame: &mut FeatureFrame, incidents: &IncidentWeeks) {
    for row in &mut frame.rows {
        row.insider = Some(incidents.label(&row.week));
    }
}

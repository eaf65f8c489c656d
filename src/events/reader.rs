//! Event filter: scan a positional CSV log and keep one user's rows.

use super::Event;
use crate::config::SourceSchema;
use crate::error::{FeatureError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Return every row of `path` whose user column equals `user`, in file order.
///
/// Short or undecodable rows are skipped. Failing to open or read the file is
/// an error; the handle is dropped before returning either way.
pub fn filter_events(user: &str, path: &Path, schema: &SourceSchema) -> Result<Vec<Event>> {
    let file = File::open(path).map_err(|source| FeatureError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(schema.has_header)
        .flexible(true)
        .from_reader(file);

    let min_columns = schema.min_columns();
    let mut record = StringRecord::new();
    let mut events = Vec::new();
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
            Err(e) => {
                skipped += 1;
                debug!(path = %path.display(), error = %e, "skipping undecodable row");
                continue;
            }
        }
        if record.get(schema.user_column) != Some(user) {
            continue;
        }
        if record.len() < min_columns {
            skipped += 1;
            continue;
        }
        events.push(to_event(&record, schema));
    }

    debug!(
        user,
        path = %path.display(),
        matched = events.len(),
        skipped,
        "filtered events"
    );
    Ok(events)
}

fn to_event(record: &StringRecord, schema: &SourceSchema) -> Event {
    let field = |i: usize| record.get(i).unwrap_or_default().to_string();
    Event {
        id: field(schema.id_column),
        timestamp: field(schema.timestamp_column),
        user: field(schema.user_column),
        resource: field(schema.resource_column),
        activity: schema
            .activity_column
            .and_then(|i| record.get(i))
            .map(String::from),
        filename: schema
            .filename_column
            .and_then(|i| record.get(i))
            .map(String::from),
    }
}

//! Table output: CSV with a header row, or NDJSON (one object per row).
//!
//! Writers are deterministic; the same table always yields the same bytes.

use crate::config::OutputFormat;
use crate::error::{FeatureError, Result};
use crate::features::{FeatureFrame, WeeklyTable};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One output row: (column, value) pairs in column order.
type Row = Vec<(&'static str, Value)>;

pub fn write_table(table: &WeeklyTable, path: &Path, format: OutputFormat) -> Result<()> {
    let labeled = table.rows.iter().any(|r| r.insider.is_some());
    let mut columns = vec!["user", "week", table.metric.column_name()];
    if labeled {
        columns.push("insider");
    }
    let rows = table.rows.iter().map(|r| {
        let mut row: Row = vec![
            ("user", Value::from(r.user.as_str())),
            ("week", Value::from(r.week.to_string())),
            (table.metric.column_name(), Value::from(r.value)),
        ];
        if let Some(label) = r.insider {
            row.push(("insider", Value::from(label)));
        }
        row
    });
    write_rows(path, format, &columns, rows)
}

pub fn write_frame(frame: &FeatureFrame, path: &Path, format: OutputFormat) -> Result<()> {
    let labeled = frame.rows.iter().any(|r| r.insider.is_some());
    let mut columns = vec!["user", "week"];
    columns.extend(frame.metrics.iter().map(|m| m.column_name()));
    if labeled {
        columns.push("insider");
    }
    let rows = frame.rows.iter().map(|r| {
        let mut row: Row = vec![
            ("user", Value::from(frame.user.as_str())),
            ("week", Value::from(r.week.to_string())),
        ];
        for (metric, value) in frame.metrics.iter().zip(&r.values) {
            row.push((metric.column_name(), Value::from(*value)));
        }
        if let Some(label) = r.insider {
            row.push(("insider", Value::from(label)));
        }
        row
    });
    write_rows(path, format, &columns, rows)
}

fn write_rows(
    path: &Path,
    format: OutputFormat,
    columns: &[&str],
    rows: impl Iterator<Item = Row>,
) -> Result<()> {
    let file = File::create(path).map_err(|e| FeatureError::write(path, e))?;
    match format {
        OutputFormat::Csv => {
            let mut w = csv::Writer::from_writer(file);
            w.write_record(columns).map_err(|e| FeatureError::write(path, e))?;
            for row in rows {
                let fields = row.iter().map(|(_, v)| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                });
                w.write_record(fields).map_err(|e| FeatureError::write(path, e))?;
            }
            w.flush().map_err(|e| FeatureError::write(path, e))?;
        }
        OutputFormat::Ndjson => {
            let mut w = BufWriter::new(file);
            for row in rows {
                let obj: Map<String, Value> =
                    row.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
                let line = serde_json::to_string(&obj).map_err(|e| FeatureError::write(path, e))?;
                writeln!(w, "{line}").map_err(|e| FeatureError::write(path, e))?;
            }
            w.flush().map_err(|e| FeatureError::write(path, e))?;
        }
    }
    Ok(())
}

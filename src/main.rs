//! Batch entrypoint: `insider-features [config.json]`.
//! Extracts weekly features for every configured user and writes one table
//! set per user; a per-user summary is appended as NDJSON.

use insider_features::{
    batch::BatchRunner,
    config::ExtractorConfig,
    logging::{StructuredLogger, UserSummary},
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let config = ExtractorConfig::load(&config_path)?;

    StructuredLogger::init(&config.log);

    info!(
        config = %config_path.display(),
        data_dir = %config.data_dir.display(),
        "insider feature extraction starting"
    );

    let runner = BatchRunner::new(config);
    let report = runner.run()?;

    let summary_path = runner.config().output_dir.join("summary.ndjson");
    let mut summary = BufWriter::new(File::create(&summary_path)?);
    for outcome in &report.succeeded {
        let incident_file = outcome.incident_file.as_ref().map(|p| p.display().to_string());
        StructuredLogger::write_json_line(
            &UserSummary {
                user: &outcome.user,
                weeks: outcome.weeks,
                insider_weeks: outcome.insider_weeks,
                incident_file,
                error: None,
            },
            &mut summary,
        )?;
    }
    for (user, err) in &report.failed {
        StructuredLogger::write_json_line(
            &UserSummary {
                user,
                weeks: 0,
                insider_weeks: 0,
                incident_file: None,
                error: Some(err.to_string()),
            },
            &mut summary,
        )?;
    }

    summary.flush()?;

    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        summary = %summary_path.display(),
        "insider feature extraction complete"
    );

    if report.total() > 0 && report.succeeded.is_empty() {
        warn!("every user failed");
        return Err("every user failed".into());
    }
    Ok(())
}

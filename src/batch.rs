//! Batch driver: run the per-user pipeline for many users.
//! One user's failure is recorded and logged; the rest still run.

use crate::config::ExtractorConfig;
use crate::error::{FeatureError, Result};
use crate::features::{FeatureExtractor, FeatureFrame, UserEvents, WeeklyTable};
use crate::labels::{
    apply_to_frame, apply_to_table, list_insider_users, locate_incident_file, IncidentWeeks,
};
use crate::output::{write_frame, write_table};
use std::path::PathBuf;
use tracing::{info, info_span, warn};

/// Everything computed for one user, before writing.
#[derive(Debug, Clone)]
pub struct UserFeatures {
    pub user: String,
    pub tables: Vec<WeeklyTable>,
    pub frame: FeatureFrame,
    pub incident_file: Option<PathBuf>,
}

impl UserFeatures {
    pub fn insider_weeks(&self) -> usize {
        self.frame.rows.iter().filter(|r| r.insider == Some(1)).count()
    }
}

#[derive(Debug, Clone)]
pub struct UserOutcome {
    pub user: String,
    pub weeks: usize,
    pub insider_weeks: usize,
    pub incident_file: Option<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<UserOutcome>,
    pub failed: Vec<(String, FeatureError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

pub struct BatchRunner {
    config: ExtractorConfig,
    extractor: FeatureExtractor,
}

impl BatchRunner {
    pub fn new(config: ExtractorConfig) -> Self {
        let extractor = FeatureExtractor::new(config.features.clone());
        Self { config, extractor }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Configured users, or every user with an incident file when none are listed.
    pub fn users(&self) -> Vec<String> {
        if !self.config.users.is_empty() {
            return self.config.users.clone();
        }
        match &self.config.answers_dir {
            Some(root) => list_insider_users(root, &self.config.labels.release_prefix)
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Filter, aggregate, merge and (when an answers tree is configured) label.
    pub fn process_user(&self, user: &str) -> Result<UserFeatures> {
        let events = UserEvents::load(user, &self.config, &self.extractor.required_sources())?;
        let mut tables = self.extractor.extract(&events);
        let mut frame = FeatureFrame::merge(user, &tables);

        let mut incident_file = None;
        if let Some(root) = &self.config.answers_dir {
            incident_file = locate_incident_file(user, root, &self.config.labels.release_prefix);
            let incidents = match &incident_file {
                Some(path) => IncidentWeeks::load(path, self.config.labels.timestamp_column)?,
                None => IncidentWeeks::default(),
            };
            for table in &mut tables {
                apply_to_table(table, &incidents);
            }
            apply_to_frame(&mut frame, &incidents);
        }

        Ok(UserFeatures {
            user: user.to_string(),
            tables,
            frame,
            incident_file,
        })
    }

    /// Process one user and write their tables under `output_dir`.
    pub fn run_user(&self, user: &str) -> Result<UserOutcome> {
        let features = self.process_user(user)?;
        let format = self.config.output.format;
        let ext = format.extension();
        let mut outputs = Vec::new();

        if self.config.output.per_metric {
            for table in &features.tables {
                let path = self
                    .config
                    .output_dir
                    .join(format!("{}_{}.{}", user, table.metric.column_name(), ext));
                write_table(table, &path, format)?;
                outputs.push(path);
            }
        }
        let path = self.config.output_dir.join(format!("{}_features.{}", user, ext));
        write_frame(&features.frame, &path, format)?;
        outputs.push(path);

        Ok(UserOutcome {
            user: user.to_string(),
            weeks: features.frame.rows.len(),
            insider_weeks: features.insider_weeks(),
            incident_file: features.incident_file,
            outputs,
        })
    }

    /// Run every user. Only failing to create the output directory aborts the batch.
    pub fn run(&self) -> Result<BatchReport> {
        std::fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| FeatureError::write(&self.config.output_dir, e))?;

        let users = self.users();
        info!(
            users = users.len(),
            output_dir = %self.config.output_dir.display(),
            "batch starting"
        );

        let mut report = BatchReport::default();
        for user in users {
            let span = info_span!("user", user = %user);
            let _guard = span.enter();
            match self.run_user(&user) {
                Ok(outcome) => {
                    info!(
                        weeks = outcome.weeks,
                        insider_weeks = outcome.insider_weeks,
                        labeled = outcome.incident_file.is_some(),
                        "user complete"
                    );
                    report.succeeded.push(outcome);
                }
                Err(e) => {
                    warn!(error = %e, "user failed");
                    report.failed.push((user, e));
                }
            }
        }
        Ok(report)
    }
}

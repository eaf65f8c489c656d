//! Extractor configuration. Every field has a default so partial JSON files work.

use crate::error::{FeatureError, Result};
use crate::features::MetricKind;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Directory holding the event logs (logon.csv, file.csv, ...)
    pub data_dir: PathBuf,
    /// Root of the ground-truth answers tree; labeling is skipped when unset
    pub answers_dir: Option<PathBuf>,
    /// Where per-user tables are written
    pub output_dir: PathBuf,
    /// Users to process. Empty means every user with an incident file.
    pub users: Vec<String>,
    pub sources: SourcesConfig,
    pub features: FeaturesConfig,
    pub labels: LabelsConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub logon: SourceSchema,
    pub file: SourceSchema,
}

/// Positional layout of one event log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSchema {
    /// File name relative to `data_dir`
    pub path: PathBuf,
    pub has_header: bool,
    pub id_column: usize,
    pub timestamp_column: usize,
    pub user_column: usize,
    pub resource_column: usize,
    pub activity_column: Option<usize>,
    pub filename_column: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub business_hours: BusinessHours,
    /// Suffix marking an executable in file events
    pub exe_suffix: String,
    /// Metrics to compute, in output column order
    pub metrics: Vec<MetricKind>,
}

/// Business-hours window: `start` is inside business hours, `end` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Dataset release tag prefixing incident file names (e.g. "r5.2")
    pub release_prefix: String,
    /// Column of the incident file holding the event timestamp
    pub timestamp_column: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Also write one table per metric next to the merged frame
    pub per_metric: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Ndjson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("r5.2"),
            answers_dir: None,
            output_dir: PathBuf::from("features"),
            users: Vec::new(),
            sources: SourcesConfig::default(),
            features: FeaturesConfig::default(),
            labels: LabelsConfig::default(),
            output: OutputConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            logon: SourceSchema::logon(),
            file: SourceSchema::file(),
        }
    }
}

impl SourceSchema {
    /// `id,date,user,pc,activity` with no header row
    pub fn logon() -> Self {
        Self {
            path: PathBuf::from("logon.csv"),
            has_header: false,
            activity_column: Some(4),
            filename_column: None,
            ..Self::base()
        }
    }

    /// `id,date,user,pc,filename,activity,...` with one header row
    pub fn file() -> Self {
        Self {
            path: PathBuf::from("file.csv"),
            has_header: true,
            activity_column: Some(5),
            filename_column: Some(4),
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            path: PathBuf::new(),
            has_header: false,
            id_column: 0,
            timestamp_column: 1,
            user_column: 2,
            resource_column: 3,
            activity_column: None,
            filename_column: None,
        }
    }

    /// Smallest row width holding every required column
    pub fn min_columns(&self) -> usize {
        [
            self.id_column,
            self.timestamp_column,
            self.user_column,
            self.resource_column,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

impl Default for SourceSchema {
    fn default() -> Self {
        Self::base()
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            business_hours: BusinessHours::default(),
            exe_suffix: ".exe".to_string(),
            metrics: vec![
                MetricKind::ExeFiles,
                MetricKind::OtherPcs,
                MetricKind::AfterHoursLogons,
            ],
        }
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        }
    }
}

impl BusinessHours {
    pub fn is_after_hours(&self, t: NaiveTime) -> bool {
        t < self.start || t >= self.end
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            release_prefix: "r5.2".to_string(),
            timestamp_column: 2,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            per_metric: true,
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Ndjson => "ndjson",
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ExtractorConfig {
    /// Load from a JSON file if present; otherwise return the default.
    /// A file that exists but does not parse or validate is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| FeatureError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|source| FeatureError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|reason| FeatureError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let hours = &self.features.business_hours;
        if hours.start >= hours.end {
            return Err(format!(
                "business_hours.start ({}) must be before business_hours.end ({})",
                hours.start, hours.end
            ));
        }
        Ok(())
    }

    pub fn source_path(&self, schema: &SourceSchema) -> PathBuf {
        self.data_dir.join(&schema.path)
    }
}

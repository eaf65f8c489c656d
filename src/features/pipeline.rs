//! Feature extraction pipeline: one user's events → weekly tables per metric.

use super::{after_hours_counts, exe_file_counts, other_pc_counts};
use super::{MetricKind, SourceKind, WeeklyTable};
use crate::config::{ExtractorConfig, FeaturesConfig};
use crate::error::Result;
use crate::events::{filter_events, Event};
use tracing::debug;

/// A user's rows from each event log. A source no metric needs stays empty.
#[derive(Debug, Clone, Default)]
pub struct UserEvents {
    pub user: String,
    pub logon: Vec<Event>,
    pub file: Vec<Event>,
}

impl UserEvents {
    /// Read the sources listed in `needed` for `user`.
    pub fn load(user: &str, config: &ExtractorConfig, needed: &[SourceKind]) -> Result<Self> {
        let mut out = Self {
            user: user.to_string(),
            ..Self::default()
        };
        if needed.contains(&SourceKind::Logon) {
            let schema = &config.sources.logon;
            out.logon = filter_events(user, &config.source_path(schema), schema)?;
        }
        if needed.contains(&SourceKind::File) {
            let schema = &config.sources.file;
            out.file = filter_events(user, &config.source_path(schema), schema)?;
        }
        debug!(user, logon = out.logon.len(), file = out.file.len(), "loaded user events");
        Ok(out)
    }

    pub fn source(&self, kind: SourceKind) -> &[Event] {
        match kind {
            SourceKind::Logon => &self.logon,
            SourceKind::File => &self.file,
        }
    }
}

pub struct FeatureExtractor {
    config: FeaturesConfig,
}

impl FeatureExtractor {
    pub fn new(config: FeaturesConfig) -> Self {
        Self { config }
    }

    /// Sources the configured metrics read from, without duplicates
    pub fn required_sources(&self) -> Vec<SourceKind> {
        let mut out = Vec::new();
        for m in &self.config.metrics {
            let s = m.source();
            if !out.contains(&s) {
                out.push(s);
            }
        }
        out
    }

    pub fn metric(&self, metric: MetricKind, user: &str, events: &[Event]) -> WeeklyTable {
        match metric {
            MetricKind::ExeFiles => exe_file_counts(user, events, &self.config.exe_suffix),
            MetricKind::OtherPcs => other_pc_counts(user, events),
            MetricKind::AfterHoursLogons => {
                after_hours_counts(user, events, &self.config.business_hours)
            }
        }
    }

    /// One table per configured metric, in configuration order
    pub fn extract(&self, events: &UserEvents) -> Vec<WeeklyTable> {
        self.config
            .metrics
            .iter()
            .map(|m| self.metric(*m, &events.user, events.source(m.source())))
            .collect()
    }

    pub fn config(&self) -> &FeaturesConfig {
        &self.config
    }
}

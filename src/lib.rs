//! Insider features — weekly per-user behavioral features from activity logs.
//!
//! Modular structure:
//! - [`events`] — Per-user filtering of positional CSV event logs
//! - [`features`] — Week bucketing, gap-filled weekly metrics, merged frames
//! - [`labels`] — Ground-truth incident lookup and week labeling
//! - [`output`] — CSV / NDJSON table writers
//! - [`batch`] — Multi-user driver with per-user failure isolation
//! - [`logging`] — Structured logging

pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod features;
pub mod labels;
pub mod logging;
pub mod output;

pub use batch::{BatchReport, BatchRunner, UserFeatures};
pub use config::ExtractorConfig;
pub use error::{FeatureError, Result};
pub use events::{filter_events, Event};
pub use features::{
    enumerate_weeks, resolve_primary, FeatureExtractor, FeatureFrame, MetricKind, WeekBucket,
    WeeklyTable,
};
pub use labels::{join_labels, locate_incident_file, IncidentWeeks};
pub use logging::StructuredLogger;

//! Primary-resource resolution: the workstation a user touches most often.

use crate::error::{FeatureError, Result};
use crate::events::Event;
use std::collections::BTreeMap;

/// Most frequent `resource` across `events`. Ties go to the lexicographically
/// smallest resource id.
pub fn resolve_primary(events: &[Event]) -> Result<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for e in events {
        *counts.entry(e.resource.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (resource, count) in counts {
        // strict comparison keeps the earlier (smaller) id on ties
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((resource, count));
        }
    }
    best.map(|(r, _)| r.to_string())
        .ok_or(FeatureError::EmptyInput)
}

//! Listing of the names a sampling profile records.

use super::profile::SamplingProfile;
use crate::utils::error::FieldError;
use colored::*;
use serde_json::{Map, Value};

/// Render the global fields, activity timelines and sampled metric names
///
/// **Public** - used by `map names`
///
/// # Errors
/// * `FieldError` - `info`, `samples.activity` or `samples.metrics` missing
pub fn render_metric_names(profile: &SamplingProfile) -> Result<String, FieldError> {
    let mut out = String::new();

    push_section(&mut out, "Global metrics (one per file):", profile.info()?, 0);
    push_section(
        &mut out,
        "Activity timelines available:",
        profile.activity()?,
        1,
    );
    push_section(
        &mut out,
        "Sampled (i.e. time-series) metric names:",
        profile.metrics()?,
        0,
    );

    Ok(out)
}

fn push_section(out: &mut String, title: &str, map: &Map<String, Value>, depth: usize) {
    out.push_str(&format!("{}\n", title.bold()));
    push_keys(out, map, depth, 1);
    out.push('\n');
}

fn push_keys(out: &mut String, map: &Map<String, Value>, depth: usize, indent: usize) {
    for (key, child) in map {
        out.push_str(&"\t".repeat(indent));
        out.push_str(key);
        out.push('\n');

        if depth > 0 {
            if let Some(child) = child.as_object() {
                push_keys(out, child, depth - 1, indent + 1);
            }
        }
    }
}

//! Truncation of a sampling profile to a window of samples.
//!
//! Every array under `samples` is cut to the inclusive index range. When
//! the window does not cover the whole run, the run summary is adjusted:
//! whole-run metrics are dropped, the run time is rescaled and the start
//! time is moved to the first kept window.

use super::profile::{count_of, SamplingProfile};
use crate::utils::config::{
    FULL_RUN_INFO_FIELDS, START_TIME_BASE_LEN, START_TIME_FORMAT,
};
use crate::utils::error::{FieldError, TruncateError};
use chrono::{Duration, NaiveDateTime};
use log::{debug, info};
use serde_json::Value;

/// Validated inclusive range of sample indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRange {
    start: usize,
    end: usize,
    count: usize,
}

impl SampleRange {
    /// Validate `start..=end` against a profile with `count` samples
    ///
    /// # Errors
    /// * `TruncateError::InvalidRange` - unless `0 <= start <= end < count`
    pub fn new(start: i64, end: i64, count: usize) -> Result<Self, TruncateError> {
        let invalid = TruncateError::InvalidRange { start, end, count };

        if start < 0 || start > end || end >= count as i64 {
            return Err(invalid);
        }

        Ok(Self {
            start: start as usize,
            end: end as usize,
            count,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of samples kept
    pub fn kept(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether the range keeps every sample of the run
    pub fn is_full(&self) -> bool {
        self.start == 0 && self.end + 1 == self.count
    }
}

/// Truncate a profile to the samples in `start..=end`
///
/// **Public** - main entry point for `map truncate`
///
/// # Arguments
/// * `profile` - Profile to cut; left untouched
/// * `start` - First kept sample (inclusive)
/// * `end` - Last kept sample (inclusive)
///
/// # Returns
/// A new profile holding only the kept windows
///
/// # Errors
/// * `TruncateError::InvalidRange` - Range outside the recorded samples
/// * `TruncateError::Field` - Summary field missing or of the wrong type
/// * `TruncateError::BadTimestamp` - `info.start_time` could not be parsed
pub fn truncate(
    profile: &SamplingProfile,
    start: i64,
    end: i64,
) -> Result<SamplingProfile, TruncateError> {
    let count = profile.sample_count()?;
    let range = SampleRange::new(start, end, count)?;

    info!(
        "Truncating {} samples to [{}, {}]",
        count,
        range.start(),
        range.end()
    );

    let mut out = profile.clone();
    let doc = out.document_mut();

    let samples = doc.get_mut("samples").ok_or_else(|| FieldError::Missing {
        resolved: Vec::new(),
        missing: "samples".to_string(),
    })?;
    slice_arrays(samples, &range);

    if let Some(samples) = samples.as_object_mut() {
        samples.insert("count".to_string(), Value::from(range.kept() as u64));
    }

    if !range.is_full() {
        let runtime = profile.runtime_ms()?;
        rescale_info(doc, &range, runtime)?;
    }

    Ok(out)
}

/// Keep only the indices in `range` of every array found under `value`
fn slice_arrays(value: &mut Value, range: &SampleRange) {
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                slice_arrays(child, range);
            }
        }
        Value::Array(items) => {
            let end = (range.end() + 1).min(items.len());
            let start = range.start().min(end);
            items.truncate(end);
            items.drain(..start);
        }
        _ => {}
    }
}

/// Adjust the run summary for a partial window
fn rescale_info(doc: &mut Value, range: &SampleRange, runtime: u64) -> Result<(), TruncateError> {
    let info = doc
        .get_mut("info")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| FieldError::Missing {
            resolved: Vec::new(),
            missing: "info".to_string(),
        })?;

    for field in FULL_RUN_INFO_FIELDS {
        if info.remove(*field).is_some() {
            debug!("Removed whole-run field info.{}", field);
        }
    }

    let count = range.count as f64;
    let new_runtime = (range.kept() as f64 / count * runtime as f64).round() as u64;
    info.insert("runtime".to_string(), Value::from(new_runtime));

    let start_time = info
        .get("start_time")
        .ok_or_else(|| FieldError::Missing {
            resolved: vec!["info".to_string()],
            missing: "start_time".to_string(),
        })?
        .as_str()
        .ok_or_else(|| FieldError::WrongType {
            path: "info, start_time".to_string(),
            expected: "string",
        })?;

    let offset_ms = (range.start() as f64 / count * runtime as f64).round() as i64;
    let shifted = shift_start_time(start_time, offset_ms)?;
    info.insert("start_time".to_string(), Value::String(shifted));

    Ok(())
}

/// Move a `YYYY-MM-DDTHH:MM:SS[offset]` timestamp forward by `offset_ms`
///
/// **Public** - the offset suffix, if any, is kept verbatim
///
/// The timestamp has whole-second resolution, so the sub-second part of the
/// shifted time is dropped: a 500 ms shift from `00:00:00` stays `00:00:00`.
///
/// # Errors
/// * `TruncateError::BadTimestamp` - base part does not match the format
pub fn shift_start_time(start_time: &str, offset_ms: i64) -> Result<String, TruncateError> {
    let split = start_time
        .char_indices()
        .nth(START_TIME_BASE_LEN)
        .map(|(i, _)| i)
        .unwrap_or(start_time.len());
    let (base, suffix) = start_time.split_at(split);

    let parsed = NaiveDateTime::parse_from_str(base, START_TIME_FORMAT).map_err(|source| {
        TruncateError::BadTimestamp {
            value: start_time.to_string(),
            source,
        }
    })?;

    let shifted = parsed + Duration::milliseconds(offset_ms);
    Ok(format!("{}{}", shifted.format(START_TIME_FORMAT), suffix))
}

/// Output name for a truncated profile
///
/// `_trunc<start>-<end>` goes before the extension, or at the end when the
/// file name has no extension.
pub fn truncated_file_name(input: &str, start: usize, end: usize) -> String {
    let suffix = format!("_trunc{}-{}", start, end);

    let dot = input.rfind('.');
    let slash = input.rfind('/');

    match (dot, slash) {
        (Some(d), Some(s)) if d > s => format!("{}{}{}", &input[..d], suffix, &input[d..]),
        (Some(d), None) => format!("{}{}{}", &input[..d], suffix, &input[d..]),
        _ => format!("{}{}", input, suffix),
    }
}

/// Recorded sample count of a raw document, if any
pub fn document_sample_count(doc: &Value) -> Option<u64> {
    doc.get("samples")
        .and_then(|samples| samples.get("count"))
        .and_then(count_of)
}

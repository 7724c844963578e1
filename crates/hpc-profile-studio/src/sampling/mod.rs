//! Sampling profile exports (per-window metrics and activity timelines).
//!
//! This module handles:
//! - A typed view over the fixed export schema
//! - Truncating a profile to a window of samples
//! - Values derived from one profile (run times, I/O integrals)
//! - Listing the metric names a profile carries

pub mod derived;
pub mod names;
pub mod profile;
pub mod truncate;

// Re-export main types
pub use derived::{
    average_over, cumulative_integral, lustre_integrals, time_secs, total_over, IndexWindow,
    LustreIntegrals, TimeCategory,
};
pub use names::render_metric_names;
pub use profile::{sum_series, MetricField, NamedSeries, SamplingProfile};
pub use truncate::{shift_start_time, truncate, truncated_file_name, SampleRange};

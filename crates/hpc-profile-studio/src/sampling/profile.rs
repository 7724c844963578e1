//! Typed view over a sampling profile document.
//!
//! The view keeps the document as loaded and exposes named getters for the
//! fixed schema:
//!
//! ```text
//! samples.count                     number of sampling windows
//! samples.window_start_offsets      window start times (ms)
//! samples.metrics.<m>.<field>       per-window mins/maxs/means/vars/sums
//! samples.activity.<thread>.<cat>   per-window percentage of wall time
//! info.runtime                      run time (ms)
//! info.number_of_processes / number_of_nodes
//! info.metrics.num_omp_threads_per_process.max
//! ```
//!
//! Every getter returns a `Result`, so a missing key is distinguishable from
//! a stored value.

use crate::json::{as_u64, lookup, number_array, path_array, path_f64, path_u64, FieldPath};
use crate::utils::config::{
    ACCELERATOR_CATEGORIES, CPU_CATEGORIES, IO_CATEGORIES, MPI_CATEGORIES, MS_PER_SECOND,
    OPENMP_CATEGORIES, OPENMP_OVERHEAD_CATEGORIES, SLEEP_CATEGORIES, SYNCHRONISATION_CATEGORIES,
    TOTAL_CPU_CATEGORIES,
};
use crate::utils::error::{FieldError, ProfileError};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Named per-window series, in the order they were requested
pub type NamedSeries = Vec<(String, Vec<f64>)>;

/// Statistical field recorded for every sampled metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum MetricField {
    #[value(name = "mins")]
    Mins,
    #[value(name = "maxs")]
    Maxs,
    #[value(name = "means")]
    Means,
    #[value(name = "vars")]
    Vars,
    #[value(name = "sums")]
    Sums,
}

impl MetricField {
    /// Key of this field inside a metric record
    pub fn key(self) -> &'static str {
        match self {
            Self::Mins => "mins",
            Self::Maxs => "maxs",
            Self::Means => "means",
            Self::Vars => "vars",
            Self::Sums => "sums",
        }
    }

    /// Legend label
    pub fn label(self) -> &'static str {
        match self {
            Self::Mins => "min",
            Self::Maxs => "max",
            Self::Means => "mean",
            Self::Vars => "variance",
            Self::Sums => "total",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for MetricField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mins" => Ok(Self::Mins),
            "maxs" => Ok(Self::Maxs),
            "means" => Ok(Self::Means),
            "vars" => Ok(Self::Vars),
            "sums" => Ok(Self::Sums),
            other => Err(FieldError::WrongType {
                path: other.to_string(),
                expected: "one of mins, maxs, means, vars, sums",
            }),
        }
    }
}

/// Sum named series index by index
///
/// **Public** - combines activity categories into one series
///
/// The result is as long as the shortest input. An empty input gives an
/// empty series.
pub fn sum_series(series: &[(String, Vec<f64>)]) -> Vec<f64> {
    let len = series.iter().map(|(_, s)| s.len()).min().unwrap_or(0);
    (0..len)
        .map(|i| series.iter().map(|(_, s)| s[i]).sum())
        .collect()
}

fn path(keys: &[&str]) -> FieldPath {
    FieldPath::from(keys)
}

/// Typed view over a sampling profile
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingProfile {
    doc: Value,
}

impl SamplingProfile {
    pub fn new(doc: Value) -> Self {
        Self { doc }
    }

    /// Load a profile from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        Ok(Self::new(crate::output::load_document(path)?))
    }

    pub fn document(&self) -> &Value {
        &self.doc
    }

    pub(crate) fn document_mut(&mut self) -> &mut Value {
        &mut self.doc
    }

    pub fn into_document(self) -> Value {
        self.doc
    }

    /// Number of sampling windows (`samples.count`)
    pub fn sample_count(&self) -> Result<usize, FieldError> {
        Ok(path_u64(&self.doc, &path(&["samples", "count"]))? as usize)
    }

    /// Run time in whole milliseconds (`info.runtime`)
    pub fn runtime_ms(&self) -> Result<u64, FieldError> {
        let ms = path_f64(&self.doc, &path(&["info", "runtime"]))?;
        Ok(ms.max(0.0).trunc() as u64)
    }

    pub fn runtime_secs(&self) -> Result<f64, FieldError> {
        Ok(self.runtime_ms()? as f64 / MS_PER_SECOND)
    }

    /// Approximate length of one sampling window in milliseconds
    pub fn sample_interval_ms(&self) -> Result<f64, FieldError> {
        let count = self.sample_count()?;
        Ok(self.runtime_ms()? as f64 / count as f64)
    }

    /// Start time of every sampling window (`samples.window_start_offsets`)
    pub fn window_start_offsets(&self) -> Result<Vec<f64>, FieldError> {
        path_array(&self.doc, &path(&["samples", "window_start_offsets"]))
    }

    pub fn num_processes(&self) -> Result<u64, FieldError> {
        path_u64(&self.doc, &path(&["info", "number_of_processes"]))
    }

    pub fn num_nodes(&self) -> Result<u64, FieldError> {
        path_u64(&self.doc, &path(&["info", "number_of_nodes"]))
    }

    /// OpenMP threads per process
    ///
    /// The thread count is the same on every process, so the recorded maximum
    /// is used.
    pub fn num_threads(&self) -> Result<u64, FieldError> {
        path_u64(
            &self.doc,
            &path(&["info", "metrics", "num_omp_threads_per_process", "max"]),
        )
    }

    /// The `info` object
    pub fn info(&self) -> Result<&Map<String, Value>, FieldError> {
        object_at(&self.doc, &path(&["info"]))
    }

    /// The `samples.metrics` object
    pub fn metrics(&self) -> Result<&Map<String, Value>, FieldError> {
        object_at(&self.doc, &path(&["samples", "metrics"]))
    }

    /// The `samples.activity` object
    pub fn activity(&self) -> Result<&Map<String, Value>, FieldError> {
        object_at(&self.doc, &path(&["samples", "activity"]))
    }

    pub fn metric_names(&self) -> Result<Vec<String>, FieldError> {
        Ok(self.metrics()?.keys().cloned().collect())
    }

    /// Whole metric records for the requested names
    ///
    /// **Public** - names are trimmed; a name with no metric is logged and skipped
    pub fn metric_samples<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<(String, &Value)>, FieldError> {
        let metrics = self.metrics()?;

        let mut found = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            match metrics.get(name) {
                Some(record) => found.push((name.to_string(), record)),
                None => warn!("Metric {} does not exist - skipping", name),
            }
        }

        Ok(found)
    }

    /// One field of every requested metric
    ///
    /// # Errors
    /// * `FieldError::Missing` - a found metric has no such field
    pub fn metric_field_samples<S: AsRef<str>>(
        &self,
        names: &[S],
        field: MetricField,
    ) -> Result<NamedSeries, FieldError> {
        self.metric_samples(names)?
            .into_iter()
            .map(|(name, record)| {
                let series = field_series(record, &name, field)?;
                Ok((name, series))
            })
            .collect()
    }

    /// Several fields of every requested metric, in the order of `fields`
    pub fn metric_fields_samples<S: AsRef<str>>(
        &self,
        names: &[S],
        fields: &[MetricField],
    ) -> Result<Vec<(String, Vec<Vec<f64>>)>, FieldError> {
        self.metric_samples(names)?
            .into_iter()
            .map(|(name, record)| {
                let series = fields
                    .iter()
                    .map(|field| field_series(record, &name, *field))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((name, series))
            })
            .collect()
    }

    /// One field of one metric; a missing metric is an error here
    pub fn metric_field(&self, name: &str, field: MetricField) -> Result<Vec<f64>, FieldError> {
        path_array(&self.doc, &path(&["samples", "metrics", name, field.key()]))
    }

    /// Activity series of `thread` for the requested categories
    ///
    /// **Public** - raw access to one activity timeline
    ///
    /// A category the timeline does not record is skipped without a message;
    /// a missing timeline is logged and gives an empty result.
    pub fn activity_samples<S: AsRef<str>>(
        &self,
        thread: &str,
        categories: &[S],
    ) -> Result<NamedSeries, FieldError> {
        let activity = self.activity()?;

        let Some(timeline) = activity.get(thread) else {
            warn!("Activity {} not found", thread);
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for category in categories {
            let category = category.as_ref().trim();
            if let Some(value) = timeline.get(category) {
                let series = number_array(value).ok_or_else(|| FieldError::WrongType {
                    path: format!("samples, activity, {}, {}", thread, category),
                    expected: "an array of numbers",
                })?;
                found.push((category.to_string(), series));
            } else {
                debug!("Activity category {} absent from {}", category, thread);
            }
        }

        Ok(found)
    }

    /// Index-by-index sum of the requested categories of `thread`
    pub fn sum_activity<S: AsRef<str>>(
        &self,
        thread: &str,
        categories: &[S],
    ) -> Result<Vec<f64>, FieldError> {
        Ok(sum_series(&self.activity_samples(thread, categories)?))
    }

    /// Plain compute (`normal_compute`)
    pub fn cpu_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, CPU_CATEGORIES)
    }

    /// Compute inside and outside OpenMP regions
    pub fn total_cpu_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, TOTAL_CPU_CATEGORIES)
    }

    /// Collective and point-to-point MPI, with and without OpenMP
    pub fn mpi_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, MPI_CATEGORIES)
    }

    /// Reads and writes, with and without OpenMP
    pub fn io_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, IO_CATEGORIES)
    }

    pub fn accelerator_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, ACCELERATOR_CATEGORIES)
    }

    pub fn omp_active_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, OPENMP_CATEGORIES)
    }

    pub fn sleep_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, SLEEP_CATEGORIES)
    }

    pub fn openmp_overhead_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, OPENMP_OVERHEAD_CATEGORIES)
    }

    pub fn synchronisation_activity(&self, thread: &str) -> Result<Vec<f64>, FieldError> {
        self.sum_activity(thread, SYNCHRONISATION_CATEGORIES)
    }

    /// Samples of `name`, looked up among the metrics first and then among
    /// the categories of `thread`
    ///
    /// # Errors
    /// * `ProfileError::MetricNotFound` - neither source records `name`
    pub fn metric_or_activity(
        &self,
        name: &str,
        field: MetricField,
        thread: &str,
        source: &str,
    ) -> Result<Vec<f64>, ProfileError> {
        if let Some((_, series)) = self.metric_field_samples(&[name], field)?.into_iter().next() {
            return Ok(series);
        }

        // Profiles without activity data only have the metrics to offer
        let activity = match self.activity() {
            Ok(_) => self.activity_samples(thread, &[name])?,
            Err(_) => Vec::new(),
        };

        activity
            .into_iter()
            .next()
            .map(|(_, series)| series)
            .ok_or_else(|| ProfileError::MetricNotFound {
                metric: name.to_string(),
                file: source.to_string(),
            })
    }
}

fn object_at<'a>(doc: &'a Value, path: &FieldPath) -> Result<&'a Map<String, Value>, FieldError> {
    lookup(doc, path)?
        .as_object()
        .ok_or_else(|| FieldError::WrongType {
            path: path.to_string(),
            expected: "an object",
        })
}

fn field_series(record: &Value, metric: &str, field: MetricField) -> Result<Vec<f64>, FieldError> {
    let value = record.get(field.key()).ok_or_else(|| FieldError::Missing {
        resolved: vec![
            "samples".to_string(),
            "metrics".to_string(),
            metric.to_string(),
        ],
        missing: field.key().to_string(),
    })?;

    number_array(value).ok_or_else(|| FieldError::WrongType {
        path: format!("samples, metrics, {}, {}", metric, field.key()),
        expected: "an array of numbers",
    })
}

/// Read a count from a value that may be stored either way
pub(crate) fn count_of(value: &Value) -> Option<u64> {
    as_u64(value)
}

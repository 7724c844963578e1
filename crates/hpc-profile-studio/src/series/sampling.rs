//! Data sets built from sampling profiles.

use super::report::ScaleMap;
use super::ScalingAxis;
use crate::sampling::{
    average_over, time_secs, total_over, IndexWindow, MetricField, NamedSeries, SamplingProfile,
    TimeCategory,
};
use crate::utils::config::{DEFAULT_ACTIVITY, MS_PER_SECOND};
use crate::utils::error::{FieldError, ProfileError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// A profile together with the name it was loaded from
pub type Source<'a> = (&'a Path, &'a SamplingProfile);

/// Stacking order and labels of [`activity_timeline`]
pub const TIMELINE_LABELS: [&str; 4] = ["cpu", "io", "openmp", "mpi"];

/// Labels of [`min_mean_max_by_scale`] entries
pub const MIN_MEAN_MAX_LABELS: [&str; 3] = ["min", "mean", "max"];

/// How a metric is summarized over an index window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Summary {
    /// Mean of the per-window values
    #[default]
    Average,
    /// Growth of a running total
    Total,
}

impl Summary {
    pub fn from_total_flag(total: bool) -> Self {
        if total {
            Self::Total
        } else {
            Self::Average
        }
    }

    fn apply(self, samples: &[f64], window: IndexWindow) -> Result<f64, ProfileError> {
        match self {
            Self::Average => average_over(samples, window),
            Self::Total => total_over(samples, window),
        }
    }
}

/// Samples of one metric from one run
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRun {
    pub samples: Vec<f64>,
    pub runtime_ms: u64,
}

impl MetricRun {
    /// X positions: sample numbers, or window start times in ms
    pub fn x_values(&self, show_time: bool) -> Vec<f64> {
        let n = self.samples.len();
        let spacing = if show_time && n > 0 {
            self.runtime_ms as f64 / n as f64
        } else {
            1.0
        };
        (0..n).map(|i| i as f64 * spacing).collect()
    }

    pub fn points(&self, show_time: bool) -> Vec<(f64, f64)> {
        self.x_values(show_time)
            .into_iter()
            .zip(self.samples.iter().copied())
            .collect()
    }
}

fn scale_of(profile: &SamplingProfile, axis: ScalingAxis) -> Result<u64, FieldError> {
    match axis {
        ScalingAxis::Processes => profile.num_processes(),
        ScalingAxis::Threads => profile.num_threads(),
    }
}

fn required_field(
    profile: &SamplingProfile,
    metric: &str,
    field: MetricField,
    source: &Path,
) -> Result<Vec<f64>, ProfileError> {
    profile.metric_field(metric, field).map_err(|e| match e {
        FieldError::Missing { .. } => ProfileError::MetricNotFound {
            metric: metric.to_string(),
            file: source.display().to_string(),
        },
        other => other.into(),
    })
}

/// Every profile's time of one category, grouped by process count
pub fn times_by_processes(
    profiles: &[&SamplingProfile],
    category: TimeCategory,
) -> Result<ScaleMap<Vec<f64>>, ProfileError> {
    let mut grouped: ScaleMap<Vec<f64>> = BTreeMap::new();

    for profile in profiles {
        grouped
            .entry(profile.num_processes()?)
            .or_default()
            .push(time_secs(profile, category)?);
    }

    Ok(grouped)
}

/// One metric summarized over a window, per scale
///
/// Averages use the `means` of the metric; totals use its running `sums`.
pub fn metric_summary_by_scale(
    profiles: &[Source<'_>],
    metric: &str,
    axis: ScalingAxis,
    window: IndexWindow,
    summary: Summary,
) -> Result<ScaleMap<f64>, ProfileError> {
    let field = match summary {
        Summary::Average => MetricField::Means,
        Summary::Total => MetricField::Sums,
    };

    profiles
        .iter()
        .map(|(source, profile)| -> Result<(u64, f64), ProfileError> {
            let samples = required_field(profile, metric, field, source)?;
            Ok((scale_of(profile, axis)?, summary.apply(&samples, window)?))
        })
        .collect()
}

/// Minimum, mean and maximum of a metric summarized over a window, per scale
pub fn min_mean_max_by_scale(
    profiles: &[Source<'_>],
    metric: &str,
    axis: ScalingAxis,
    window: IndexWindow,
    summary: Summary,
) -> Result<ScaleMap<[f64; 3]>, ProfileError> {
    let fields = [MetricField::Mins, MetricField::Means, MetricField::Maxs];

    profiles
        .iter()
        .map(|(source, profile)| -> Result<(u64, [f64; 3]), ProfileError> {
            let mut values = [0.0; 3];
            for (value, field) in values.iter_mut().zip(fields) {
                let samples = required_field(profile, metric, field, source)?;
                *value = summary.apply(&samples, window)?;
            }
            Ok((scale_of(profile, axis)?, values))
        })
        .collect()
}

fn metric_run(
    profile: &SamplingProfile,
    metric: &str,
    source: &Path,
) -> Result<MetricRun, ProfileError> {
    let file = source.display().to_string();
    Ok(MetricRun {
        samples: profile.metric_or_activity(metric, MetricField::Means, DEFAULT_ACTIVITY, &file)?,
        runtime_ms: profile.runtime_ms()?,
    })
}

/// One metric from every profile, labelled by process count or file name
///
/// Keyed by process count, a later profile replaces an earlier one with
/// the same count. Keyed by file name every profile is kept.
///
/// # Errors
/// * `ProfileError::MetricNotFound` - a profile records the name neither
///   as a metric nor as an activity category
pub fn metric_across_files(
    profiles: &[Source<'_>],
    metric: &str,
    by_processes: bool,
) -> Result<Vec<(String, MetricRun)>, ProfileError> {
    if by_processes {
        let mut keyed: ScaleMap<MetricRun> = BTreeMap::new();
        for (source, profile) in profiles {
            keyed.insert(profile.num_processes()?, metric_run(profile, metric, source)?);
        }
        Ok(keyed.into_iter().map(|(k, run)| (k.to_string(), run)).collect())
    } else {
        let mut keyed: BTreeMap<String, MetricRun> = BTreeMap::new();
        for (source, profile) in profiles {
            keyed.insert(super::file_label(source), metric_run(profile, metric, source)?);
        }
        Ok(keyed.into_iter().collect())
    }
}

/// One metric from every profile keyed by (processes, threads)
pub fn metric_by_configuration(
    profiles: &[Source<'_>],
    metric: &str,
) -> Result<BTreeMap<(u64, u64), MetricRun>, ProfileError> {
    profiles
        .iter()
        .map(|(source, profile)| -> Result<((u64, u64), MetricRun), ProfileError> {
            let key = (profile.num_processes()?, profile.num_threads()?);
            Ok((key, metric_run(profile, metric, source)?))
        })
        .collect()
}

/// Smallest and largest sample over all runs
pub fn sample_bounds<'a>(runs: impl IntoIterator<Item = &'a MetricRun>) -> Option<(f64, f64)> {
    runs.into_iter()
        .flat_map(|run| run.samples.iter().copied())
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Several fields of one metric, cut to `from..to`
///
/// A name recorded only as an activity category gives a single series,
/// labelled with the first requested field.
pub fn metric_fields_window(
    profile: &SamplingProfile,
    metric: &str,
    fields: &[MetricField],
    window: IndexWindow,
    source: &Path,
) -> Result<Vec<(MetricField, Vec<f64>)>, ProfileError> {
    let Some(first) = fields.first().copied() else {
        return Ok(Vec::new());
    };

    let series: Vec<(MetricField, Vec<f64>)> =
        match profile.metric_fields_samples(&[metric], fields)?.into_iter().next() {
            Some((_, series)) => fields.iter().copied().zip(series).collect(),
            None => vec![(
                first,
                profile.metric_or_activity(
                    metric,
                    first,
                    DEFAULT_ACTIVITY,
                    &source.display().to_string(),
                )?,
            )],
        };

    Ok(series
        .into_iter()
        .map(|(field, samples)| {
            let to = window.to.unwrap_or(samples.len()).min(samples.len());
            let from = window.from.min(to);
            (field, samples[from..to].to_vec())
        })
        .collect())
}

/// CPU, I/O, OpenMP and MPI activity of the main thread, in stacking order
pub fn activity_timeline(profile: &SamplingProfile) -> Result<NamedSeries, FieldError> {
    let series = [
        profile.cpu_activity(DEFAULT_ACTIVITY)?,
        profile.io_activity(DEFAULT_ACTIVITY)?,
        profile.omp_active_activity(DEFAULT_ACTIVITY)?,
        profile.mpi_activity(DEFAULT_ACTIVITY)?,
    ];

    Ok(TIMELINE_LABELS
        .iter()
        .map(|l| l.to_string())
        .zip(series)
        .collect())
}

/// Metric means and activity categories named in `names`, over window start times
///
/// Names found in neither place are skipped. A profile without activity
/// data contributes metrics only.
pub fn metrics_over_time<S: AsRef<str>>(
    profile: &SamplingProfile,
    names: &[S],
) -> Result<(Vec<f64>, NamedSeries), FieldError> {
    let times = profile.window_start_offsets()?;

    let mut series = profile.metric_field_samples(names, MetricField::Means)?;
    if profile.activity().is_ok() {
        series.extend(profile.activity_samples(DEFAULT_ACTIVITY, names)?);
    }

    Ok((times, series))
}

/// One CSV row of raw values per metric, in metric name order
pub fn sample_rows(
    profile: &SamplingProfile,
    field: MetricField,
) -> Result<Vec<(String, Vec<Value>)>, FieldError> {
    profile
        .metrics()?
        .iter()
        .map(|(name, record)| -> Result<(String, Vec<Value>), FieldError> {
            let values = record
                .get(field.key())
                .and_then(Value::as_array)
                .ok_or_else(|| FieldError::Missing {
                    resolved: vec!["samples".into(), "metrics".into(), name.clone()],
                    missing: field.key().to_string(),
                })?;
            Ok((name.clone(), values.clone()))
        })
        .collect()
}

/// Sample interval in seconds, for labelling time axes
pub fn interval_secs(profile: &SamplingProfile) -> Result<f64, FieldError> {
    Ok(profile.sample_interval_ms()? / MS_PER_SECOND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn profile(procs: u64, threads: u64, means: &[f64]) -> SamplingProfile {
        let sums: Vec<f64> = means
            .iter()
            .scan(0.0, |acc, v| {
                *acc += v;
                Some(*acc)
            })
            .collect();
        SamplingProfile::new(json!({
            "samples": {
                "count": means.len(),
                "window_start_offsets": (0..means.len()).map(|i| i * 10).collect::<Vec<_>>(),
                "metrics": {
                    "m": {
                        "mins": means.iter().map(|v| v - 1.0).collect::<Vec<_>>(),
                        "means": means,
                        "maxs": means.iter().map(|v| v + 1.0).collect::<Vec<_>>(),
                        "sums": sums
                    }
                },
                "activity": {"main_thread": {
                    "normal_compute": [80, 60],
                    "io_reads": [10, 20],
                    "openmp": [0, 0],
                    "collective_mpi": [10, 20]
                }}
            },
            "info": {
                "runtime": 2000,
                "number_of_processes": procs,
                "number_of_nodes": 1,
                "metrics": {"num_omp_threads_per_process": {"max": threads}}
            }
        }))
    }

    #[test]
    fn test_metric_summary_by_scale() {
        let a = profile(4, 1, &[1.0, 3.0]);
        let b = profile(2, 1, &[10.0, 20.0]);
        let sources = vec![(Path::new("a.json"), &a), (Path::new("b.json"), &b)];

        let avg = metric_summary_by_scale(
            &sources,
            "m",
            ScalingAxis::Processes,
            IndexWindow::all(),
            Summary::Average,
        )
        .unwrap();
        assert_eq!(avg.into_iter().collect::<Vec<_>>(), vec![(2, 15.0), (4, 2.0)]);

        let total = metric_summary_by_scale(
            &sources,
            "m",
            ScalingAxis::Processes,
            IndexWindow::all(),
            Summary::Total,
        )
        .unwrap();
        assert_eq!(total[&2], 20.0);
    }

    #[test]
    fn test_missing_metric_names_file() {
        let a = profile(4, 1, &[1.0]);
        let err = metric_summary_by_scale(
            &[(Path::new("a.json"), &a)],
            "nope",
            ScalingAxis::Processes,
            IndexWindow::all(),
            Summary::Average,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Unable to find metric nope in JSON profile a.json");
    }

    #[test]
    fn test_min_mean_max() {
        let a = profile(1, 8, &[2.0, 4.0]);
        let out = min_mean_max_by_scale(
            &[(Path::new("a.json"), &a)],
            "m",
            ScalingAxis::Threads,
            IndexWindow::all(),
            Summary::Average,
        )
        .unwrap();
        assert_eq!(out[&8], [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_metric_across_files() {
        let a = profile(4, 1, &[1.0, 2.0]);
        let b = profile(2, 1, &[3.0, 4.0]);
        let sources = vec![(Path::new("runs/z.json"), &a), (Path::new("runs/y.json"), &b)];

        let by_procs = metric_across_files(&sources, "m", true).unwrap();
        assert_eq!(by_procs[0].0, "2");
        assert_eq!(by_procs[0].1.samples, vec![3.0, 4.0]);

        let by_name = metric_across_files(&sources, "m", false).unwrap();
        assert_eq!(by_name[0].0, "y.json");

        let activity = metric_across_files(&sources, "io_reads", true).unwrap();
        assert_eq!(activity[0].1.samples, vec![10.0, 20.0]);
        assert_eq!(activity[0].1.x_values(true), vec![0.0, 1000.0]);
    }

    #[test]
    fn test_metric_by_configuration() {
        let a = profile(4, 2, &[1.0]);
        let runs = metric_by_configuration(&[(Path::new("a.json"), &a)], "m").unwrap();
        assert!(runs.contains_key(&(4, 2)));
        assert_eq!(sample_bounds(runs.values()), Some((1.0, 1.0)));
    }

    #[test]
    fn test_metric_fields_window() {
        let a = profile(1, 1, &[1.0, 2.0, 3.0]);
        let fields = [MetricField::Mins, MetricField::Maxs];
        let window = IndexWindow::new(1, None);
        let out = metric_fields_window(&a, "m", &fields, window, Path::new("a.json")).unwrap();
        assert_eq!(
            out,
            vec![
                (MetricField::Mins, vec![1.0, 2.0]),
                (MetricField::Maxs, vec![3.0, 4.0]),
            ]
        );
    }

    #[test]
    fn test_activity_timeline_and_times() {
        let a = profile(2, 1, &[1.0, 1.0]);
        let timeline = activity_timeline(&a).unwrap();
        assert_eq!(timeline[0], ("cpu".to_string(), vec![80.0, 60.0]));
        assert_eq!(timeline[3], ("mpi".to_string(), vec![10.0, 20.0]));

        let b = profile(2, 1, &[1.0, 1.0]);
        let grouped = times_by_processes(&[&a, &b], TimeCategory::Cpu).unwrap();
        assert_eq!(grouped[&2], vec![1.4, 1.4]);
    }

    #[test]
    fn test_metrics_over_time() {
        let a = profile(1, 1, &[5.0, 6.0]);
        let (times, series) = metrics_over_time(&a, &["m", "openmp", "absent"]).unwrap();
        assert_eq!(times, vec![0.0, 10.0]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, "m");
        assert_eq!(series[1].0, "openmp");
    }

    #[test]
    fn test_sample_rows() {
        let a = profile(1, 1, &[5.0, 6.0]);
        let rows = sample_rows(&a, MetricField::Means).unwrap();
        assert_eq!(rows, vec![("m".to_string(), vec![json!(5.0), json!(6.0)])]);
    }
}

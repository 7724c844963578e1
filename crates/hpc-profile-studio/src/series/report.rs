//! Data sets built from performance reports.

use super::ScalingAxis;
use crate::json::{as_f64, resolve, FieldPath};
use crate::report::PerfReport;
use crate::utils::error::{FieldError, ProfileError};
use chrono::NaiveDateTime;
use log::warn;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Data keyed by process or thread count
pub type ScaleMap<T> = BTreeMap<u64, T>;

/// Legend labels of [`stacked_components`], bottom to top
pub const STACKED_LABELS: [&str; 5] = [
    "CPU",
    "Collective MPI",
    "Point-to-Point MPI",
    "File System Read",
    "File System Write",
];

/// Labels of [`components_by_scale`] entries
pub const COMPONENT_LABELS: [&str; 3] = ["io", "mpi", "cpu"];

/// Category of run time read from a performance report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ReportTime {
    #[value(name = "total")]
    Total,
    #[value(name = "io")]
    Io,
    #[value(name = "mpi")]
    Mpi,
    #[value(name = "cpu")]
    Cpu,
}

impl ReportTime {
    pub fn title(self) -> &'static str {
        match self {
            Self::Total => "Runtime",
            Self::Io => "I/O Time",
            Self::Mpi => "MPI Time",
            Self::Cpu => "CPU Time",
        }
    }

    pub fn of(self, report: &PerfReport) -> Result<f64, FieldError> {
        match self {
            Self::Total => report.runtime_secs(),
            Self::Io => report.io_time(),
            Self::Mpi => report.mpi_time(),
            Self::Cpu => report.cpu_time(),
        }
    }
}

/// Percentages and the matching wall clock times, per scale
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Components {
    pub percent: ScaleMap<Vec<f64>>,
    pub time: ScaleMap<Vec<f64>>,
}

/// A report field to show, with its legend label
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    pub path: FieldPath,
    pub label: String,
}

impl FromStr for MetricSpec {
    type Err = FieldError;

    /// Parse `list, of, keys [: label]`
    ///
    /// Without a label the last key names the metric.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (keys, label) = match line.split_once(':') {
            Some((keys, label)) => (keys, Some(label.trim().to_string())),
            None => (line, None),
        };

        let path: FieldPath = keys.parse()?;
        let label = label
            .filter(|l| !l.is_empty())
            .or_else(|| path.last().map(|k| k.to_string()))
            .unwrap_or_default();

        Ok(Self { path, label })
    }
}

/// Parse a metric list, one [`MetricSpec`] per non-blank line
pub fn parse_metric_list(text: &str) -> Result<Vec<MetricSpec>, FieldError> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::parse)
        .collect()
}

fn scale_of(report: &PerfReport, axis: ScalingAxis) -> Result<u64, FieldError> {
    match axis {
        ScalingAxis::Processes => report.num_processes(),
        ScalingAxis::Threads => report.num_threads(),
    }
}

/// Run time in seconds per scale
///
/// Reports with the same scale overwrite earlier ones.
pub fn runtime_by_scale(
    reports: &[PerfReport],
    axis: ScalingAxis,
) -> Result<ScaleMap<f64>, FieldError> {
    reports
        .iter()
        .map(|r| Ok((scale_of(r, axis)?, r.runtime_secs()?)))
        .collect()
}

/// I/O, MPI and CPU percentages and times per scale, in that order
pub fn components_by_scale(
    reports: &[PerfReport],
    axis: ScalingAxis,
) -> Result<Components, FieldError> {
    let mut out = Components::default();

    for report in reports {
        let scale = scale_of(report, axis)?;
        let runtime = report.runtime_secs()?;
        let percent = vec![
            report.io_percent()?,
            report.mpi_percent()?,
            report.cpu_percent()?,
        ];
        let time = percent.iter().map(|p| p * runtime / 100.0).collect();

        out.percent.insert(scale, percent);
        out.time.insert(scale, time);
    }

    Ok(out)
}

/// CPU, MPI breakdown and I/O breakdown as shares of the whole run
///
/// The MPI and I/O breakdowns are recorded as shares of MPI and I/O time
/// and are scaled by the MPI and I/O percentages. Entries follow
/// [`STACKED_LABELS`].
pub fn stacked_components(
    reports: &[PerfReport],
    axis: ScalingAxis,
) -> Result<Components, FieldError> {
    let mut out = Components::default();

    for report in reports {
        let scale = scale_of(report, axis)?;
        let runtime = report.runtime_secs()?;
        let mpi = report.mpi_percent()?;
        let io = report.io_percent()?;

        let mut percent = vec![report.cpu_percent()?];
        percent.extend(report.mpi_sub_percent()?.iter().map(|p| p * mpi / 100.0));
        percent.extend(report.io_sub_percent()?.iter().map(|p| p * io / 100.0));
        let time = percent.iter().map(|p| runtime * p / 100.0).collect();

        out.percent.insert(scale, percent);
        out.time.insert(scale, time);
    }

    Ok(out)
}

/// Values of arbitrary report fields per scale
///
/// A field that is missing or not numeric is logged and becomes NaN, which
/// charts leave out.
pub fn metric_values_by_scale(
    reports: &[PerfReport],
    metrics: &[MetricSpec],
    axis: ScalingAxis,
) -> Result<ScaleMap<Vec<f64>>, FieldError> {
    reports
        .iter()
        .map(|report| {
            let values = metrics
                .iter()
                .map(|m| {
                    resolve(report.document(), &m.path)
                        .and_then(as_f64)
                        .unwrap_or_else(|| {
                            warn!("No numeric value at '{}'", m.path);
                            f64::NAN
                        })
                })
                .collect();
            Ok((scale_of(report, axis)?, values))
        })
        .collect()
}

/// Memory use and MPI share of the run, both as percentages, per scale
pub fn memory_and_mpi_by_scale(
    reports: &[PerfReport],
    axis: ScalingAxis,
) -> Result<ScaleMap<[f64; 2]>, FieldError> {
    reports
        .iter()
        .map(|r| Ok((scale_of(r, axis)?, [r.memory_percent()?, r.mpi_percent()?])))
        .collect()
}

/// Every report's time of one category, grouped by process count
pub fn times_by_processes(
    reports: &[PerfReport],
    category: ReportTime,
) -> Result<ScaleMap<Vec<f64>>, FieldError> {
    let mut grouped: ScaleMap<Vec<f64>> = BTreeMap::new();

    for report in reports {
        grouped
            .entry(report.num_processes()?)
            .or_default()
            .push(category.of(report)?);
    }

    Ok(grouped)
}

/// Run time in seconds keyed by start date
pub fn runtime_by_date(
    reports: &[PerfReport],
) -> Result<BTreeMap<NaiveDateTime, f64>, ProfileError> {
    reports
        .iter()
        .map(|r| Ok((r.start_date()?, r.runtime_secs()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn report(procs: u64, threads: u64, runtime: f64) -> PerfReport {
        let weekday = ["Mon", "Tue", "Wed", "Thu"][procs as usize - 1];
        PerfReport::new(json!({"data": {
            "applicationDetails": {
                "processes": {"plain": procs},
                "ompNumThreads": threads,
                "nodes": {"plain": 1},
                "hostMemory": {"plain": {"value": 100.0}},
                "time": {"plain": runtime},
                "startDate": {"plain": format!("{} Jan 0{} 2018 09:00:00 (UTC)", weekday, procs)}
            },
            "overview": {"io": {"percent": 10}, "mpi": {"percent": 40}, "cpu": {"percent": 50}},
            "mpi": {"collectivePercent": 50, "p2pPercent": 50},
            "io": {"readPercent": 100, "writePercent": 0},
            "memory": {"mean": 5.0}
        }}))
    }

    #[test]
    fn test_runtime_by_scale_sorted() {
        let reports = vec![report(4, 1, 25.0), report(1, 2, 100.0), report(2, 4, 50.0)];

        let by_procs = runtime_by_scale(&reports, ScalingAxis::Processes).unwrap();
        assert_eq!(by_procs.keys().copied().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(by_procs.values().copied().collect::<Vec<_>>(), vec![100.0, 50.0, 25.0]);

        let by_threads = runtime_by_scale(&reports, ScalingAxis::Threads).unwrap();
        assert_eq!(by_threads[&4], 50.0);
    }

    #[test]
    fn test_components() {
        let out = components_by_scale(&[report(2, 1, 200.0)], ScalingAxis::Processes).unwrap();
        assert_eq!(out.percent[&2], vec![10.0, 40.0, 50.0]);
        assert_eq!(out.time[&2], vec![20.0, 80.0, 100.0]);
    }

    #[test]
    fn test_stacked_components() {
        let out = stacked_components(&[report(2, 1, 200.0)], ScalingAxis::Processes).unwrap();
        assert_eq!(out.percent[&2], vec![50.0, 20.0, 20.0, 10.0, 0.0]);
        assert_eq!(out.time[&2], vec![100.0, 40.0, 40.0, 20.0, 0.0]);
        assert_eq!(out.percent[&2].len(), STACKED_LABELS.len());
    }

    #[test]
    fn test_metric_specs() {
        let specs = parse_metric_list(
            "data, overview, cpu, percent : CPU share\n\ndata, overview, mpi, percent\n",
        )
        .unwrap();
        assert_eq!(specs[0].label, "CPU share");
        assert_eq!(specs[1].label, "percent");

        let missing: MetricSpec = "data, nothing".parse().unwrap();
        let values = metric_values_by_scale(
            &[report(2, 1, 1.0)],
            &[specs[0].clone(), missing],
            ScalingAxis::Processes,
        )
        .unwrap();
        assert_eq!(values[&2][0], 50.0);
        assert!(values[&2][1].is_nan());
    }

    #[test]
    fn test_memory_and_mpi() {
        let out = memory_and_mpi_by_scale(&[report(4, 1, 1.0)], ScalingAxis::Processes).unwrap();
        assert_eq!(out[&4], [20.0, 40.0]);
    }

    #[test]
    fn test_times_by_processes_groups_repeats() {
        let reports = vec![report(2, 1, 10.0), report(2, 1, 12.0), report(1, 1, 20.0)];
        let grouped = times_by_processes(&reports, ReportTime::Mpi).unwrap();
        assert_eq!(grouped[&1], vec![8.0]);
        assert_eq!(grouped[&2], vec![4.0, 4.8]);
    }

    #[test]
    fn test_runtime_by_date() {
        let reports = vec![report(3, 1, 30.0), report(1, 1, 10.0)];
        let by_date = runtime_by_date(&reports).unwrap();
        assert_eq!(by_date.values().copied().collect::<Vec<_>>(), vec![10.0, 30.0]);
    }
}

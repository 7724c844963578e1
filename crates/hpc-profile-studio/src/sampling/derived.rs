//! Values derived from one sampling profile.
//!
//! Run times are approximated from the activity timelines: the mean
//! percentage of a category group times the run time. The Lustre integrals
//! accumulate a per-window rate into a running total that can be compared
//! with the total the profiler recorded.

use super::profile::{MetricField, SamplingProfile};
use crate::utils::config::{
    DEFAULT_ACTIVITY, LUSTRE_READ_RATE, LUSTRE_READ_TOTAL, LUSTRE_WRITE_RATE, LUSTRE_WRITE_TOTAL,
    MS_PER_SECOND,
};
use crate::utils::error::ProfileError;
use std::fmt;

/// Window of sample indices used to summarize a series
///
/// Averages cover `from..to`; totals subtract the running total at `from`
/// from the one at `to`. `to = None` means the end of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexWindow {
    pub from: usize,
    pub to: Option<usize>,
}

impl IndexWindow {
    pub fn new(from: usize, to: Option<usize>) -> Self {
        Self { from, to }
    }

    /// The whole series
    pub fn all() -> Self {
        Self::default()
    }
}

impl fmt::Display for IndexWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to {
            Some(to) => write!(f, "[{}, {})", self.from, to),
            None => write!(f, "[{}, end)", self.from),
        }
    }
}

/// Mean of `samples` over the window
///
/// # Errors
/// * `ProfileError::EmptyData` - the window selects no samples
pub fn average_over(samples: &[f64], window: IndexWindow) -> Result<f64, ProfileError> {
    let to = window.to.unwrap_or(samples.len()).min(samples.len());
    if window.from >= to {
        return Err(ProfileError::EmptyData(format!(
            "window {} selects none of {} samples",
            window, samples.len()
        )));
    }

    let slice = &samples[window.from..to];
    Ok(slice.iter().sum::<f64>() / slice.len() as f64)
}

/// Growth of a running total between the window ends
///
/// # Errors
/// * `ProfileError::EmptyData` - either end lies outside the series
pub fn total_over(sums: &[f64], window: IndexWindow) -> Result<f64, ProfileError> {
    let last = match window.to {
        Some(to) => sums.get(to),
        None => sums.last(),
    };

    match (last, sums.get(window.from)) {
        (Some(last), Some(first)) => Ok(last - first),
        _ => Err(ProfileError::EmptyData(format!(
            "window {} outside of {} running totals",
            window,
            sums.len()
        ))),
    }
}

/// Category of run time derived from a sampling profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TimeCategory {
    #[value(name = "total")]
    Total,
    #[value(name = "io")]
    Io,
    #[value(name = "mpi")]
    Mpi,
    #[value(name = "cpu")]
    Cpu,
    #[value(name = "non-sleeping")]
    NonSleeping,
}

impl TimeCategory {
    /// Default chart title for the category
    pub fn title(self) -> &'static str {
        match self {
            Self::Total => "Runtime",
            Self::Io => "I/O Time",
            Self::Mpi => "MPI Time",
            Self::Cpu => "CPU Time",
            Self::NonSleeping => "Active Time",
        }
    }
}

/// Time in seconds spent in `category` over the whole run
///
/// **Public** - used by the sampling box plots
///
/// # Arguments
/// * `profile` - Sampling profile with a `main_thread` activity timeline
/// * `category` - Which time to derive
///
/// # Errors
/// * `ProfileError::Field` - run time or activity missing
/// * `ProfileError::EmptyData` - the activity timeline has no samples
pub fn time_secs(profile: &SamplingProfile, category: TimeCategory) -> Result<f64, ProfileError> {
    let total = profile.runtime_ms()? as f64 / MS_PER_SECOND;

    let share = |timeline: Vec<f64>| -> Result<f64, ProfileError> {
        Ok(average_over(&timeline, IndexWindow::all())? * total / 100.0)
    };

    match category {
        TimeCategory::Total => Ok(total),
        TimeCategory::Io => share(profile.io_activity(DEFAULT_ACTIVITY)?),
        TimeCategory::Mpi => share(profile.mpi_activity(DEFAULT_ACTIVITY)?),
        TimeCategory::Cpu => share(profile.cpu_activity(DEFAULT_ACTIVITY)?),
        TimeCategory::NonSleeping => Ok(time_secs(profile, TimeCategory::Cpu)?
            + time_secs(profile, TimeCategory::Io)?
            + time_secs(profile, TimeCategory::Mpi)?),
    }
}

/// Running total of a per-second rate sampled every `interval_secs`
///
/// `out[i] = out[i-1] + rate[i] * interval_secs * nodes`
pub fn cumulative_integral(rate: &[f64], interval_secs: f64, nodes: f64) -> Vec<f64> {
    rate.iter()
        .scan(0.0, |acc, r| {
            *acc += r * interval_secs * nodes;
            Some(*acc)
        })
        .collect()
}

/// Approximate and recorded Lustre byte counts of one profile
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LustreIntegrals {
    pub read_approx: Vec<f64>,
    pub read_actual: Vec<f64>,
    pub write_approx: Vec<f64>,
    pub write_actual: Vec<f64>,
}

/// Integrate the Lustre read and write rates of a profile
///
/// # Errors
/// * `ProfileError::MetricNotFound` - a Lustre metric is not recorded
pub fn lustre_integrals(
    profile: &SamplingProfile,
    source: &str,
) -> Result<LustreIntegrals, ProfileError> {
    let interval = profile.sample_interval_ms()? / MS_PER_SECOND;
    let nodes = profile.num_nodes()? as f64;

    let metric = |name: &str, field: MetricField| -> Result<Vec<f64>, ProfileError> {
        profile
            .metric_field_samples(&[name], field)?
            .into_iter()
            .next()
            .map(|(_, series)| series)
            .ok_or_else(|| ProfileError::MetricNotFound {
                metric: name.to_string(),
                file: source.to_string(),
            })
    };

    Ok(LustreIntegrals {
        read_approx: cumulative_integral(
            &metric(LUSTRE_READ_RATE, MetricField::Means)?,
            interval,
            nodes,
        ),
        read_actual: metric(LUSTRE_READ_TOTAL, MetricField::Sums)?,
        write_approx: cumulative_integral(
            &metric(LUSTRE_WRITE_RATE, MetricField::Means)?,
            interval,
            nodes,
        ),
        write_actual: metric(LUSTRE_WRITE_TOTAL, MetricField::Sums)?,
    })
}

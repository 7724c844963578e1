//! Helpers shared by the command implementations.

use crate::chart::{
    load_chart_config, BoxStats, ChartConfig, Figure, Panel, Plot, Renderer, SvgRenderer,
};
use crate::commands::models::ChartOutput;
use crate::output::in_artifacts_dir;
use crate::report::PerfReport;
use crate::sampling::SamplingProfile;
use crate::scaling::Scaling;
use crate::series::report::ScaleMap;
use crate::series::{load_each, read_file_list};
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Render `figure` to the chart output, applying the style file if given
///
/// **Public** - final step of every chart command
///
/// # Returns
/// The path the SVG was written to
pub fn render_chart(figure: &Figure, chart: &ChartOutput) -> Result<PathBuf> {
    let config = match &chart.style {
        Some(style) => load_chart_config(style)
            .with_context(|| format!("Failed to load chart style {}", style.display()))?,
        None => ChartConfig::default(),
    };

    let output = in_artifacts_dir(chart.output.clone());
    SvgRenderer::new(config)
        .render(figure, &output)
        .context("Failed to render chart")?;

    info!("✓ Chart written to: {}", output.display());
    Ok(output)
}

/// Load every sampling profile named in a file list
///
/// With `skip_unreadable`, files that cannot be opened are logged and
/// left out. An empty result is an error either way.
pub fn load_profiles(list: &Path, skip_unreadable: bool) -> Result<Vec<(PathBuf, SamplingProfile)>> {
    let files = read_file_list(list)
        .with_context(|| format!("Failed to read file list {}", list.display()))?;

    let loaded = load_each(&files, |p| SamplingProfile::load(p), skip_unreadable)
        .context("Failed to load sampling profile")?;
    if loaded.is_empty() {
        bail!("No profiles loaded from {}", list.display());
    }

    debug!("Loaded {} sampling profiles", loaded.len());
    Ok(loaded)
}

/// Load every performance report named in a file list
pub fn load_reports(list: &Path, skip_unreadable: bool) -> Result<Vec<PerfReport>> {
    let files = read_file_list(list)
        .with_context(|| format!("Failed to read file list {}", list.display()))?;

    let loaded = load_each(&files, |p| PerfReport::load(p), skip_unreadable)
        .context("Failed to load performance report")?;
    if loaded.is_empty() {
        bail!("No reports loaded from {}", list.display());
    }

    debug!("Loaded {} performance reports", loaded.len());
    Ok(loaded.into_iter().map(|(_, report)| report).collect())
}

/// Category labels of a scale-keyed data set, in key order
pub fn scale_labels<T>(data: &ScaleMap<T>) -> Vec<String> {
    data.keys().map(|k| k.to_string()).collect()
}

/// Scale keys as numbers, for ideal scaling curves
pub fn scale_counts<T>(data: &ScaleMap<T>) -> Vec<f64> {
    data.keys().map(|k| *k as f64).collect()
}

/// Points at integer category positions
pub fn category_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

/// Ideal curve over `counts` seeded from `seed_values`, or `None` without a seed
pub fn ideal_points(scaling: Scaling, seed_values: &[f64], counts: &[f64]) -> Option<Vec<(f64, f64)>> {
    let seed = scaling.seed(seed_values)?;
    Some(category_points(&scaling.ideal_line(seed, counts)))
}

/// One box per process count, built from the grouped times
///
/// Counts without any samples are logged and left out.
pub fn box_panel(grouped: &ScaleMap<Vec<f64>>) -> Panel {
    let (categories, boxes): (Vec<String>, Vec<BoxStats>) = grouped
        .iter()
        .filter_map(|(count, times)| match BoxStats::from_samples(times) {
            Some(stats) => Some((count.to_string(), stats)),
            None => {
                warn!("No times recorded for {} processes", count);
                None
            }
        })
        .unzip();

    Panel::new(Plot::Boxes { categories, boxes }).with_labels("Processes", "Time (s)")
}

/// File name of `path`, used as a chart title
pub fn title_from(path: &Path) -> String {
    crate::series::file_label(path)
}

//! Commands over sampling profiles (`map ...`).
//!
//! Each chart command loads its profiles, builds a data set with
//! [`crate::series::sampling`], assembles a [`Figure`] and renders it.

use crate::chart::{BarGroup, Figure, Line, LineStyle, Panel, Plot, Rgb};
use crate::commands::models::{
    ChartOutput, CompareArgs, CsvArgs, MapBarArgs, MapBoxArgs, MetricArgs, PanelsArgs,
    ScaledMetricArgs, TruncateArgs,
};
use crate::commands::utils::{
    box_panel, category_points, ideal_points, load_profiles, render_chart, scale_counts,
    scale_labels, title_from,
};
use crate::output::{sample_table_paths, write_document, write_sample_table};
use crate::sampling::{
    lustre_integrals, render_metric_names, truncate, truncated_file_name, SamplingProfile,
};
use crate::series::sampling::{self as series, Source, MIN_MEAN_MAX_LABELS};
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const LINE_COLORS: [Rgb; 4] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE, Rgb::BLACK];

fn load_profile(input: &Path) -> Result<SamplingProfile> {
    SamplingProfile::load(input)
        .with_context(|| format!("Failed to load sampling profile {}", input.display()))
}

fn sources(loaded: &[(PathBuf, SamplingProfile)]) -> Vec<Source<'_>> {
    loaded.iter().map(|(path, p)| (path.as_path(), p)).collect()
}

/// Print the global fields, activity timelines and metric names of a profile
///
/// **Public** - entry point for `map names`
pub fn execute_names(input: &Path) -> Result<()> {
    let profile = load_profile(input)?;
    let listing = render_metric_names(&profile).context("Profile is missing a section")?;
    print!("{}", listing);
    Ok(())
}

/// Write a copy of a profile holding only the samples `start..=end`
///
/// **Public** - entry point for `map truncate`
///
/// # Returns
/// Path of the truncated profile
///
/// # Errors
/// * `Invalid index range [start, end]` - nothing is written
/// * Load and write failures
///
/// # Example
/// ```ignore
/// let out = execute_truncate(TruncateArgs {
///     input: PathBuf::from("run.json"),
///     start: 10,
///     end: 99,
///     output: None,
/// })?;
/// assert_eq!(out, PathBuf::from("run_trunc10-99.json"));
/// ```
pub fn execute_truncate(args: TruncateArgs) -> Result<PathBuf> {
    let profile = load_profile(&args.input)?;

    // The range error is reported as is, without extra context
    let truncated = truncate(&profile, args.start, args.end)?;

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(truncated_file_name(
            &args.input.to_string_lossy(),
            args.start as usize,
            args.end as usize,
        ))
    });

    write_document(truncated.document(), &output)
        .context("Failed to write truncated profile")?;
    println!("Truncated JSON samples written to {}", output.display());

    Ok(output)
}

/// Export one field of every metric as a CSV table plus a name list
///
/// **Public** - entry point for `map csv`
///
/// # Returns
/// (samples file, field names file)
pub fn execute_csv(args: CsvArgs) -> Result<(PathBuf, PathBuf)> {
    let profile = load_profile(&args.input)?;
    let rows = series::sample_rows(&profile, args.field)
        .with_context(|| format!("Failed to read the {} of every metric", args.field))?;

    let (samples_path, names_path) = sample_table_paths(&args.input, args.output.as_deref());
    write_sample_table(&rows, &samples_path, &names_path)
        .context("Failed to write sample table")?;

    println!("Samples written to {}", samples_path.display());
    println!("Field names written to {}", names_path.display());
    Ok((samples_path, names_path))
}

/// Stacked CPU, I/O, OpenMP and MPI activity per sample
///
/// **Public** - entry point for `map timeline`
pub fn execute_timeline(input: &Path, chart: &ChartOutput) -> Result<PathBuf> {
    let profile = load_profile(input)?;
    let timeline =
        series::activity_timeline(&profile).context("Failed to read the activity timeline")?;

    let samples = timeline.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    let colors = [Rgb::GREEN, Rgb::RED, Rgb::YELLOW, Rgb::BLUE];
    let groups = timeline
        .into_iter()
        .zip(colors)
        .map(|((label, values), color)| BarGroup::new(label, values).with_color(color))
        .collect();

    let title = title_from(input);
    println!("{}", title);

    let panel = Panel::new(Plot::StackedBars {
        categories: vec![String::new(); samples],
        groups,
    })
    .with_labels("Sample", "% time");

    render_chart(&Figure::new().with_title(title).with_panel(panel), chart)
}

/// Several metrics and activity categories over time
///
/// **Public** - entry point for `map metrics`
///
/// # Arguments
/// * `input` - Sampling profile
/// * `metric_file` - One metric or activity category name per line
/// * `chart` - Output
pub fn execute_metrics(input: &Path, metric_file: &Path, chart: &ChartOutput) -> Result<PathBuf> {
    let profile = load_profile(input)?;

    let names: Vec<String> = fs::read_to_string(metric_file)
        .with_context(|| format!("Failed to read metric list {}", metric_file.display()))?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    let (times, found) =
        series::metrics_over_time(&profile, &names).context("Failed to read metrics")?;
    if found.is_empty() {
        warn!("None of the {} listed names were found", names.len());
    }

    let lines = found
        .into_iter()
        .map(|(name, values)| {
            Line::new(times.iter().copied().zip(values).collect()).with_label(name)
        })
        .collect();

    let panel = Panel::new(Plot::Lines { x_ticks: None, lines }).with_labels("Time (ms)", "");
    render_chart(
        &Figure::new().with_title(title_from(input)).with_panel(panel),
        chart,
    )
}

/// Selected fields of one metric over a sample window
///
/// **Public** - entry point for `map metric`
pub fn execute_metric(args: MetricArgs) -> Result<PathBuf> {
    let profile = load_profile(&args.input)?;
    let fields =
        series::metric_fields_window(&profile, &args.metric, &args.fields, args.window, &args.input)?;

    let lines = fields
        .iter()
        .enumerate()
        .map(|(i, (field, values))| {
            Line::indexed(values)
                .with_label(field.label())
                .with_color(LINE_COLORS[i % LINE_COLORS.len()])
        })
        .collect();

    let y_label = args.description.clone().unwrap_or_else(|| args.metric.clone());
    let panel =
        Panel::new(Plot::Lines { x_ticks: None, lines }).with_labels("Sample number", y_label);
    render_chart(&Figure::new().with_panel(panel), &args.chart)
}

fn x_label(show_time: bool) -> &'static str {
    if show_time {
        "Time (ms)"
    } else {
        "Sample number"
    }
}

/// One metric from several profiles on shared axes
///
/// **Public** - entry point for `map compare`
pub fn execute_compare(args: CompareArgs) -> Result<PathBuf> {
    let loaded = load_profiles(&args.file_list, false)?;
    let runs = series::metric_across_files(&sources(&loaded), &args.metric, args.deduplicate)?;

    let lines = runs
        .iter()
        .map(|(label, run)| Line::new(run.points(args.show_time)).with_label(label.as_str()))
        .collect();

    let y_label = args.description.clone().unwrap_or_else(|| args.metric.clone());
    let panel = Panel::new(Plot::Lines { x_ticks: None, lines })
        .with_labels(x_label(args.show_time), y_label);
    render_chart(&Figure::new().with_panel(panel), &args.chart)
}

/// One metric from several profiles, one panel per (processes, threads)
///
/// **Public** - entry point for `map panels`
pub fn execute_panels(args: PanelsArgs) -> Result<PathBuf> {
    let loaded = load_profiles(&args.file_list, false)?;
    let runs = series::metric_by_configuration(&sources(&loaded), &args.metric)?;

    let y_range = if args.shared_y {
        series::sample_bounds(runs.values())
    } else {
        None
    };
    let x_range = args.shared_x.then(|| {
        let right = runs
            .values()
            .map(|run| {
                if args.show_time {
                    run.runtime_ms as f64
                } else {
                    run.samples.len() as f64
                }
            })
            .fold(0.0, f64::max);
        (0.0, right)
    });

    let y_label = args.description.clone().unwrap_or_else(|| args.metric.clone());
    let mut figure = Figure::new();
    for (i, ((procs, threads), run)) in runs.iter().enumerate() {
        let line = Line::new(run.points(args.show_time))
            .with_label(format!("Procs: ({}, {})", procs, threads))
            .with_color(LINE_COLORS[i % LINE_COLORS.len()]);

        figure = figure.with_panel(
            Panel::new(Plot::Lines {
                x_ticks: None,
                lines: vec![line],
            })
            .with_labels(x_label(args.show_time), y_label.as_str())
            .with_x_range(x_range)
            .with_y_range(y_range),
        );
    }

    render_chart(&figure, &args.chart)
}

/// Bar (or line) chart of one metric summarized per scale
///
/// **Public** - entry point for `map bar`
pub fn execute_map_bar(args: MapBarArgs) -> Result<PathBuf> {
    let scaled = &args.scaled;
    let loaded = load_profiles(&scaled.file_list, false)?;
    let data = series::metric_summary_by_scale(
        &sources(&loaded),
        &scaled.metric,
        scaled.axis,
        scaled.window,
        scaled.summary,
    )?;

    let categories = scale_labels(&data);
    let values: Vec<f64> = data.values().copied().collect();
    info!("{} over {}: {:?}", scaled.metric, scaled.window, values);

    let plot = if args.line {
        let mut lines = vec![Line::new(category_points(&values))
            .with_label("actual")
            .with_color(Rgb::RED)];

        if let Some(expected) = args.expected {
            if let Some(points) = ideal_points(expected, &values, &scale_counts(&data)) {
                lines.push(
                    Line::new(points)
                        .with_label(expected.label())
                        .with_color(Rgb::BLACK),
                );
            }
        }

        Plot::Lines {
            x_ticks: Some(categories),
            lines,
        }
    } else {
        if args.expected.is_some() {
            warn!("--expected is only drawn on line charts");
        }
        Plot::Bars {
            categories,
            groups: vec![BarGroup::new(scaled.metric.as_str(), values).with_color(Rgb::RED)],
        }
    };

    let panel = Panel::new(plot)
        .with_labels(scaled.axis.label(), scaled.y_label.as_str())
        .with_log_y(scaled.log_y);
    render_chart(&Figure::new().with_panel(panel), &scaled.chart)
}

/// Stacked minimum, mean and maximum of a metric per scale
///
/// **Public** - entry point for `map min-max`
///
/// Each bar stacks the minimum, the step up to the mean and the step up to
/// the maximum, so segment tops sit at the three values.
pub fn execute_min_max(args: ScaledMetricArgs) -> Result<PathBuf> {
    let loaded = load_profiles(&args.file_list, false)?;
    let data = series::min_mean_max_by_scale(
        &sources(&loaded),
        &args.metric,
        args.axis,
        args.window,
        args.summary,
    )?;

    let colors = [Rgb::RED, Rgb::GREEN, Rgb::BLUE];
    let groups = (0..MIN_MEAN_MAX_LABELS.len())
        .map(|i| {
            let steps = data
                .values()
                .map(|v| if i == 0 { v[0] } else { v[i] - v[i - 1] })
                .collect();
            BarGroup::new(MIN_MEAN_MAX_LABELS[i], steps).with_color(colors[i])
        })
        .collect();

    let panel = Panel::new(Plot::StackedBars {
        categories: scale_labels(&data),
        groups,
    })
    .with_labels(args.axis.label(), args.y_label.as_str())
    .with_log_y(args.log_y);
    render_chart(&Figure::new().with_panel(panel), &args.chart)
}

/// Box plot of a derived run time per process count
///
/// **Public** - entry point for `map box`
pub fn execute_map_box(args: MapBoxArgs) -> Result<PathBuf> {
    let loaded = load_profiles(&args.file_list, false)?;
    let profiles: Vec<&SamplingProfile> = loaded.iter().map(|(_, p)| p).collect();
    let grouped = series::times_by_processes(&profiles, args.category)?;

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| args.category.title().to_string());
    render_chart(
        &Figure::new().with_title(title).with_panel(box_panel(&grouped)),
        &args.chart,
    )
}

/// Approximate Lustre byte counts integrated from the rates, next to the
/// recorded totals
///
/// **Public** - entry point for `map lustre`
pub fn execute_lustre(input: &Path, chart: &ChartOutput) -> Result<PathBuf> {
    let profile = load_profile(input)?;
    let integrals = lustre_integrals(&profile, &input.display().to_string())?;

    let panel = |approx: &[f64], actual: &[f64], what: &str| {
        let lines = vec![
            Line::indexed(approx)
                .with_label(format!("Approx bytes {}", what))
                .with_style(LineStyle::Dashed)
                .with_color(Rgb::BLACK),
            Line::indexed(actual)
                .with_label(format!("Actual bytes {}", what))
                .with_color(Rgb::BLACK),
        ];
        Panel::new(Plot::Lines { x_ticks: None, lines }).with_labels("Sample number", "Bytes")
    };

    let figure = Figure::new()
        .with_title(title_from(input))
        .with_panel(panel(
            &integrals.write_approx,
            &integrals.write_actual,
            "written",
        ))
        .with_panel(panel(&integrals.read_approx, &integrals.read_actual, "read"));

    render_chart(&figure, chart)
}

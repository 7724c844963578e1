//! Commands over performance reports (`report ...`).

use crate::chart::{BarGroup, Figure, Line, LineStyle, Panel, Plot, Rgb};
use crate::commands::models::{
    ChartOutput, ComponentsArgs, ReportBarArgs, ReportBoxArgs, ScalingArgs,
};
use crate::commands::utils::{
    box_panel, category_points, ideal_points, load_reports, render_chart, scale_counts,
    scale_labels,
};
use crate::series::report::{
    components_by_scale, memory_and_mpi_by_scale, metric_values_by_scale, parse_metric_list,
    runtime_by_date, runtime_by_scale, stacked_components, times_by_processes, ScaleMap,
    COMPONENT_LABELS, STACKED_LABELS,
};
use crate::series::ScalingAxis;
use crate::utils::config::DATE_TICK_FORMAT;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const BAR_COLORS: [Rgb; 4] = [Rgb::RED, Rgb::BLUE, Rgb::GREEN, Rgb::BLACK];

/// CPU, collective MPI, point-to-point MPI, file system read and write
const STACKED_COLORS: [Rgb; 5] = [
    Rgb(0x6c, 0x40, 0x31),
    Rgb(0xd0, 0x52, 0x3a),
    Rgb(0xd0, 0x38, 0x2a),
    Rgb(0x17, 0x52, 0x38),
    Rgb(0x1f, 0x72, 0x22),
];

const SERIES_COLORS: [Rgb; 5] = [Rgb::RED, Rgb::BLUE, Rgb::GREEN, Rgb::CYAN, Rgb::BLACK];

const IDEAL_STYLES: [LineStyle; 2] = [LineStyle::Solid, LineStyle::Dashed];

/// Entry `i` of every per-scale vector, NaN where absent
fn column(data: &ScaleMap<Vec<f64>>, i: usize) -> Vec<f64> {
    data.values()
        .map(|v| v.get(i).copied().unwrap_or(f64::NAN))
        .collect()
}

/// Bars of arbitrary report fields per scale
///
/// **Public** - entry point for `report bar`
///
/// # Arguments
/// * `args.metric_file` - One `list, of, keys [: label]` per line
pub fn execute_report_bar(args: ReportBarArgs) -> Result<PathBuf> {
    let reports = load_reports(&args.file_list, false)?;

    let text = fs::read_to_string(&args.metric_file)
        .with_context(|| format!("Failed to read metric list {}", args.metric_file.display()))?;
    let metrics = parse_metric_list(&text).context("Failed to parse metric list")?;
    debug!("Showing {} report fields", metrics.len());

    let data = metric_values_by_scale(&reports, &metrics, args.axis)?;
    let groups = metrics
        .iter()
        .enumerate()
        .map(|(i, m)| {
            BarGroup::new(m.label.as_str(), column(&data, i))
                .with_color(BAR_COLORS[i % BAR_COLORS.len()])
        })
        .collect();

    let panel = Panel::new(Plot::Bars {
        categories: scale_labels(&data),
        groups,
    })
    .with_labels(args.axis.label(), args.y_label.as_str());
    render_chart(&Figure::new().with_panel(panel), &args.chart)
}

fn stacked_panel(data: &ScaleMap<Vec<f64>>, axis: ScalingAxis, y_label: &str) -> Panel {
    let groups = STACKED_LABELS
        .iter()
        .zip(STACKED_COLORS)
        .enumerate()
        .map(|(i, (label, color))| BarGroup::new(*label, column(data, i)).with_color(color))
        .collect();

    Panel::new(Plot::StackedBars {
        categories: scale_labels(data),
        groups,
    })
    .with_labels(axis.label(), y_label)
}

/// Stacked CPU, MPI and I/O breakdown as shares and as wall clock time
///
/// **Public** - entry point for `report stacked`
///
/// Reports that cannot be read are skipped.
pub fn execute_stacked(file_list: &Path, axis: ScalingAxis, chart: &ChartOutput) -> Result<PathBuf> {
    let reports = load_reports(file_list, true)?;
    let components = stacked_components(&reports, axis)?;

    let figure = Figure::new()
        .with_panel(stacked_panel(&components.percent, axis, "Proportion of time (%)"))
        .with_panel(stacked_panel(&components.time, axis, "Wall clock time (s)"));
    render_chart(&figure, chart)
}

/// I/O, MPI and CPU shares as bars and their times as log-scaled lines
///
/// **Public** - entry point for `report components`
///
/// Ideal curves start from twice the seed of the component seeds, and only
/// components that are not zero everywhere are drawn. Reports that cannot
/// be read are skipped.
pub fn execute_components(args: ComponentsArgs) -> Result<PathBuf> {
    let reports = load_reports(&args.file_list, true)?;
    let components = components_by_scale(&reports, args.axis)?;

    let categories = scale_labels(&components.percent);
    let colors = [Rgb::RED, Rgb::BLUE, Rgb::GREEN];

    let bars = (0..COMPONENT_LABELS.len())
        .map(|i| BarGroup::new(COMPONENT_LABELS[i], column(&components.percent, i)).with_color(colors[i]))
        .collect();
    let percent_panel = Panel::new(Plot::Bars {
        categories: categories.clone(),
        groups: bars,
    })
    .with_labels(args.axis.label(), "Proportion of Time (%)");

    let times: Vec<Vec<f64>> = (0..COMPONENT_LABELS.len())
        .map(|i| column(&components.time, i))
        .collect();
    let drawn: Vec<usize> = (0..times.len())
        .filter(|i| times[*i].iter().any(|t| *t != 0.0))
        .collect();

    let counts = scale_counts(&components.time);
    let mut lines = Vec::new();
    for (n, scaling) in args.expected.iter().enumerate() {
        let seeds: Vec<f64> = drawn.iter().filter_map(|i| scaling.seed(&times[*i])).collect();
        let Some(seed) = scaling.seed(&seeds) else {
            info!("No non-zero component to seed the {} curve", scaling);
            continue;
        };

        lines.push(
            Line::new(category_points(&scaling.ideal_line(seed * 2.0, &counts)))
                .with_label(scaling.label())
                .with_style(IDEAL_STYLES[n % IDEAL_STYLES.len()])
                .with_color(Rgb::BLACK),
        );
    }
    for i in drawn {
        lines.push(
            Line::new(category_points(&times[i]))
                .with_label(COMPONENT_LABELS[i])
                .with_style(LineStyle::Thick)
                .with_color(colors[i]),
        );
    }

    let time_panel = Panel::new(Plot::Lines {
        x_ticks: Some(categories),
        lines,
    })
    .with_labels(args.axis.label(), "Wallclock time (s)")
    .with_log_y(true);

    let figure = Figure::new()
        .with_panel(percent_panel)
        .with_panel(time_panel);
    render_chart(&figure, &args.chart)
}

/// Run time against scale for one or more series of reports
///
/// **Public** - entry point for `report scaling`
///
/// Ideal curves are seeded from the first series. Reports that cannot be
/// read are skipped.
///
/// # Errors
/// * Label count differs from the number of file lists
pub fn execute_scaling(args: ScalingArgs) -> Result<PathBuf> {
    if let Some(labels) = &args.labels {
        if labels.len() != args.file_lists.len() {
            bail!(
                "{} labels given for {} file lists",
                labels.len(),
                args.file_lists.len()
            );
        }
    }

    let mut lines = Vec::new();
    let mut x_ticks = None;

    for (n, list) in args.file_lists.iter().enumerate() {
        let reports = load_reports(list, true)?;
        let data = runtime_by_scale(&reports, args.axis)?;
        let values: Vec<f64> = data.values().copied().collect();

        if n == 0 {
            let counts = scale_counts(&data);
            for (i, scaling) in args.expected.iter().enumerate() {
                if let Some(points) = ideal_points(*scaling, &values, &counts) {
                    lines.push(
                        Line::new(points)
                            .with_label(scaling.label())
                            .with_style(IDEAL_STYLES[i % IDEAL_STYLES.len()])
                            .with_color(Rgb::BLACK),
                    );
                }
            }
            x_ticks = Some(scale_labels(&data));
        }

        let label = args
            .labels
            .as_ref()
            .and_then(|labels| labels.get(n))
            .cloned()
            .unwrap_or_else(|| "actual".to_string());
        lines.push(
            Line::new(category_points(&values))
                .with_label(label)
                .with_style(LineStyle::Thick)
                .with_color(SERIES_COLORS[n % SERIES_COLORS.len()]),
        );
    }

    let panel = Panel::new(Plot::Lines { x_ticks, lines })
        .with_labels(args.axis.label(), "Run time (s)")
        .with_log_y(args.log_y);
    render_chart(&Figure::new().with_panel(panel), &args.chart)
}

/// Box plot of a report time per process count
///
/// **Public** - entry point for `report box`
pub fn execute_report_box(args: ReportBoxArgs) -> Result<PathBuf> {
    let reports = load_reports(&args.file_list, false)?;
    let grouped = times_by_processes(&reports, args.category)?;

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| args.category.title().to_string());
    render_chart(
        &Figure::new().with_title(title).with_panel(box_panel(&grouped)),
        &args.chart,
    )
}

/// Run time of each report in start date order
///
/// **Public** - entry point for `report dates`
pub fn execute_dates(file_list: &Path, title: Option<String>, chart: &ChartOutput) -> Result<PathBuf> {
    let reports = load_reports(file_list, false)?;
    let by_date = runtime_by_date(&reports)?;

    let x_ticks = by_date
        .keys()
        .map(|date| date.format(DATE_TICK_FORMAT).to_string())
        .collect();
    let values: Vec<f64> = by_date.values().copied().collect();

    let line = Line::new(category_points(&values))
        .with_style(LineStyle::Markers)
        .with_color(Rgb::RED);
    let panel = Panel::new(Plot::Lines {
        x_ticks: Some(x_ticks),
        lines: vec![line],
    })
    .with_labels("Date", "Run time (s)");

    render_chart(
        &Figure::new().with_optional_title(title).with_panel(panel),
        chart,
    )
}

/// Memory use next to MPI share of the run, per scale
///
/// **Public** - entry point for `report mem-mpi`
pub fn execute_mem_mpi(file_list: &Path, axis: ScalingAxis, chart: &ChartOutput) -> Result<PathBuf> {
    let reports = load_reports(file_list, false)?;
    let data = memory_and_mpi_by_scale(&reports, axis)?;

    let groups = ["Memory Use", "MPI Time"]
        .iter()
        .zip([Rgb::RED, Rgb::BLUE])
        .enumerate()
        .map(|(i, (label, color))| {
            BarGroup::new(*label, data.values().map(|v| v[i]).collect()).with_color(color)
        })
        .collect();

    let panel = Panel::new(Plot::Bars {
        categories: scale_labels(&data),
        groups,
    })
    .with_labels(axis.label(), "Proportion (%)");
    render_chart(&Figure::new().with_panel(panel), chart)
}

//! HPC Profile Studio CLI
//!
//! Field access, truncation and charts for JSON exports of sampling
//! profiles and performance reports.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use hpc_profile_studio::commands::{
    execute_compare, execute_components, execute_csv, execute_dates, execute_keys,
    execute_lustre, execute_map_bar, execute_map_box, execute_mem_mpi, execute_metric,
    execute_metrics, execute_min_max, execute_names, execute_panels, execute_report_bar,
    execute_report_box, execute_scaling, execute_stacked, execute_timeline, execute_truncate,
    execute_value, ChartOutput, CompareArgs, ComponentsArgs, CsvArgs, MapBarArgs, MapBoxArgs,
    MetricArgs, PanelsArgs, ReportBarArgs, ReportBoxArgs, ScaledMetricArgs, ScalingArgs,
    TruncateArgs, ValueArgs,
};
use hpc_profile_studio::sampling::{IndexWindow, MetricField, TimeCategory};
use hpc_profile_studio::scaling::Scaling;
use hpc_profile_studio::series::report::ReportTime;
use hpc_profile_studio::series::sampling::Summary;
use hpc_profile_studio::series::ScalingAxis;
use hpc_profile_studio::utils::config::DEFAULT_BAR_YLABEL;

/// HPC Profile Studio - inspect and chart HPC profiler JSON exports
#[derive(Parser, Debug)]
#[command(name = "hpc-profile")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the keys of a JSON file
    Keys {
        /// JSON file to read
        file: PathBuf,

        /// Number of nested levels to show below the top level
        #[arg(long, default_value = "1")]
        level: usize,

        /// Show every key in the file
        #[arg(long)]
        all: bool,
    },

    /// Show the value stored at a field path
    Value {
        /// JSON file to read
        file: PathBuf,

        /// Ordered keys, each one level deeper
        #[arg(required = true)]
        fields: Vec<String>,

        /// Also write the value as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sampling profile (Arm MAP export) tools
    #[command(subcommand)]
    Map(MapCommand),

    /// Performance report tools
    #[command(subcommand)]
    Report(ReportCommand),
}

/// Chart output options
#[derive(Args, Debug)]
struct ChartOpts {
    /// Output path for the SVG chart (placed in artifacts/ by default)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML chart style file
    #[arg(long)]
    style: Option<PathBuf>,
}

impl ChartOpts {
    fn into_output(self, default_name: &str) -> ChartOutput {
        ChartOutput::new(self.output.unwrap_or_else(|| PathBuf::from(default_name)))
            .with_style(self.style)
    }
}

/// Sample window options
#[derive(Args, Debug)]
struct WindowOpts {
    /// Zero based index of the first sample used
    #[arg(long = "from", visible_alias = "ind-from", default_value = "0")]
    from: usize,

    /// Zero based index up to which samples are used (default: the end)
    #[arg(long = "to", visible_alias = "ind-to")]
    to: Option<usize>,
}

impl From<WindowOpts> for IndexWindow {
    fn from(opts: WindowOpts) -> Self {
        IndexWindow::new(opts.from, opts.to)
    }
}

/// Options of charts summarizing one metric per scale
#[derive(Args, Debug)]
struct ScaledOpts {
    /// Text file listing the profiles, one per line
    file_list: PathBuf,

    /// Metric name under samples.metrics
    metric: String,

    /// Scale by threads instead of processes
    #[arg(long)]
    threads: bool,

    /// The metric holds a running total; show its growth over the window
    #[arg(long)]
    total: bool,

    /// Logarithmic y axis
    #[arg(long)]
    log_y: bool,

    /// Y-axis label
    #[arg(long, default_value = DEFAULT_BAR_YLABEL)]
    ylabel: String,

    #[command(flatten)]
    window: WindowOpts,

    #[command(flatten)]
    chart: ChartOpts,
}

impl ScaledOpts {
    fn into_args(self, default_name: &str) -> ScaledMetricArgs {
        ScaledMetricArgs {
            file_list: self.file_list,
            metric: self.metric,
            axis: ScalingAxis::from_threads_flag(self.threads),
            window: self.window.into(),
            summary: Summary::from_total_flag(self.total),
            log_y: self.log_y,
            y_label: self.ylabel,
            chart: self.chart.into_output(default_name),
        }
    }
}

/// Sampling profile commands
#[derive(Subcommand, Debug)]
enum MapCommand {
    /// List global fields, activity timelines and sampled metric names
    Names {
        /// Sampling profile
        file: PathBuf,
    },

    /// Keep only the samples in [start, end]
    Truncate {
        /// Sampling profile
        file: PathBuf,

        /// Zero based index of the first kept sample
        #[arg(allow_hyphen_values = true)]
        start: i64,

        /// Zero based index of the last kept sample
        #[arg(allow_hyphen_values = true)]
        end: i64,

        /// Output file (default: <name>_trunc<start>-<end>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export one field of every metric as CSV
    Csv {
        /// Sampling profile
        file: PathBuf,

        /// Samples file; the field names file is derived from it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field written for every sample
        #[arg(long, value_enum, default_value = "means")]
        field: MetricField,
    },

    /// Stacked activity timeline of the main thread
    Timeline {
        /// Sampling profile
        file: PathBuf,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Metrics listed in a file over time
    Metrics {
        /// Sampling profile
        file: PathBuf,

        /// File with one metric or activity name per line
        metric_file: PathBuf,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Selected fields of one metric
    Metric {
        /// Sampling profile
        file: PathBuf,

        /// Metric or activity category name
        metric: String,

        /// Fields to draw
        #[arg(value_enum, required = true)]
        fields: Vec<MetricField>,

        /// Y-axis label (default: the metric name)
        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        window: WindowOpts,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// One metric from several profiles on one chart
    Compare {
        /// Text file listing the profiles, one per line
        file_list: PathBuf,

        /// Metric or activity category name
        metric: String,

        /// Y-axis label (default: the metric name)
        #[arg(long)]
        description: Option<String>,

        /// Keep one run per process count
        #[arg(long)]
        deduplicate: bool,

        /// Wall clock time on the x axis instead of sample numbers
        #[arg(long)]
        show_time: bool,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// One metric from several profiles, one panel per configuration
    Panels {
        /// Text file listing the profiles, one per line
        file_list: PathBuf,

        /// Metric or activity category name
        metric: String,

        /// Y-axis label (default: the metric name)
        #[arg(long)]
        description: Option<String>,

        /// Wall clock time on the x axis instead of sample numbers
        #[arg(long)]
        show_time: bool,

        /// Same x range on every panel
        #[arg(long)]
        x_constant: bool,

        /// Same y range on every panel
        #[arg(long)]
        y_constant: bool,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Metric summary per process or thread count
    Bar {
        #[command(flatten)]
        opts: ScaledOpts,

        /// Draw a line instead of bars
        #[arg(long)]
        line: bool,

        /// Ideal scaling drawn with the line
        #[arg(long, value_enum)]
        expected: Option<Scaling>,
    },

    /// Stacked min, mean and max of a metric per scale
    MinMax {
        #[command(flatten)]
        opts: ScaledOpts,
    },

    /// Box plot of derived run times per process count
    Box {
        /// Text file listing the profiles, one per line
        file_list: PathBuf,

        /// Time category
        #[arg(long, value_enum, default_value = "total")]
        category: TimeCategory,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Approximate Lustre byte integrals against the recorded totals
    Lustre {
        /// Sampling profile
        file: PathBuf,

        #[command(flatten)]
        chart: ChartOpts,
    },
}

/// Performance report commands
#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Bars of report fields listed in a file
    Bar {
        /// Text file listing the reports, one per line
        file_list: PathBuf,

        /// File with lines of `list, of, keys [: label]`
        metric_file: PathBuf,

        /// Scale by threads instead of processes
        #[arg(long)]
        threads: bool,

        /// Y-axis label
        #[arg(long, default_value = DEFAULT_BAR_YLABEL)]
        ylabel: String,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Stacked CPU, MPI and I/O breakdown
    Stacked {
        /// Text file listing the reports, one per line
        file_list: PathBuf,

        /// Scale by threads instead of processes
        #[arg(long)]
        threads: bool,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// I/O, MPI and CPU shares and times
    Components {
        /// Text file listing the reports, one per line
        file_list: PathBuf,

        /// Scale by threads instead of processes
        #[arg(long)]
        threads: bool,

        /// Ideal scalings drawn on the time panel
        #[arg(long, value_enum, num_args = 1..)]
        expected: Vec<Scaling>,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Run time against scale for one or more series
    Scaling {
        /// Text files listing the reports of each series
        #[arg(required = true)]
        file_lists: Vec<PathBuf>,

        /// Scale by threads instead of processes
        #[arg(long)]
        threads: bool,

        /// Legend label of each series
        #[arg(long, num_args = 1..)]
        labels: Option<Vec<String>>,

        /// Ideal scalings drawn from the first series
        #[arg(long, value_enum, num_args = 1.., default_value = "lineard")]
        expected: Vec<Scaling>,

        /// Linear y axis
        #[arg(long)]
        nolog: bool,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Box plot of report times per process count
    Box {
        /// Text file listing the reports, one per line
        file_list: PathBuf,

        /// Time category
        #[arg(long, value_enum, default_value = "total")]
        category: ReportTime,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Run time by start date
    Dates {
        /// Text file listing the reports, one per line
        file_list: PathBuf,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Memory use next to MPI time
    MemMpi {
        /// Text file listing the reports, one per line
        file_list: PathBuf,

        /// Scale by threads instead of processes
        #[arg(long)]
        threads: bool,

        #[command(flatten)]
        chart: ChartOpts,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Keys { file, level, all } => {
            execute_keys(&file, level, all)?;
        }

        Commands::Value {
            file,
            fields,
            output,
        } => {
            execute_value(ValueArgs {
                input: file,
                fields,
                output,
            })?;
        }

        Commands::Map(command) => run_map(command)?,

        Commands::Report(command) => run_report(command)?,
    }

    Ok(())
}

fn run_map(command: MapCommand) -> Result<()> {
    match command {
        MapCommand::Names { file } => execute_names(&file)?,

        MapCommand::Truncate {
            file,
            start,
            end,
            output,
        } => {
            execute_truncate(TruncateArgs {
                input: file,
                start,
                end,
                output,
            })?;
        }

        MapCommand::Csv {
            file,
            output,
            field,
        } => {
            execute_csv(CsvArgs {
                input: file,
                output,
                field,
            })?;
        }

        MapCommand::Timeline { file, chart } => {
            execute_timeline(&file, &chart.into_output("timeline.svg"))?;
        }

        MapCommand::Metrics {
            file,
            metric_file,
            chart,
        } => {
            execute_metrics(&file, &metric_file, &chart.into_output("metrics.svg"))?;
        }

        MapCommand::Metric {
            file,
            metric,
            fields,
            description,
            window,
            chart,
        } => {
            execute_metric(MetricArgs {
                input: file,
                metric,
                fields,
                description,
                window: window.into(),
                chart: chart.into_output("metric.svg"),
            })?;
        }

        MapCommand::Compare {
            file_list,
            metric,
            description,
            deduplicate,
            show_time,
            chart,
        } => {
            execute_compare(CompareArgs {
                file_list,
                metric,
                description,
                deduplicate,
                show_time,
                chart: chart.into_output("compare.svg"),
            })?;
        }

        MapCommand::Panels {
            file_list,
            metric,
            description,
            show_time,
            x_constant,
            y_constant,
            chart,
        } => {
            execute_panels(PanelsArgs {
                file_list,
                metric,
                description,
                show_time,
                shared_x: x_constant,
                shared_y: y_constant,
                chart: chart.into_output("panels.svg"),
            })?;
        }

        MapCommand::Bar {
            opts,
            line,
            expected,
        } => {
            execute_map_bar(MapBarArgs {
                scaled: opts.into_args("map_bar.svg"),
                line,
                expected,
            })?;
        }

        MapCommand::MinMax { opts } => {
            execute_min_max(opts.into_args("min_max.svg"))?;
        }

        MapCommand::Box {
            file_list,
            category,
            title,
            chart,
        } => {
            execute_map_box(MapBoxArgs {
                file_list,
                category,
                title,
                chart: chart.into_output("map_box.svg"),
            })?;
        }

        MapCommand::Lustre { file, chart } => {
            execute_lustre(&file, &chart.into_output("lustre.svg"))?;
        }
    }

    Ok(())
}

fn run_report(command: ReportCommand) -> Result<()> {
    match command {
        ReportCommand::Bar {
            file_list,
            metric_file,
            threads,
            ylabel,
            chart,
        } => {
            execute_report_bar(ReportBarArgs {
                file_list,
                metric_file,
                axis: ScalingAxis::from_threads_flag(threads),
                y_label: ylabel,
                chart: chart.into_output("report_bar.svg"),
            })?;
        }

        ReportCommand::Stacked {
            file_list,
            threads,
            chart,
        } => {
            execute_stacked(
                &file_list,
                ScalingAxis::from_threads_flag(threads),
                &chart.into_output("stacked.svg"),
            )?;
        }

        ReportCommand::Components {
            file_list,
            threads,
            expected,
            chart,
        } => {
            execute_components(ComponentsArgs {
                file_list,
                axis: ScalingAxis::from_threads_flag(threads),
                expected,
                chart: chart.into_output("components.svg"),
            })?;
        }

        ReportCommand::Scaling {
            file_lists,
            threads,
            labels,
            expected,
            nolog,
            chart,
        } => {
            execute_scaling(ScalingArgs {
                file_lists,
                labels,
                axis: ScalingAxis::from_threads_flag(threads),
                expected,
                log_y: !nolog,
                chart: chart.into_output("scaling.svg"),
            })?;
        }

        ReportCommand::Box {
            file_list,
            category,
            title,
            chart,
        } => {
            execute_report_box(ReportBoxArgs {
                file_list,
                category,
                title,
                chart: chart.into_output("report_box.svg"),
            })?;
        }

        ReportCommand::Dates {
            file_list,
            title,
            chart,
        } => {
            execute_dates(&file_list, title, &chart.into_output("dates.svg"))?;
        }

        ReportCommand::MemMpi {
            file_list,
            threads,
            chart,
        } => {
            execute_mem_mpi(
                &file_list,
                ScalingAxis::from_threads_flag(threads),
                &chart.into_output("mem_mpi.svg"),
            )?;
        }
    }

    Ok(())
}

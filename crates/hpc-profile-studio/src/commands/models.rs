use crate::sampling::{IndexWindow, MetricField, TimeCategory};
use crate::scaling::Scaling;
use crate::series::report::ReportTime;
use crate::series::sampling::Summary;
use crate::series::ScalingAxis;
use crate::utils::config::DEFAULT_BAR_YLABEL;
use std::path::PathBuf;

/// Destination and style of a rendered chart
///
/// **Public** - shared by every chart command
#[derive(Debug, Clone)]
pub struct ChartOutput {
    /// SVG output path (placed in artifacts/ when it has no directory)
    pub output: PathBuf,

    /// Optional TOML chart style file
    pub style: Option<PathBuf>,
}

impl ChartOutput {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: Option<PathBuf>) -> Self {
        self.style = style;
        self
    }
}

impl Default for ChartOutput {
    fn default() -> Self {
        Self::new("chart.svg")
    }
}

/// Arguments for the `value` command
#[derive(Debug, Clone, Default)]
pub struct ValueArgs {
    /// JSON document to read
    pub input: PathBuf,

    /// Ordered keys, one level each
    pub fields: Vec<String>,

    /// Also write the value as JSON to this file
    pub output: Option<PathBuf>,
}

/// Arguments for `map truncate`
#[derive(Debug, Clone, Default)]
pub struct TruncateArgs {
    pub input: PathBuf,

    /// First kept sample (inclusive)
    pub start: i64,

    /// Last kept sample (inclusive)
    pub end: i64,

    /// Output file (default: input name with `_trunc<start>-<end>`)
    pub output: Option<PathBuf>,
}

/// Arguments for `map csv`
#[derive(Debug, Clone)]
pub struct CsvArgs {
    pub input: PathBuf,

    /// Samples file; the field-name list is derived from it
    pub output: Option<PathBuf>,

    /// Metric field written for every sample
    pub field: MetricField,
}

impl Default for CsvArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            field: MetricField::Means,
        }
    }
}

/// One metric summarized per process or thread count
///
/// **Public** - used by `map bar` and `map min-max`
#[derive(Debug, Clone)]
pub struct ScaledMetricArgs {
    /// Text file listing the profiles, one per line
    pub file_list: PathBuf,

    /// Metric under `samples.metrics`
    pub metric: String,

    pub axis: ScalingAxis,

    /// Samples used for the summary
    pub window: IndexWindow,

    /// Average the means, or take the growth of the running sums
    pub summary: Summary,

    pub log_y: bool,

    pub y_label: String,

    pub chart: ChartOutput,
}

impl Default for ScaledMetricArgs {
    fn default() -> Self {
        Self {
            file_list: PathBuf::new(),
            metric: String::new(),
            axis: ScalingAxis::Processes,
            window: IndexWindow::all(),
            summary: Summary::Average,
            log_y: false,
            y_label: DEFAULT_BAR_YLABEL.to_string(),
            chart: ChartOutput::default(),
        }
    }
}

/// Arguments for `map bar`
#[derive(Debug, Clone, Default)]
pub struct MapBarArgs {
    pub scaled: ScaledMetricArgs,

    /// Draw a line instead of bars
    pub line: bool,

    /// Ideal scaling drawn next to the line
    pub expected: Option<Scaling>,
}

/// Arguments for `map compare`
#[derive(Debug, Clone, Default)]
pub struct CompareArgs {
    pub file_list: PathBuf,

    /// Metric or activity category
    pub metric: String,

    /// Y-axis label (defaults to the metric name)
    pub description: Option<String>,

    /// Key runs by process count, keeping one run per count
    pub deduplicate: bool,

    /// Put wall clock time on the x axis
    pub show_time: bool,

    pub chart: ChartOutput,
}

/// Arguments for `map panels`
#[derive(Debug, Clone, Default)]
pub struct PanelsArgs {
    pub file_list: PathBuf,

    pub metric: String,

    pub description: Option<String>,

    pub show_time: bool,

    /// Same x range on every panel
    pub shared_x: bool,

    /// Same y range on every panel
    pub shared_y: bool,

    pub chart: ChartOutput,
}

/// Arguments for `map metric`
#[derive(Debug, Clone)]
pub struct MetricArgs {
    pub input: PathBuf,

    pub metric: String,

    /// Fields drawn as separate lines
    pub fields: Vec<MetricField>,

    pub description: Option<String>,

    pub window: IndexWindow,

    pub chart: ChartOutput,
}

impl Default for MetricArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            metric: String::new(),
            fields: vec![MetricField::Means],
            description: None,
            window: IndexWindow::all(),
            chart: ChartOutput::default(),
        }
    }
}

/// Arguments for `map box`
#[derive(Debug, Clone)]
pub struct MapBoxArgs {
    pub file_list: PathBuf,
    pub category: TimeCategory,
    pub title: Option<String>,
    pub chart: ChartOutput,
}

impl Default for MapBoxArgs {
    fn default() -> Self {
        Self {
            file_list: PathBuf::new(),
            category: TimeCategory::Total,
            title: None,
            chart: ChartOutput::default(),
        }
    }
}

/// Arguments for `report bar`
#[derive(Debug, Clone)]
pub struct ReportBarArgs {
    pub file_list: PathBuf,

    /// Lines of `list, of, keys [: label]`
    pub metric_file: PathBuf,

    pub axis: ScalingAxis,

    pub y_label: String,

    pub chart: ChartOutput,
}

impl Default for ReportBarArgs {
    fn default() -> Self {
        Self {
            file_list: PathBuf::new(),
            metric_file: PathBuf::new(),
            axis: ScalingAxis::Processes,
            y_label: DEFAULT_BAR_YLABEL.to_string(),
            chart: ChartOutput::default(),
        }
    }
}

/// Arguments for `report components`
#[derive(Debug, Clone, Default)]
pub struct ComponentsArgs {
    pub file_list: PathBuf,
    pub axis: ScalingAxis,

    /// Ideal scalings drawn on the time panel
    pub expected: Vec<Scaling>,

    pub chart: ChartOutput,
}

/// Arguments for `report scaling`
#[derive(Debug, Clone)]
pub struct ScalingArgs {
    /// One file list per data set
    pub file_lists: Vec<PathBuf>,

    /// Legend labels, one per data set
    pub labels: Option<Vec<String>>,

    pub axis: ScalingAxis,

    /// Ideal scalings drawn from the first data set
    pub expected: Vec<Scaling>,

    pub log_y: bool,

    pub chart: ChartOutput,
}

impl Default for ScalingArgs {
    fn default() -> Self {
        Self {
            file_lists: Vec::new(),
            labels: None,
            axis: ScalingAxis::Processes,
            expected: vec![Scaling::LinearDecreasing],
            log_y: true,
            chart: ChartOutput::default(),
        }
    }
}

/// Arguments for `report box`
#[derive(Debug, Clone)]
pub struct ReportBoxArgs {
    pub file_list: PathBuf,
    pub category: ReportTime,
    pub title: Option<String>,
    pub chart: ChartOutput,
}

impl Default for ReportBoxArgs {
    fn default() -> Self {
        Self {
            file_list: PathBuf::new(),
            category: ReportTime::Total,
            title: None,
            chart: ChartOutput::default(),
        }
    }
}

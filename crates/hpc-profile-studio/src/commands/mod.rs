//! CLI command implementations.
//!
//! Each command group is implemented in its own module.
//! Commands orchestrate the library components: they load documents, build
//! data sets, assemble figures and write the results.

pub mod json;
pub mod map;
pub mod models;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use json::{execute_keys, execute_value};
pub use map::{
    execute_compare, execute_csv, execute_lustre, execute_map_bar, execute_map_box,
    execute_metric, execute_metrics, execute_min_max, execute_names, execute_panels,
    execute_timeline, execute_truncate,
};
pub use models::{
    ChartOutput, CompareArgs, ComponentsArgs, CsvArgs, MapBarArgs, MapBoxArgs, MetricArgs,
    PanelsArgs, ReportBarArgs, ReportBoxArgs, ScaledMetricArgs, ScalingArgs, TruncateArgs,
    ValueArgs,
};
pub use report::{
    execute_components, execute_dates, execute_mem_mpi, execute_report_bar, execute_report_box,
    execute_scaling, execute_stacked,
};

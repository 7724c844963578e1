//! Configuration and constants shared by the library and the CLI.

/// Default directory for chart outputs given without a directory component
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Default chart size in pixels
pub const DEFAULT_CHART_WIDTH: u32 = 1200;
pub const DEFAULT_CHART_HEIGHT: u32 = 700;

/// Indentation used when re-serializing a profile document
pub const JSON_INDENT: &[u8] = b"    ";

/// Base format of `info.start_time` in sampling profiles
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Length of a timestamp rendered with [`START_TIME_FORMAT`]
pub const START_TIME_BASE_LEN: usize = 19;

/// Format of the start date in performance reports (timezone note stripped)
pub const REPORT_DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

/// Axis labels of the run-time-by-date chart
pub const DATE_TICK_FORMAT: &str = "%b %d";

pub const MS_PER_SECOND: f64 = 1000.0;

/// Activity timeline read when no thread is named
pub const DEFAULT_ACTIVITY: &str = "main_thread";

// Activity category groups summed into one series
pub const CPU_CATEGORIES: &[&str] = &["normal_compute"];
pub const TOTAL_CPU_CATEGORIES: &[&str] = &["normal_compute", "openmp"];
pub const MPI_CATEGORIES: &[&str] = &[
    "collective_mpi",
    "collective_mpi_openmp",
    "point_to_point_mpi",
    "point_to_point_mpi_openmp",
];
pub const IO_CATEGORIES: &[&str] = &["io_reads", "io_reads_openmp", "io_writes", "io_writes_openmp"];
pub const ACCELERATOR_CATEGORIES: &[&str] = &["accelerator"];
pub const OPENMP_CATEGORIES: &[&str] = &["openmp"];
pub const SLEEP_CATEGORIES: &[&str] = &["sleep"];
pub const OPENMP_OVERHEAD_CATEGORIES: &[&str] =
    &["openmp_overhead_in_region", "openmp_overhead_no_region"];
pub const SYNCHRONISATION_CATEGORIES: &[&str] = &["synchronisation"];

/// Fields under `info` that only describe a complete run
pub const FULL_RUN_INFO_FIELDS: &[&str] = &["metrics"];

// Performance report breakdowns
pub const MPI_SUB_PERCENT_FIELDS: &[&str] = &["collectivePercent", "p2pPercent"];
pub const IO_SUB_PERCENT_FIELDS: &[&str] = &["readPercent", "writePercent"];

// Lustre metrics used for the approximate I/O integrals
pub const LUSTRE_READ_RATE: &str = "lustre_bytes_read";
pub const LUSTRE_READ_TOTAL: &str = "lustre_rchar_total";
pub const LUSTRE_WRITE_RATE: &str = "lustre_bytes_written";
pub const LUSTRE_WRITE_TOTAL: &str = "lustre_wchar_total";

pub const DEFAULT_BAR_YLABEL: &str = "Proportion of Time (%)";

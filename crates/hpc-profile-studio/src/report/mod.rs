//! Performance report exports (whole-run summaries).

pub mod view;

pub use view::{parse_start_date, PerfReport};

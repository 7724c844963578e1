//! Typed view over a performance report document.
//!
//! ```text
//! data.applicationDetails.processes.plain        process count
//! data.applicationDetails.ompNumThreads          threads per process
//! data.applicationDetails.nodes.plain            node count
//! data.applicationDetails.hostMemory.plain.value memory per node
//! data.applicationDetails.time.plain             run time (s)
//! data.applicationDetails.startDate.plain        start date
//! data.overview.{io,cpu,mpi}.percent             share of run time (%)
//! data.mpi.{collectivePercent,p2pPercent}        share of MPI time (%)
//! data.io.{readPercent,writePercent}             share of I/O time (%)
//! data.memory.mean                               mean memory per process
//! ```

use crate::json::{lookup, path_f64, path_u64, FieldPath};
use crate::utils::config::{IO_SUB_PERCENT_FIELDS, MPI_SUB_PERCENT_FIELDS, REPORT_DATE_FORMAT};
use crate::utils::error::{FieldError, ProfileError};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::path::Path;

fn details(keys: &[&str]) -> FieldPath {
    ["data", "applicationDetails"]
        .iter()
        .chain(keys.iter())
        .copied()
        .collect()
}

fn path(keys: &[&str]) -> FieldPath {
    FieldPath::from(keys)
}

/// Typed view over a performance report
#[derive(Debug, Clone, PartialEq)]
pub struct PerfReport {
    doc: Value,
}

impl PerfReport {
    pub fn new(doc: Value) -> Self {
        Self { doc }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        Ok(Self::new(crate::output::load_document(path)?))
    }

    pub fn document(&self) -> &Value {
        &self.doc
    }

    /// The `data.overview` subtree
    pub fn overview(&self) -> Result<&Value, FieldError> {
        lookup(&self.doc, &path(&["data", "overview"]))
    }

    pub fn num_processes(&self) -> Result<u64, FieldError> {
        path_u64(&self.doc, &details(&["processes", "plain"]))
    }

    pub fn num_threads(&self) -> Result<u64, FieldError> {
        path_u64(&self.doc, &details(&["ompNumThreads"]))
    }

    pub fn num_nodes(&self) -> Result<u64, FieldError> {
        path_u64(&self.doc, &details(&["nodes", "plain"]))
    }

    pub fn mem_per_node(&self) -> Result<f64, FieldError> {
        path_f64(&self.doc, &details(&["hostMemory", "plain", "value"]))
    }

    pub fn runtime_secs(&self) -> Result<f64, FieldError> {
        path_f64(&self.doc, &details(&["time", "plain"]))
    }

    /// Start date text as recorded, timezone note included
    pub fn start_date_text(&self) -> Result<&str, FieldError> {
        let path = details(&["startDate", "plain"]);
        lookup(&self.doc, &path)?
            .as_str()
            .ok_or_else(|| FieldError::WrongType {
                path: path.to_string(),
                expected: "a string",
            })
    }

    /// Parsed start date
    pub fn start_date(&self) -> Result<NaiveDateTime, ProfileError> {
        parse_start_date(self.start_date_text()?)
    }

    pub fn io_percent(&self) -> Result<f64, FieldError> {
        self.overview_percent("io")
    }

    pub fn cpu_percent(&self) -> Result<f64, FieldError> {
        self.overview_percent("cpu")
    }

    pub fn mpi_percent(&self) -> Result<f64, FieldError> {
        self.overview_percent("mpi")
    }

    pub fn io_time(&self) -> Result<f64, FieldError> {
        Ok(self.runtime_secs()? * self.io_percent()? / 100.0)
    }

    pub fn cpu_time(&self) -> Result<f64, FieldError> {
        Ok(self.runtime_secs()? * self.cpu_percent()? / 100.0)
    }

    pub fn mpi_time(&self) -> Result<f64, FieldError> {
        Ok(self.runtime_secs()? * self.mpi_percent()? / 100.0)
    }

    /// Collective and point-to-point shares of the MPI time
    pub fn mpi_sub_percent(&self) -> Result<Vec<f64>, FieldError> {
        self.sub_percent("mpi", MPI_SUB_PERCENT_FIELDS)
    }

    /// Read and write shares of the I/O time
    pub fn io_sub_percent(&self) -> Result<Vec<f64>, FieldError> {
        self.sub_percent("io", IO_SUB_PERCENT_FIELDS)
    }

    /// Mean memory used per process
    pub fn memory_mean(&self) -> Result<f64, FieldError> {
        path_f64(&self.doc, &path(&["data", "memory", "mean"]))
    }

    /// Memory used by all processes as a percentage of the node memory
    pub fn memory_percent(&self) -> Result<f64, FieldError> {
        let used = self.memory_mean()? * self.num_processes()? as f64 * 100.0;
        Ok(used / (self.mem_per_node()? * self.num_nodes()? as f64))
    }

    fn overview_percent(&self, section: &str) -> Result<f64, FieldError> {
        path_f64(&self.doc, &path(&["data", "overview", section, "percent"]))
    }

    fn sub_percent(&self, section: &str, fields: &[&str]) -> Result<Vec<f64>, FieldError> {
        fields
            .iter()
            .map(|field| path_f64(&self.doc, &path(&["data", section, field])))
            .collect()
    }
}

/// Parse a report start date such as `Tue Mar 01 2016 10:20:30 (GMT)`
///
/// The parenthesised timezone note, if any, is ignored.
pub fn parse_start_date(text: &str) -> Result<NaiveDateTime, ProfileError> {
    let base = match text.rfind('(') {
        Some(i) => &text[..i],
        None => text,
    };

    NaiveDateTime::parse_from_str(base.trim(), REPORT_DATE_FORMAT).map_err(|e| {
        ProfileError::InvalidInput(format!("Unparseable start date '{}': {}", text, e))
    })
}

//! Output writers for profile documents, sample tables and charts.
//!
//! This module handles reading and writing data on disk:
//! - JSON documents (4-space indented, sorted keys)
//! - Flat sample tables (CSV rows plus a field-name list)

pub mod csv;
pub mod json;

// Re-export main functions
pub use self::csv::{sample_table_paths, write_sample_table};
pub use self::json::{load_document, write_document};

use crate::utils::config::DEFAULT_ARTIFACTS_DIR;
use crate::utils::error::OutputError;
use log::debug;
use std::path::{Path, PathBuf};

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate `path` and create its parent directories if needed
pub fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// Place a bare file name under the artifacts directory
///
/// Paths that already carry a directory component are returned unchanged.
pub fn in_artifacts_dir(path: PathBuf) -> PathBuf {
    if path.parent().map(|p| p.as_os_str().is_empty()).unwrap_or(true) {
        PathBuf::from(DEFAULT_ARTIFACTS_DIR).join(path)
    } else {
        path
    }
}

/// Calculate file size in bytes
pub(crate) fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

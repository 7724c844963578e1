//! Flat sample table output.
//!
//! A sample table is a pair of files: one CSV row of samples per metric,
//! and a plain list naming the metric on each row.

use super::prepare_output_path;
use crate::utils::error::OutputError;
use log::info;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const SAMPLES_SUFFIX: &str = "_allsamples.txt";
const FIELD_NAMES_SUFFIX: &str = "_fieldnames.txt";

/// Derive the (samples, field names) output paths
///
/// **Public** - used by the `map csv` command
///
/// Without an explicit output the names come from the input file with its
/// extension replaced. With one, the samples go there and the field names
/// file is derived from it.
pub fn sample_table_paths(input: &Path, output: Option<&Path>) -> (PathBuf, PathBuf) {
    match output {
        None => {
            let stem = strip_extension(input);
            (
                PathBuf::from(format!("{}{}", stem, SAMPLES_SUFFIX)),
                PathBuf::from(format!("{}{}", stem, FIELD_NAMES_SUFFIX)),
            )
        }
        Some(out) => {
            let stem = strip_extension(out);
            (
                out.to_path_buf(),
                PathBuf::from(format!("{}{}", stem, FIELD_NAMES_SUFFIX)),
            )
        }
    }
}

/// Drop the text after the last dot of the file name, if any
fn strip_extension(path: &Path) -> String {
    let text = path.to_string_lossy();
    let name_start = text.rfind('/').map(|i| i + 1).unwrap_or(0);
    match text[name_start..].rfind('.') {
        Some(dot) if dot > 0 => text[..name_start + dot].to_string(),
        _ => text.to_string(),
    }
}

/// Write one CSV row per metric and the matching name list
///
/// **Public** - main entry point for sample table output
///
/// # Arguments
/// * `rows` - (metric name, samples) in output order
/// * `samples_path` - CSV destination
/// * `names_path` - Field-name list destination
pub fn write_sample_table(
    rows: &[(String, Vec<Value>)],
    samples_path: &Path,
    names_path: &Path,
) -> Result<(), OutputError> {
    prepare_output_path(samples_path)?;
    prepare_output_path(names_path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(samples_path)?;
    let mut names = BufWriter::new(File::create(names_path)?);

    for (name, samples) in rows {
        writeln!(names, "{}", name)?;
        writer.write_record(samples.iter().map(cell))?;
    }

    writer.flush()?;
    names.flush()?;

    info!("Written samples to {}", samples_path.display());
    info!("Written field names to {}", names_path.display());

    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

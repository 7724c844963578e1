//! JSON document reader and writer.
//!
//! Documents are kept as `serde_json::Value`, whose object map is ordered by
//! key, so everything written here comes out with sorted keys.

use super::{calculate_file_size, prepare_output_path};
use crate::utils::config::JSON_INDENT;
use crate::utils::error::{OutputError, ProfileError};
use log::{debug, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Read a JSON document from a file
///
/// **Public** - entry point for every command that reads a profile
///
/// # Errors
/// * `ProfileError::ReadFailed` - File cannot be opened
/// * `ProfileError::JsonError` - File is not valid JSON
pub fn load_document(input_path: impl AsRef<Path>) -> Result<Value, ProfileError> {
    let input_path = input_path.as_ref();

    debug!("Reading document from: {}", input_path.display());

    let file = File::open(input_path)?;
    let doc: Value = serde_json::from_reader(BufReader::new(file))?;

    Ok(doc)
}

/// Write a value to a JSON file, pretty printed with a 4-space indent
///
/// **Public** - used by truncation and the `value` command
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
pub fn write_document<T: Serialize + ?Sized>(
    doc: &T,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing JSON to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    doc.serialize(&mut serializer)?;
    writer.flush()?;

    info!(
        "JSON written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a value to a string with the same layout as [`write_document`]
pub fn document_to_string<T: Serialize + ?Sized>(doc: &T) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

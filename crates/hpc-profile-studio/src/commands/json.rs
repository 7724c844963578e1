//! Generic JSON inspection commands.

use crate::commands::models::ValueArgs;
use crate::json::{render_key_tree, resolve, FieldPath};
use crate::output::json::document_to_string;
use crate::output::{load_document, write_document};
use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::path::Path;

/// Print the key tree of a JSON document
///
/// **Public** - entry point for `keys`
///
/// # Arguments
/// * `input` - JSON file
/// * `level` - Deepest level shown (0 = top level only)
/// * `show_all` - Show every key, including each element of arrays of objects
pub fn execute_keys(input: &Path, level: usize, show_all: bool) -> Result<()> {
    let doc = load_document(input)
        .with_context(|| format!("Failed to load JSON from {}", input.display()))?;

    println!("{}", format!("Keys in {}", input.display()).bold());
    print!("{}", render_key_tree(&doc, level, show_all));
    Ok(())
}

/// Print the value at a field path and optionally save it
///
/// **Public** - entry point for `value`
///
/// A missing field prints `None`, the value is otherwise printed in the
/// same layout it would be written in.
///
/// # Example
/// ```ignore
/// execute_value(ValueArgs {
///     input: PathBuf::from("profile.json"),
///     fields: vec!["info".into(), "runtime".into()],
///     output: None,
/// })?;
/// ```
pub fn execute_value(args: ValueArgs) -> Result<()> {
    let doc = load_document(&args.input)
        .with_context(|| format!("Failed to load JSON from {}", args.input.display()))?;

    let path: FieldPath = args.fields.iter().map(String::as_str).collect();

    let Some(value) = resolve(&doc, &path) else {
        println!("None");
        return Ok(());
    };

    println!(
        "{}",
        document_to_string(value).context("Failed to format value")?
    );

    if let Some(output) = &args.output {
        write_document(value, output).context("Failed to write value")?;
        info!("✓ Value written to: {}", output.display());
    }

    Ok(())
}

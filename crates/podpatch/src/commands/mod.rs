//! Command implementations for the podpatch CLI
//!
//! Each command module handles file I/O and delegates to podpatch-merge or
//! podpatch-template for the actual work.

pub mod check;
pub mod merge;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;

/// Output encoding for merged documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Whether `path` names standard input.
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a document from a file, or from stdin for `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        return std::io::read_to_string(std::io::stdin()).context("Failed to read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write rendered output to a file, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

/// Serialize a value in the requested format, newline-terminated.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value)?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}

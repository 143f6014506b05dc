//! Merge command implementation

use super::{OutputFormat, is_stdin, read_input, render, write_output};
use anyhow::{Result, bail};
use podpatch_merge::{Node, merge_text};
use podpatch_template::merge_template_text;
use std::path::PathBuf;

pub struct MergeArgs {
    pub source: PathBuf,
    pub changes: PathBuf,
    pub format: OutputFormat,
    pub typed: bool,
    pub output: Option<PathBuf>,
}

pub fn execute(args: &MergeArgs) -> Result<()> {
    if is_stdin(&args.source) && is_stdin(&args.changes) {
        bail!("Only one of SOURCE and CHANGES can be read from stdin");
    }

    let source = read_input(&args.source)?;
    let changes = read_input(&args.changes)?;

    tracing::debug!(
        source = %args.source.display(),
        changes = %args.changes.display(),
        typed = args.typed,
        "Merging documents"
    );

    let rendered = if args.typed {
        let merged = merge_template_text(&source, &changes)?;
        render(&merged, args.format)?
    } else {
        let merged = merge_text(&source, &changes)?;
        render(&serde_json::Value::from(Node::Mapping(merged)), args.format)?
    };

    write_output(args.output.as_deref(), &rendered)
}

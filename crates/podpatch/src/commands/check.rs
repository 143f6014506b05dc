//! Check command implementation

use super::read_input;
use anyhow::Result;
use podpatch_template::PodTemplatePatch;
use std::path::Path;

pub fn execute(path: &Path, config: bool) -> Result<()> {
    let text = read_input(path)?;
    let patch = if config {
        PodTemplatePatch::from_config(&text)?
    } else {
        PodTemplatePatch::new(text)
    };

    let template = patch.validate()?;
    tracing::info!(containers = template.spec.containers.len(), "Template is valid");
    println!("ok");
    Ok(())
}

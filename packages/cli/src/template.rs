//! Day template files for the `diff` command

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use choreboard_core::DayTemplateItem;

/// Accepted on-disk shapes: a bare item list or `{"items": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateFile {
    Items(Vec<DayTemplateItem>),
    Wrapped { items: Vec<DayTemplateItem> },
}

pub fn parse_template(content: &str) -> Result<Vec<DayTemplateItem>> {
    let file: TemplateFile =
        serde_json::from_str(content).context("Template must be a JSON list of day template items")?;

    Ok(match file {
        TemplateFile::Items(items) | TemplateFile::Wrapped { items } => items,
    })
}

pub fn load_template(path: &Path) -> Result<Vec<DayTemplateItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    parse_template(&content)
}

//! Source command implementation

use cmp_config::{ConfigStore, ConfigValue, SourceConfig};
use colored::Colorize;
use serde_json::json;

use super::leaves;
use crate::error::Result;

/// Run the source command
pub fn run_source(store: &ConfigStore, name: &str, json: bool) -> Result<()> {
    let source = store.source_config(name)?;
    println!("{}", render_source(&source, json)?);
    Ok(())
}

pub fn render_source(source: &SourceConfig, json: bool) -> Result<String> {
    if json {
        let value = json!({
            "name": source.name,
            "option": source.option.to_json(),
            "trigger_characters": source.trigger_characters(),
            "keyword_pattern": source.keyword_pattern(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut lines = vec![format!("{} {}", "Source".bold(), source.name.cyan())];

    let mut options = Vec::new();
    leaves("", &ConfigValue::Table(source.option.as_table().clone()), &mut options);
    lines.push(format!("{}:", "Options".bold()));
    if options.is_empty() {
        lines.push(format!("  {}", "None".dimmed()));
    }
    for (path, leaf) in options {
        lines.push(format!("  {} = {}", path, leaf));
    }

    if let Some(characters) = source.trigger_characters() {
        lines.push(format!(
            "{}: {}",
            "Trigger characters".bold(),
            characters.join(" ")
        ));
    }
    if let Some(pattern) = source.keyword_pattern() {
        lines.push(format!("{}: {}", "Keyword pattern".bold(), pattern));
    }
    Ok(lines.join("\n"))
}

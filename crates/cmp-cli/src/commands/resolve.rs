//! Resolve command implementation

use cmp_config::{ConfigStore, ConfigValue};
use colored::Colorize;

use super::leaves;
use crate::error::Result;

/// Run the resolve command
pub fn run_resolve(store: &ConfigStore, json: bool) -> Result<()> {
    println!("{}", render_resolve(store, json)?);
    Ok(())
}

pub fn render_resolve(store: &ConfigStore, json: bool) -> Result<String> {
    let config = store.get();
    if json {
        return Ok(serde_json::to_string_pretty(&config.to_json())?);
    }

    let mut out = Vec::new();
    leaves("", &ConfigValue::Table(config.as_table().clone()), &mut out);
    if out.is_empty() {
        return Ok(format!("{}", "(empty configuration)".dimmed()));
    }
    Ok(out
        .into_iter()
        .map(|(path, leaf)| format!("{} = {}", path.cyan(), leaf))
        .collect::<Vec<_>>()
        .join("\n"))
}

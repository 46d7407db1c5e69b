//! Status command implementation

use cmp_config::{ConfigStore, ResolveMode};
use colored::Colorize;
use serde_json::json;

use crate::error::Result;

/// Run the status command
pub fn run_status(store: &ConfigStore, json: bool) -> Result<()> {
    println!("{}", render_status(store, json)?);
    Ok(())
}

pub fn render_status(store: &ConfigStore, json: bool) -> Result<String> {
    let plan = store.plan();
    let enabled = store.is_enabled();
    let native_menu = store.is_native_menu();

    if json {
        let layers: Vec<_> = plan
            .layers
            .iter()
            .map(|layer| json!({"layer": layer.key.to_string(), "revision": layer.revision}))
            .collect();
        let value = json!({
            "mode": plan.mode.name(),
            "enabled": enabled,
            "native_menu": native_menu,
            "layers": layers,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let context = match &plan.mode {
        ResolveMode::Onetime => String::new(),
        ResolveMode::Cmdline { kind } => format!(" ({})", kind),
        ResolveMode::Default { buffer, filetype } => {
            format!(" (buffer {}, filetype {:?})", buffer, filetype)
        }
    };
    let yes_no = |flag: bool| if flag { "yes".green() } else { "no".yellow() };

    let mut lines = vec![
        format!("{}", "Completion Config Status".bold()),
        String::new(),
        format!("{}:        {}{}", "Mode".dimmed(), plan.mode.name().cyan(), context),
        format!("{}:     {}", "Enabled".dimmed(), yes_no(enabled)),
        format!("{}: {}", "Native menu".dimmed(), yes_no(native_menu)),
        String::new(),
        format!("{}:", "Layers".bold()),
    ];
    for layer in &plan.layers {
        lines.push(format!(
            "  {} {} (revision {})",
            "+".green(),
            layer.key.to_string().cyan(),
            layer.revision
        ));
    }
    Ok(lines.join("\n"))
}

//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cmp_config::{BufferId, StaticContext};

/// Inspect how layered completion configuration resolves in a given context
#[derive(Parser, Debug)]
#[command(name = "cmp-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file holding the configuration layers
    #[arg(short, long, global = true, env = "CMP_CONFIG_LAYERS")]
    pub layers: Option<PathBuf>,

    /// Current buffer
    #[arg(long, global = true, default_value_t = 1)]
    pub buffer: BufferId,

    /// Filetype of the current buffer
    #[arg(long, global = true, default_value = "")]
    pub filetype: String,

    /// Simulate command-line mode of this type (":", "/", "?", ...)
    #[arg(long, global = true)]
    pub cmdline: Option<String>,

    /// Report a host mode where completion must stay off
    #[arg(long, global = true)]
    pub unsuitable: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Host snapshot described by the context flags
    pub fn context(&self) -> StaticContext {
        let context = StaticContext {
            cmdline: self.cmdline.clone(),
            suitable: true,
            buffer: self.buffer,
            filetype: self.filetype.clone(),
        };
        if self.unsuitable {
            context.unsuitable()
        } else {
            context
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved configuration
    Resolve {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration of one completion source
    ///
    /// Examples:
    ///   cmp-config source buffer
    ///   cmp-config --cmdline / source buffer --json
    Source {
        /// Source name as it appears in `sources`
        name: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the resolution mode, contributing layers and derived flags
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

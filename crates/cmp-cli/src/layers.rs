//! Layer file loading
//!
//! A layer file is a TOML document with one table per layer:
//!
//! ```toml
//! [global]
//! preselect = "item"
//!
//! [filetype.lua]
//! sources = [{ name = "nvim_lua" }]
//!
//! [buffer.3]
//! enabled = false
//!
//! [cmdline."/"]
//! sources = [{ name = "buffer" }]
//!
//! [onetime]
//! completion = { autocomplete = false }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use cmp_config::{BufferId, ConfigSchema, ConfigStore};
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Parsed layer file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerFile {
    #[serde(default)]
    pub global: Option<ConfigSchema>,

    #[serde(default)]
    pub filetype: BTreeMap<String, ConfigSchema>,

    /// Keyed by buffer id; TOML table keys are always strings
    #[serde(default)]
    pub buffer: BTreeMap<String, ConfigSchema>,

    #[serde(default)]
    pub cmdline: BTreeMap<String, ConfigSchema>,

    #[serde(default)]
    pub onetime: Option<ConfigSchema>,
}

impl LayerFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::user(format!("Cannot read layer file {}: {}", path.display(), e))
        })?;
        let file = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), layers = file.len(), "loaded layer file");
        Ok(file)
    }

    /// Number of layers the file defines
    pub fn len(&self) -> usize {
        usize::from(self.global.is_some())
            + self.filetype.len()
            + self.buffer.len()
            + self.cmdline.len()
            + usize::from(self.onetime.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every layer into `store`.
    ///
    /// # Errors
    ///
    /// Returns a user error if a `[buffer.<id>]` key is not an integer.
    pub fn apply(self, store: &mut ConfigStore) -> Result<()> {
        let buffers = self
            .buffer
            .into_iter()
            .map(|(key, schema)| {
                let id: BufferId = key.trim().parse().map_err(|_| {
                    CliError::user(format!("Invalid buffer id '{}' in layer file", key))
                })?;
                Ok((id, schema))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(global) = self.global {
            store.set_global(global);
        }
        for (name, schema) in self.filetype {
            store.set_filetype(schema, name);
        }
        for (id, schema) in buffers {
            store.set_buffer(schema, id);
        }
        for (kind, schema) in self.cmdline {
            store.set_cmdline(schema, kind);
        }
        if let Some(onetime) = self.onetime {
            store.set_onetime(onetime);
        }
        Ok(())
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::model::context::FieldAssignment;

/// Defaults for local runs. Flags and runner inputs always take precedence.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub github_token: Option<String>,
    pub organization: Option<String>,
    pub user: Option<String>,
    pub graphql_url: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl FileConfig {
    pub fn field_assignments(&self) -> Vec<FieldAssignment> {
        self.fields
            .iter()
            .map(|(name, value)| FieldAssignment::new(name, value))
            .collect()
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("add-to-project").join("config.toml"))
}

/// Load `explicit`, or the default config file if one exists.
pub fn load_config(explicit: Option<&Path>) -> Result<FileConfig> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(FileConfig::default()),
        },
    }
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

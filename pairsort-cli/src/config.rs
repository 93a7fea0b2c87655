/// Config file loading and creation for the pairsort CLI.
///
/// Config lives at ~/.config/pairsort/config.toml.
/// All fields are optional — CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct PairsortConfig {
    /// Item file used instead of the built-in questionnaire.
    pub items: Option<String>,
    /// Shuffle seed for a reproducible presentation order.
    pub seed: Option<u64>,
    /// Directory receiving the CSV exports.
    pub export_dir: Option<String>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# pairsort configuration
# All values here can be overridden by CLI flags.

# Item file (JSON array of {id, text, category}, or TOML with [[items]]).
# If not set, the built-in work-motivation questionnaire is used.
# items = \"/path/to/items.toml\"

# Shuffle seed. Leave unset for a fresh random order on every run.
# seed = 42

# Write ranking_details.csv and category_scores.csv here after each run.
# export_dir = \"/path/to/exports\"
";

/// Returns the default config path: ~/.config/pairsort/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("pairsort").join("config.toml")
}

pub fn parse_config(content: &str) -> Result<PairsortConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> PairsortConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config(&content)
                .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => PairsortConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}

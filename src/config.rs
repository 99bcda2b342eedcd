//! Application configuration, built once in `main` and passed down by
//! reference. There is deliberately no global config holder; everything that
//! needs a setting receives it explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// File probed in the working directory when no `--config` flag is given.
const DEFAULT_CONFIG_FILE: &str = "birthstats.toml";

/// Batch size used when neither the config file nor the CLI supplies one.
const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Override for the SQLite database location. When absent the database
    /// lives under the user's home directory.
    pub database: Option<PathBuf>,
    /// Records buffered per insert batch during import. A throughput knob,
    /// not a correctness one.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from `path` if given, otherwise from
    /// `birthstats.toml` in the working directory if it exists, otherwise
    /// fall back to defaults. An explicitly named file that is missing or
    /// malformed is an error; the implicit one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.exists() {
                    Self::from_file(implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_keys() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.database.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let config: Config =
            toml::from_str("database = \"/tmp/b.sqlite\"\nbatch_size = 50\n").unwrap();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.database.as_deref(), Some(Path::new("/tmp/b.sqlite")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("batchsize = 50\n").is_err());
    }
}

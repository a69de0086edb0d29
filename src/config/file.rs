//! Configuration file support for persistent settings.
//!
//! This module loads configuration from a TOML file located at
//! `~/.config/doku-du/config.toml` (or the platform-specific equivalent).
//! Configuration file values serve as defaults that can be overridden by CLI
//! arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! paths = ["~/volumes", "/srv/data"]
//!
//! [logging]
//! level = "debug"
//!
//! [scanning]
//! threads = 4
//!
//! [output]
//! json = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default paths to report on
    pub paths: Option<Vec<PathBuf>>,

    /// Logging options
    #[serde(default)]
    pub logging: FileLoggingConfig,

    /// Scanning options
    #[serde(default)]
    pub scanning: FileScanConfig,

    /// Output options
    #[serde(default)]
    pub output: FileOutputConfig,
}

/// Logging options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    /// Minimum level written to stderr (`"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`, `"off"`)
    pub level: Option<String>,
}

/// Scanning options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileScanConfig {
    /// Number of threads used to measure paths in parallel
    pub threads: Option<usize>,
}

/// Output options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileOutputConfig {
    /// Whether to print a JSON document instead of the human-readable summary
    pub json: Option<bool>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/doku-du/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    ///
    /// Returns `None` if the config directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("doku-du").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// contains invalid TOML or unexpected fields.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })
    }

    /// Configured paths with `~` expanded, if any are set.
    #[must_use]
    pub fn expanded_paths(&self) -> Option<Vec<PathBuf>> {
        self.paths
            .as_ref()
            .filter(|paths| !paths.is_empty())
            .map(|paths| paths.iter().map(|p| expand_tilde(p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_file_config() {
        let config = FileConfig::default();

        assert!(config.paths.is_none());
        assert!(config.logging.level.is_none());
        assert!(config.scanning.threads.is_none());
        assert!(config.output.json.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
paths = ["~/volumes", "/srv/data"]

[logging]
level = "debug"

[scanning]
threads = 4

[output]
json = true
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(
            config.paths,
            Some(vec![PathBuf::from("~/volumes"), PathBuf::from("/srv/data")])
        );
        assert_eq!(config.logging.level, Some("debug".to_string()));
        assert_eq!(config.scanning.threads, Some(4));
        assert_eq!(config.output.json, Some(true));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[logging]
level = "warn"
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert!(config.paths.is_none());
        assert_eq!(config.logging.level, Some("warn".to_string()));
        assert!(config.scanning.threads.is_none());
        assert!(config.output.json.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert!(config.paths.is_none());
    }

    #[test]
    fn test_malformed_config_errors() {
        let toml_content = r#"
[scanning]
threads = "many"
"#;
        assert!(toml::from_str::<FileConfig>(toml_content).is_err());
    }

    #[test]
    fn test_unknown_field_errors() {
        assert!(toml::from_str::<FileConfig>("dirs = [\"/tmp\"]").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "paths = [\"/srv\"]\n[output]\njson = true\n").unwrap();

        let config = FileConfig::load_from(&path).unwrap();
        assert_eq!(config.paths, Some(vec![PathBuf::from("/srv")]));
        assert_eq!(config.output.json, Some(true));
    }

    #[test]
    fn test_load_from_missing_file_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");

        let err = FileConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_config_path_returns_expected_suffix() {
        if let Some(p) = FileConfig::config_path() {
            assert!(p.ends_with(Path::new("doku-du").join("config.toml")));
        }
    }

    #[test]
    fn test_expanded_paths() {
        let config = FileConfig {
            paths: Some(vec![PathBuf::from("~/a"), PathBuf::from("/b")]),
            ..FileConfig::default()
        };

        let expanded = config.expanded_paths().unwrap();
        assert_eq!(expanded[1], PathBuf::from("/b"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded[0], home.join("a"));
        }

        let empty = FileConfig {
            paths: Some(vec![]),
            ..FileConfig::default()
        };
        assert!(empty.expanded_paths().is_none());
    }

    #[test]
    fn test_expand_tilde_with_home() {
        let expanded = expand_tilde(&PathBuf::from("~/Projects"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("Projects"));
        }
    }

    #[test]
    fn test_expand_tilde_bare() {
        let expanded = expand_tilde(&PathBuf::from("~"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home);
        }
    }

    #[test]
    fn test_expand_tilde_no_effect_on_non_tilde() {
        let relative = PathBuf::from("some/relative/path");
        assert_eq!(expand_tilde(&relative), relative);

        let absolute = PathBuf::from("/usr/local/bin");
        assert_eq!(expand_tilde(&absolute), absolute);
    }
}

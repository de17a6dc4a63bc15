//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treedraw/treedraw.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `TREEDRAW_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for treedraw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON file holding the tree and its settings
    pub data_file: PathBuf,
    /// Node count used by `random` when none is given
    pub random_tree_size: usize,
    /// Label of the root of a fresh tree
    pub default_root_value: String,
    /// Print `[#id]` after each node label
    pub show_ids: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            random_tree_size: 16,
            default_root_value: "root".into(),
            show_ids: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub random_tree_size: Option<usize>,
    pub default_root_value: Option<String>,
    pub show_ids: Option<bool>,
}

fn default_data_file() -> PathBuf {
    ProjectDirs::from("", "", "treedraw")
        .map(|dirs| dirs.data_dir().join("tree.json"))
        .unwrap_or_else(|| PathBuf::from("~/.treedraw/tree.json"))
}

/// Get the XDG config directory for treedraw.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treedraw").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treedraw.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input as is on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            random_tree_size: overlay.random_tree_size.unwrap_or(self.random_tree_size),
            default_root_value: overlay
                .default_root_value
                .clone()
                .unwrap_or_else(|| self.default_root_value.clone()),
            show_ids: overlay.show_ids.unwrap_or(self.show_ids),
        }
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, applied after the global one
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current, env_source())?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply TREEDRAW_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("default_root_value") {
            settings.default_root_value = val;
        }
        match config.get_int("random_tree_size") {
            Ok(val) => {
                settings.random_tree_size =
                    usize::try_from(val).map_err(|_| ApplicationError::Config {
                        message: format!("random_tree_size must not be negative: {val}"),
                    })?;
            }
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }
        match config.get_bool("show_ids") {
            Ok(val) => settings.show_ids = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.random_tree_size == 0 {
            return Err(ApplicationError::Config {
                message: "random_tree_size must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treedraw configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treedraw/treedraw.toml
#   Local:  file passed with --config
#   Env:    TREEDRAW_* environment variables (e.g. TREEDRAW_DATA_FILE)

# Where the tree is saved (~ and $VAR are expanded)
# data_file = "~/.local/share/treedraw/tree.json"

# Node count for `treedraw random` without an argument
# random_tree_size = 16

# Label of the root node of a new tree
# default_root_value = "root"

# Print node ids next to labels
# show_ids = true
"#
        .to_string()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("TREEDRAW").prefix_separator("_")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_source().source(Some(vars))
    }

    #[test]
    fn given_default_settings_when_created_then_has_expected_values() {
        let settings = Settings::default();
        assert!(settings.data_file.ends_with("tree.json"));
        assert_eq!(settings.random_tree_size, 16);
        assert_eq!(settings.default_root_value, "root");
        assert!(settings.show_ids);
    }

    #[test]
    fn given_overlay_when_merging_then_overlay_wins_only_where_set() {
        let base = Settings::default();
        let overlay = RawSettings {
            random_tree_size: Some(40),
            show_ids: Some(false),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.random_tree_size, 40);
        assert!(!merged.show_ids);
        assert_eq!(merged.data_file, base.data_file);
        assert_eq!(merged.default_root_value, "root");
    }

    #[test]
    fn given_env_vars_when_applying_overrides_then_replaces_values() {
        let env = env_from(&[
            ("TREEDRAW_DATA_FILE", "/tmp/elsewhere.json"),
            ("TREEDRAW_RANDOM_TREE_SIZE", "64"),
            ("TREEDRAW_SHOW_IDS", "false"),
            ("TREEDRAW_DEFAULT_ROOT_VALUE", "top"),
        ]);

        let settings = Settings::apply_env_overrides(Settings::default(), env).unwrap();

        assert_eq!(settings.data_file, PathBuf::from("/tmp/elsewhere.json"));
        assert_eq!(settings.random_tree_size, 64);
        assert!(!settings.show_ids);
        assert_eq!(settings.default_root_value, "top");
    }

    #[test]
    fn given_non_numeric_size_in_env_when_applying_overrides_then_errors() {
        let env = env_from(&[("TREEDRAW_RANDOM_TREE_SIZE", "lots")]);
        let result = Settings::apply_env_overrides(Settings::default(), env);
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_file: PathBuf::from("~/trees/tree.json"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.data_file.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_settings_when_rendering_toml_then_contains_every_key() {
        let toml = Settings::default().to_toml().unwrap();
        for key in ["data_file", "random_tree_size", "default_root_value", "show_ids"] {
            assert!(toml.contains(key), "missing {key} in {toml}");
        }
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.data_file.is_none());
    }
}

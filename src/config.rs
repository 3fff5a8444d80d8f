//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bintree/bintree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `BINTREE_*` prefix (`BINTREE_RANDOM__MAX=50`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::RandomSource;

/// Value range for randomly generated trees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RandomConfig {
    /// Smallest value drawn (inclusive)
    pub min: i64,
    /// Largest value drawn (inclusive)
    pub max: i64,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            min: RandomSource::DEFAULT_MIN,
            max: RandomSource::DEFAULT_MAX,
        }
    }
}

/// Unified configuration for bintree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Trees with more nodes are summarized instead of drawn
    pub display_limit: usize,
    /// Maximum node count for keyboard-built trees
    pub interactive_limit: usize,
    /// Print elapsed time after each action
    pub timings: bool,
    /// Random tree settings
    pub random: RandomConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_limit: 20,
            interactive_limit: 10,
            timings: true,
            random: RandomConfig::default(),
        }
    }
}

/// Get the XDG config directory for bintree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bintree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bintree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file (must exist if given)
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), config_file)
    }

    /// Load from explicit layers; `global` is skipped when missing.
    pub fn load_layers(
        global: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("display_limit", defaults.display_limit as i64)
            .map_err(config_err)?
            .set_default("interactive_limit", defaults.interactive_limit as i64)
            .map_err(config_err)?
            .set_default("timings", defaults.timings)
            .map_err(config_err)?
            .set_default("random.min", defaults.random.min)
            .map_err(config_err)?
            .set_default("random.max", defaults.random.max)
            .map_err(config_err)?;

        if let Some(global_path) = global {
            if global_path.exists() {
                builder = builder.add_source(
                    File::from(global_path)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("BINTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings no tree could be built with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.random.min > self.random.max {
            return Err(ApplicationError::Config {
                message: format!(
                    "random.min ({}) is greater than random.max ({})",
                    self.random.min, self.random.max
                ),
            });
        }
        if self.interactive_limit == 0 {
            return Err(ApplicationError::Config {
                message: "interactive_limit must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Serialize current settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize: {}", e),
        })
    }

    /// Commented config template with compiled defaults.
    pub fn template() -> String {
        r#"# bintree configuration
# Location: ~/.config/bintree/bintree.toml (or pass --config <file>)
# Environment overrides: BINTREE_DISPLAY_LIMIT, BINTREE_RANDOM__MAX, ...

# Trees with more nodes are summarized by their max value instead of drawn
display_limit = 20

# Maximum node count when building a tree from keyboard input
interactive_limit = 10

# Print elapsed time after each action
timings = true

[random]
# Inclusive value range for generated trees
min = 0
max = 1000
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_layers(None, None).unwrap();
        assert_eq!(settings.display_limit, 20);
        assert_eq!(settings.interactive_limit, 10);
        assert_eq!(settings.random, RandomConfig { min: 0, max: 1000 });
    }

    #[test]
    fn given_template_when_parsed_then_matches_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_inverted_range_when_validating_then_errors() {
        let settings = Settings {
            random: RandomConfig { min: 10, max: 1 },
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips() {
        let settings = Settings {
            display_limit: 5,
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::TidemarkError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Project-local config file, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tidemark.toml";

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub strict: bool,
    pub paths: PathsConfig,
    pub tokens: TokensConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Token source of truth (`.ts`/`.js` text, or a `.toml` manifest).
    pub source: PathBuf,
    /// Generated stylesheet, overwritten on every run.
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokensConfig {
    pub default_palette: String,
    pub default_shade: u16,
    pub fallback_hex: String,
    /// Dotted path to the focus-ring alias, e.g. `SEMANTIC.focus.ring`.
    pub focus_alias: String,
    pub dark_focus_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub light_property: String,
    pub dark_property: String,
    pub dark_selectors: Vec<String>,
}

impl Config {
    /// Load config: explicit path, else the first discovered file, else defaults.
    ///
    /// Whatever file is used is merged over the built-in defaults, so it only
    /// needs the keys it changes.
    pub fn load(explicit: Option<&Path>) -> Result<Self, TidemarkError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config");
                Self::from_file(&path)
            }
            None => {
                tracing::debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, TidemarkError> {
        let content = std::fs::read_to_string(path).map_err(|source| TidemarkError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
            .map_err(|e| TidemarkError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse a (possibly partial) config and merge it over the defaults.
    pub fn from_toml(content: &str) -> Result<Self, TidemarkError> {
        let mut merged: toml::Table =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| TidemarkError::Config(e.to_string()))?;
        let user: toml::Table =
            toml::from_str(content).map_err(|e| TidemarkError::Config(e.to_string()))?;
        merge_tables(&mut merged, user);

        let config: Config = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| TidemarkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the generator cannot work with.
    pub fn validate(&self) -> Result<(), TidemarkError> {
        if !tidemark_parse::is_hex_color(&self.tokens.fallback_hex) {
            return Err(TidemarkError::Config(format!(
                "tokens.fallback_hex '{}' is not a hex color",
                self.tokens.fallback_hex
            )));
        }
        if self.tokens.focus_alias.trim().is_empty() {
            return Err(TidemarkError::Config("tokens.focus_alias is empty".into()));
        }
        for (key, property) in [
            ("output.light_property", &self.output.light_property),
            ("output.dark_property", &self.output.dark_property),
        ] {
            if !property.starts_with("--") || property.len() < 3 {
                return Err(TidemarkError::Config(format!(
                    "{key} '{property}' is not a CSS custom property name"
                )));
            }
        }
        if self.output.light_property == self.output.dark_property {
            return Err(TidemarkError::Config(
                "output.light_property and output.dark_property must differ".into(),
            ));
        }
        Ok(())
    }

    /// `./tidemark.toml`, then the user config file.
    pub fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        Self::user_config_path().filter(|p| p.is_file())
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tidemark").map(|d| d.config_dir().join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Recursively overlay `overlay` onto `base`. Tables merge; everything else replaces.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

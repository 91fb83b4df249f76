//! TOML-based configuration for sqlweave.
//!
//! Supports a config file (sqlweave.toml) with environment variable expansion
//! in the dialect name.
//!
//! Example configuration:
//! ```toml
//! [compiler]
//! dialect = "${DB_ENGINE}"   # mysql, pgsql, sqlite, sqlsrv, ...
//! param_mode = "named"       # or "positional"
//! named_prefix = ":"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::dialect::default_registry;
use crate::sql::params::ParamMode;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Statement compiler configuration.
    pub compiler: CompilerSettings,
}

/// Statement compiler configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Engine name looked up in the dialect registry (supports ${ENV_VAR} expansion).
    pub dialect: String,

    /// Placeholder strategy.
    pub param_mode: ParamMode,

    /// Prefix of generated named placeholders.
    pub named_prefix: char,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            dialect: "mysql".to_string(),
            param_mode: ParamMode::Positional,
            named_prefix: ':',
        }
    }
}

impl CompilerSettings {
    /// Get the dialect name with environment variables expanded.
    pub fn resolved_dialect(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.dialect)
    }

    /// Check that the dialect is registered and the prefix is usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let dialect = self.resolved_dialect()?;
        if !default_registry().contains(&dialect) {
            return Err(SettingsError::UnsupportedDialect(dialect));
        }
        if self.named_prefix.is_alphanumeric() || self.named_prefix.is_whitespace() {
            return Err(SettingsError::InvalidConfig(format!(
                "named_prefix must be a punctuation character, got {:?}",
                self.named_prefix
            )));
        }
        Ok(())
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.compiler.validate()?;
        tracing::debug!(path = %path.display(), dialect = %settings.compiler.dialect, "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLWEAVE_CONFIG`
    /// 2. `./sqlweave.toml`
    /// 3. `~/.config/sqlweave/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        // Check environment variable first
        if let Ok(path) = env::var("SQLWEAVE_CONFIG") {
            return Self::from_file(&path);
        }

        // Check local directory
        let local_config = PathBuf::from("sqlweave.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sqlweave").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR (ends at non-alphanumeric/underscore)
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}

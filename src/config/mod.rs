//! Configuration module for sqlweave.
//!
//! Handles the compiler settings file and environment variables.

mod settings;

pub use settings::{expand_env_vars, CompilerSettings, Settings, SettingsError};

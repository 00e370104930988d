// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{CommandsConfig, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; templates are not parsed yet.
/// Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

pub fn load_from_str(contents: &str) -> Result<RawConfigFile> {
    let config: RawConfigFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the recommended entry point:
///
/// - Reads TOML.
/// - Applies defaults (`[config].shell`).
/// - Requires a `[commands.<kind>]` section for every operation kind.
/// - Parses every template and rejects placeholders the kind cannot provide,
///   so those mistakes surface at startup rather than per request.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<CommandsConfig> {
    let raw_config = load_from_path(&path)?;
    CommandsConfig::try_from(raw_config)
}

/// Default config location: `Unconv.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Unconv.toml")
}

// src/engine/mod.rs

//! Conversion orchestration.
//!
//! [`Converter`] is the instance API. The free functions below drive one
//! process-wide converter, for callers that want `load` once at startup and
//! convert from anywhere afterwards.

pub mod converter;

pub use converter::Converter;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config::CommandsConfig;
use crate::errors::Result;
use crate::staging::StagedFile;

static CONVERTER: LazyLock<Converter> = LazyLock::new(Converter::new);

/// Install the commands configuration for the process-wide converter.
///
/// Must be called before [`unconv`] or [`merge`]; calling again replaces the
/// configuration for later calls.
pub fn load(config: CommandsConfig) {
    CONVERTER.load(config);
}

/// Convert a staged file to PDF and return the new file's path.
pub async fn unconv(working_dir: &Path, file: &StagedFile) -> Result<PathBuf> {
    CONVERTER.unconv(working_dir, file).await
}

/// Merge PDF files into one and return the new file's path.
pub async fn merge(working_dir: &Path, files_paths: &[PathBuf]) -> Result<PathBuf> {
    CONVERTER.merge(working_dir, files_paths).await
}

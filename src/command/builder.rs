// src/command/builder.rs

//! Turns an operation kind plus request paths into a ready-to-run command.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::template::{Field, TemplateData, Value};
use crate::config::{CommandConfig, CommandsConfig};
use crate::errors::{Result, UnconvError};
use crate::staging::make_file_path;
use crate::types::OperationKind;

const RESULT_EXTENSION: &str = ".pdf";

/// Data for the conversion templates (`markdown`, `html`, `office`).
#[derive(Debug, Clone, Copy)]
pub struct ConversionData<'a> {
    pub file_path: &'a str,
    pub result_file_path: &'a str,
}

impl TemplateData for ConversionData<'_> {
    fn lookup(&self, field: Field) -> Option<Value<'_>> {
        match field {
            Field::FilePath => Some(Value::Str(self.file_path)),
            Field::ResultFilePath => Some(Value::Str(self.result_file_path)),
            Field::FilesPaths => None,
        }
    }
}

/// Data for the `merge` template.
#[derive(Debug, Clone, Copy)]
pub struct MergeData<'a> {
    pub files_paths: &'a [String],
    pub result_file_path: &'a str,
}

impl TemplateData for MergeData<'_> {
    fn lookup(&self, field: Field) -> Option<Value<'_>> {
        match field {
            Field::FilesPaths => Some(Value::List(self.files_paths)),
            Field::ResultFilePath => Some(Value::Str(self.result_file_path)),
            Field::FilePath => None,
        }
    }
}

/// A fully rendered command, ready for the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    pub kind: OperationKind,
    pub command: String,
    /// Where the command is expected to write its PDF.
    pub result_path: PathBuf,
    /// Timeout in seconds.
    pub timeout: u64,
}

/// Render the command converting `source_path` to a PDF inside `working_dir`.
///
/// Fails with `UnsupportedOperation` when `kind` is not a conversion kind.
pub fn build_conversion_command(
    config: &CommandsConfig,
    kind: OperationKind,
    source_path: &Path,
    working_dir: &Path,
) -> Result<RenderedCommand> {
    if !kind.is_conversion() {
        return Err(UnconvError::UnsupportedOperation(kind.to_string()));
    }
    let cmd = command_for(config, kind)?;

    let result_path = make_file_path(working_dir, RESULT_EXTENSION);
    let data = ConversionData {
        file_path: path_str(source_path)?,
        result_file_path: path_str(&result_path)?,
    };
    let command = cmd.template.render(&data)?;

    debug!(%kind, cmd = %command, timeout_secs = cmd.timeout, "rendered conversion command");

    Ok(RenderedCommand {
        kind,
        command,
        result_path,
        timeout: cmd.timeout,
    })
}

/// Render the command merging `source_paths` into one PDF inside
/// `working_dir`.
pub fn build_merge_command(
    config: &CommandsConfig,
    source_paths: &[PathBuf],
    working_dir: &Path,
) -> Result<RenderedCommand> {
    if source_paths.is_empty() {
        return Err(UnconvError::InvalidInput(
            "merge requires at least one file".to_string(),
        ));
    }
    let kind = OperationKind::Merge;
    let cmd = command_for(config, kind)?;

    let files_paths = source_paths
        .iter()
        .map(|p| path_str(p).map(str::to_string))
        .collect::<Result<Vec<_>>>()?;

    let result_path = make_file_path(working_dir, RESULT_EXTENSION);
    let data = MergeData {
        files_paths: &files_paths,
        result_file_path: path_str(&result_path)?,
    };
    let command = cmd.template.render(&data)?;

    debug!(
        %kind,
        cmd = %command,
        timeout_secs = cmd.timeout,
        files = files_paths.len(),
        "rendered merge command"
    );

    Ok(RenderedCommand {
        kind,
        command,
        result_path,
        timeout: cmd.timeout,
    })
}

fn command_for(config: &CommandsConfig, kind: OperationKind) -> Result<&CommandConfig> {
    config
        .command(kind)
        .ok_or_else(|| UnconvError::UnsupportedOperation(kind.to_string()))
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        UnconvError::InvalidInput(format!("path {path:?} is not valid UTF-8"))
    })
}

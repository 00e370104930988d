// src/engine/converter.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::command::{RenderedCommand, build_conversion_command, build_merge_command};
use crate::config::CommandsConfig;
use crate::errors::{Result, UnconvError};
use crate::exec::{ProcessObserver, Supervisor};
use crate::staging::StagedFile;
use crate::types::OperationKind;

/// Conversion entry point: owns the loaded configuration and hands rendered
/// commands to the [`Supervisor`].
///
/// Configuration is kept as an `Arc` snapshot. `load` swaps the snapshot;
/// calls already running keep the one they started with.
#[derive(Default)]
pub struct Converter {
    config: RwLock<Option<Arc<CommandsConfig>>>,
    observer: Option<Arc<dyn ProcessObserver>>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("loaded", &self.is_loaded())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with configuration already installed.
    pub fn with_config(config: CommandsConfig) -> Self {
        let converter = Self::new();
        converter.load(config);
        converter
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProcessObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Install `config` for every subsequent call.
    pub fn load(&self, config: CommandsConfig) {
        info!(shell = %config.shell(), "commands configuration loaded");
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(config));
    }

    pub fn is_loaded(&self) -> bool {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The configuration currently installed.
    pub fn snapshot(&self) -> Result<Arc<CommandsConfig>> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(UnconvError::NotLoaded)
    }

    /// Render, without running, the command that would convert `file`.
    pub fn plan_unconv(&self, working_dir: &Path, file: &StagedFile) -> Result<RenderedCommand> {
        let config = self.snapshot()?;
        let kind = conversion_kind(file)?;
        build_conversion_command(&config, kind, &file.path, working_dir)
    }

    /// Render, without running, the command that would merge `files_paths`.
    pub fn plan_merge(&self, working_dir: &Path, files_paths: &[PathBuf]) -> Result<RenderedCommand> {
        let config = self.snapshot()?;
        build_merge_command(&config, files_paths, working_dir)
    }

    /// Convert a staged file to PDF and return the new file's path.
    pub async fn unconv(&self, working_dir: &Path, file: &StagedFile) -> Result<PathBuf> {
        let config = self.snapshot()?;
        let kind = conversion_kind(file)?;

        debug!(%kind, file = ?file.path, "converting file to PDF");
        let rendered = build_conversion_command(&config, kind, &file.path, working_dir)?;
        self.run(&config, rendered).await
    }

    /// Merge PDF files into a single PDF and return the new file's path.
    pub async fn merge(&self, working_dir: &Path, files_paths: &[PathBuf]) -> Result<PathBuf> {
        let config = self.snapshot()?;

        debug!(files = files_paths.len(), "merging PDF files");
        let rendered = build_merge_command(&config, files_paths, working_dir)?;
        self.run(&config, rendered).await
    }

    async fn run(&self, config: &CommandsConfig, rendered: RenderedCommand) -> Result<PathBuf> {
        self.supervisor(config)
            .execute(&rendered.command, rendered.timeout)
            .await?;
        Ok(rendered.result_path)
    }

    fn supervisor(&self, config: &CommandsConfig) -> Supervisor {
        let supervisor = Supervisor::new().with_shell(config.shell());
        match &self.observer {
            Some(observer) => supervisor.with_observer(Arc::clone(observer)),
            None => supervisor,
        }
    }
}

fn conversion_kind(file: &StagedFile) -> Result<OperationKind> {
    file.file_type
        .conversion_kind()
        .ok_or_else(|| UnconvError::UnsupportedOperation(file.file_type.to_string()))
}

// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod staging;
pub mod types;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::{CliArgs, CliCommand};
use crate::command::RenderedCommand;
use crate::config::load_and_validate;

pub use crate::engine::{Converter, load, merge, unconv};
pub use crate::errors::UnconvError;
pub use crate::staging::{FileType, StagedFile};
pub use crate::types::OperationKind;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the config, installs it, then runs (or, with
/// `--dry-run`, only renders) the requested conversion or merge. The result
/// path is printed on stdout.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)
        .with_context(|| format!("loading config {:?}", args.config))?;
    let converter = Converter::with_config(cfg);

    if args.dry_run {
        let rendered = match &args.command {
            CliCommand::Convert { file, working_dir } => {
                converter.plan_unconv(working_dir, &StagedFile::new(file))?
            }
            CliCommand::Merge { files, working_dir } => {
                converter.plan_merge(working_dir, files)?
            }
        };
        print_dry_run(&rendered);
        return Ok(());
    }

    let result = match &args.command {
        CliCommand::Convert { file, working_dir } => {
            converter.unconv(working_dir, &StagedFile::new(file)).await?
        }
        CliCommand::Merge { files, working_dir } => converter.merge(working_dir, files).await?,
    };

    println!("{}", result.display());
    Ok(())
}

fn print_dry_run(rendered: &RenderedCommand) {
    println!("unconv dry-run");
    println!("  kind:    {}", rendered.kind);
    println!("  timeout: {}s", rendered.timeout);
    println!("  result:  {}", rendered.result_path.display());
    println!("  cmd:     {}", rendered.command);

    debug!("dry-run complete (no execution)");
}

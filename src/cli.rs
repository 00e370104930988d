// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `unconv`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "unconv",
    version,
    about = "Convert documents to PDF and merge PDFs through configured external tools.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the commands config file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `UNCONV_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the rendered command instead of running it.
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Convert a Markdown, HTML or Office file to PDF.
    Convert {
        /// File to convert; its type is detected from the extension.
        file: PathBuf,

        /// Directory the resulting PDF is written to.
        #[arg(long, value_name = "DIR", default_value = ".")]
        working_dir: PathBuf,
    },

    /// Merge PDF files into one.
    Merge {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Directory the resulting PDF is written to.
        #[arg(long, value_name = "DIR", default_value = ".")]
        working_dir: PathBuf,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

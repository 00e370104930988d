// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::command::CommandTemplate;
use crate::exec::DEFAULT_SHELL;
use crate::types::OperationKind;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// shell = "sh"
///
/// [commands.markdown]
/// template = "pandoc {{ .FilePath }} -o {{ .ResultFilePath }}"
/// timeout = 30
///
/// [commands.merge]
/// template = "pdftk {{ range $p := .FilesPaths }} {{ $p }} {{ end }} cat output {{ .ResultFilePath }}"
/// timeout = 30
/// ```
///
/// This is the unvalidated shape; templates are still plain strings. Use
/// [`CommandsConfig::try_from`] (or the loader) to get a usable config.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// One entry per operation kind, keyed by `markdown`, `html`, `office`
    /// and `merge`. All four are required.
    #[serde(default)]
    pub commands: BTreeMap<String, RawCommandConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Program used to interpret rendered commands (invoked with `-c`).
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            shell: default_shell(),
        }
    }
}

/// `[commands.<kind>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCommandConfig {
    pub template: String,

    /// Hard wall-clock limit, in seconds.
    pub timeout: u64,
}

/// A validated command: parsed template plus its timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    pub template: CommandTemplate,
    pub timeout: u64,
}

/// Validated configuration for every operation kind.
///
/// Only constructed through validation, so every kind is present and every
/// template references placeholders valid for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandsConfig {
    shell: String,
    commands: BTreeMap<OperationKind, CommandConfig>,
}

impl CommandsConfig {
    pub(crate) fn new_unchecked(
        shell: String,
        commands: BTreeMap<OperationKind, CommandConfig>,
    ) -> Self {
        Self { shell, commands }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn command(&self, kind: OperationKind) -> Option<&CommandConfig> {
        self.commands.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperationKind, &CommandConfig)> {
        self.commands.iter().map(|(kind, cmd)| (*kind, cmd))
    }
}

// src/config/validate.rs

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::command::{CommandTemplate, Field};
use crate::config::model::{CommandConfig, CommandsConfig, RawConfigFile};
use crate::errors::{Result, UnconvError};
use crate::types::OperationKind;

impl TryFrom<RawConfigFile> for CommandsConfig {
    type Error = UnconvError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_shell(&raw)?;
        validate_sections(&raw)?;

        let mut commands = BTreeMap::new();
        for kind in OperationKind::ALL {
            let cmd = raw.commands.get(kind.as_str()).ok_or_else(|| {
                UnconvError::ConfigError(format!("missing [commands.{kind}] section"))
            })?;

            let template = CommandTemplate::parse(&cmd.template).map_err(|e| {
                UnconvError::ConfigError(format!("[commands.{kind}].template: {e}"))
            })?;
            validate_placeholders(kind, &template)?;

            commands.insert(
                kind,
                CommandConfig {
                    template,
                    timeout: cmd.timeout,
                },
            );
        }

        Ok(CommandsConfig::new_unchecked(raw.config.shell, commands))
    }
}

/// Placeholders each operation kind is rendered with.
pub fn allowed_fields(kind: OperationKind) -> BTreeSet<Field> {
    let input = if kind.is_conversion() {
        Field::FilePath
    } else {
        Field::FilesPaths
    };
    BTreeSet::from([input, Field::ResultFilePath])
}

fn validate_shell(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.shell.trim().is_empty() {
        return Err(UnconvError::ConfigError(
            "[config].shell must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_sections(cfg: &RawConfigFile) -> Result<()> {
    for name in cfg.commands.keys() {
        if !OperationKind::ALL.iter().any(|kind| kind.as_str() == name) {
            return Err(UnconvError::ConfigError(format!(
                "unknown section [commands.{name}] (expected markdown, html, office or merge)"
            )));
        }
    }
    Ok(())
}

fn validate_placeholders(kind: OperationKind, template: &CommandTemplate) -> Result<()> {
    let allowed = allowed_fields(kind);
    let used = template.fields();

    if let Some(field) = used.difference(&allowed).next() {
        return Err(UnconvError::ConfigError(format!(
            "[commands.{kind}].template references {field}, which is not available for {kind} commands"
        )));
    }

    if !used.contains(&Field::ResultFilePath) {
        warn!(
            %kind,
            template = %template,
            "command template never references .ResultFilePath; no output file will be known to it"
        );
    }

    Ok(())
}

#![allow(dead_code)]

use std::collections::BTreeMap;

use unconv::config::{CommandsConfig, ConfigSection, RawCommandConfig, RawConfigFile};
use unconv::OperationKind;

/// Builder for `CommandsConfig` to simplify test setup.
///
/// Starts with harmless defaults for every kind (copy the input for
/// conversions, concatenate the inputs for merge), each with a 30s timeout.
pub struct CommandsConfigBuilder {
    config: RawConfigFile,
}

pub const COPY_TEMPLATE: &str = "cp {{ .FilePath }} {{ .ResultFilePath }}";
pub const CONCAT_TEMPLATE: &str =
    "cat {{ range $p := .FilesPaths }} {{ $p }}{{ end }} > {{ .ResultFilePath }}";

impl CommandsConfigBuilder {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        for kind in OperationKind::ALL {
            let template = if kind.is_conversion() {
                COPY_TEMPLATE
            } else {
                CONCAT_TEMPLATE
            };
            commands.insert(
                kind.as_str().to_string(),
                RawCommandConfig {
                    template: template.to_string(),
                    timeout: 30,
                },
            );
        }

        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                commands,
            },
        }
    }

    pub fn with_command(mut self, kind: OperationKind, template: &str, timeout: u64) -> Self {
        self.config.commands.insert(
            kind.as_str().to_string(),
            RawCommandConfig {
                template: template.to_string(),
                timeout,
            },
        );
        self
    }

    pub fn with_timeout(mut self, kind: OperationKind, timeout: u64) -> Self {
        if let Some(cmd) = self.config.commands.get_mut(kind.as_str()) {
            cmd.timeout = timeout;
        }
        self
    }

    pub fn with_shell(mut self, shell: &str) -> Self {
        self.config.config.shell = shell.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> CommandsConfig {
        CommandsConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for CommandsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

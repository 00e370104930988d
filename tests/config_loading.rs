use std::error::Error;
use std::io::Write;

use tempfile::NamedTempFile;
use unconv::OperationKind;
use unconv::config::{CommandsConfig, load_and_validate, load_from_str};
use unconv::errors::UnconvError;
use unconv_test_utils::builders::CommandsConfigBuilder;

type TestResult = Result<(), Box<dyn Error>>;

const FULL_CONFIG: &str = r#"
[commands.markdown]
template = "pandoc {{ .FilePath }} -o {{ .ResultFilePath }}"
timeout = 30

[commands.html]
template = "wkhtmltopdf {{ .FilePath }} {{ .ResultFilePath }}"
timeout = 20

[commands.office]
template = "unoconv --format pdf --output \"{{ .ResultFilePath }}\" \"{{ .FilePath }}\""
timeout = 60

[commands.merge]
template = "pdftk {{ range $p := .FilesPaths }} {{ $p }} {{ end }} cat output {{ .ResultFilePath }}"
timeout = 10
"#;

fn write_config(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{contents}")?;
    Ok(file)
}

fn expect_config_error(contents: &str) -> String {
    let file = write_config(contents).unwrap();
    match load_and_validate(file.path()) {
        Err(UnconvError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn full_config_loads_every_kind() -> TestResult {
    let file = write_config(FULL_CONFIG)?;
    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.shell(), "sh");

    let timeouts: Vec<(OperationKind, u64)> =
        cfg.iter().map(|(kind, cmd)| (kind, cmd.timeout)).collect();
    assert_eq!(
        timeouts,
        vec![
            (OperationKind::Markdown, 30),
            (OperationKind::Html, 20),
            (OperationKind::Office, 60),
            (OperationKind::Merge, 10),
        ]
    );

    let markdown = cfg.command(OperationKind::Markdown).unwrap();
    assert_eq!(
        markdown.template.source(),
        "pandoc {{ .FilePath }} -o {{ .ResultFilePath }}"
    );
    Ok(())
}

#[test]
fn shell_can_be_overridden() -> TestResult {
    let cfg = load_from_str(&format!("[config]\nshell = \"bash\"\n{FULL_CONFIG}"))?;
    assert_eq!(cfg.config.shell, "bash");
    Ok(())
}

#[test]
fn missing_section_is_a_config_error() {
    let without_merge = FULL_CONFIG
        .split("[commands.merge]")
        .next()
        .unwrap()
        .to_string();

    let msg = expect_config_error(&without_merge);
    assert!(msg.contains("missing [commands.merge]"), "{msg}");
}

#[test]
fn unknown_section_is_a_config_error() {
    let msg = expect_config_error(&format!(
        "{FULL_CONFIG}\n[commands.latex]\ntemplate = \"echo\"\ntimeout = 1\n"
    ));
    assert!(msg.contains("[commands.latex]"), "{msg}");
}

#[test]
fn merge_placeholder_in_conversion_template_is_rejected_at_load() {
    let contents = FULL_CONFIG.replace(
        "wkhtmltopdf {{ .FilePath }}",
        "wkhtmltopdf {{ .FilesPaths }}",
    );

    let msg = expect_config_error(&contents);
    assert!(msg.contains("[commands.html]"), "{msg}");
    assert!(msg.contains(".FilesPaths"), "{msg}");
}

#[test]
fn conversion_placeholder_in_merge_template_is_rejected_at_load() {
    let contents = FULL_CONFIG.replace("cat output {{ .ResultFilePath }}", "cat output {{ .FilePath }}");

    let msg = expect_config_error(&contents);
    assert!(msg.contains("[commands.merge]"), "{msg}");
    assert!(msg.contains(".FilePath"), "{msg}");
}

#[test]
fn malformed_template_is_rejected_at_load() {
    let contents = FULL_CONFIG.replace("-o {{ .ResultFilePath }}", "-o {{ .ResultPath }}");

    let msg = expect_config_error(&contents);
    assert!(msg.contains("[commands.markdown].template"), "{msg}");
    assert!(msg.contains("unknown placeholder '.ResultPath'"), "{msg}");
}

#[test]
fn empty_shell_is_rejected() {
    let msg = expect_config_error(&format!("[config]\nshell = \"  \"\n{FULL_CONFIG}"));
    assert!(msg.contains("shell"), "{msg}");
}

#[test]
fn validation_applies_to_configs_built_in_code() {
    let blank_shell = CommandsConfigBuilder::new().with_shell("").raw();
    assert!(matches!(
        CommandsConfig::try_from(blank_shell),
        Err(UnconvError::ConfigError(_))
    ));

    let wrong_placeholder = CommandsConfigBuilder::new()
        .with_command(OperationKind::Html, "wkhtmltopdf {{ .FilesPaths }} out.pdf", 5)
        .raw();
    match CommandsConfig::try_from(wrong_placeholder) {
        Err(UnconvError::ConfigError(msg)) => assert!(msg.contains("html"), "{msg}"),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }

    let custom_shell = CommandsConfigBuilder::new().with_shell("bash").build();
    assert_eq!(custom_shell.shell(), "bash");
}

#[test]
fn negative_timeout_fails_deserialization() -> TestResult {
    let file = write_config(&FULL_CONFIG.replace("timeout = 10", "timeout = -1"))?;
    assert!(matches!(
        load_and_validate(file.path()),
        Err(UnconvError::TomlError(_))
    ));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_and_validate("/definitely/not/here/Unconv.toml"),
        Err(UnconvError::IoError(_))
    ));
}

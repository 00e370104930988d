#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use unconv::errors::UnconvError;
use unconv::{Converter, FileType, OperationKind, StagedFile};
use unconv_test_utils::builders::CommandsConfigBuilder;
use unconv_test_utils::observer::RecordingObserver;
use unconv_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn stage(dir: &Path, name: &str, contents: &str) -> Result<StagedFile, Box<dyn Error>> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(StagedFile::new(path))
}

fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn every_convertible_type_produces_a_pdf() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let converter = Converter::with_config(CommandsConfigBuilder::new().build());

    for (name, file_type) in [
        ("file.md", FileType::Markdown),
        ("file.html", FileType::Html),
        ("file.docx", FileType::Office),
    ] {
        let file = stage(dir.path(), name, name)?;
        assert_eq!(file.file_type, file_type);

        let result = with_timeout(converter.unconv(dir.path(), &file)).await?;

        assert_eq!(result.parent(), Some(dir.path()));
        assert_eq!(result.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(fs::read_to_string(&result)?, name);
    }
    Ok(())
}

#[tokio::test]
async fn externally_detected_type_overrides_the_extension() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("upload.bin");
    fs::write(&path, "# sniffed as markdown")?;
    assert_eq!(StagedFile::new(&path).file_type, FileType::Unknown);

    let file = StagedFile::with_type(&path, FileType::Markdown);
    let converter = Converter::with_config(CommandsConfigBuilder::new().build());
    let result = with_timeout(converter.unconv(dir.path(), &file)).await?;

    assert_eq!(fs::read_to_string(&result)?, "# sniffed as markdown");
    Ok(())
}

#[tokio::test]
async fn pdf_input_is_unsupported_and_touches_nothing() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let observer = Arc::new(RecordingObserver::new());
    let converter =
        Converter::with_config(CommandsConfigBuilder::new().build()).with_observer(observer.clone());

    let file = stage(dir.path(), "file.pdf", "%PDF-1.4")?;
    let before = entries(dir.path());

    let result = converter.unconv(dir.path(), &file).await;

    match result {
        Err(UnconvError::UnsupportedOperation(ty)) => assert_eq!(ty, "pdf"),
        other => panic!("expected UnsupportedOperation, got {other:?}"),
    }
    assert_eq!(entries(dir.path()), before);
    assert!(observer.transitions().is_empty(), "no process may be started");
    Ok(())
}

#[tokio::test]
async fn converting_before_load_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let converter = Converter::new();
    let file = stage(dir.path(), "file.md", "# hi")?;

    assert!(!converter.is_loaded());
    assert!(matches!(
        converter.unconv(dir.path(), &file).await,
        Err(UnconvError::NotLoaded)
    ));
    assert!(matches!(
        converter.merge(dir.path(), &[file.path.clone()]).await,
        Err(UnconvError::NotLoaded)
    ));
    Ok(())
}

#[tokio::test]
async fn latest_load_wins() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let file = stage(dir.path(), "file.md", "# hi")?;

    let converter = Converter::with_config(
        CommandsConfigBuilder::new()
            .with_command(OperationKind::Markdown, "printf first > {{ .ResultFilePath }}", 30)
            .build(),
    );
    let first = with_timeout(converter.unconv(dir.path(), &file)).await?;
    assert_eq!(fs::read_to_string(first)?, "first");

    converter.load(
        CommandsConfigBuilder::new()
            .with_command(OperationKind::Markdown, "printf second > {{ .ResultFilePath }}", 30)
            .build(),
    );
    let second = with_timeout(converter.unconv(dir.path(), &file)).await?;
    assert_eq!(fs::read_to_string(second)?, "second");
    Ok(())
}

#[tokio::test]
async fn conversion_timeout_is_reported_as_timeout() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let converter = Converter::with_config(
        CommandsConfigBuilder::new()
            .with_command(
                OperationKind::Office,
                "sleep 5; cp {{ .FilePath }} {{ .ResultFilePath }}",
                0,
            )
            .build(),
    );
    let file = stage(dir.path(), "file.docx", "docx")?;

    let err = with_timeout(converter.unconv(dir.path(), &file))
        .await
        .unwrap_err();

    assert!(matches!(err, UnconvError::Timeout { timeout: 0, .. }), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn failing_tool_is_an_execution_error() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let converter = Converter::with_config(
        CommandsConfigBuilder::new()
            .with_command(
                OperationKind::Html,
                "false {{ .FilePath }} {{ .ResultFilePath }}",
                30,
            )
            .build(),
    );
    let file = stage(dir.path(), "page.html", "<p>hi</p>")?;

    let result = with_timeout(converter.unconv(dir.path(), &file)).await;
    assert!(matches!(result, Err(UnconvError::Execution { .. })), "got {result:?}");
    Ok(())
}

#[tokio::test]
async fn merge_concatenates_inputs_in_order() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let converter = Converter::with_config(CommandsConfigBuilder::new().build());

    let one = stage(dir.path(), "one.pdf", "one\n")?.path;
    let two = stage(dir.path(), "two.pdf", "two\n")?.path;

    let result = with_timeout(converter.merge(dir.path(), &[one, two])).await?;

    assert_eq!(result.extension().and_then(|e| e.to_str()), Some("pdf"));
    assert_eq!(fs::read_to_string(result)?, "one\ntwo\n");
    Ok(())
}

#[tokio::test]
async fn merge_timeout_is_a_timeout_not_a_template_failure() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let converter = Converter::with_config(
        CommandsConfigBuilder::new()
            .with_command(
                OperationKind::Merge,
                "sleep 5; cat {{ range $p := .FilesPaths }} {{ $p }}{{ end }} > {{ .ResultFilePath }}",
                0,
            )
            .build(),
    );

    let one = stage(dir.path(), "one.pdf", "one")?.path;
    let two = stage(dir.path(), "two.pdf", "two")?.path;
    let files = [one.clone(), two.clone()];

    // The template itself renders fine.
    let planned = converter.plan_merge(dir.path(), &files)?;
    assert!(planned.command.contains(one.to_str().unwrap()));

    match with_timeout(converter.merge(dir.path(), &files)).await {
        Err(UnconvError::Timeout { command, timeout }) => {
            assert_eq!(timeout, 0);
            assert!(command.contains(one.to_str().unwrap()));
            assert!(command.contains(two.to_str().unwrap()));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn empty_merge_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let converter = Converter::with_config(CommandsConfigBuilder::new().build());
    let none: Vec<PathBuf> = Vec::new();

    let err = converter.merge(dir.path(), &none).await.unwrap_err();
    assert!(matches!(err, UnconvError::InvalidInput(_)));
    assert!(err.is_client_error());
    Ok(())
}

#[test]
fn markdown_plan_substitutes_both_paths() -> TestResult {
    let converter = Converter::with_config(
        CommandsConfigBuilder::new()
            .with_command(
                OperationKind::Markdown,
                "pandoc {{.FilePath}} -o {{.ResultFilePath}}",
                30,
            )
            .build(),
    );
    let working_dir = Path::new("/work");
    let file = StagedFile::new("/work/file.md");

    let rendered = converter.plan_unconv(working_dir, &file)?;

    assert_eq!(rendered.kind, OperationKind::Markdown);
    assert_eq!(rendered.timeout, 30);
    assert!(rendered.result_path.starts_with(working_dir));
    assert_eq!(
        rendered.result_path.extension().and_then(|e| e.to_str()),
        Some("pdf")
    );
    assert_eq!(
        rendered.command,
        format!("pandoc /work/file.md -o {}", rendered.result_path.display())
    );
    Ok(())
}

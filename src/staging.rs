// src/staging.rs

//! The thin slice of file staging the conversion core depends on.
//!
//! Uploaded bytes are written to a working directory by the caller; this
//! module only knows how to describe an already-staged file (its path and
//! detected type) and how to pick a fresh path for a command's output.

use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::types::OperationKind;

/// Logical type of a staged file, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Markdown,
    Html,
    Office,
    Pdf,
    Unknown,
}

const OFFICE_EXTENSIONS: &[&str] = &[
    "doc", "docx", "odt", "rtf", "txt", "xls", "xlsx", "ods", "ppt", "pptx", "odp",
];

impl FileType {
    pub fn from_path(path: &Path) -> Self {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_ascii_lowercase(),
            None => return FileType::Unknown,
        };

        match ext.as_str() {
            "md" | "markdown" => FileType::Markdown,
            "html" | "htm" => FileType::Html,
            "pdf" => FileType::Pdf,
            e if OFFICE_EXTENSIONS.contains(&e) => FileType::Office,
            _ => FileType::Unknown,
        }
    }

    /// The conversion that turns this file type into a PDF, if any.
    pub fn conversion_kind(self) -> Option<OperationKind> {
        match self {
            FileType::Markdown => Some(OperationKind::Markdown),
            FileType::Html => Some(OperationKind::Html),
            FileType::Office => Some(OperationKind::Office),
            FileType::Pdf | FileType::Unknown => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Markdown => "markdown",
            FileType::Html => "html",
            FileType::Office => "office",
            FileType::Pdf => "pdf",
            FileType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A file that already sits in a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub file_type: FileType,
}

impl StagedFile {
    /// Describe a staged file, detecting its type from the extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_type = FileType::from_path(&path);
        Self { path, file_type }
    }

    /// Describe a staged file whose type was detected elsewhere.
    pub fn with_type(path: impl Into<PathBuf>, file_type: FileType) -> Self {
        Self {
            path: path.into(),
            file_type,
        }
    }
}

/// Return a fresh, not-yet-existing path inside `working_dir`.
///
/// `ext` may be given with or without the leading dot. Nothing is created on
/// disk.
pub fn make_file_path(working_dir: &Path, ext: &str) -> PathBuf {
    let ext = ext.trim_start_matches('.');
    working_dir.join(format!("{}.{}", Uuid::new_v4(), ext))
}

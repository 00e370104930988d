use std::fmt;
use std::str::FromStr;

/// The kind of external command a request needs.
///
/// Each kind owns exactly one command template and one timeout in the
/// configuration. The three conversion kinds take a single source file; `Merge`
/// takes a list of PDF files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    Markdown,
    Html,
    Office,
    Merge,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Markdown,
        OperationKind::Html,
        OperationKind::Office,
        OperationKind::Merge,
    ];

    /// Whether this kind converts one file to PDF (as opposed to merging).
    pub fn is_conversion(self) -> bool {
        !matches!(self, OperationKind::Merge)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Markdown => "markdown",
            OperationKind::Html => "html",
            OperationKind::Office => "office",
            OperationKind::Merge => "merge",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" => Ok(OperationKind::Markdown),
            "html" => Ok(OperationKind::Html),
            "office" => Ok(OperationKind::Office),
            "merge" => Ok(OperationKind::Merge),
            other => Err(format!(
                "invalid operation kind: {other} (expected \"markdown\", \"html\", \"office\" or \"merge\")"
            )),
        }
    }
}

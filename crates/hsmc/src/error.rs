//! Compile-time error reporting.
//!
//! # Design
//!
//! - `CompileError` — single fatal diagnostic with an optional source location
//! - `ErrorKind` — categorizes errors by compiler phase
//! - `CompileResult` — result alias used throughout the crate
//!
//! Every error is fatal and surfaces as one human-readable line; there is no
//! recovery and no partial output. The message carries the complete text
//! (`unknown state Foo`, `unexpected }`); `render` prefixes the
//! `file:line:col` location when the error points into a source file.

use crate::foundation::{SourceMap, Span};
use std::fmt;

/// Fatal compilation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// Category of this error
    pub kind: ErrorKind,
    /// Source location, when the error points at a token
    pub span: Option<Span>,
    /// Complete human-readable message
    pub message: String,
}

/// Category of compilation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized character in the input
    Lexical,
    /// Unexpected token or unexpected end of input
    Syntax,
    /// Same (name, guard) event declared twice on one state
    DuplicateEvent,
    /// Destination or start reference matches no state
    UnknownState,
    /// Destination or start reference matches more than one state
    AmbiguousState,
    /// Composite state entered without a start reference
    MissingStart,
    /// Start reference does not lead into the state's own subtree
    InvalidStart,
}

impl CompileError {
    /// Create an error anchored to a source location.
    pub fn new(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span: Some(span),
            message: message.into(),
        }
    }

    /// Create an error with no source location (model-level violations).
    pub fn unlocated(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            span: None,
            message: message.into(),
        }
    }

    /// Render as a single diagnostic line, resolving the location if any.
    pub fn render(&self, sources: &SourceMap) -> String {
        match &self.span {
            Some(span) => {
                let (line, col) = sources.line_col(span);
                format!(
                    "{}:{}:{}: {}",
                    sources.file_path(span).display(),
                    line,
                    col,
                    self.message
                )
            }
            None => self.message.clone(),
        }
    }
}

impl ErrorKind {
    /// Human-readable name for this error kind.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "lexical error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::DuplicateEvent => "duplicate event",
            ErrorKind::UnknownState => "unknown state",
            ErrorKind::AmbiguousState => "ambiguous state",
            ErrorKind::MissingStart => "missing start",
            ErrorKind::InvalidStart => "invalid start",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CompileError {}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_with_location() {
        let mut sources = SourceMap::new();
        let file_id = sources.add_file(PathBuf::from("chart.cs"), "demo.M {\n??\n}".to_string());
        let err = CompileError::new(ErrorKind::Lexical, Span::new(file_id, 9, 10), "unexpected ?");
        assert_eq!(err.render(&sources), "chart.cs:2:1: unexpected ?");
    }

    #[test]
    fn test_render_without_location() {
        let sources = SourceMap::new();
        let err = CompileError::unlocated(ErrorKind::UnknownState, "unknown state NoSuch");
        assert_eq!(err.render(&sources), "unknown state NoSuch");
        assert_eq!(err.to_string(), "unknown state NoSuch");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::Syntax.name(), "syntax error");
        assert_eq!(ErrorKind::MissingStart.name(), "missing start");
        assert_eq!(ErrorKind::AmbiguousState.to_string(), "ambiguous state");
    }
}

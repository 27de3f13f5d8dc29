// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Query input loading.
//!
//! The positional command-line argument is either literal query text or the
//! path of a file holding it. In explicit file mode the argument is always a
//! path and read failures are fatal. Otherwise text that starts with a known
//! statement keyword or spans several lines is taken literally, and anything
//! else is tried as a path, falling back to literal text when no such file
//! exists.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{QueryError, Result};

/// Leading keywords that mark an argument as literal query text.
pub const STATEMENT_KEYWORDS: [&str; 6] = ["SELECT", "WITH", "INSERT", "UPDATE", "DELETE", "EXPLAIN"];

/// How the positional argument should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Decide between literal text and file path heuristically.
    #[default]
    Auto,
    /// The argument is a file path; failing to read it is an error.
    File,
}

/// Raw query text plus the file it came from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInput {
    pub text: String,
    /// Path of the query file. `None` for inline queries.
    pub source: Option<PathBuf>,
}

impl QueryInput {
    /// Literal query text not backed by a file.
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    /// Load the query named by `arg` according to `mode`.
    pub fn load(arg: &str, mode: InputMode) -> Result<Self> {
        match mode {
            InputMode::File => Self::read_file(Path::new(arg)),
            InputMode::Auto if looks_like_query(arg) => Ok(Self::inline(arg)),
            InputMode::Auto => {
                let path = Path::new(arg);
                match fs::read_to_string(path) {
                    Ok(text) => Ok(Self {
                        text,
                        source: Some(path.to_path_buf()),
                    }),
                    Err(err) if err.kind() == ErrorKind::NotFound || !path.is_file() => {
                        debug!(arg, error = %err, "No readable query file, using argument as query text");
                        Ok(Self::inline(arg))
                    }
                    Err(source) => Err(QueryError::Read {
                        path: path.to_path_buf(),
                        source,
                    }),
                }
            }
        }
    }

    fn read_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| QueryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            text,
            source: Some(path.to_path_buf()),
        })
    }
}

/// Whether `arg` should be treated as literal query text without touching
/// the filesystem.
pub fn looks_like_query(arg: &str) -> bool {
    let trimmed = arg.trim();
    if trimmed.contains('\n') {
        return true;
    }
    let upper = trimmed.to_uppercase();
    STATEMENT_KEYWORDS.iter().any(|kw| upper.starts_with(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_select_is_literal() {
        let input = QueryInput::load("SELECT * FROM table", InputMode::Auto).unwrap();
        assert_eq!(input, QueryInput::inline("SELECT * FROM table"));
    }

    #[test]
    fn test_keyword_detection_is_case_insensitive() {
        assert!(looks_like_query("  with cte AS (SELECT 1) SELECT * FROM cte"));
        assert!(looks_like_query("explain plan for select 1"));
        assert!(!looks_like_query("query.sql"));
    }

    #[test]
    fn test_multiline_is_literal() {
        let text = "SELECT *\nFROM table\nWHERE id = 1";
        let input = QueryInput::load(text, InputMode::Auto).unwrap();
        assert_eq!(input.text, text);
        assert!(input.source.is_none());
    }

    #[test]
    fn test_auto_mode_reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("query.sql");
        fs::write(&path, "SELECT * FROM file").unwrap();

        let input = QueryInput::load(path.to_str().unwrap(), InputMode::Auto).unwrap();
        assert_eq!(input.text, "SELECT * FROM file");
        assert_eq!(input.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_auto_mode_falls_back_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nonexistent.sql");
        let arg = path.to_str().unwrap();

        let input = QueryInput::load(arg, InputMode::Auto).unwrap();
        assert_eq!(input, QueryInput::inline(arg));
    }

    #[test]
    fn test_auto_mode_falls_back_for_directory() {
        let dir = TempDir::new().unwrap();
        let arg = dir.path().to_str().unwrap();

        let input = QueryInput::load(arg, InputMode::Auto).unwrap();
        assert!(input.source.is_none());
    }

    #[test]
    fn test_file_mode_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("explicit.sql");
        fs::write(&path, "SELECT * FROM explicit").unwrap();

        let input = QueryInput::load(path.to_str().unwrap(), InputMode::File).unwrap();
        assert_eq!(input.text, "SELECT * FROM explicit");
        assert!(input.source.is_some());
    }

    #[test]
    fn test_file_mode_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.sql");

        let err = QueryInput::load(path.to_str().unwrap(), InputMode::File).unwrap_err();
        assert!(matches!(err, QueryError::Read { .. }));
    }

    #[test]
    fn test_file_mode_does_not_apply_keyword_heuristic() {
        let err = QueryInput::load("SELECT 1", InputMode::File).unwrap_err();
        assert!(matches!(err, QueryError::Read { .. }));
    }
}

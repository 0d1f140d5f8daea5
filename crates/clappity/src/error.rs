// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the Clappity renderer.
//!
//! This module defines [`ClappityError`], the main error enum, and
//! [`SourceContext`] for rich error reporting on malformed templates.
//!
//! # Error Categories
//!
//! - **Syntax errors**: a directive is malformed (`[[for x on items]]`)
//! - **End of input**: a directive is never closed (`[[if flag]] { ...`)
//! - **Limits**: recursion depth or loop iteration budget exceeded
//! - **Context errors**: a JSON document cannot be used as a data context
//! - **Resolution errors**: a template file could not be located or read
//!
//! Missing keys and missing lists are not errors. They render as empty
//! output.

use std::fmt;
use thiserror::Error;

/// Source context for enhanced error messages.
///
/// Captures a snippet of the template around an error location,
/// enabling messages with line numbers and a caret under the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    /// All lines from the template.
    pub lines: Vec<String>,
    /// The line number where the error occurred (1-indexed).
    pub error_line: usize,
    /// The column number where the error occurred (1-indexed).
    pub error_column: usize,
    /// First line number of the snippet (1-indexed).
    pub snippet_start: usize,
    /// Last line number of the snippet (1-indexed).
    pub snippet_end: usize,
}

impl SourceContext {
    /// Creates a source context from a template and error location.
    ///
    /// Captures 2 lines before and after the error line.
    pub fn from_source(source: &str, line: usize, column: usize) -> Self {
        let lines: Vec<String> = source.lines().map(|l| l.to_string()).collect();
        let snippet_start = line.saturating_sub(2).max(1);
        let snippet_end = (line + 2).min(lines.len().max(1));

        Self {
            lines,
            error_line: line,
            error_column: column,
            snippet_start,
            snippet_end,
        }
    }

    /// Formats the snippet with line numbers and an error indicator.
    ///
    /// ```text
    ///    1 | <ul>
    ///    2 | [[for item on items]] {
    ///      |           ^
    ///    3 | </ul>
    /// ```
    pub fn format_snippet(&self) -> String {
        let mut result = String::new();

        for line_num in self.snippet_start..=self.snippet_end {
            let Some(line) = self.lines.get(line_num - 1) else {
                break;
            };

            result.push_str(&format!("{:4} | {}\n", line_num, line));

            if line_num == self.error_line {
                result.push_str(&format!(
                    "     | {}^\n",
                    " ".repeat(self.error_column.saturating_sub(1))
                ));
            }
        }

        result
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_snippet())
    }
}

/// Helper struct for displaying optional source context.
pub struct OptSourceContextDisplay<'a>(pub &'a Option<SourceContext>);

impl fmt::Display for OptSourceContextDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ctx) => write!(f, "{}", ctx),
            None => Ok(()),
        }
    }
}

/// Helper trait for formatting optional source context.
pub trait AsDisplay<'a> {
    /// Wraps self for Display formatting.
    fn as_display(&'a self) -> OptSourceContextDisplay<'a>;
}

impl<'a> AsDisplay<'a> for Option<SourceContext> {
    fn as_display(&'a self) -> OptSourceContextDisplay<'a> {
        OptSourceContextDisplay(self)
    }
}

/// The main error type for Clappity operations.
#[derive(Error, Debug)]
pub enum ClappityError {
    /// A directive is malformed.
    #[error("Template syntax error: {message} at line {line}, column {column}\n{}", source_context.as_display())]
    TemplateSyntax {
        /// Description of the problem.
        message: String,
        /// Byte offset into the template.
        offset: usize,
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed, in characters).
        column: usize,
        /// Snippet of the surrounding template.
        source_context: Option<SourceContext>,
    },

    /// The template ended while a directive was still open.
    #[error("Unexpected end of input: expected {expected} (opened at line {line}, column {column})")]
    UnexpectedEndOfInput {
        /// What the scanner was looking for.
        expected: String,
        /// Byte offset where the search started.
        offset: usize,
        /// Line of `offset` (1-indexed).
        line: usize,
        /// Column of `offset` (1-indexed).
        column: usize,
    },

    /// Directive nesting exceeded the configured depth.
    #[error("Recursion limit of {depth} nested directives exceeded")]
    RecursionLimit {
        /// The configured maximum depth.
        depth: usize,
    },

    /// Loops produced more iterations than allowed for one render.
    #[error("Iteration limit of {limit} loop iterations exceeded")]
    IterationLimit {
        /// The configured maximum iteration count.
        limit: usize,
    },

    /// The supplied data cannot be used as a data context.
    #[error("Invalid data context: {0}")]
    InvalidContext(String),

    /// Template file could not be found or resolved.
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClappityError {
    /// Returns the byte offset for positioned errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ClappityError::TemplateSyntax { offset, .. }
            | ClappityError::UnexpectedEndOfInput { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Convenience type alias for Results with [`ClappityError`].
pub type Result<T> = std::result::Result<T, ClappityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_points_at_column() {
        let ctx = SourceContext::from_source("a\n[[for x on y]] {\nb", 2, 9);
        let snippet = ctx.format_snippet();
        assert!(snippet.contains("   2 | [[for x on y]] {"));
        assert!(snippet.contains("     |         ^"));
        assert!(snippet.contains("   1 | a"));
        assert!(snippet.contains("   3 | b"));
    }

    #[test]
    fn test_offset_only_for_positioned_errors() {
        let err = ClappityError::UnexpectedEndOfInput {
            expected: "`}`".into(),
            offset: 7,
            line: 1,
            column: 8,
        };
        assert_eq!(err.offset(), Some(7));
        assert_eq!(ClappityError::RecursionLimit { depth: 3 }.offset(), None);
    }
}

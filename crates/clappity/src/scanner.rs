// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Bounds-checked cursor over a template.
//!
//! The [`Scanner`] owns an immutable slice, a byte cursor and an end bound.
//! Nested bodies are scanned as a [`Span`] of the same template, so every
//! offset, line and column in an error refers to the template the caller
//! passed in. Every operation that needs a character which is not there
//! fails with [`ClappityError::UnexpectedEndOfInput`] rather than reading
//! past the end. The cursor always sits on a `char` boundary.

use crate::error::{ClappityError, Result, SourceContext};

/// Byte range within a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The text covered by this span.
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }

    /// Narrows the span to exclude surrounding whitespace.
    pub fn trim(&self, input: &str) -> Span {
        self.trim_start(input).trim_end(input)
    }

    /// Narrows the span to exclude leading whitespace.
    pub fn trim_start(&self, input: &str) -> Span {
        let text = self.text(input);
        let leading = text.len() - text.trim_start().len();
        Span::new(self.start + leading, self.end)
    }

    /// Narrows the span to exclude trailing whitespace.
    pub fn trim_end(&self, input: &str) -> Span {
        let text = self.text(input);
        let trailing = text.len() - text.trim_end().len();
        Span::new(self.start, self.end - trailing)
    }

    /// Returns true if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Cursor over a template string.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    end: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over the whole of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            end: input.len(),
        }
    }

    /// Creates a scanner limited to `span` of `input`.
    pub fn with_span(input: &'a str, span: Span) -> Self {
        let end = span.end.min(input.len());
        Self {
            input,
            pos: span.start.min(end),
            end,
        }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The full input.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Unconsumed remainder of the scanned range.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..self.end]
    }

    /// Returns true once every character in range has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.end
    }

    /// Character under the cursor.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns true if the remainder starts with `pat`.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Consumes one character.
    pub fn advance(&mut self) -> Result<char> {
        let c = self
            .peek()
            .ok_or_else(|| self.eof("a character", self.pos))?;
        self.pos += c.len_utf8();
        Ok(c)
    }

    /// Consumes `pat` if the remainder starts with it.
    pub fn eat(&mut self, pat: &str) -> bool {
        if self.starts_with(pat) {
            self.pos += pat.len();
            true
        } else {
            false
        }
    }

    /// Consumes `expected`, failing with a positioned error otherwise.
    pub fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.syntax_error(
                format!("expected `{}`, found `{}`", expected, c),
                self.pos,
            )),
            None => Err(self.eof(&format!("`{}`", expected), self.pos)),
        }
    }

    /// Skips any whitespace, newlines included.
    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Copies through literal text up to the next `[[` marker or the end
    /// of the range. The marker itself is not consumed.
    pub fn take_literal(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.find("[[").unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Reads characters up to (not including) the first one matching
    /// `stop`. Reaching the end of the range is not an error.
    pub fn take_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if stop(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    /// Like [`take_until`](Self::take_until) but the terminator must exist.
    ///
    /// The terminator itself is not consumed.
    pub fn read_until(&mut self, stop: impl Fn(char) -> bool, expected: &str) -> Result<&'a str> {
        let start = self.pos;
        let text = self.take_until(stop);
        if self.is_eof() {
            return Err(self.eof(expected, start));
        }
        Ok(text)
    }

    /// Moves the cursor just past the next occurrence of `target`.
    pub fn seek_past(&mut self, target: char) -> Result<()> {
        let start = self.pos;
        match self.rest().find(target) {
            Some(idx) => {
                self.pos += idx + target.len_utf8();
                Ok(())
            }
            None => Err(self.eof(&format!("`{}`", target), start)),
        }
    }

    /// Captures a block body. The cursor must sit just after the opening
    /// `{`; on success it sits just after the closing `}` and the span of
    /// the raw body is returned.
    ///
    /// With `balanced`, inner `{`/`}` pairs are tracked with a depth
    /// counter. Without it the first `}` closes the block.
    pub fn capture_block(&mut self, balanced: bool) -> Result<Span> {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(c) = self.peek() {
            match c {
                '{' if balanced => depth += 1,
                '}' if depth == 0 => {
                    let body = Span::new(start, self.pos);
                    self.pos += 1;
                    return Ok(body);
                }
                '}' => depth -= 1,
                _ => {}
            }
            self.pos += c.len_utf8();
        }

        Err(self.eof("closing `}`", start.saturating_sub(1)))
    }

    /// 1-indexed line and column of a byte offset.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        line_column(self.input, offset)
    }

    /// Builds a syntax error pointing at `offset`.
    pub fn syntax_error(&self, message: impl Into<String>, offset: usize) -> ClappityError {
        let (line, column) = self.position(offset);
        ClappityError::TemplateSyntax {
            message: message.into(),
            offset,
            line,
            column,
            source_context: Some(SourceContext::from_source(self.input, line, column)),
        }
    }

    fn eof(&self, expected: &str, offset: usize) -> ClappityError {
        let (line, column) = self.position(offset);
        ClappityError::UnexpectedEndOfInput {
            expected: expected.to_string(),
            offset,
            line,
            column,
        }
    }
}

/// 1-indexed line and column of a byte offset within `input`.
pub fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let before = input.get(..offset).unwrap_or(input);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

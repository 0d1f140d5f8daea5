// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Directive recognition.
//!
//! A directive starts at a `[[` marker. [`Directive::parse`] consumes the
//! marker, the header and, for block directives, the `{ ... }` body, and
//! returns the parsed unit with its body as a [`Span`] of the template.
//!
//! | Directive | Syntax |
//! |---|---|
//! | Variable | `[[name]]` |
//! | Section | `[[section name]] { ... }` |
//! | Conditional | `[[if name]] { ... }` / `[[if !name]] { ... }` |
//! | Loop | `[[for item in listName]] { ... }` |

use crate::error::Result;
use crate::scanner::{Scanner, Span};
use serde::{Deserialize, Serialize};

/// How block bodies find their closing brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BraceMode {
    /// Every block body balances inner `{`/`}` pairs.
    #[default]
    Balanced,
    /// Only `section` balances braces; `if` and `for` bodies end at the
    /// first `}`.
    Compat,
}

impl BraceMode {
    fn balances(self, kind: DirectiveKind) -> bool {
        match self {
            BraceMode::Balanced => true,
            BraceMode::Compat => kind == DirectiveKind::Section,
        }
    }
}

/// The kind of a directive, used for logging and brace handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `[[section name]]`
    Section,
    /// `[[if cond]]`
    If,
    /// `[[for item in list]]`
    For,
    /// `[[name]]`
    Variable,
}

/// Condition of an `if` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition<'a> {
    /// Identifier looked up in the context.
    pub name: &'a str,
    /// True for `!name`.
    pub negated: bool,
}

impl<'a> Condition<'a> {
    /// Parses `name` or `!name`.
    pub fn parse(text: &'a str) -> Self {
        let text = text.trim();
        match text.strip_prefix('!') {
            Some(name) => Condition {
                name: name.trim(),
                negated: true,
            },
            None => Condition {
                name: text,
                negated: false,
            },
        }
    }
}

/// A parsed directive block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Named block rendered in place.
    Section {
        /// Section name (may be empty).
        name: &'a str,
        /// Raw body.
        body: Span,
    },
    /// Conditional block.
    If {
        /// Tested identifier.
        condition: Condition<'a>,
        /// Raw body.
        body: Span,
    },
    /// Loop over a sequence.
    For {
        /// Loop variable.
        item: &'a str,
        /// Sequence identifier.
        list: &'a str,
        /// Raw body.
        body: Span,
    },
    /// Variable interpolation.
    Variable {
        /// Identifier looked up in the context.
        name: &'a str,
    },
}

/// Ends a header token. Matches the whitespace skipped between tokens.
fn is_token_end(c: char) -> bool {
    c.is_whitespace() || c == ']'
}

impl<'a> Directive<'a> {
    /// Parses the directive at the cursor, which must sit on `[[`.
    pub fn parse(scanner: &mut Scanner<'a>, mode: BraceMode) -> Result<Self> {
        let marker = scanner.offset();
        if !scanner.eat("[[") {
            return Err(scanner.syntax_error("expected `[[`", marker));
        }
        scanner.skip_whitespace();

        let keyword = scanner.read_until(is_token_end, "`]` closing the directive")?;

        match keyword {
            "section" => {
                scanner.skip_whitespace();
                let name = scanner.read_until(|c| c == ']', "`]` after section name")?;
                let body = Self::block(scanner, mode.balances(DirectiveKind::Section))?;
                Ok(Directive::Section {
                    name: name.trim(),
                    body,
                })
            }
            "if" => {
                scanner.skip_whitespace();
                let condition_at = scanner.offset();
                let text = scanner.read_until(|c| c == ']', "`]` after condition")?;
                let condition = Condition::parse(text);
                if condition.name.is_empty() {
                    return Err(scanner.syntax_error("`if` needs a condition", condition_at));
                }
                let body = Self::block(scanner, mode.balances(DirectiveKind::If))?;
                Ok(Directive::If { condition, body })
            }
            "for" => {
                scanner.skip_whitespace();
                let item_at = scanner.offset();
                let item = scanner.read_until(is_token_end, "loop variable")?;
                if item.is_empty() {
                    return Err(scanner.syntax_error("`for` needs a loop variable", item_at));
                }

                scanner.skip_whitespace();
                let in_at = scanner.offset();
                if !scanner.eat("in") || !scanner.peek().is_some_and(char::is_whitespace) {
                    return Err(scanner.syntax_error("expected `in` after loop variable", in_at));
                }
                scanner.skip_whitespace();

                let list_at = scanner.offset();
                let list = scanner.read_until(|c| c == ']', "`]` after list name")?.trim();
                if list.is_empty() {
                    return Err(scanner.syntax_error("`for` needs a list name", list_at));
                }

                let body = Self::block(scanner, mode.balances(DirectiveKind::For))?;
                Ok(Directive::For { item, list, body })
            }
            name => {
                scanner.skip_whitespace();
                scanner.expect(']')?;
                scanner.eat("]");
                Ok(Directive::Variable { name })
            }
        }
    }

    /// Advances to the next `{` and captures the body up to its `}`.
    fn block(scanner: &mut Scanner<'a>, balanced: bool) -> Result<Span> {
        scanner.seek_past('{')?;
        scanner.capture_block(balanced)
    }

    /// The kind of this directive.
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Section { .. } => DirectiveKind::Section,
            Directive::If { .. } => DirectiveKind::If,
            Directive::For { .. } => DirectiveKind::For,
            Directive::Variable { .. } => DirectiveKind::Variable,
        }
    }

    /// The body span, for block directives.
    pub fn body(&self) -> Option<Span> {
        match self {
            Directive::Section { body, .. }
            | Directive::If { body, .. }
            | Directive::For { body, .. } => Some(*body),
            Directive::Variable { .. } => None,
        }
    }
}

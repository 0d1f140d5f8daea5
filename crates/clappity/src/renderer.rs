// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The template renderer.
//!
//! A single left-to-right pass copies literal text, parses each directive
//! at a `[[` marker and recursively renders block bodies against the same
//! [`DataContext`]. Bodies are rendered as spans of the original template,
//! so error positions always point into the template that was passed in.
//!
//! Loop variables are bound for the duration of the loop body rather than
//! substituted textually. An element value is emitted verbatim and never
//! re-scanned for directives. When nested loops reuse a name the outer
//! binding wins, since the outer loop fills the marker before the inner
//! body is ever rendered.

use tracing::{debug, warn};

use crate::context::DataContext;
use crate::directive::{BraceMode, Directive};
use crate::error::{ClappityError, Result};
use crate::scanner::{Scanner, Span};

/// Default maximum directive nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum number of loop iterations in one render call.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Limits and compatibility switches for a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum directive nesting depth.
    pub max_depth: usize,
    /// Maximum loop iterations across one render call.
    pub max_iterations: usize,
    /// How `if` and `for` bodies find their closing brace.
    pub brace_mode: BraceMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            brace_mode: BraceMode::default(),
        }
    }
}

/// A rendered section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The section name from `[[section name]]`.
    pub name: String,
    /// The rendered body.
    pub content: String,
}

/// Result of [`Renderer::render_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Full rendered output.
    pub output: String,
    /// Every section rendered during the pass, innermost first when
    /// sections nest.
    pub sections: Vec<Section>,
}

impl Rendered {
    /// Returns the first rendered section with the given name.
    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.content.as_str())
    }
}

/// Renders templates against a [`DataContext`].
///
/// A renderer holds no per-render state and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use clappity::{DataContext, Renderer};
///
/// let renderer = Renderer::new();
/// let ctx = DataContext::new().with("items", vec!["a", "b", "c"]);
///
/// let out = renderer.render("[[for x in items]] { [[x]], }", &ctx).unwrap();
/// assert_eq!(out, "a, b, c, ");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

/// Mutable bookkeeping for one render call.
struct Pass<'a> {
    template: &'a str,
    ctx: &'a DataContext,
    iterations: usize,
    sections: Vec<Section>,
}

/// Loop variables in scope, outermost first.
type Bindings<'a> = Vec<(&'a str, &'a str)>;

impl Renderer {
    /// Creates a renderer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer with the given options.
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders `template` and returns the output.
    pub fn render(&self, template: &str, ctx: &DataContext) -> Result<String> {
        self.render_document(template, ctx).map(|r| r.output)
    }

    /// Renders `template` and returns the output along with every
    /// rendered section.
    pub fn render_document(&self, template: &str, ctx: &DataContext) -> Result<Rendered> {
        debug!("Processing template ({} bytes, {} keys)", template.len(), ctx.len());

        let mut pass = Pass {
            template,
            ctx,
            iterations: 0,
            sections: Vec::new(),
        };
        let mut bindings = Vec::new();
        let mut output = String::with_capacity(template.len());
        self.render_span(
            &mut pass,
            Span::new(0, template.len()),
            &mut bindings,
            0,
            &mut output,
        )?;

        debug!("Template rendered successfully");
        Ok(Rendered {
            output,
            sections: pass.sections,
        })
    }

    fn render_span<'a>(
        &self,
        pass: &mut Pass<'a>,
        span: Span,
        bindings: &mut Bindings<'a>,
        depth: usize,
        out: &mut String,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(ClappityError::RecursionLimit {
                depth: self.options.max_depth,
            });
        }

        let mut scanner = Scanner::with_span(pass.template, span);
        loop {
            out.push_str(scanner.take_literal());
            if scanner.is_eof() {
                return Ok(());
            }

            let at = scanner.offset();
            if let Some(value) = bound_variable(&scanner, bindings) {
                out.push_str(value);
                scanner.seek_past(']')?;
                scanner.expect(']')?;
                continue;
            }

            let directive = Directive::parse(&mut scanner, self.options.brace_mode)?;
            debug!("Directive recognized: {:?} at offset {}", directive.kind(), at);

            match directive {
                Directive::Section { name, body } => {
                    let body = body.trim(pass.template);
                    let start = out.len();
                    self.render_span(pass, body, bindings, depth + 1, out)?;
                    pass.sections.push(Section {
                        name: name.to_string(),
                        content: out[start..].to_string(),
                    });
                }
                Directive::If { condition, body } => {
                    let holds = pass.ctx.is_truthy(condition.name) != condition.negated;
                    if holds {
                        let body = body.trim(pass.template);
                        self.render_span(pass, body, bindings, depth + 1, out)?;
                    }
                }
                Directive::For { item, list, body } => {
                    let ctx = pass.ctx;
                    let Some(elements) = ctx.sequence(list) else {
                        warn!("Array not found: {}", list);
                        continue;
                    };
                    let body = body.trim_start(pass.template);
                    for element in elements {
                        pass.iterations += 1;
                        if pass.iterations > self.options.max_iterations {
                            return Err(ClappityError::IterationLimit {
                                limit: self.options.max_iterations,
                            });
                        }
                        bindings.push((item, element.as_str()));
                        let result = self.render_span(pass, body, bindings, depth + 1, out);
                        bindings.pop();
                        result?;
                    }
                }
                Directive::Variable { name } => {
                    out.push_str(&pass.ctx.display(name));
                }
            }
        }
    }

    /// Validates every directive in `template`, including bodies that a
    /// render with the current data would skip.
    pub fn check(&self, template: &str) -> Result<usize> {
        self.check_span(template, Span::new(0, template.len()), 0)
    }

    fn check_span(&self, template: &str, span: Span, depth: usize) -> Result<usize> {
        if depth > self.options.max_depth {
            return Err(ClappityError::RecursionLimit {
                depth: self.options.max_depth,
            });
        }

        let mut count = 0;
        let mut scanner = Scanner::with_span(template, span);
        loop {
            scanner.take_literal();
            if scanner.is_eof() {
                return Ok(count);
            }
            let directive = Directive::parse(&mut scanner, self.options.brace_mode)?;
            count += 1;
            if let Some(body) = directive.body() {
                count += self.check_span(template, body, depth + 1)?;
            }
        }
    }
}

/// Returns the value of a loop variable if the cursor sits on `[[name]]`
/// for a bound `name`. The outermost loop binding a name wins.
fn bound_variable<'a>(scanner: &Scanner<'_>, bindings: &Bindings<'a>) -> Option<&'a str> {
    if bindings.is_empty() {
        return None;
    }
    let inner = scanner.rest().strip_prefix("[[")?;
    let close = inner.find(']')?;
    if !inner[close..].starts_with("]]") {
        return None;
    }
    let name = inner[..close].trim();
    bindings
        .iter()
        .find(|(bound, _)| *bound == name)
        .map(|(_, value)| *value)
}

/// Renders `template` with a default [`Renderer`].
pub fn render(template: &str, ctx: &DataContext) -> Result<String> {
    Renderer::new().render(template, ctx)
}

//! Parser error types.

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use serde::Serialize;
use thiserror::Error;

use crate::lexer::Span;

/// Which layer rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Characters that do not form a token in the current lexical mode.
    Lexical,
    /// A token the grammar does not allow at this point.
    Syntax,
    /// A grammar-local check failed, e.g. an argument count.
    Semantic,
}

/// A parse error.
///
/// A failed parse produces exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message} at position {span}")]
pub struct ParseError {
    pub kind: ErrorKind,
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// The offending source text.
    pub lexeme: String,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
}

impl ParseError {
    fn build(kind: ErrorKind, message: impl Into<String>, span: Span, lexeme: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            lexeme: lexeme.to_string(),
            expected: None,
        }
    }

    #[must_use]
    pub fn lexical(message: impl Into<String>, span: Span, lexeme: &str) -> Self {
        Self::build(ErrorKind::Lexical, message, span, lexeme)
    }

    #[must_use]
    pub fn syntax(message: impl Into<String>, span: Span, lexeme: &str) -> Self {
        Self::build(ErrorKind::Syntax, message, span, lexeme)
    }

    #[must_use]
    pub fn semantic(message: impl Into<String>, span: Span, lexeme: &str) -> Self {
        Self::build(ErrorKind::Semantic, message, span, lexeme)
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, lexeme: &str, span: Span) -> Self {
        let expected: String = expected.into();
        Self {
            kind: ErrorKind::Syntax,
            message: format!("Unexpected token: expected {expected}, found '{lexeme}'"),
            span,
            lexeme: lexeme.to_string(),
            expected: Some(expected),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected: String = expected.into();
        Self {
            kind: ErrorKind::Syntax,
            message: format!("Unexpected end of input: expected {expected}"),
            span,
            lexeme: String::new(),
            expected: Some(expected),
        }
    }

    /// 1-based line and column of the error start within `source`.
    #[must_use]
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = self.span.start.min(source.len());
        let before = source.get(..offset).unwrap_or_default();
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    /// Renders the error as a source snippet with the offending span marked.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        self.render_with(source, &Renderer::plain())
    }

    /// Like [`ParseError::render`], with ANSI colors.
    #[must_use]
    pub fn render_styled(&self, source: &str) -> String {
        self.render_with(source, &Renderer::styled())
    }

    fn render_with(&self, source: &str, renderer: &Renderer) -> String {
        let range = adjust_range(self.span, source.len());
        let label = self.label();
        let snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range).label(&label));
        let report: Vec<Group> = vec![Level::ERROR.primary_title(&self.message).element(snippet)];
        renderer.render(&report).to_string()
    }

    fn label(&self) -> String {
        match &self.expected {
            Some(expected) => format!("expected {expected}"),
            None if self.lexeme.is_empty() => String::from("here"),
            None => format!("'{}'", self.lexeme),
        }
    }
}

/// Widens an empty span to one character so the marker is visible.
fn adjust_range(span: Span, limit: usize) -> std::ops::Range<usize> {
    let start = span.start.min(limit);
    let end = span.end.min(limit);
    if start == end {
        start..(start + 1).min(limit)
    } else {
        start..end
    }
}

//! Caller-supplied parse configuration and the diagnostic sink.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::ParseError;
use crate::lexer::{KeywordClassifier, LexicalMode, SqlKeywords};

/// Default limit for nested expressions, conditions and sub-selects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Receives the diagnostic of a failed parse.
pub trait DiagnosticSink {
    fn report(&mut self, error: &ParseError);
}

impl<F: FnMut(&ParseError)> DiagnosticSink for F {
    fn report(&mut self, error: &ParseError) {
        self(error);
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, error: &ParseError) {
        debug!(
            kind = ?error.kind,
            start = error.span.start,
            end = error.span.end,
            "{}",
            error.message
        );
    }
}

/// Keeps every reported diagnostic. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    log: Arc<Mutex<Vec<ParseError>>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<ParseError> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, error: &ParseError) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.clone());
    }
}

/// Settings for one parse.
///
/// ```
/// use ecsql_parser::{ParseContext, parse};
///
/// let mut ctx = ParseContext::new().with_shorthand_predicates("Price");
/// let tree = parse("> 5", &mut ctx).unwrap();
/// assert_eq!(tree.root().tag().map(|t| t.as_str()), Some("comparison_predicate"));
/// ```
pub struct ParseContext {
    pub lexical_mode: LexicalMode,
    /// Whether predicates may omit their left operand.
    pub shorthand_predicate_allowed: bool,
    /// The column a shorthand predicate applies to.
    pub implicit_field_name: Option<String>,
    pub max_depth: usize,
    classifier: Arc<dyn KeywordClassifier>,
    sink: Box<dyn DiagnosticSink + Send>,
}

impl ParseContext {
    /// Full-statement parsing with the built-in keyword table, reporting
    /// to [`TracingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexical_mode: LexicalMode::Sql,
            shorthand_predicate_allowed: false,
            implicit_field_name: None,
            max_depth: DEFAULT_MAX_DEPTH,
            classifier: Arc::new(SqlKeywords),
            sink: Box::new(TracingSink),
        }
    }

    /// Allows shorthand predicates against `field`.
    #[must_use]
    pub fn with_shorthand_predicates(mut self, field: impl Into<String>) -> Self {
        self.shorthand_predicate_allowed = true;
        self.implicit_field_name = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_lexical_mode(mut self, mode: LexicalMode) -> Self {
        self.lexical_mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: impl KeywordClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl DiagnosticSink + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn set_shorthand_predicate_allowed(&mut self, allowed: bool) {
        self.shorthand_predicate_allowed = allowed;
    }

    pub fn set_implicit_field_name(&mut self, name: Option<String>) {
        self.implicit_field_name = name;
    }

    pub fn set_lexical_mode(&mut self, mode: LexicalMode) {
        self.lexical_mode = mode;
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn KeywordClassifier {
        self.classifier.as_ref()
    }

    pub(crate) fn report(&mut self, error: &ParseError) {
        self.sink.report(error);
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("lexical_mode", &self.lexical_mode)
            .field("shorthand_predicate_allowed", &self.shorthand_predicate_allowed)
            .field("implicit_field_name", &self.implicit_field_name)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

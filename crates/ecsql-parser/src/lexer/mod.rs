//! ECSQL lexer.
//!
//! A hand-written lexer that produces tokens on demand. Classification
//! depends on the current [`LexicalMode`] and on a [`KeywordClassifier`].

mod classify;
mod span;
mod token;
mod tokenizer;

pub use classify::{KeywordAliases, KeywordClassifier, SqlKeywords, WordClass};
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{LexicalMode, Lexer};

//! ECSQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! It builds the parse tree directly in an arena and hands out a compacted
//! [`ParseTree`](crate::tree::ParseTree) on success.

mod actions;
mod condition;
mod context;
mod error;
mod expr;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;
mod query;
mod window;

pub use context::{
    CollectingSink, DiagnosticSink, ParseContext, TracingSink, DEFAULT_MAX_DEPTH,
};
pub use error::{ErrorKind, ParseError};
pub use parser::{parse, Parser};

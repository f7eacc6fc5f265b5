//! # ecsql-parser
//!
//! Parser front end for ECSQL, a SQL-92 dialect extended with schema-aware
//! constructs: qualified class references, relationship joins, property
//! paths with array indexing and `->` extraction, and `ECSQLOPTIONS`
//! clauses.
//!
//! This crate provides:
//! - A context-sensitive lexer with pluggable keyword classification
//! - A recursive descent parser that builds a typed parse tree in an arena
//! - Tree navigation, an unparser and JSON export
//!
//! ## Parsing a statement
//!
//! ```rust
//! use ecsql_parser::{parse, ParseContext, RuleTag};
//!
//! let mut ctx = ParseContext::new();
//! let tree = parse("SELECT * FROM Foo.Bar WHERE a = 1", &mut ctx).unwrap();
//!
//! assert_eq!(tree.root().tag(), Some(RuleTag::SelectStatement));
//! let class = tree.find(RuleTag::QualifiedClassName).unwrap();
//! assert_eq!(class.leaf_texts(), ["Foo", ".", "Bar"]);
//! assert_eq!(tree.to_sql(), "SELECT * FROM Foo.Bar WHERE a = 1");
//! ```
//!
//! ## Shorthand predicates
//!
//! Criteria text can omit the left operand of a predicate. The parser
//! fills it in from the implicit field name:
//!
//! ```rust
//! use ecsql_parser::{parse, ParseContext, RuleTag};
//!
//! let mut ctx = ParseContext::new().with_shorthand_predicates("Price");
//! let tree = parse("> 5", &mut ctx).unwrap();
//!
//! let column = tree.root().child(0).unwrap();
//! assert_eq!(column.tag(), Some(RuleTag::ColumnRef));
//! assert_eq!(column.leaf_texts(), ["Price"]);
//! ```

pub mod lexer;
pub mod parser;
pub mod tree;

pub use lexer::{Keyword, KeywordAliases, KeywordClassifier, LexicalMode, Span};
pub use parser::{
    parse, CollectingSink, DiagnosticSink, ErrorKind, ParseContext, ParseError, Parser,
    TracingSink,
};
pub use tree::{LiteralKind, NodeRef, ParseTree, RuleTag, Shape};

//! Tests for diagnostics: message forms, error kinds, positions, the depth
//! limit and reporting to the context's sink.

mod common;
use common::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ecsql_parser::{parse as parse_with, CollectingSink, ErrorKind, ParseContext, ParseError};

#[test]
fn unexpected_token_message() {
    let err = parse_err("SELECT a FROM s.A WHERE");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert!(err.message.starts_with("Unexpected end of input: expected"), "{}", err.message);
    assert!(err.lexeme.is_empty());

    let err = parse_err("SELECT a FROM s.A GROUP a");
    assert_eq!(err.message, "Unexpected token: expected BY, found 'a'");
    assert_eq!(err.expected.as_deref(), Some("BY"));
    assert_eq!(err.lexeme, "a");
    assert_eq!(err.span.start, 24);
    assert_eq!(err.span.end, 25);
}

#[test]
fn display_includes_position() {
    let err = parse_err("SELECT a FROM s.A GROUP a");
    assert_eq!(
        err.to_string(),
        "Unexpected token: expected BY, found 'a' at position 24..25"
    );
}

#[test]
fn lexical_errors() {
    let err = parse_err("SELECT # FROM s.A");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert_eq!(err.message, "Unexpected character: #");
    assert_eq!(err.span.start, 7);

    let err = parse_err("SELECT 'open FROM s.A");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert_eq!(err.message, "Unterminated string literal");

    let err = parse_err("SELECT [open FROM s.A");
    assert_eq!(err.kind, ErrorKind::Lexical);
}

#[test]
fn unterminated_block_comment_is_lexical_error() {
    let err = parse_err("SELECT a FROM s.A /* oops");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert_eq!(err.message, "Unterminated block comment");
    assert_eq!(err.span.start, 18);
    assert_eq!(err.lexeme, "/* oops");
}

#[test]
fn comments_are_skipped() {
    let tree = parse(
        "SELECT a -- trailing\n\
         , b // another\n\
         FROM /* inline */ s.A",
    );
    assert_eq!(tree.to_sql(), "SELECT a, b FROM s.A");
}

#[test]
fn semantic_errors() {
    let err = parse_err("SELECT a.*.b FROM s.A");
    assert_eq!(err.kind, ErrorKind::Semantic);
    assert_eq!(err.message, "'*' can only occur at the end of property path");
    assert_eq!(err.lexeme, "b");

    let err = parse_err("SELECT MAX(a, b) FROM s.A");
    assert_eq!(err.kind, ErrorKind::Semantic);
    assert!(err.message.contains("GREATEST"));
}

#[test]
fn depth_limit_stops_deep_nesting() {
    let depth = 500;
    let sql = format!("SELECT {}1{} FROM s.A", "(".repeat(depth), ")".repeat(depth));
    let err = parse_err(&sql);
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.message, "statement is nested too deeply");

    let sql = format!("SELECT {}1 FROM s.A", "- ".repeat(depth));
    assert_eq!(parse_err(&sql).message, "statement is nested too deeply");

    let mut sql = String::from("SELECT 1");
    for _ in 0..depth {
        sql = format!("SELECT * FROM ({sql}) t");
    }
    assert_eq!(parse_err(&sql).message, "statement is nested too deeply");
}

#[test]
fn depth_limit_is_configurable() {
    let sql = "SELECT ((((1)))) FROM s.A";
    let mut ctx = ParseContext::new();
    assert!(parse_with(sql, &mut ctx).is_ok());

    let mut ctx = ParseContext::new().with_max_depth(4);
    let err = parse_with(sql, &mut ctx).unwrap_err();
    assert_eq!(err.message, "statement is nested too deeply");
}

#[test]
fn long_flat_input_is_not_deep() {
    let terms = vec!["a"; 2000].join(" + ");
    let tree = parse(&format!("SELECT {terms} FROM s.A"));
    assert!(tree.len() > 2000);

    let conditions = vec!["a = 1"; 1000].join(" AND ");
    parse(&format!("SELECT * FROM s.A WHERE {conditions}"));
}

#[test]
fn error_is_reported_to_collecting_sink() {
    let sink = CollectingSink::new();
    let mut ctx = ParseContext::new().with_sink(sink.clone());

    assert!(parse_with("SELECT * FROM s.A", &mut ctx).is_ok());
    assert!(sink.diagnostics().is_empty());

    let err = parse_with("SELECT FROM s.A", &mut ctx).unwrap_err();
    let reported = sink.diagnostics();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0], err);

    parse_with("DELETE s.A", &mut ctx).unwrap_err();
    assert_eq!(sink.diagnostics().len(), 2);
    sink.clear();
    assert!(sink.diagnostics().is_empty());
}

#[test]
fn closure_sink() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let mut ctx = ParseContext::new().with_sink(move |_: &ParseError| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    let _ = parse_with("SELECT", &mut ctx);
    let _ = parse_with("SELECT 1", &mut ctx);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn rendered_snippet() {
    let source = "SELECT a\nFROM s.A\nWHERE a = = 1";
    let err = parse_err(source);
    assert_eq!(err.line_col(source), (3, 11));
    let rendered = err.render(source);
    assert!(rendered.contains(&err.message), "{rendered}");
    assert!(rendered.contains("WHERE a = = 1"), "{rendered}");
    assert!(rendered.contains('^'), "{rendered}");
}

#[test]
fn error_serializes_to_json() {
    let err = parse_err("SELECT a FROM s.A GROUP a");
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "syntax");
    assert_eq!(json["lexeme"], "a");
    assert_eq!(json["expected"], "BY");
    assert_eq!(json["span"]["start"], 24);
}

#![allow(dead_code)]

use ecsql_parser::{parse as parse_with, NodeRef, ParseContext, ParseError, ParseTree, RuleTag};

pub fn parse(sql: &str) -> ParseTree {
    parse_with(sql, &mut ParseContext::new())
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    parse_with(sql, &mut ParseContext::new())
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_shorthand(text: &str, field: &str) -> ParseTree {
    let mut ctx = ParseContext::new().with_shorthand_predicates(field);
    parse_with(text, &mut ctx)
        .unwrap_or_else(|e| panic!("Failed to parse shorthand: {text}\nError: {e:?}"))
}

/// The `index`-th child of the root.
pub fn root_child(tree: &ParseTree, index: usize) -> NodeRef<'_> {
    tree.root()
        .child(index)
        .unwrap_or_else(|| panic!("root has no child {index}:\n{tree}"))
}

/// The first node tagged `tag`.
pub fn find(tree: &ParseTree, tag: RuleTag) -> NodeRef<'_> {
    tree.find(tag)
        .unwrap_or_else(|| panic!("no {tag} node in:\n{tree}"))
}

/// The where clause's condition of a SELECT.
pub fn condition(tree: &ParseTree) -> NodeRef<'_> {
    find(tree, RuleTag::WhereClause)
        .child(1)
        .unwrap_or_else(|| panic!("empty where clause:\n{tree}"))
}

/// Verifies that `to_sql()` produces a fixed point:
/// parse(sql).to_sql() can be re-parsed into the same tree and yields
/// the same string again.
pub fn round_trip(sql: &str) {
    let tree1 = parse(sql);
    let rendered1 = tree1.to_sql();
    let tree2 = parse(&rendered1);
    let rendered2 = tree2.to_sql();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    assert_eq!(tree1.to_string(), tree2.to_string(), "Tree changed for: {sql}");
}

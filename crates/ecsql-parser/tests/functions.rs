//! Tests for function calls and aggregates.

mod common;
use common::*;

use ecsql_parser::{ErrorKind, NodeRef, ParseTree, RuleTag, Shape};

fn select(value: &str) -> ParseTree {
    parse(&format!("SELECT {value} FROM s.A"))
}

fn value(tree: &ParseTree) -> NodeRef<'_> {
    find(tree, RuleTag::DerivedColumn).child(0).unwrap()
}

#[test]
fn generic_function_call() {
    let tree = select("lower(a, 'x')");
    let call = value(&tree);
    assert_eq!(call.tag(), Some(RuleTag::FctSpec));
    assert_eq!(call.child_count(), 4);
    assert_eq!(call.child(0).unwrap().shape(), Shape::NameLeaf);
    let args = call.child(2).unwrap();
    assert_eq!(args.tag(), Some(RuleTag::FunctionArgsCommalist));
    assert_eq!(args.child_count(), 2);

    let tree = select("random()");
    let call = value(&tree);
    assert_eq!(call.child_count(), 3);
    assert_eq!(call.leaf_texts(), ["random", "(", ")"]);
}

#[test]
fn max_with_one_argument() {
    let tree = select("MAX(a)");
    let aggregate = value(&tree);
    assert_eq!(aggregate.tag(), Some(RuleTag::AggregateFct));
    assert_eq!(aggregate.child(0).unwrap().text(), Some("MAX"));
    assert_eq!(aggregate.child(2).unwrap().tag(), Some(RuleTag::OptAllDistinct));
    let args = aggregate.child(3).unwrap();
    assert_eq!(args.tag(), Some(RuleTag::FunctionArgsCommalist));
    assert_eq!(args.child_count(), 1);
}

#[test]
fn max_and_min_reject_several_arguments() {
    let err = parse_err("SELECT MAX(a, b) FROM s.A");
    assert_eq!(err.kind, ErrorKind::Semantic);
    assert!(err.message.contains("GREATEST"), "{}", err.message);
    assert_eq!(err.lexeme, "MAX");

    let err = parse_err("SELECT MIN(a, b, c) FROM s.A");
    assert_eq!(err.kind, ErrorKind::Semantic);
    assert_eq!(
        err.message,
        "MIN expects exactly one argument; use LEAST(...) to compare several values"
    );
}

#[test]
fn single_argument_aggregates() {
    for name in ["AVG", "SUM", "TOTAL", "COUNT"] {
        let tree = select(&format!("{name}(DISTINCT a)"));
        let aggregate = value(&tree);
        assert_eq!(aggregate.child(2).unwrap().text(), Some("DISTINCT"));

        let err = parse_err(&format!("SELECT {name}(a, b) FROM s.A"));
        assert_eq!(err.kind, ErrorKind::Semantic);
        assert_eq!(err.message, format!("{name} expects exactly one argument"));
    }
}

#[test]
fn count_star() {
    let tree = select("COUNT(*)");
    let aggregate = value(&tree);
    assert_eq!(aggregate.leaf_texts(), ["COUNT", "(", "*", ")"]);
}

#[test]
fn group_concat_arguments() {
    let tree = select("GROUP_CONCAT(a, ';')");
    assert_eq!(value(&tree).child(3).unwrap().child_count(), 2);

    let tree = select("GROUP_CONCAT(DISTINCT a)");
    assert_eq!(value(&tree).child(2).unwrap().text(), Some("DISTINCT"));

    let err = parse_err("SELECT GROUP_CONCAT(DISTINCT a, ';') FROM s.A");
    assert_eq!(
        err.message,
        "GROUP_CONCAT with DISTINCT or ALL does not accept a separator argument"
    );

    let err = parse_err("SELECT GROUP_CONCAT(a, ';', b) FROM s.A");
    assert_eq!(err.message, "GROUP_CONCAT expects one or two arguments");
}

#[test]
fn function_names_are_usable_as_properties() {
    let tree = select("Count, Max, Total");
    assert_eq!(tree.find_all(RuleTag::ColumnRef).count(), 3);
    assert!(tree.find(RuleTag::AggregateFct).is_none());
}

#[test]
fn iif() {
    let tree = select("IIF(a > 1 AND b, 'yes', 'no')");
    let iif = value(&tree);
    assert_eq!(iif.tag(), Some(RuleTag::IifSpec));
    assert_eq!(iif.child_count(), 8);
    assert_eq!(iif.child(2).unwrap().tag(), Some(RuleTag::BooleanTerm));
    assert_eq!(iif.child(4).unwrap().text(), Some("yes"));
}

#[test]
fn navigation_value() {
    let tree = select("NAVIGATION_VALUE(s.Parent.Child, 1, ?)");
    let nav = value(&tree);
    assert_eq!(nav.tag(), Some(RuleTag::NavigationValueFct));
    assert_eq!(nav.child_count(), 7);
    assert_eq!(nav.child(2).unwrap().tag(), Some(RuleTag::ColumnRef));
    let rel = nav.child(5).unwrap();
    assert_eq!(rel.tag(), Some(RuleTag::NavigationRelClass));
    assert_eq!(rel.child(1).unwrap().tag(), Some(RuleTag::Parameter));

    let tree = select("NAVIGATION_VALUE(s.Parent.Child, 1)");
    assert_eq!(
        value(&tree).child(5).unwrap().tag(),
        Some(RuleTag::OptNavigationRelClass)
    );
}

#[test]
fn nested_function_calls() {
    let tree = select("coalesce(upper(a), SUM(b) + 1)");
    let call = value(&tree);
    let args = call.child(2).unwrap();
    assert_eq!(args.child(0).unwrap().tag(), Some(RuleTag::FctSpec));
    assert_eq!(args.child(1).unwrap().tag(), Some(RuleTag::NumValueExp));
}

#[test]
fn semicolon_argument_separator_needs_shorthand_mode() {
    let err = parse_err("SELECT f(1; 2) FROM s.A");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.message, "Unexpected token: expected ')', found ';'");
}

#[test]
fn function_round_trips() {
    round_trip("SELECT COUNT(*), MAX(a), GROUP_CONCAT(DISTINCT b) FROM s.A");
    round_trip("SELECT IIF(a IS NULL, 0, a), lower(name), random() FROM s.A");
    round_trip("SELECT NAVIGATION_VALUE(s.P.C, 1, 2) FROM s.A");
}

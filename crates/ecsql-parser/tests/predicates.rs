//! Tests for search conditions and predicates.

mod common;
use common::*;

use ecsql_parser::{ParseTree, RuleTag};

fn where_(cond: &str) -> ParseTree {
    parse(&format!("SELECT * FROM s.A WHERE {cond}"))
}

#[test]
fn comparison_predicate_children() {
    let tree = where_("a = 1");
    let predicate = condition(&tree);
    assert_eq!(predicate.tag(), Some(RuleTag::ComparisonPredicate));
    assert_eq!(predicate.child_count(), 3);
    assert_eq!(predicate.child(0).unwrap().tag(), Some(RuleTag::ColumnRef));
    assert_eq!(predicate.child(1).unwrap().text(), Some("="));
    assert_eq!(predicate.child(2).unwrap().text(), Some("1"));
}

#[test]
fn comparison_operators() {
    for op in ["=", "<>", "<", "<=", ">", ">="] {
        let tree = where_(&format!("a {op} 1"));
        assert_eq!(condition(&tree).child(1).unwrap().text(), Some(op));
    }
    let tree = where_("a != 1");
    assert_eq!(condition(&tree).child(1).unwrap().text(), Some("<>"));
}

#[test]
fn is_comparison() {
    let tree = where_("a IS NOT b");
    let predicate = condition(&tree);
    assert_eq!(predicate.tag(), Some(RuleTag::ComparisonPredicate));
    let op = predicate.child(1).unwrap();
    assert_eq!(op.tag(), Some(RuleTag::Comparison));
    assert_eq!(op.leaf_texts(), ["IS", "NOT"]);
}

#[test]
fn quantified_comparison() {
    let tree = where_("a >= ANY (SELECT b FROM s.B)");
    let predicate = condition(&tree);
    assert_eq!(predicate.tag(), Some(RuleTag::AllOrAnyPredicate));
    let part = predicate.child(1).unwrap();
    assert_eq!(part.tag(), Some(RuleTag::QuantifiedComparisonPredicatePart2));
    assert_eq!(part.child(0).unwrap().text(), Some(">="));
    assert_eq!(part.child(1).unwrap().text(), Some("ANY"));
    assert_eq!(part.child(2).unwrap().tag(), Some(RuleTag::Subquery));
}

#[test]
fn between_predicate() {
    let tree = where_("a NOT BETWEEN 1 AND 10 AND b = 2");
    let term = condition(&tree);
    assert_eq!(term.tag(), Some(RuleTag::BooleanTerm));
    let between = term.child(0).unwrap();
    assert_eq!(between.tag(), Some(RuleTag::BetweenPredicate));
    let part = between.child(1).unwrap();
    assert_eq!(part.leaf_texts(), ["NOT", "BETWEEN", "1", "AND", "10"]);
}

#[test]
fn like_predicates() {
    let tree = where_("a LIKE 'ab%' ESCAPE '\\'");
    let like = condition(&tree);
    assert_eq!(like.tag(), Some(RuleTag::LikePredicate));
    let part = like.child(1).unwrap();
    assert_eq!(part.tag(), Some(RuleTag::CharacterLikePredicatePart2));
    assert_eq!(part.child(0).unwrap().tag(), Some(RuleTag::SqlNot));
    assert_eq!(part.child(3).unwrap().tag(), Some(RuleTag::EscapeClause));

    let tree = where_("a NOT LIKE 'x' || b");
    let part = condition(&tree).child(1).unwrap();
    assert_eq!(part.tag(), Some(RuleTag::CharacterLikePredicatePart2));
    assert_eq!(part.child(0).unwrap().text(), Some("NOT"));

    let tree = where_("a LIKE ?");
    let part = condition(&tree).child(1).unwrap();
    assert_eq!(part.tag(), Some(RuleTag::OtherLikePredicatePart2));
    assert_eq!(part.child(3).unwrap().tag(), Some(RuleTag::OptEscape));
}

#[test]
fn null_tests() {
    let tree = where_("a IS NULL");
    let test = condition(&tree);
    assert_eq!(test.tag(), Some(RuleTag::TestForNull));
    let part = test.child(1).unwrap();
    assert_eq!(part.tag(), Some(RuleTag::NullPredicatePart2));
    assert_eq!(part.child(1).unwrap().tag(), Some(RuleTag::SqlNot));

    let tree = where_("a IS NOT NULL");
    let part = condition(&tree).child(1).unwrap();
    assert_eq!(part.leaf_texts(), ["IS", "NOT", "NULL"]);
}

#[test]
fn in_predicates() {
    let tree = where_("a IN (1, 2, 3)");
    let in_predicate = condition(&tree);
    assert_eq!(in_predicate.tag(), Some(RuleTag::InPredicate));
    let value = find(&tree, RuleTag::InPredicateValue);
    assert_eq!(value.child_count(), 3);
    assert_eq!(value.child(1).unwrap().child_count(), 3);

    let tree = where_("a NOT IN (SELECT b FROM s.B)");
    let part = find(&tree, RuleTag::InPredicatePart2);
    assert_eq!(part.child(0).unwrap().text(), Some("NOT"));
    let value = part.child(2).unwrap();
    assert_eq!(value.child_count(), 1);
    assert_eq!(value.child(0).unwrap().tag(), Some(RuleTag::Subquery));
}

#[test]
fn exists_and_unique() {
    let tree = where_("EXISTS (SELECT 1 FROM s.B)");
    assert_eq!(condition(&tree).tag(), Some(RuleTag::ExistenceTest));

    let tree = where_("NOT UNIQUE (SELECT a FROM s.B)");
    let factor = condition(&tree);
    assert_eq!(factor.tag(), Some(RuleTag::BooleanFactor));
    assert_eq!(factor.child(1).unwrap().tag(), Some(RuleTag::UniqueTest));
}

#[test]
fn rtree_match() {
    let tree = where_("a.Id MATCH iModel_spatial_overlap_aabb(:bbox)");
    let predicate = condition(&tree);
    assert_eq!(predicate.tag(), Some(RuleTag::RtreematchPredicate));
    let part = predicate.child(1).unwrap();
    assert_eq!(part.child(1).unwrap().text(), Some("MATCH"));
    assert_eq!(part.child(2).unwrap().tag(), Some(RuleTag::FctSpec));
}

#[test]
fn type_predicate() {
    let tree = where_("ECClassId IS NOT (ONLY s.B, s.C)");
    let predicate = condition(&tree);
    assert_eq!(predicate.tag(), Some(RuleTag::TypePredicate));
    assert_eq!(predicate.child_count(), 6);
    let list = predicate.child(4).unwrap();
    assert_eq!(list.child_count(), 2);
    let first = list.child(0).unwrap();
    assert_eq!(first.tag(), Some(RuleTag::TypeListItem));
    assert_eq!(first.child(0).unwrap().text(), Some("ONLY"));
    assert_eq!(list.child(1).unwrap().child(0).unwrap().tag(), Some(RuleTag::OptOnly));
}

#[test]
fn boolean_tests() {
    let tree = where_("a IS NOT TRUE");
    let test = condition(&tree);
    assert_eq!(test.tag(), Some(RuleTag::BooleanTest));
    assert_eq!(test.child(0).unwrap().tag(), Some(RuleTag::UnaryPredicate));
    assert_eq!(test.child(3).unwrap().text(), Some("TRUE"));

    let tree = where_("(a = 1) IS UNKNOWN");
    let test = condition(&tree);
    assert_eq!(test.tag(), Some(RuleTag::BooleanTest));
    assert_eq!(test.child(0).unwrap().tag(), Some(RuleTag::BooleanPrimary));
    assert_eq!(test.child(2).unwrap().tag(), Some(RuleTag::SqlNot));
}

#[test]
fn boolean_structure() {
    let tree = where_("a = 1 OR b = 2 OR c = 3");
    let or = condition(&tree);
    assert_eq!(or.tag(), Some(RuleTag::SearchCondition));
    // left associative
    assert_eq!(or.child(0).unwrap().tag(), Some(RuleTag::SearchCondition));
    assert_eq!(or.child(1).unwrap().text(), Some("OR"));

    let tree = where_("NOT a = 1 AND b");
    let and = condition(&tree);
    assert_eq!(and.tag(), Some(RuleTag::BooleanTerm));
    assert_eq!(and.child(0).unwrap().tag(), Some(RuleTag::BooleanFactor));
    assert_eq!(and.child(2).unwrap().tag(), Some(RuleTag::UnaryPredicate));
}

#[test]
fn parenthesised_conditions() {
    let tree = where_("(a = 1 OR b = 2) AND c");
    let and = condition(&tree);
    let primary = and.child(0).unwrap();
    assert_eq!(primary.tag(), Some(RuleTag::BooleanPrimary));
    assert_eq!(primary.child(0).unwrap().text(), Some("("));
    assert_eq!(primary.child(1).unwrap().tag(), Some(RuleTag::SearchCondition));
}

#[test]
fn parenthesised_values_in_conditions() {
    let tree = where_("(a) = 1");
    let predicate = condition(&tree);
    assert_eq!(predicate.tag(), Some(RuleTag::ComparisonPredicate));
    let lhs = predicate.child(0).unwrap();
    assert_eq!(lhs.tag(), Some(RuleTag::ValueExpPrimary));
    assert_eq!(lhs.child(1).unwrap().tag(), Some(RuleTag::ColumnRef));

    let tree = where_("((a + 1)) * 2 BETWEEN 1 AND 5");
    let between = condition(&tree);
    assert_eq!(between.tag(), Some(RuleTag::BetweenPredicate));
    assert_eq!(between.child(0).unwrap().tag(), Some(RuleTag::Term));
}

#[test]
fn deeply_nested_parentheses_parse_linearly() {
    let depth = 40;
    let cond = format!("{}a = 1{}", "(".repeat(depth), ")".repeat(depth));
    let tree = where_(&cond);
    assert_eq!(tree.find_all(RuleTag::BooleanPrimary).count(), depth);
}

#[test]
fn predicate_round_trips() {
    round_trip("SELECT * FROM s.A WHERE a NOT BETWEEN 1 AND 2 OR b LIKE 'x%' ESCAPE '!'");
    round_trip("SELECT * FROM s.A WHERE a IN (1, 2) AND b IS NOT NULL AND NOT c IS TRUE");
    round_trip("SELECT * FROM s.A WHERE ECClassId IS (ONLY s.B) AND (a + 1) * 2 > 3");
    round_trip("SELECT * FROM s.A WHERE EXISTS (SELECT 1 FROM s.B WHERE b.Id = a.Id)");
}

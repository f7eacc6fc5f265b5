//! Tests for SELECT statements and their clauses.

mod common;
use common::*;

use ecsql_parser::{RuleTag, Shape};

#[test]
fn select_star_from_class() {
    let tree = parse("SELECT * FROM Foo.Bar");
    let root = tree.root();
    assert_eq!(root.tag(), Some(RuleTag::SelectStatement));
    assert_eq!(root.child_count(), 1);

    let single = root_child(&tree, 0);
    assert_eq!(single.tag(), Some(RuleTag::SingleSelectStatement));
    assert_eq!(single.child_count(), 4);
    assert_eq!(single.child(0).unwrap().text(), Some("SELECT"));
    assert_eq!(single.child(1).unwrap().tag(), Some(RuleTag::OptAllDistinct));
    let selection = single.child(2).unwrap();
    assert_eq!(selection.tag(), Some(RuleTag::Selection));
    assert_eq!(selection.leaf_texts(), ["*"]);
}

#[test]
fn select_distinct_and_all() {
    let tree = parse("SELECT DISTINCT a FROM s.A");
    let single = root_child(&tree, 0);
    assert_eq!(single.child(1).unwrap().text(), Some("DISTINCT"));

    let tree = parse("SELECT ALL a FROM s.A");
    let single = root_child(&tree, 0);
    assert_eq!(single.child(1).unwrap().text(), Some("ALL"));
}

#[test]
fn select_list_is_flattened() {
    let tree = parse("SELECT a, b, c, d, e FROM s.A");
    let list = find(&tree, RuleTag::ScalarExpCommalist);
    assert_eq!(list.shape(), Shape::CommaList);
    assert_eq!(list.child_count(), 5);
    for column in list.children() {
        assert_eq!(column.tag(), Some(RuleTag::DerivedColumn));
    }
}

#[test]
fn select_column_aliases() {
    let tree = parse("SELECT a AS x, b y, c FROM s.A");
    let list = find(&tree, RuleTag::ScalarExpCommalist);
    let aliases: Vec<_> = list.children().map(|c| c.child(1).unwrap()).collect();

    assert_eq!(aliases[0].tag(), Some(RuleTag::AsClause));
    assert_eq!(aliases[0].leaf_texts(), ["AS", "x"]);
    assert_eq!(aliases[1].tag(), Some(RuleTag::AsClause));
    assert_eq!(aliases[1].child(0).unwrap().tag(), Some(RuleTag::OptAs));
    assert_eq!(aliases[1].leaf_texts(), ["y"]);
    assert_eq!(aliases[2].tag(), Some(RuleTag::OptAsClause));
}

#[test]
fn select_without_from() {
    let tree = parse("SELECT 1");
    let table_exp = find(&tree, RuleTag::TableExp);
    assert_eq!(table_exp.child_count(), 8);
    assert_eq!(table_exp.child(0).unwrap().tag(), Some(RuleTag::OptFromClause));
}

#[test]
fn table_exp_clause_order() {
    let tree = parse(
        "SELECT a, COUNT(*) FROM s.A WHERE a > 1 GROUP BY a HAVING COUNT(*) > 2 \
         WINDOW w AS (PARTITION BY a) ORDER BY a DESC LIMIT 10 OFFSET 5 \
         ECSQLOPTIONS NoECClassIdFilter",
    );
    let table_exp = find(&tree, RuleTag::TableExp);
    let tags: Vec<_> = table_exp.children().map(|c| c.tag()).collect();
    assert_eq!(
        tags,
        [
            Some(RuleTag::FromClause),
            Some(RuleTag::WhereClause),
            Some(RuleTag::GroupByClause),
            Some(RuleTag::HavingClause),
            Some(RuleTag::WindowClause),
            Some(RuleTag::OrderByClause),
            Some(RuleTag::LimitOffsetClause),
            Some(RuleTag::EcsqloptionsClause),
        ]
    );
}

#[test]
fn order_by_directions() {
    let tree = parse("SELECT a FROM s.A ORDER BY a DESC, b, c ASC");
    let specs = find(&tree, RuleTag::OrderingSpecCommalist);
    assert_eq!(specs.child_count(), 3);

    let directions: Vec<_> = specs
        .children()
        .map(|spec| spec.child(1).unwrap())
        .collect();
    assert_eq!(directions[0].text(), Some("DESC"));
    assert_eq!(directions[1].tag(), Some(RuleTag::OptAscDesc));
    assert_eq!(directions[2].text(), Some("ASC"));

    // the ordering value is the column itself, not a predicate wrapper
    let first = specs.child(0).unwrap().child(0).unwrap();
    assert_eq!(first.tag(), Some(RuleTag::ColumnRef));
}

#[test]
fn order_by_predicate() {
    let tree = parse("SELECT a FROM s.A ORDER BY a IS NULL");
    let spec = find(&tree, RuleTag::OrderingSpec);
    assert_eq!(spec.child(0).unwrap().tag(), Some(RuleTag::TestForNull));
}

#[test]
fn limit_without_offset() {
    let tree = parse("SELECT a FROM s.A LIMIT ?");
    let limit = find(&tree, RuleTag::LimitOffsetClause);
    assert_eq!(limit.child(1).unwrap().tag(), Some(RuleTag::Parameter));
    assert_eq!(limit.child(2).unwrap().tag(), Some(RuleTag::OptOffset));
}

#[test]
fn union_chain_nests_right() {
    let tree = parse("SELECT a FROM s.A UNION SELECT b FROM s.B INTERSECT SELECT c FROM s.C");
    let root = tree.root();
    assert_eq!(root.child_count(), 4);
    assert_eq!(root.child(1).unwrap().text(), Some("UNION"));
    assert_eq!(root.child(2).unwrap().tag(), Some(RuleTag::All));

    let rest = root.child(3).unwrap();
    assert_eq!(rest.tag(), Some(RuleTag::SelectStatement));
    assert_eq!(rest.child(1).unwrap().text(), Some("INTERSECT"));
    let last = rest.child(3).unwrap();
    assert_eq!(last.child_count(), 1);
}

#[test]
fn long_union_chain_is_not_limited_by_depth() {
    let sql = vec!["SELECT 1"; 300].join(" UNION ALL ");
    let tree = parse(&sql);
    assert_eq!(tree.find_all(RuleTag::SingleSelectStatement).count(), 300);
}

#[test]
fn values_as_query() {
    let tree = parse("VALUES (1, 'a', NULL)");
    let values = root_child(&tree, 0);
    assert_eq!(values.tag(), Some(RuleTag::ValuesOrQuerySpec));
    let row = values.child(2).unwrap();
    assert_eq!(row.tag(), Some(RuleTag::RowValueConstructorCommalist));
    assert_eq!(row.child_count(), 3);
}

#[test]
fn select_round_trips() {
    round_trip("SELECT DISTINCT a AS x, b FROM s.A WHERE a = 1 ORDER BY b DESC LIMIT 5");
    round_trip("SELECT a FROM s.A UNION ALL SELECT b FROM s.B");
    round_trip("SELECT [Select], \"my col\" FROM [My Schema].[Class]");
    round_trip("SELECT a FROM s.A WHERE b = :param AND c = ?");
}

//! Search conditions and predicates.
//!
//! A predicate is read as its left operand followed by an optional tail
//! (`= x`, `BETWEEN a AND b`, `IS NULL`, ...). The tail is parsed on its
//! own so CASE when-operands and shorthand predicates can reuse it.

use super::pratt::comparison_op;
use super::{ParseError, Parser};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, RuleTag};

/// What follows the left operand of a predicate.
enum PredicateTail {
    None,
    /// `op rhs`, where `op` is a punctuation leaf or `comparison[IS, sql_not]`.
    Comparison { op: NodeId, rhs: NodeId },
    /// A finished `*_part_2` node; `tag` is the predicate it completes.
    Part2 { tag: RuleTag, part: NodeId },
    /// `IS [NOT] (type, ...)`
    Type {
        is: NodeId,
        not: NodeId,
        open: NodeId,
        list: NodeId,
        close: NodeId,
    },
    /// `IS [NOT] TRUE|FALSE|UNKNOWN`
    Truth { is: NodeId, not: NodeId, value: NodeId },
}

impl Parser<'_> {
    /// Parses `boolean_term (OR boolean_term)*`.
    pub(super) fn parse_search_condition(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            let mut left = p.parse_boolean_term()?;
            while let Some(or) = p.eat_keyword(Keyword::Or) {
                let right = p.parse_boolean_term()?;
                left = p.arena.rule(RuleTag::SearchCondition, [left, or, right]);
            }
            Ok(left)
        })
    }

    fn parse_boolean_term(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_boolean_factor()?;
        while let Some(and) = self.eat_keyword(Keyword::And) {
            let right = self.parse_boolean_factor()?;
            left = self.arena.rule(RuleTag::BooleanTerm, [left, and, right]);
        }
        Ok(left)
    }

    fn parse_boolean_factor(&mut self) -> Result<NodeId, ParseError> {
        // NOT LIKE / NOT IN without a left operand is a shorthand predicate
        let factor_not = self.check_keyword(Keyword::Not)
            && !matches!(
                self.peek().as_keyword(),
                Some(Keyword::Like | Keyword::In)
            );
        if factor_not {
            let not = self.keyword_leaf(Keyword::Not);
            let test = self.parse_boolean_test()?;
            return Ok(self.arena.rule(RuleTag::BooleanFactor, [not, test]));
        }
        self.parse_boolean_test()
    }

    fn parse_boolean_test(&mut self) -> Result<NodeId, ParseError> {
        let primary = self.parse_boolean_primary()?;
        let Some(is) = self.eat_keyword(Keyword::Is) else {
            return Ok(primary);
        };
        let not = self.opt_not();
        let value = self.parse_truth_value()?;
        Ok(self
            .arena
            .rule(RuleTag::BooleanTest, [primary, is, not, value]))
    }

    fn parse_truth_value(&mut self) -> Result<NodeId, ParseError> {
        match self.current_word() {
            Some(kw @ (Keyword::True | Keyword::False | Keyword::Unknown)) => {
                Ok(self.keyword_leaf(kw))
            }
            _ => Err(self.error_here("TRUE, FALSE or UNKNOWN")),
        }
    }

    fn parse_boolean_primary(&mut self) -> Result<NodeId, ParseError> {
        match self.current.as_keyword() {
            Some(kw @ (Keyword::Exists | Keyword::Unique)) => {
                let keyword = self.keyword_leaf(kw);
                let subquery = self.parse_subquery()?;
                let tag = if kw == Keyword::Exists {
                    RuleTag::ExistenceTest
                } else {
                    RuleTag::UniqueTest
                };
                return Ok(self.arena.rule(tag, [keyword, subquery]));
            }
            _ => {}
        }

        if self.check(&TokenKind::LeftParen) && !self.peek_starts_query() {
            return self.parse_parenthesized_condition();
        }

        let lhs = if self.at_shorthand_start() {
            let (at, lexeme) = (self.current.span, self.lexeme());
            self.actions().shorthand_column_ref(at, lexeme)?
        } else {
            self.parse_value_exp()?
        };
        let tail = self.parse_predicate_part_2()?;
        Ok(self.complete_predicate(lhs, tail))
    }

    /// `( condition )`. A parenthesised plain value is re-read as a value
    /// so it can carry operators and a predicate tail: `(a + 1) * 2 > 3`.
    fn parse_parenthesized_condition(&mut self) -> Result<NodeId, ParseError> {
        let open = self.punct("(");
        let inner = self.parse_search_condition()?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;

        if self.arena.rule_tag(inner) != Some(RuleTag::UnaryPredicate) {
            return Ok(self
                .arena
                .rule(RuleTag::BooleanPrimary, [open, inner, close]));
        }

        let value = self.actions().unwrap_unary(inner);
        let primary = self
            .arena
            .rule(RuleTag::ValueExpPrimary, [open, value, close]);
        let lhs = self.parse_value_exp_continue(primary, 0)?;
        let tail = self.parse_predicate_part_2()?;
        Ok(self.complete_predicate(lhs, tail))
    }

    /// Parses a search condition and unwraps a bare value.
    pub(super) fn parse_value_or_predicate(&mut self) -> Result<NodeId, ParseError> {
        let condition = self.parse_search_condition()?;
        Ok(self.actions().unwrap_unary(condition))
    }

    /// True at a token that can only start a predicate without its left
    /// operand.
    pub(super) fn at_shorthand_start(&mut self) -> bool {
        if self.current.kind.is_comparison() {
            return true;
        }
        match self.current.as_keyword() {
            Some(Keyword::Is | Keyword::Like | Keyword::In) => true,
            Some(Keyword::Not) => matches!(
                self.peek().as_keyword(),
                Some(Keyword::Like | Keyword::In)
            ),
            _ => false,
        }
    }

    /// True at the start of a predicate tail.
    pub(super) fn at_predicate_tail(&mut self) -> bool {
        if self.current.kind.is_comparison() {
            return true;
        }
        match self.current.as_keyword() {
            Some(
                Keyword::Is | Keyword::Like | Keyword::In | Keyword::Between | Keyword::Match,
            ) => true,
            Some(Keyword::Not) => matches!(
                self.peek().as_keyword(),
                Some(Keyword::Like | Keyword::In | Keyword::Between | Keyword::Match)
            ),
            _ => false,
        }
    }

    fn parse_predicate_part_2(&mut self) -> Result<PredicateTail, ParseError> {
        if let Some(op) = comparison_op(&self.current.kind) {
            let op = self.punct(op);
            return self.parse_comparison_rhs(op);
        }

        if let Some(is) = self.eat_keyword(Keyword::Is) {
            return self.parse_is_tail(is);
        }

        let not = if self.check_keyword(Keyword::Not) && self.at_predicate_tail() {
            self.keyword_leaf(Keyword::Not)
        } else {
            self.arena.empty(RuleTag::SqlNot)
        };

        let tail = match self.current.as_keyword() {
            Some(Keyword::Between) => {
                let between = self.keyword_leaf(Keyword::Between);
                let low = self.parse_value_exp()?;
                let and = self.expect_keyword(Keyword::And)?;
                let high = self.parse_value_exp()?;
                let part = self.arena.rule(
                    RuleTag::BetweenPredicatePart2,
                    [not, between, low, and, high],
                );
                PredicateTail::Part2 {
                    tag: RuleTag::BetweenPredicate,
                    part,
                }
            }
            Some(Keyword::Like) => {
                let like = self.keyword_leaf(Keyword::Like);
                let pattern = self.parse_value_exp()?;
                let escape = match self.eat_keyword(Keyword::Escape) {
                    Some(escape) => {
                        let value = self.parse_value_exp()?;
                        self.arena.rule(RuleTag::EscapeClause, [escape, value])
                    }
                    None => self.arena.empty(RuleTag::OptEscape),
                };
                let tag = self.actions().like_part_2_tag(pattern);
                let part = self.arena.rule(tag, [not, like, pattern, escape]);
                PredicateTail::Part2 {
                    tag: RuleTag::LikePredicate,
                    part,
                }
            }
            Some(Keyword::In) => {
                let in_kw = self.keyword_leaf(Keyword::In);
                let value = self.parse_in_predicate_value()?;
                let part = self
                    .arena
                    .rule(RuleTag::InPredicatePart2, [not, in_kw, value]);
                PredicateTail::Part2 {
                    tag: RuleTag::InPredicate,
                    part,
                }
            }
            Some(Keyword::Match) => {
                let match_kw = self.keyword_leaf(Keyword::Match);
                let function = self.parse_fct_spec()?;
                let part = self
                    .arena
                    .rule(RuleTag::RtreematchPredicatePart2, [not, match_kw, function]);
                PredicateTail::Part2 {
                    tag: RuleTag::RtreematchPredicate,
                    part,
                }
            }
            _ => PredicateTail::None,
        };
        Ok(tail)
    }

    fn parse_comparison_rhs(&mut self, op: NodeId) -> Result<PredicateTail, ParseError> {
        match self.current.as_keyword() {
            Some(kw @ (Keyword::All | Keyword::Any | Keyword::Some)) => {
                let quantifier = self.keyword_leaf(kw);
                let subquery = self.parse_subquery()?;
                let part = self.arena.rule(
                    RuleTag::QuantifiedComparisonPredicatePart2,
                    [op, quantifier, subquery],
                );
                Ok(PredicateTail::Part2 {
                    tag: RuleTag::AllOrAnyPredicate,
                    part,
                })
            }
            _ => {
                let rhs = self.parse_value_exp()?;
                Ok(PredicateTail::Comparison { op, rhs })
            }
        }
    }

    /// Everything after `IS`.
    fn parse_is_tail(&mut self, is: NodeId) -> Result<PredicateTail, ParseError> {
        let not = self.opt_not();

        if let Some(null) = self.eat_keyword(Keyword::Null) {
            let part = self
                .arena
                .rule(RuleTag::NullPredicatePart2, [is, not, null]);
            return Ok(PredicateTail::Part2 {
                tag: RuleTag::TestForNull,
                part,
            });
        }

        if self.check(&TokenKind::LeftParen) {
            let open = self.punct("(");
            let list = self.parse_comma_list(RuleTag::TypeList, false, Self::parse_type_list_item)?;
            let close = self.expect(&TokenKind::RightParen, "')'")?;
            return Ok(PredicateTail::Type {
                is,
                not,
                open,
                list,
                close,
            });
        }

        if let Some(kw @ (Keyword::True | Keyword::False | Keyword::Unknown)) = self.current_word()
        {
            let value = self.keyword_leaf(kw);
            return Ok(PredicateTail::Truth { is, not, value });
        }

        let op = self.arena.rule(RuleTag::Comparison, [is, not]);
        self.parse_comparison_rhs(op)
    }

    fn parse_type_list_item(&mut self) -> Result<NodeId, ParseError> {
        let only = self.opt_keyword(Keyword::Only, RuleTag::OptOnly);
        let class = self.parse_table_node()?;
        Ok(self.arena.rule(RuleTag::TypeListItem, [only, class]))
    }

    fn parse_in_predicate_value(&mut self) -> Result<NodeId, ParseError> {
        if !self.check(&TokenKind::LeftParen) {
            return Err(self.error_here("'('"));
        }
        if self.peek_starts_query() {
            let subquery = self.parse_subquery()?;
            return Ok(self.arena.rule(RuleTag::InPredicateValue, [subquery]));
        }
        let open = self.punct("(");
        let values = self.parse_comma_list(
            RuleTag::ValueExpCommalist,
            true,
            Self::parse_value_exp,
        )?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self
            .arena
            .rule(RuleTag::InPredicateValue, [open, values, close]))
    }

    fn complete_predicate(&mut self, lhs: NodeId, tail: PredicateTail) -> NodeId {
        match tail {
            PredicateTail::None => self.arena.rule(RuleTag::UnaryPredicate, [lhs]),
            PredicateTail::Comparison { op, rhs } => self
                .arena
                .rule(RuleTag::ComparisonPredicate, [lhs, op, rhs]),
            PredicateTail::Part2 { tag, part } => self.arena.rule(tag, [lhs, part]),
            PredicateTail::Type {
                is,
                not,
                open,
                list,
                close,
            } => self
                .arena
                .rule(RuleTag::TypePredicate, [lhs, is, not, open, list, close]),
            PredicateTail::Truth { is, not, value } => {
                let operand = self.arena.rule(RuleTag::UnaryPredicate, [lhs]);
                self.arena
                    .rule(RuleTag::BooleanTest, [operand, is, not, value])
            }
        }
    }

    /// One operand after `WHEN` in a simple CASE: a value, or a predicate
    /// tail applied to the CASE operand.
    pub(super) fn parse_when_operand(&mut self) -> Result<NodeId, ParseError> {
        if !self.at_predicate_tail() {
            return self.parse_value_exp();
        }
        let (at, lexeme) = (self.current.span, self.lexeme());
        match self.parse_predicate_part_2()? {
            PredicateTail::Comparison { op, rhs } => Ok(self
                .arena
                .rule(RuleTag::ComparisonPredicatePart2, [op, rhs])),
            PredicateTail::Part2 { part, .. } => Ok(part),
            PredicateTail::None | PredicateTail::Type { .. } | PredicateTail::Truth { .. } => Err(
                ParseError::syntax("predicate is not allowed as a CASE operand", at, lexeme),
            ),
        }
    }
}

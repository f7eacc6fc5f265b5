//! SELECT statements, common table expressions and the FROM list.

use super::{ParseError, Parser};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, RuleTag};

impl Parser<'_> {
    /// Parses a SELECT statement, with an optional WITH prefix and set
    /// operations.
    pub(super) fn parse_select_statement(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| {
            if p.check_keyword(Keyword::With) {
                let cte = p.parse_cte()?;
                let select = p.parse_compound_select()?;
                return Ok(p.arena.rule(RuleTag::SelectStatement, [cte, select]));
            }
            p.parse_compound_select()
        })
    }

    /// `single [UNION|INTERSECT|EXCEPT [ALL] single]...`, nested to the
    /// right.
    fn parse_compound_select(&mut self) -> Result<NodeId, ParseError> {
        let mut operands = vec![self.parse_single_select()?];
        let mut operators = Vec::new();
        while let Some(op @ (Keyword::Union | Keyword::Intersect | Keyword::Except)) =
            self.current.as_keyword()
        {
            let op = self.keyword_leaf(op);
            let all = self.opt_keyword(Keyword::All, RuleTag::All);
            operators.push((op, all));
            operands.push(self.parse_single_select()?);
        }

        // operands always holds one more entry than operators
        let last = operands[operators.len()];
        let mut select = self.arena.rule(RuleTag::SelectStatement, [last]);
        for (i, (op, all)) in operators.into_iter().enumerate().rev() {
            select = self
                .arena
                .rule(RuleTag::SelectStatement, [operands[i], op, all, select]);
        }
        Ok(select)
    }

    fn parse_single_select(&mut self) -> Result<NodeId, ParseError> {
        if self.check_keyword(Keyword::Values) {
            return self.parse_values();
        }
        let select = self.expect_keyword(Keyword::Select)?;
        let quantifier = self.parse_opt_all_distinct();
        let selection = if self.check(&TokenKind::Star) {
            let star = self.punct("*");
            self.arena.rule(RuleTag::Selection, [star])
        } else {
            self.parse_comma_list(RuleTag::ScalarExpCommalist, false, Self::parse_derived_column)?
        };
        let table_exp = self.parse_table_exp()?;
        Ok(self.arena.rule(
            RuleTag::SingleSelectStatement,
            [select, quantifier, selection, table_exp],
        ))
    }

    /// `ALL` or `DISTINCT` leaf, or an empty `opt_all_distinct`.
    pub(super) fn parse_opt_all_distinct(&mut self) -> NodeId {
        match self.current.as_keyword() {
            Some(kw @ (Keyword::All | Keyword::Distinct)) => self.keyword_leaf(kw),
            _ => self.arena.empty(RuleTag::OptAllDistinct),
        }
    }

    fn parse_derived_column(&mut self) -> Result<NodeId, ParseError> {
        let value = self.parse_value_exp()?;
        let alias = if let Some(as_kw) = self.eat_keyword(Keyword::As) {
            let name = self.expect_name()?;
            self.arena.rule(RuleTag::AsClause, [as_kw, name])
        } else if self.is_name() {
            let as_kw = self.arena.empty(RuleTag::OptAs);
            let name = self.expect_name()?;
            self.arena.rule(RuleTag::AsClause, [as_kw, name])
        } else {
            self.arena.empty(RuleTag::OptAsClause)
        };
        Ok(self.arena.rule(RuleTag::DerivedColumn, [value, alias]))
    }

    /// The eight clauses following the select list; absent ones are empty
    /// `opt_*` nodes.
    fn parse_table_exp(&mut self) -> Result<NodeId, ParseError> {
        let from = match self.eat_keyword(Keyword::From) {
            Some(from) => {
                let refs = self.parse_comma_list(
                    RuleTag::TableRefCommalist,
                    false,
                    Self::parse_table_ref,
                )?;
                self.arena.rule(RuleTag::FromClause, [from, refs])
            }
            None => self.arena.empty(RuleTag::OptFromClause),
        };
        let where_clause = self.parse_opt_where()?;

        let group_by = match self.eat_keyword(Keyword::Group) {
            Some(group) => {
                let by = self.expect_keyword(Keyword::By)?;
                let values = self.parse_comma_list(
                    RuleTag::ValueExpCommalist,
                    false,
                    Self::parse_value_exp,
                )?;
                self.arena.rule(RuleTag::GroupByClause, [group, by, values])
            }
            None => self.arena.empty(RuleTag::OptGroupByClause),
        };

        let having = match self.eat_keyword(Keyword::Having) {
            Some(having) => {
                let condition = self.parse_search_condition()?;
                self.arena.rule(RuleTag::HavingClause, [having, condition])
            }
            None => self.arena.empty(RuleTag::OptHavingClause),
        };

        let window = match self.eat_keyword(Keyword::Window) {
            Some(window) => {
                let definitions = self.parse_comma_list(
                    RuleTag::WindowDefinitionList,
                    false,
                    Self::parse_window_definition,
                )?;
                self.arena.rule(RuleTag::WindowClause, [window, definitions])
            }
            None => self.arena.empty(RuleTag::OptWindowClause),
        };

        let order_by = self.parse_opt_order_by()?;
        let limit = self.parse_opt_limit()?;
        let options = self.parse_opt_options()?;

        Ok(self.arena.rule(
            RuleTag::TableExp,
            [from, where_clause, group_by, having, window, order_by, limit, options],
        ))
    }

    /// Parses an optional `WHERE condition`.
    pub(super) fn parse_opt_where(&mut self) -> Result<NodeId, ParseError> {
        match self.eat_keyword(Keyword::Where) {
            Some(where_kw) => self.parse_where_rest(where_kw),
            None => Ok(self.arena.empty(RuleTag::OptWhereClause)),
        }
    }

    pub(super) fn parse_where_rest(&mut self, where_kw: NodeId) -> Result<NodeId, ParseError> {
        let condition = self.parse_search_condition()?;
        Ok(self.arena.rule(RuleTag::WhereClause, [where_kw, condition]))
    }

    /// Parses an optional `ORDER BY spec, ...`.
    pub(super) fn parse_opt_order_by(&mut self) -> Result<NodeId, ParseError> {
        let Some(order) = self.eat_keyword(Keyword::Order) else {
            return Ok(self.arena.empty(RuleTag::OptOrderByClause));
        };
        let by = self.expect_keyword(Keyword::By)?;
        let specs = self.parse_comma_list(
            RuleTag::OrderingSpecCommalist,
            false,
            Self::parse_ordering_spec,
        )?;
        Ok(self.arena.rule(RuleTag::OrderByClause, [order, by, specs]))
    }

    fn parse_ordering_spec(&mut self) -> Result<NodeId, ParseError> {
        let value = self.parse_value_or_predicate()?;
        let direction = match self.current.as_keyword() {
            Some(kw @ (Keyword::Asc | Keyword::Desc)) => self.keyword_leaf(kw),
            _ => self.arena.empty(RuleTag::OptAscDesc),
        };
        Ok(self.arena.rule(RuleTag::OrderingSpec, [value, direction]))
    }

    fn parse_opt_limit(&mut self) -> Result<NodeId, ParseError> {
        let Some(limit) = self.eat_keyword(Keyword::Limit) else {
            return Ok(self.arena.empty(RuleTag::OptLimitOffsetClause));
        };
        let count = self.parse_value_exp()?;
        let offset = match self.eat_keyword(Keyword::Offset) {
            Some(offset) => {
                let value = self.parse_value_exp()?;
                self.arena.rule(RuleTag::OffsetClause, [offset, value])
            }
            None => self.arena.empty(RuleTag::OptOffset),
        };
        Ok(self
            .arena
            .rule(RuleTag::LimitOffsetClause, [limit, count, offset]))
    }

    /// `WITH [RECURSIVE] name [(cols)] AS (select), ...`
    fn parse_cte(&mut self) -> Result<NodeId, ParseError> {
        let with = self.expect_keyword(Keyword::With)?;
        let recursive = if self.check_keyword(Keyword::Recursive)
            && matches!(
                self.peek().kind,
                TokenKind::Name(_) | TokenKind::QuotedName(_)
            ) {
            self.keyword_leaf(Keyword::Recursive)
        } else {
            self.arena.empty(RuleTag::OptRecursive)
        };
        let blocks =
            self.parse_comma_list(RuleTag::CteBlockList, false, Self::parse_cte_table_name)?;
        Ok(self.arena.rule(RuleTag::Cte, [with, recursive, blocks]))
    }

    fn parse_cte_table_name(&mut self) -> Result<NodeId, ParseError> {
        let name = self.expect_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            let open = self.punct("(");
            let list = self.parse_comma_list(RuleTag::ColumnCommalist, false, Self::expect_name)?;
            let close = self.expect(&TokenKind::RightParen, "')'")?;
            self.arena
                .rule(RuleTag::ColumnCommalistClause, [open, list, close])
        } else {
            self.arena.empty(RuleTag::OptColumnCommalist)
        };
        let as_kw = self.expect_keyword(Keyword::As)?;
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let select = self.parse_select_statement()?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self.arena.rule(
            RuleTag::CteTableName,
            [name, columns, as_kw, open, select, close],
        ))
    }

    /// Parses one FROM item with any joins chained to it.
    fn parse_table_ref(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_table_primary()?;
        loop {
            if let Some(cross) = self.eat_keyword(Keyword::Cross) {
                let join = self.expect_keyword(Keyword::Join)?;
                let right = self.parse_table_primary()?;
                left = self
                    .arena
                    .rule(RuleTag::CrossUnion, [left, cross, join, right]);
                continue;
            }

            if let Some(natural) = self.eat_keyword(Keyword::Natural) {
                let join_type = self.parse_join_type()?;
                let join = self.expect_keyword(Keyword::Join)?;
                let right = self.parse_table_primary()?;
                left = self.arena.rule(
                    RuleTag::QualifiedJoin,
                    [left, natural, join_type, join, right],
                );
                continue;
            }

            let starts_join = matches!(
                self.current.as_keyword(),
                Some(
                    Keyword::Join
                        | Keyword::Inner
                        | Keyword::Left
                        | Keyword::Right
                        | Keyword::Full
                )
            );
            if !starts_join {
                return Ok(left);
            }
            let join_type = self.parse_join_type()?;
            let join = self.expect_keyword(Keyword::Join)?;
            let right = self.parse_table_primary()?;
            left = self.parse_join_spec(left, join_type, join, right)?;
        }
    }

    /// `join_type[]`, `join_type[INNER]`, `join_type[outer_join_type [OUTER]]`.
    fn parse_join_type(&mut self) -> Result<NodeId, ParseError> {
        match self.current.as_keyword() {
            Some(Keyword::Inner) => {
                let inner = self.keyword_leaf(Keyword::Inner);
                Ok(self.arena.rule(RuleTag::JoinType, [inner]))
            }
            Some(side @ (Keyword::Left | Keyword::Right | Keyword::Full)) => {
                let side = self.keyword_leaf(side);
                let outer_type = self.arena.rule(RuleTag::OuterJoinType, [side]);
                match self.eat_keyword(Keyword::Outer) {
                    Some(outer) => Ok(self.arena.rule(RuleTag::JoinType, [outer_type, outer])),
                    None => Ok(self.arena.rule(RuleTag::JoinType, [outer_type])),
                }
            }
            _ => Ok(self.arena.empty(RuleTag::JoinType)),
        }
    }

    /// The part after `JOIN right`: `ON`, `USING (cols)`, or a relationship
    /// join `USING rel [FORWARD|BACKWARD]`.
    fn parse_join_spec(
        &mut self,
        left: NodeId,
        join_type: NodeId,
        join: NodeId,
        right: NodeId,
    ) -> Result<NodeId, ParseError> {
        if let Some(on) = self.eat_keyword(Keyword::On) {
            let condition = self.parse_search_condition()?;
            let spec = self.arena.rule(RuleTag::JoinCondition, [on, condition]);
            return Ok(self
                .arena
                .rule(RuleTag::QualifiedJoin, [left, join_type, join, right, spec]));
        }

        let Some(using) = self.eat_keyword(Keyword::Using) else {
            return Err(self.error_here("ON or USING"));
        };

        if self.check(&TokenKind::LeftParen) {
            let open = self.punct("(");
            let columns = self.parse_comma_list(
                RuleTag::ColumnCommalist,
                false,
                Self::expect_name,
            )?;
            let close = self.expect(&TokenKind::RightParen, "')'")?;
            let spec = self
                .arena
                .rule(RuleTag::NamedColumnsJoin, [using, open, columns, close]);
            return Ok(self
                .arena
                .rule(RuleTag::QualifiedJoin, [left, join_type, join, right, spec]));
        }

        let relationship = self.parse_table_node()?;
        let direction = match self.current_word() {
            Some(kw @ (Keyword::Forward | Keyword::Backward)) => self.keyword_leaf(kw),
            _ => self.arena.empty(RuleTag::OpRelationshipDirection),
        };
        Ok(self.arena.rule(
            RuleTag::EcrelationshipJoin,
            [left, join_type, join, right, using, relationship, direction],
        ))
    }

    /// A class reference, a sub-select with its range variable, or a
    /// parenthesised join.
    fn parse_table_primary(&mut self) -> Result<NodeId, ParseError> {
        if !self.check(&TokenKind::LeftParen) {
            return self.parse_class_ref();
        }
        if self.peek_starts_query() {
            let subquery = self.parse_subquery()?;
            let alias = self.parse_opt_range_variable()?;
            return Ok(self.arena.rule(RuleTag::SubqueryRef, [subquery, alias]));
        }
        self.advance();
        let inner = self.nested(Self::parse_table_ref)?;
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(inner)
    }

    /// `table_ref[opt_disqualify_polymorphic_constraint, opt_only, table_node, opt_range_variable]`
    pub(super) fn parse_class_ref(&mut self) -> Result<NodeId, ParseError> {
        let disqualify = if self.check(&TokenKind::Plus) {
            self.punct("+")
        } else {
            self.arena.empty(RuleTag::OptDisqualifyPolymorphicConstraint)
        };
        let only = match self.current.as_keyword() {
            Some(kw @ (Keyword::Only | Keyword::All)) => self.keyword_leaf(kw),
            _ => self.arena.empty(RuleTag::OptOnly),
        };
        let table = self.parse_table_node()?;
        let alias = self.parse_opt_range_variable()?;
        Ok(self
            .arena
            .rule(RuleTag::TableRef, [disqualify, only, table, alias]))
    }

    /// `[tablespace sep] schema sep class`, where sep is `.` or `:`, or a
    /// bare table name.
    pub(super) fn parse_table_node(&mut self) -> Result<NodeId, ParseError> {
        let mut parts = vec![self.expect_name()?];
        while parts.len() < 5 {
            let sep = match self.current.kind {
                TokenKind::Dot => ".",
                TokenKind::Colon => ":",
                _ => break,
            };
            parts.push(self.punct(sep));
            parts.push(self.expect_name()?);
        }
        let tag = if parts.len() == 1 {
            RuleTag::TableName
        } else {
            RuleTag::QualifiedClassName
        };
        Ok(self.arena.rule(tag, parts))
    }

    fn parse_opt_range_variable(&mut self) -> Result<NodeId, ParseError> {
        if let Some(as_kw) = self.eat_keyword(Keyword::As) {
            let name = self.expect_name()?;
            return Ok(self.arena.rule(RuleTag::RangeVariable, [as_kw, name]));
        }
        if self.is_name() {
            let as_kw = self.arena.empty(RuleTag::OptAs);
            let name = self.expect_name()?;
            return Ok(self.arena.rule(RuleTag::RangeVariable, [as_kw, name]));
        }
        Ok(self.arena.empty(RuleTag::OptRangeVariable))
    }

    /// True when the current `(` opens a query.
    pub(super) fn peek_starts_query(&mut self) -> bool {
        matches!(
            self.peek().as_keyword(),
            Some(Keyword::Select | Keyword::With | Keyword::Values)
        )
    }

    /// `subquery['(', select_statement, ')']`
    pub(super) fn parse_subquery(&mut self) -> Result<NodeId, ParseError> {
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let select = self.parse_select_statement()?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self.arena.rule(RuleTag::Subquery, [open, select, close]))
    }

    /// `window_definition[name, AS, window_specification]`
    fn parse_window_definition(&mut self) -> Result<NodeId, ParseError> {
        let name = self.expect_name()?;
        let as_kw = self.expect_keyword(Keyword::As)?;
        let spec = self.parse_window_specification()?;
        Ok(self.arena.rule(RuleTag::WindowDefinition, [name, as_kw, spec]))
    }
}

//! Scalar expressions: operators, primaries, column references and
//! function calls.

use super::pratt::{
    infix_binding_power, token_to_binary_op, token_to_unary_op, PREFIX_BINDING_POWER,
};
use super::window::is_window_function;
use super::{ParseError, Parser};
use crate::lexer::{Keyword, LexicalMode, TokenKind};
use crate::tree::{NodeId, RuleTag};

impl Parser<'_> {
    /// Parses a value expression.
    pub(super) fn parse_value_exp(&mut self) -> Result<NodeId, ParseError> {
        self.nested(|p| p.parse_value_exp_bp(0))
    }

    /// Parses a value expression with the given minimum binding power.
    fn parse_value_exp_bp(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        let lhs = if let Some(op) = token_to_unary_op(&self.current.kind) {
            let op = self.punct(op);
            let operand = self.nested(|p| p.parse_value_exp_bp(PREFIX_BINDING_POWER))?;
            self.arena.rule(RuleTag::Factor, [op, operand])
        } else {
            self.parse_value_primary()?
        };
        self.parse_value_exp_continue(lhs, min_bp)
    }

    /// Applies infix operators to an already parsed left operand.
    pub(super) fn parse_value_exp_continue(
        &mut self,
        mut lhs: NodeId,
        min_bp: u8,
    ) -> Result<NodeId, ParseError> {
        loop {
            let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let Some((tag, op)) = token_to_binary_op(&self.current.kind) else {
                break;
            };
            let op = self.punct(op);
            let rhs = self.nested(|p| p.parse_value_exp_bp(r_bp))?;
            lhs = self.arena.rule(tag, [lhs, op, rhs]);
        }
        Ok(lhs)
    }

    fn parse_value_primary(&mut self) -> Result<NodeId, ParseError> {
        if self.current.kind.is_literal() {
            return self.parse_literal();
        }

        match &self.current.kind {
            TokenKind::Question => {
                let mark = self.punct("?");
                return Ok(self.arena.rule(RuleTag::Parameter, [mark]));
            }
            TokenKind::Colon => {
                let colon = self.punct(":");
                let name = self.expect_name()?;
                return Ok(self.arena.rule(RuleTag::Parameter, [colon, name]));
            }
            TokenKind::LeftParen => return self.parse_parenthesized_value(),
            TokenKind::Dollar => return self.parse_column_ref(),
            _ => {}
        }

        match self.current_word() {
            Some(kw @ (Keyword::Null | Keyword::True | Keyword::False)) => {
                return Ok(self.keyword_leaf(kw));
            }
            Some(Keyword::Case) => return self.parse_case(),
            Some(Keyword::Cast) => return self.parse_cast(),
            Some(
                kw @ (Keyword::CurrentDate | Keyword::CurrentTime | Keyword::CurrentTimestamp),
            ) => {
                let keyword = self.keyword_leaf(kw);
                return Ok(self.arena.rule(RuleTag::DatetimeValueFct, [keyword]));
            }
            Some(kw)
                if kw.starts_datetime_literal()
                    && matches!(self.peek().kind, TokenKind::String(_)) =>
            {
                return self.parse_datetime_literal(kw);
            }
            _ => {}
        }

        if self.is_name() {
            if matches!(self.peek().kind, TokenKind::LeftParen) {
                return self.parse_function();
            }
            return self.parse_column_ref();
        }

        Err(self.error_here("value expression"))
    }

    /// A literal leaf. Further literals directly after it are folded into
    /// it.
    fn parse_literal(&mut self) -> Result<NodeId, ParseError> {
        let literal = self.literal();
        while self.current.kind.is_literal() {
            let (_, text) = self.literal_parts();
            let (at, lexeme) = (self.current.span, self.lexeme());
            self.actions().fold_literal(literal, &text, at, lexeme)?;
            self.advance();
        }
        Ok(literal)
    }

    /// `(SELECT ...)` as a sub-select, otherwise `( value )`.
    fn parse_parenthesized_value(&mut self) -> Result<NodeId, ParseError> {
        if self.peek_starts_query() {
            return self.parse_subquery();
        }
        let open = self.punct("(");
        let condition = self.parse_search_condition()?;
        let inner = self.actions().unwrap_unary(condition);
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self
            .arena
            .rule(RuleTag::ValueExpPrimary, [open, inner, close]))
    }

    /// `DATE '...'`, `TIME '...'`, `TIMESTAMP '...'`.
    fn parse_datetime_literal(&mut self, keyword: Keyword) -> Result<NodeId, ParseError> {
        self.rescan_next(LexicalMode::DateTime);
        let keyword = self.keyword_leaf(keyword);
        if !matches!(self.current.kind, TokenKind::DateTime(_)) {
            return Err(self.error_here("date/time literal"));
        }
        let value = self.literal();
        Ok(self
            .arena
            .rule(RuleTag::DatetimeValueFct, [keyword, value]))
    }

    /// Parses a property path with an optional `->` extraction.
    pub(super) fn parse_column_ref(&mut self) -> Result<NodeId, ParseError> {
        let path = self.parse_property_path()?;
        let extract = if self.check(&TokenKind::Arrow) {
            let arrow = self.punct("->");
            let target = self.parse_property_path()?;
            let optional = if self.check(&TokenKind::Question) {
                self.punct("?")
            } else {
                self.arena.empty(RuleTag::OptOptionalProp)
            };
            self.arena
                .rule(RuleTag::ExtractValue, [arrow, target, optional])
        } else {
            self.arena.empty(RuleTag::OptExtractValue)
        };
        Ok(self.arena.rule(RuleTag::ColumnRef, [path, extract]))
    }

    /// Parses `segment(.segment)*`, where a segment is a property with an
    /// optional array index, `*`, or `$`.
    pub(super) fn parse_property_path(&mut self) -> Result<NodeId, ParseError> {
        let path = self.arena.dot_list(RuleTag::PropertyPath);
        let first = self.parse_path_segment()?;
        self.arena.append(path, first);
        while self.check(&TokenKind::Dot) {
            self.advance();
            let (at, lexeme) = (self.current.span, self.lexeme());
            let segment = self.parse_path_segment()?;
            self.actions()
                .append_path_segment(path, segment, at, lexeme)?;
        }
        Ok(path)
    }

    fn parse_path_segment(&mut self) -> Result<NodeId, ParseError> {
        match self.current.kind {
            TokenKind::Star => return Ok(self.punct("*")),
            TokenKind::Dollar => return Ok(self.punct("$")),
            _ => {}
        }
        let name = self.expect_name()?;
        let index = match self.current.kind {
            TokenKind::ArrayIndex(Some(index)) => {
                self.advance();
                self.arena.array_index(format!("[{index}]"))
            }
            TokenKind::ArrayIndex(None) => {
                self.advance();
                self.arena.array_index("[]")
            }
            _ => self.arena.empty(RuleTag::OptColumnArrayIdx),
        };
        Ok(self.arena.rule(RuleTag::PropertyPathEntry, [name, index]))
    }

    /// A call of a named function, with an optional window.
    fn parse_function(&mut self) -> Result<NodeId, ParseError> {
        let word = match self.current.kind {
            TokenKind::Name(_) => self.current_word(),
            _ => None,
        };
        let function = match word {
            Some(Keyword::Iif) => return self.parse_iif(),
            Some(Keyword::NavigationValue) => return self.parse_navigation_value(),
            Some(
                kw @ (Keyword::Avg
                | Keyword::Count
                | Keyword::Max
                | Keyword::Min
                | Keyword::Sum
                | Keyword::Total
                | Keyword::GroupConcat),
            ) => self.parse_aggregate(kw)?,
            Some(kw) if is_window_function(kw) => return self.parse_window_function(kw),
            _ => self.parse_fct_spec()?,
        };
        self.parse_opt_window(function)
    }

    /// `name ( [value, ...] )`
    pub(super) fn parse_fct_spec(&mut self) -> Result<NodeId, ParseError> {
        let name = self.expect_name()?;
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        if self.check(&TokenKind::RightParen) {
            let close = self.punct(")");
            return Ok(self.arena.rule(RuleTag::FctSpec, [name, open, close]));
        }
        let args = self.parse_comma_list(
            RuleTag::FunctionArgsCommalist,
            true,
            Self::parse_value_exp,
        )?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self
            .arena
            .rule(RuleTag::FctSpec, [name, open, args, close]))
    }

    fn parse_aggregate(&mut self, function: Keyword) -> Result<NodeId, ParseError> {
        let (at, lexeme) = (self.current.span, self.lexeme());
        let name = self.keyword_leaf(function);
        let open = self.expect(&TokenKind::LeftParen, "'('")?;

        if function == Keyword::Count && self.check(&TokenKind::Star) {
            let star = self.punct("*");
            let close = self.expect(&TokenKind::RightParen, "')'")?;
            return Ok(self
                .arena
                .rule(RuleTag::AggregateFct, [name, open, star, close]));
        }

        let quantified = matches!(
            self.current.as_keyword(),
            Some(Keyword::All | Keyword::Distinct)
        );
        let quantifier = self.parse_opt_all_distinct();
        let args = self.parse_comma_list(
            RuleTag::FunctionArgsCommalist,
            true,
            Self::parse_value_exp,
        )?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        self.actions()
            .check_aggregate(function, quantified, args, at, lexeme)?;
        Ok(self
            .arena
            .rule(RuleTag::AggregateFct, [name, open, quantifier, args, close]))
    }

    /// `IIF(condition, then, else)`
    fn parse_iif(&mut self) -> Result<NodeId, ParseError> {
        let iif = self.keyword_leaf(Keyword::Iif);
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let condition = self.parse_search_condition()?;
        let first_comma = self.expect(&TokenKind::Comma, "','")?;
        let then = self.parse_value_exp()?;
        let second_comma = self.expect(&TokenKind::Comma, "','")?;
        let otherwise = self.parse_value_exp()?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self.arena.rule(
            RuleTag::IifSpec,
            [iif, open, condition, first_comma, then, second_comma, otherwise, close],
        ))
    }

    /// `NAVIGATION_VALUE(path, id [, relationship class id])`
    fn parse_navigation_value(&mut self) -> Result<NodeId, ParseError> {
        let function = self.keyword_leaf(Keyword::NavigationValue);
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let property = self.parse_column_ref()?;
        let comma = self.expect(&TokenKind::Comma, "','")?;
        let id = self.parse_value_exp()?;
        let rel_class = if self.check(&TokenKind::Comma) {
            let comma = self.punct(",");
            let value = self.parse_value_exp()?;
            self.arena.rule(RuleTag::NavigationRelClass, [comma, value])
        } else {
            self.arena.empty(RuleTag::OptNavigationRelClass)
        };
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self.arena.rule(
            RuleTag::NavigationValueFct,
            [function, open, property, comma, id, rel_class, close],
        ))
    }

    /// `CAST(value AS type)`, where type is `name`, `schema.name` or
    /// either followed by `[]`.
    fn parse_cast(&mut self) -> Result<NodeId, ParseError> {
        let cast = self.keyword_leaf(Keyword::Cast);
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let value = self.parse_value_exp()?;
        let as_kw = self.expect_keyword(Keyword::As)?;

        let mut parts = vec![self.expect_name()?];
        let sep = match self.current.kind {
            TokenKind::Dot => Some("."),
            TokenKind::Colon => Some(":"),
            _ => None,
        };
        if let Some(sep) = sep {
            parts.push(self.punct(sep));
            parts.push(self.expect_name()?);
        }
        let scalar = self.arena.rule(RuleTag::CastTargetScalar, parts);
        let target = match self.current.kind {
            TokenKind::ArrayIndex(None) => {
                self.advance();
                let index = self.arena.array_index("[]");
                self.arena.rule(RuleTag::CastTargetArray, [scalar, index])
            }
            _ => scalar,
        };

        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self
            .arena
            .rule(RuleTag::CastSpec, [cast, open, value, as_kw, target, close]))
    }

    /// Simple (`CASE x WHEN ...`) and searched (`CASE WHEN cond ...`)
    /// CASE expressions.
    fn parse_case(&mut self) -> Result<NodeId, ParseError> {
        let case = self.keyword_leaf(Keyword::Case);

        if self.check_keyword(Keyword::When) {
            let clauses = self.arena.list(RuleTag::SearchedWhenClauseList);
            while let Some(when) = self.eat_keyword(Keyword::When) {
                let condition = self.parse_search_condition()?;
                let then = self.expect_keyword(Keyword::Then)?;
                let result = self.parse_value_exp()?;
                let clause = self.arena.rule(
                    RuleTag::SearchedWhenClause,
                    [when, condition, then, result],
                );
                self.arena.append(clauses, clause);
            }
            let else_clause = self.parse_opt_else()?;
            let end = self.expect_keyword(Keyword::End)?;
            return Ok(self
                .arena
                .rule(RuleTag::SearchedCase, [case, clauses, else_clause, end]));
        }

        let operand = self.parse_value_exp()?;
        let clauses = self.arena.list(RuleTag::SimpleWhenClauseList);
        loop {
            let when = self.expect_keyword(Keyword::When)?;
            let operands =
                self.parse_comma_list(RuleTag::WhenOperandList, false, Self::parse_when_operand)?;
            let then = self.expect_keyword(Keyword::Then)?;
            let result = self.parse_value_exp()?;
            let clause = self
                .arena
                .rule(RuleTag::SimpleWhenClause, [when, operands, then, result]);
            self.arena.append(clauses, clause);
            if !self.check_keyword(Keyword::When) {
                break;
            }
        }
        let else_clause = self.parse_opt_else()?;
        let end = self.expect_keyword(Keyword::End)?;
        Ok(self.arena.rule(
            RuleTag::SimpleCase,
            [case, operand, clauses, else_clause, end],
        ))
    }

    fn parse_opt_else(&mut self) -> Result<NodeId, ParseError> {
        match self.eat_keyword(Keyword::Else) {
            Some(else_kw) => {
                let value = self.parse_value_exp()?;
                Ok(self.arena.rule(RuleTag::ElseClause, [else_kw, value]))
            }
            None => Ok(self.arena.empty(RuleTag::OptElseClause)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ErrorKind, ParseContext, Parser};
    use crate::tree::{ParseTree, RuleTag};

    fn select(value: &str) -> ParseTree {
        let sql = format!("SELECT {value} FROM s.A");
        Parser::new(&sql, &ParseContext::new())
            .parse_statement()
            .unwrap()
    }

    fn first_value(tree: &ParseTree) -> Option<RuleTag> {
        tree.find(RuleTag::DerivedColumn)
            .and_then(|c| c.child(0))
            .and_then(|v| v.tag())
    }

    #[test]
    fn test_precedence() {
        let tree = select("a + b * c");
        let sum = tree.find(RuleTag::NumValueExp).unwrap();
        assert_eq!(sum.child(2).unwrap().tag(), Some(RuleTag::Term));

        let tree = select("a - b - c");
        let outer = tree.find(RuleTag::NumValueExp).unwrap();
        assert_eq!(outer.child(0).unwrap().tag(), Some(RuleTag::NumValueExp));
    }

    #[test]
    fn test_unary_and_concatenation() {
        assert_eq!(first_value(&select("-a")), Some(RuleTag::Factor));
        assert_eq!(first_value(&select("a || 'x'")), Some(RuleTag::Concatenation));
    }

    #[test]
    fn test_primaries() {
        for (value, tag) in [
            ("?", RuleTag::Parameter),
            (":p", RuleTag::Parameter),
            ("(a)", RuleTag::ValueExpPrimary),
            ("(SELECT 1)", RuleTag::Subquery),
            ("CURRENT_DATE", RuleTag::DatetimeValueFct),
            ("DATE '2024-01-31'", RuleTag::DatetimeValueFct),
            ("CAST(a AS TEXT)", RuleTag::CastSpec),
            ("CAST(a AS s.Point[])", RuleTag::CastSpec),
            ("lower(a)", RuleTag::FctSpec),
            ("IIF(a > 1, 'x', 'y')", RuleTag::IifSpec),
            ("COUNT(*)", RuleTag::AggregateFct),
            ("NAVIGATION_VALUE(s.R.P, 1)", RuleTag::NavigationValueFct),
            ("CASE WHEN a THEN 1 ELSE 2 END", RuleTag::SearchedCase),
            ("CASE a WHEN > 1, IS NULL THEN 1 END", RuleTag::SimpleCase),
            ("a.b[2]->c.d ?", RuleTag::ColumnRef),
        ] {
            assert_eq!(first_value(&select(value)), Some(tag), "{value}");
        }
    }

    #[test]
    fn test_date_literal_is_verbatim() {
        let tree = select("TIMESTAMP '2024-01-31T10:00:00'");
        let fct = tree.find(RuleTag::DatetimeValueFct).unwrap();
        assert_eq!(fct.leaf_texts(), ["TIMESTAMP", "2024-01-31T10:00:00"]);
    }

    #[test]
    fn test_contextual_function_name_as_column() {
        let tree = select("Count, Date");
        assert_eq!(tree.find_all(RuleTag::ColumnRef).count(), 2);
    }

    #[test]
    fn test_aggregate_argument_check() {
        let ctx = ParseContext::new();
        let err = Parser::new("SELECT SUM(a, b) FROM s.A", &ctx)
            .parse_statement()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Semantic);
        assert_eq!(err.message, "SUM expects exactly one argument");
    }
}

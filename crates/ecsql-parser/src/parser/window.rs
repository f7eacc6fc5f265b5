//! Window functions and window specifications.

use super::{ParseError, Parser};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, RuleTag};

/// Functions that are only valid with an OVER clause.
pub(super) const fn is_window_function(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::RowNumber
            | Keyword::Rank
            | Keyword::DenseRank
            | Keyword::PercentRank
            | Keyword::CumeDist
            | Keyword::Ntile
            | Keyword::Lead
            | Keyword::Lag
            | Keyword::FirstValue
            | Keyword::LastValue
            | Keyword::NthValue
    )
}

impl Parser<'_> {
    /// Parses a window-only function call and its mandatory OVER clause.
    pub(super) fn parse_window_function(&mut self, keyword: Keyword) -> Result<NodeId, ParseError> {
        let function = match keyword {
            Keyword::Ntile => {
                let ntile = self.keyword_leaf(keyword);
                let open = self.expect(&TokenKind::LeftParen, "'('")?;
                let buckets = self.parse_value_exp()?;
                let close = self.expect(&TokenKind::RightParen, "')'")?;
                self.arena
                    .rule(RuleTag::NtileFunction, [ntile, open, buckets, close])
            }
            Keyword::Lead | Keyword::Lag => self.parse_lead_or_lag(keyword)?,
            Keyword::FirstValue | Keyword::LastValue => {
                let name = self.keyword_leaf(keyword);
                let open = self.expect(&TokenKind::LeftParen, "'('")?;
                let value = self.parse_value_exp()?;
                let close = self.expect(&TokenKind::RightParen, "')'")?;
                let nulls = self.parse_opt_null_treatment();
                self.arena.rule(
                    RuleTag::FirstOrLastValueFunction,
                    [name, open, value, close, nulls],
                )
            }
            Keyword::NthValue => self.parse_nth_value()?,
            _ => {
                let name = self.keyword_leaf(keyword);
                let open = self.expect(&TokenKind::LeftParen, "'('")?;
                let close = self.expect(&TokenKind::RightParen, "')'")?;
                self.arena
                    .rule(RuleTag::WindowFunctionType, [name, open, close])
            }
        };
        if !self.check_keyword(Keyword::Over) && !self.check_keyword(Keyword::Filter) {
            return Err(self.error_here("OVER"));
        }
        self.parse_window_suffix(function)
    }

    fn parse_lead_or_lag(&mut self, keyword: Keyword) -> Result<NodeId, ParseError> {
        let name = self.keyword_leaf(keyword);
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let value = self.parse_value_exp()?;
        let extras = if self.check(&TokenKind::Comma) {
            let comma = self.punct(",");
            let offset = self.parse_value_exp()?;
            if self.check(&TokenKind::Comma) {
                let second = self.punct(",");
                let default = self.parse_value_exp()?;
                self.arena
                    .rule(RuleTag::LeadOrLagExtras, [comma, offset, second, default])
            } else {
                self.arena.rule(RuleTag::LeadOrLagExtras, [comma, offset])
            }
        } else {
            self.arena.empty(RuleTag::OptLeadOrLagExtras)
        };
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        let nulls = self.parse_opt_null_treatment();
        Ok(self.arena.rule(
            RuleTag::LeadOrLagFunction,
            [name, open, value, extras, close, nulls],
        ))
    }

    fn parse_nth_value(&mut self) -> Result<NodeId, ParseError> {
        let name = self.keyword_leaf(Keyword::NthValue);
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let value = self.parse_value_exp()?;
        let comma = self.expect(&TokenKind::Comma, "','")?;
        let n = self.parse_value_exp()?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;

        // FROM is only the modifier when FIRST or LAST follows
        let from_first_or_last = if self.check_keyword(Keyword::From)
            && (self.peek().is_word(Keyword::First) || self.peek().is_word(Keyword::Last))
        {
            let from = self.keyword_leaf(Keyword::From);
            let side = if self.check_keyword(Keyword::First) {
                Keyword::First
            } else {
                Keyword::Last
            };
            let side = self.keyword_leaf(side);
            self.arena.rule(RuleTag::FromFirstOrLast, [from, side])
        } else {
            self.arena.empty(RuleTag::OptFromFirstOrLast)
        };

        let nulls = self.parse_opt_null_treatment();
        Ok(self.arena.rule(
            RuleTag::NthValueFunction,
            [name, open, value, comma, n, close, from_first_or_last, nulls],
        ))
    }

    /// `RESPECT NULLS`, `IGNORE NULLS`, or nothing.
    fn parse_opt_null_treatment(&mut self) -> NodeId {
        let treatment = match self.current_word() {
            Some(kw @ (Keyword::Respect | Keyword::Ignore))
                if self.peek().is_word(Keyword::Nulls) =>
            {
                kw
            }
            _ => return self.arena.empty(RuleTag::OptNullTreatment),
        };
        let treatment = self.keyword_leaf(treatment);
        let nulls = self.keyword_leaf(Keyword::Nulls);
        self.arena.rule(RuleTag::NullTreatment, [treatment, nulls])
    }

    /// Wraps `function` in a window when `OVER` or `FILTER (` follows.
    pub(super) fn parse_opt_window(&mut self, function: NodeId) -> Result<NodeId, ParseError> {
        let windowed = self.check_keyword(Keyword::Over)
            || (self.check_keyword(Keyword::Filter)
                && matches!(self.peek().kind, TokenKind::LeftParen));
        if windowed {
            self.parse_window_suffix(function)
        } else {
            Ok(function)
        }
    }

    /// `[FILTER (WHERE cond)] OVER (name | window_specification)`
    fn parse_window_suffix(&mut self, function: NodeId) -> Result<NodeId, ParseError> {
        let filter = match self.eat_keyword(Keyword::Filter) {
            Some(filter) => {
                let open = self.expect(&TokenKind::LeftParen, "'('")?;
                let where_kw = self.expect_keyword(Keyword::Where)?;
                let where_clause = self.parse_where_rest(where_kw)?;
                let close = self.expect(&TokenKind::RightParen, "')'")?;
                self.arena
                    .rule(RuleTag::FilterClause, [filter, open, where_clause, close])
            }
            None => self.arena.empty(RuleTag::OptFilterClause),
        };
        let over = self.expect_keyword(Keyword::Over)?;
        let window = if self.check(&TokenKind::LeftParen) {
            self.parse_window_specification()?
        } else {
            self.expect_name()?
        };
        Ok(self
            .arena
            .rule(RuleTag::WindowFunction, [function, filter, over, window]))
    }

    /// `( [existing] [PARTITION BY ...] [ORDER BY ...] [frame] )`
    pub(super) fn parse_window_specification(&mut self) -> Result<NodeId, ParseError> {
        let open = self.expect(&TokenKind::LeftParen, "'('")?;

        let starts_clause = matches!(
            self.current_word(),
            Some(
                Keyword::Partition
                    | Keyword::Order
                    | Keyword::Rows
                    | Keyword::Range
                    | Keyword::Groups
            )
        );
        let existing = if self.is_name() && !starts_clause {
            self.expect_name()?
        } else {
            self.arena.empty(RuleTag::OptExistingWindowName)
        };

        let partition = self.parse_opt_partition()?;
        let order_by = self.parse_opt_order_by()?;
        let frame = self.parse_opt_frame()?;

        let details = self.arena.rule(
            RuleTag::WindowSpecificationDetails,
            [existing, partition, order_by, frame],
        );
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self
            .arena
            .rule(RuleTag::WindowSpecification, [open, details, close]))
    }

    fn parse_opt_partition(&mut self) -> Result<NodeId, ParseError> {
        if !self.check_keyword(Keyword::Partition) {
            return Ok(self.arena.empty(RuleTag::OptWindowPartitionClause));
        }
        let partition = self.keyword_leaf(Keyword::Partition);
        let by = self.expect_keyword(Keyword::By)?;
        let columns = self.parse_comma_list(
            RuleTag::WindowPartitionColumnReferenceList,
            false,
            Self::parse_partition_column,
        )?;
        Ok(self
            .arena
            .rule(RuleTag::WindowPartitionClause, [partition, by, columns]))
    }

    fn parse_partition_column(&mut self) -> Result<NodeId, ParseError> {
        let column = self.parse_column_ref()?;
        let collate = if self.check_keyword(Keyword::Collate) {
            let collate = self.keyword_leaf(Keyword::Collate);
            let name = self.expect_name()?;
            self.arena.rule(RuleTag::CollateClause, [collate, name])
        } else {
            self.arena.empty(RuleTag::OptCollateClause)
        };
        Ok(self
            .arena
            .rule(RuleTag::WindowPartitionColumnReference, [column, collate]))
    }

    fn parse_opt_frame(&mut self) -> Result<NodeId, ParseError> {
        let units = match self.current_word() {
            Some(kw @ (Keyword::Rows | Keyword::Range | Keyword::Groups)) => self.keyword_leaf(kw),
            _ => return Ok(self.arena.empty(RuleTag::OptWindowFrameClause)),
        };

        let extent = match self.eat_keyword(Keyword::Between) {
            Some(between) => {
                let start = self.parse_frame_bound()?;
                let and = self.expect_keyword(Keyword::And)?;
                let end = self.parse_frame_bound()?;
                self.arena
                    .rule(RuleTag::WindowFrameBetween, [between, start, and, end])
            }
            None => self.parse_frame_bound()?,
        };

        let exclusion = self.parse_opt_frame_exclusion()?;
        Ok(self
            .arena
            .rule(RuleTag::WindowFrameClause, [units, extent, exclusion]))
    }

    /// One frame bound: `UNBOUNDED PRECEDING|FOLLOWING`, `CURRENT ROW`, or
    /// `value PRECEDING|FOLLOWING`.
    fn parse_frame_bound(&mut self) -> Result<NodeId, ParseError> {
        if self.check_keyword(Keyword::Unbounded) {
            let unbounded = self.keyword_leaf(Keyword::Unbounded);
            return if self.check_keyword(Keyword::Preceding) {
                let preceding = self.keyword_leaf(Keyword::Preceding);
                Ok(self
                    .arena
                    .rule(RuleTag::WindowFrameStart, [unbounded, preceding]))
            } else if self.check_keyword(Keyword::Following) {
                let following = self.keyword_leaf(Keyword::Following);
                Ok(self
                    .arena
                    .rule(RuleTag::WindowFrameBound, [unbounded, following]))
            } else {
                Err(self.error_here("PRECEDING or FOLLOWING"))
            };
        }

        if self.check_keyword(Keyword::Current) {
            let current = self.keyword_leaf(Keyword::Current);
            let row = self.expect_keyword(Keyword::Row)?;
            return Ok(self.arena.rule(RuleTag::WindowFrameStart, [current, row]));
        }

        let value = self.parse_value_exp()?;
        if self.check_keyword(Keyword::Preceding) {
            let preceding = self.keyword_leaf(Keyword::Preceding);
            Ok(self
                .arena
                .rule(RuleTag::WindowFramePreceding, [value, preceding]))
        } else if self.check_keyword(Keyword::Following) {
            let following = self.keyword_leaf(Keyword::Following);
            Ok(self
                .arena
                .rule(RuleTag::WindowFrameFollowing, [value, following]))
        } else {
            Err(self.error_here("PRECEDING or FOLLOWING"))
        }
    }

    fn parse_opt_frame_exclusion(&mut self) -> Result<NodeId, ParseError> {
        if !self.check_keyword(Keyword::Exclude) {
            return Ok(self.arena.empty(RuleTag::OptWindowFrameExclusion));
        }
        let exclude = self.keyword_leaf(Keyword::Exclude);
        let exclusion = match self.current_word() {
            Some(Keyword::Current) => {
                let current = self.keyword_leaf(Keyword::Current);
                let row = self.expect_keyword(Keyword::Row)?;
                self.arena
                    .rule(RuleTag::WindowFrameExclusion, [exclude, current, row])
            }
            Some(kw @ (Keyword::Group | Keyword::Ties)) => {
                let what = self.keyword_leaf(kw);
                self.arena.rule(RuleTag::WindowFrameExclusion, [exclude, what])
            }
            Some(Keyword::No) => {
                let no = self.keyword_leaf(Keyword::No);
                let others = self.expect_keyword(Keyword::Others)?;
                self.arena
                    .rule(RuleTag::WindowFrameExclusion, [exclude, no, others])
            }
            _ => return Err(self.error_here("CURRENT ROW, GROUP, TIES or NO OTHERS")),
        };
        Ok(exclusion)
    }
}

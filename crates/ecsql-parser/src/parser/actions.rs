//! Tree-shaping and validation steps shared by the grammar functions.
//!
//! These are the places where the parser does more than allocate a node
//! for what it just read: synthesizing the left operand of shorthand
//! predicates, folding adjacent literals, guarding path and aggregate
//! shapes.

use super::{ParseContext, ParseError};
use crate::lexer::{Keyword, Span};
use crate::tree::{Arena, LiteralKind, NodeId, ParseNode, RuleTag};

pub(super) struct Actions<'p> {
    pub(super) arena: &'p mut Arena,
    pub(super) ctx: &'p ParseContext,
}

impl Actions<'_> {
    /// Builds `column_ref[name]` for the implicit field of a shorthand
    /// predicate.
    pub(super) fn shorthand_column_ref(
        &mut self,
        at: Span,
        lexeme: &str,
    ) -> Result<NodeId, ParseError> {
        if !self.ctx.shorthand_predicate_allowed {
            return Err(ParseError::syntax(
                "predicate is missing its left operand",
                at,
                lexeme,
            ));
        }
        let Some(field) = self.ctx.implicit_field_name.as_deref() else {
            return Err(ParseError::semantic(
                "no implicit field name available for shorthand predicate",
                at,
                lexeme,
            ));
        };
        let name = self.arena.name(field);
        Ok(self.arena.rule(RuleTag::ColumnRef, [name]))
    }

    /// Merges the literal token `text` into the preceding literal leaf.
    pub(super) fn fold_literal(
        &mut self,
        literal: NodeId,
        text: &str,
        at: Span,
        lexeme: &str,
    ) -> Result<(), ParseError> {
        if !self.ctx.shorthand_predicate_allowed {
            return Err(ParseError::syntax(
                "adjacent literals are only allowed in shorthand predicates",
                at,
                lexeme,
            ));
        }
        if self.arena.fold_literal(literal, text) {
            Ok(())
        } else {
            Err(ParseError::syntax("expected a literal", at, lexeme))
        }
    }

    /// Appends a segment to a property path. Nothing may follow a `*` or
    /// `$` segment.
    pub(super) fn append_path_segment(
        &mut self,
        path: NodeId,
        segment: NodeId,
        at: Span,
        lexeme: &str,
    ) -> Result<(), ParseError> {
        if let Some(last) = self.arena.children(path).last() {
            for sentinel in ["*", "$"] {
                if self.arena.get(*last).is_punctuation(sentinel) {
                    return Err(ParseError::semantic(
                        format!("'{sentinel}' can only occur at the end of property path"),
                        at,
                        lexeme,
                    ));
                }
            }
        }
        self.arena.append(path, segment);
        Ok(())
    }

    /// Argument checks for the built-in aggregates.
    pub(super) fn check_aggregate(
        &self,
        function: Keyword,
        quantified: bool,
        args: NodeId,
        at: Span,
        lexeme: &str,
    ) -> Result<(), ParseError> {
        let count = self.arena.children(args).len();
        let message = match function {
            Keyword::Max if count != 1 => Some(String::from(
                "MAX expects exactly one argument; use GREATEST(...) to compare several values",
            )),
            Keyword::Min if count != 1 => Some(String::from(
                "MIN expects exactly one argument; use LEAST(...) to compare several values",
            )),
            Keyword::Avg | Keyword::Sum | Keyword::Total | Keyword::Count if count != 1 => {
                Some(format!("{} expects exactly one argument", function.as_str()))
            }
            Keyword::GroupConcat if quantified && count > 1 => Some(String::from(
                "GROUP_CONCAT with DISTINCT or ALL does not accept a separator argument",
            )),
            Keyword::GroupConcat if count > 2 => {
                Some(String::from("GROUP_CONCAT expects one or two arguments"))
            }
            _ => None,
        };
        match message {
            Some(message) => Err(ParseError::semantic(message, at, lexeme)),
            None => Ok(()),
        }
    }

    /// Tag for the LIKE tail: string-valued patterns get their own rule.
    pub(super) fn like_part_2_tag(&self, pattern: NodeId) -> RuleTag {
        let string_valued = match self.arena.get(pattern) {
            ParseNode::Literal { kind, .. } => *kind == LiteralKind::String,
            node => node.rule_tag() == Some(RuleTag::Concatenation),
        };
        if string_valued {
            RuleTag::CharacterLikePredicatePart2
        } else {
            RuleTag::OtherLikePredicatePart2
        }
    }

    /// `unary_predicate[v]` becomes `v`; anything else is returned as is.
    pub(super) fn unwrap_unary(&self, node: NodeId) -> NodeId {
        match self.arena.get(node) {
            ParseNode::Rule {
                tag: RuleTag::UnaryPredicate,
                children,
            } if children.len() == 1 => children[0],
            _ => node,
        }
    }

    /// Wraps an OR/AND combination parsed as a shorthand root in
    /// parentheses so it stays self-delimiting.
    pub(super) fn parenthesize_shorthand_root(&mut self, root: NodeId) -> NodeId {
        match self.arena.rule_tag(root) {
            Some(RuleTag::SearchCondition | RuleTag::BooleanTerm) => {
                let open = self.arena.punct("(");
                let close = self.arena.punct(")");
                self.arena.rule(RuleTag::BooleanPrimary, [open, root, close])
            }
            _ => root,
        }
    }
}

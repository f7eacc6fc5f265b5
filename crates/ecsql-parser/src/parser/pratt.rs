//! Operator precedence for value expressions.
//!
//! Boolean structure (OR, AND, NOT, IS) and predicates are handled by the
//! recursive-descent layer; only scalar operators go through this table.

use crate::lexer::TokenKind;
use crate::tree::RuleTag;

/// Binding power of the unary operators `-`, `+` and `~`.
pub const PREFIX_BINDING_POWER: u8 = 13;

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        // Bitwise OR (lowest precedence)
        TokenKind::BitOr => Some((1, 2)),

        // Bitwise AND
        TokenKind::BitAnd => Some((3, 4)),

        // Bit shifts
        TokenKind::LeftShift | TokenKind::RightShift => Some((5, 6)),

        // Additive
        TokenKind::Plus | TokenKind::Minus => Some((7, 8)),

        // String concatenation
        TokenKind::Concat => Some((9, 10)),

        // Multiplicative
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((11, 12)),

        _ => None,
    }
}

/// Returns the node tag and operator text for an infix token.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<(RuleTag, &'static str)> {
    let op = match kind {
        TokenKind::BitOr => (RuleTag::NumValueExp, "|"),
        TokenKind::BitAnd => (RuleTag::NumValueExp, "&"),
        TokenKind::LeftShift => (RuleTag::NumValueExp, "<<"),
        TokenKind::RightShift => (RuleTag::NumValueExp, ">>"),
        TokenKind::Plus => (RuleTag::NumValueExp, "+"),
        TokenKind::Minus => (RuleTag::NumValueExp, "-"),
        TokenKind::Concat => (RuleTag::Concatenation, "||"),
        TokenKind::Star => (RuleTag::Term, "*"),
        TokenKind::Slash => (RuleTag::Term, "/"),
        TokenKind::Percent => (RuleTag::Term, "%"),
        _ => return None,
    };
    Some(op)
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Minus => Some("-"),
        TokenKind::Plus => Some("+"),
        TokenKind::BitNot => Some("~"),
        _ => None,
    }
}

/// Returns the operator text of a comparison token.
#[must_use]
pub const fn comparison_op(kind: &TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Eq => Some("="),
        TokenKind::NotEq => Some("<>"),
        TokenKind::Lt => Some("<"),
        TokenKind::LtEq => Some("<="),
        TokenKind::Gt => Some(">"),
        TokenKind::GtEq => Some(">="),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        // Multiplication should bind tighter than addition
        let add_bp = infix_binding_power(&TokenKind::Plus).unwrap();
        let mul_bp = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(mul_bp.0 > add_bp.0);

        // Concatenation sits between them
        let concat_bp = infix_binding_power(&TokenKind::Concat).unwrap();
        assert!(concat_bp.0 > add_bp.0 && concat_bp.0 < mul_bp.0);

        // Bitwise operators are the loosest
        let or_bp = infix_binding_power(&TokenKind::BitOr).unwrap();
        let and_bp = infix_binding_power(&TokenKind::BitAnd).unwrap();
        let shl_bp = infix_binding_power(&TokenKind::LeftShift).unwrap();
        assert!(or_bp.0 < and_bp.0 && and_bp.0 < shl_bp.0 && shl_bp.0 < add_bp.0);

        // Unary operators bind tighter than everything
        assert!(PREFIX_BINDING_POWER > mul_bp.1);
    }

    #[test]
    fn test_left_associativity() {
        for kind in [TokenKind::Plus, TokenKind::Star, TokenKind::Concat, TokenKind::BitOr] {
            let (left, right) = infix_binding_power(&kind).unwrap();
            assert!(left < right);
        }
    }

    #[test]
    fn test_comparisons_are_not_infix() {
        assert_eq!(infix_binding_power(&TokenKind::Eq), None);
        assert_eq!(infix_binding_power(&TokenKind::LeftParen), None);
    }

    #[test]
    fn test_token_to_binary_op() {
        assert_eq!(
            token_to_binary_op(&TokenKind::Plus),
            Some((RuleTag::NumValueExp, "+"))
        );
        assert_eq!(token_to_binary_op(&TokenKind::Star), Some((RuleTag::Term, "*")));
        assert_eq!(
            token_to_binary_op(&TokenKind::Concat),
            Some((RuleTag::Concatenation, "||"))
        );
        assert_eq!(token_to_binary_op(&TokenKind::Eq), None);
    }

    #[test]
    fn test_token_to_unary_op() {
        assert_eq!(token_to_unary_op(&TokenKind::Minus), Some("-"));
        assert_eq!(token_to_unary_op(&TokenKind::BitNot), Some("~"));
        assert_eq!(token_to_unary_op(&TokenKind::Star), None);
    }

    #[test]
    fn test_comparison_op() {
        assert_eq!(comparison_op(&TokenKind::NotEq), Some("<>"));
        assert_eq!(comparison_op(&TokenKind::Plus), None);
    }
}

//! Token types for the ECSQL lexer.

use super::Span;

/// ECSQL keywords.
///
/// Reserved keywords are always lexed as [`TokenKind::Keyword`]. The
/// remaining ones are contextual: they lex as names and the parser only
/// treats them as keywords in the positions that need them, so that
/// properties called `Date` or `Rank` stay addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Statements and clauses
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Limit,
    Offset,
    Window,
    Distinct,
    All,
    As,
    Asc,
    Desc,
    With,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Default,
    Pragma,
    For,
    Ecsqloptions,
    Only,

    // Set operations
    Union,
    Intersect,
    Except,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Natural,
    On,
    Using,

    // Predicates and logic
    And,
    Or,
    Not,
    Is,
    In,
    Between,
    Like,
    Escape,
    Exists,
    Unique,
    Match,
    Any,
    Some,
    Null,
    True,
    False,

    // Expressions
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
    Over,
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,

    // Contextual: literals and tests
    Date,
    Time,
    Timestamp,
    Unknown,
    Recursive,
    Forward,
    Backward,
    Collate,

    // Contextual: functions
    Avg,
    Count,
    Max,
    Min,
    Sum,
    Total,
    GroupConcat,
    Iif,
    NavigationValue,
    RowNumber,
    Rank,
    DenseRank,
    PercentRank,
    CumeDist,
    Ntile,
    Lead,
    Lag,
    FirstValue,
    LastValue,
    NthValue,

    // Contextual: window vocabulary
    Filter,
    Partition,
    Rows,
    Range,
    Groups,
    Unbounded,
    Preceding,
    Following,
    Current,
    Row,
    Exclude,
    No,
    Others,
    Ties,
    Respect,
    Ignore,
    Nulls,
    First,
    Last,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let keyword = match s.to_ascii_uppercase().as_str() {
            "SELECT" => Self::Select,
            "FROM" => Self::From,
            "WHERE" => Self::Where,
            "GROUP" => Self::Group,
            "BY" => Self::By,
            "HAVING" => Self::Having,
            "ORDER" => Self::Order,
            "LIMIT" => Self::Limit,
            "OFFSET" => Self::Offset,
            "WINDOW" => Self::Window,
            "DISTINCT" => Self::Distinct,
            "ALL" => Self::All,
            "AS" => Self::As,
            "ASC" => Self::Asc,
            "DESC" => Self::Desc,
            "WITH" => Self::With,
            "INSERT" => Self::Insert,
            "INTO" => Self::Into,
            "VALUES" => Self::Values,
            "UPDATE" => Self::Update,
            "SET" => Self::Set,
            "DELETE" => Self::Delete,
            "DEFAULT" => Self::Default,
            "PRAGMA" => Self::Pragma,
            "FOR" => Self::For,
            "ECSQLOPTIONS" => Self::Ecsqloptions,
            "ONLY" => Self::Only,
            "UNION" => Self::Union,
            "INTERSECT" => Self::Intersect,
            "EXCEPT" => Self::Except,
            "JOIN" => Self::Join,
            "INNER" => Self::Inner,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "FULL" => Self::Full,
            "OUTER" => Self::Outer,
            "CROSS" => Self::Cross,
            "NATURAL" => Self::Natural,
            "ON" => Self::On,
            "USING" => Self::Using,
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "IS" => Self::Is,
            "IN" => Self::In,
            "BETWEEN" => Self::Between,
            "LIKE" => Self::Like,
            "ESCAPE" => Self::Escape,
            "EXISTS" => Self::Exists,
            "UNIQUE" => Self::Unique,
            "MATCH" => Self::Match,
            "ANY" => Self::Any,
            "SOME" => Self::Some,
            "NULL" => Self::Null,
            "TRUE" => Self::True,
            "FALSE" => Self::False,
            "CASE" => Self::Case,
            "WHEN" => Self::When,
            "THEN" => Self::Then,
            "ELSE" => Self::Else,
            "END" => Self::End,
            "CAST" => Self::Cast,
            "OVER" => Self::Over,
            "CURRENT_DATE" => Self::CurrentDate,
            "CURRENT_TIME" => Self::CurrentTime,
            "CURRENT_TIMESTAMP" => Self::CurrentTimestamp,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "UNKNOWN" => Self::Unknown,
            "RECURSIVE" => Self::Recursive,
            "FORWARD" => Self::Forward,
            "BACKWARD" => Self::Backward,
            "COLLATE" => Self::Collate,
            "AVG" => Self::Avg,
            "COUNT" => Self::Count,
            "MAX" => Self::Max,
            "MIN" => Self::Min,
            "SUM" => Self::Sum,
            "TOTAL" => Self::Total,
            "GROUP_CONCAT" => Self::GroupConcat,
            "IIF" => Self::Iif,
            "NAVIGATION_VALUE" => Self::NavigationValue,
            "ROW_NUMBER" => Self::RowNumber,
            "RANK" => Self::Rank,
            "DENSE_RANK" => Self::DenseRank,
            "PERCENT_RANK" => Self::PercentRank,
            "CUME_DIST" => Self::CumeDist,
            "NTILE" => Self::Ntile,
            "LEAD" => Self::Lead,
            "LAG" => Self::Lag,
            "FIRST_VALUE" => Self::FirstValue,
            "LAST_VALUE" => Self::LastValue,
            "NTH_VALUE" => Self::NthValue,
            "FILTER" => Self::Filter,
            "PARTITION" => Self::Partition,
            "ROWS" => Self::Rows,
            "RANGE" => Self::Range,
            "GROUPS" => Self::Groups,
            "UNBOUNDED" => Self::Unbounded,
            "PRECEDING" => Self::Preceding,
            "FOLLOWING" => Self::Following,
            "CURRENT" => Self::Current,
            "ROW" => Self::Row,
            "EXCLUDE" => Self::Exclude,
            "NO" => Self::No,
            "OTHERS" => Self::Others,
            "TIES" => Self::Ties,
            "RESPECT" => Self::Respect,
            "IGNORE" => Self::Ignore,
            "NULLS" => Self::Nulls,
            "FIRST" => Self::First,
            "LAST" => Self::Last,
            _ => return None,
        };
        Some(keyword)
    }

    /// Returns the canonical (upper-case) spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::By => "BY",
            Self::Having => "HAVING",
            Self::Order => "ORDER",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Window => "WINDOW",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::As => "AS",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::With => "WITH",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Default => "DEFAULT",
            Self::Pragma => "PRAGMA",
            Self::For => "FOR",
            Self::Ecsqloptions => "ECSQLOPTIONS",
            Self::Only => "ONLY",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::Natural => "NATURAL",
            Self::On => "ON",
            Self::Using => "USING",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Is => "IS",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Escape => "ESCAPE",
            Self::Exists => "EXISTS",
            Self::Unique => "UNIQUE",
            Self::Match => "MATCH",
            Self::Any => "ANY",
            Self::Some => "SOME",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::Over => "OVER",
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Unknown => "UNKNOWN",
            Self::Recursive => "RECURSIVE",
            Self::Forward => "FORWARD",
            Self::Backward => "BACKWARD",
            Self::Collate => "COLLATE",
            Self::Avg => "AVG",
            Self::Count => "COUNT",
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Sum => "SUM",
            Self::Total => "TOTAL",
            Self::GroupConcat => "GROUP_CONCAT",
            Self::Iif => "IIF",
            Self::NavigationValue => "NAVIGATION_VALUE",
            Self::RowNumber => "ROW_NUMBER",
            Self::Rank => "RANK",
            Self::DenseRank => "DENSE_RANK",
            Self::PercentRank => "PERCENT_RANK",
            Self::CumeDist => "CUME_DIST",
            Self::Ntile => "NTILE",
            Self::Lead => "LEAD",
            Self::Lag => "LAG",
            Self::FirstValue => "FIRST_VALUE",
            Self::LastValue => "LAST_VALUE",
            Self::NthValue => "NTH_VALUE",
            Self::Filter => "FILTER",
            Self::Partition => "PARTITION",
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
            Self::Unbounded => "UNBOUNDED",
            Self::Preceding => "PRECEDING",
            Self::Following => "FOLLOWING",
            Self::Current => "CURRENT",
            Self::Row => "ROW",
            Self::Exclude => "EXCLUDE",
            Self::No => "NO",
            Self::Others => "OTHERS",
            Self::Ties => "TIES",
            Self::Respect => "RESPECT",
            Self::Ignore => "IGNORE",
            Self::Nulls => "NULLS",
            Self::First => "FIRST",
            Self::Last => "LAST",
        }
    }

    /// Whether the keyword can never be used as a plain name.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        !matches!(
            self,
            Self::Date
                | Self::Time
                | Self::Timestamp
                | Self::Unknown
                | Self::Recursive
                | Self::Forward
                | Self::Backward
                | Self::Collate
                | Self::Avg
                | Self::Count
                | Self::Max
                | Self::Min
                | Self::Sum
                | Self::Total
                | Self::GroupConcat
                | Self::Iif
                | Self::NavigationValue
                | Self::RowNumber
                | Self::Rank
                | Self::DenseRank
                | Self::PercentRank
                | Self::CumeDist
                | Self::Ntile
                | Self::Lead
                | Self::Lag
                | Self::FirstValue
                | Self::LastValue
                | Self::NthValue
                | Self::Filter
                | Self::Partition
                | Self::Rows
                | Self::Range
                | Self::Groups
                | Self::Unbounded
                | Self::Preceding
                | Self::Following
                | Self::Current
                | Self::Row
                | Self::Exclude
                | Self::No
                | Self::Others
                | Self::Ties
                | Self::Respect
                | Self::Ignore
                | Self::Nulls
                | Self::First
                | Self::Last
        )
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Integer literal as written (`42`, `0x2A`). Values wider than 64
    /// bits are left for the consumer to range-check.
    Integer(String),
    /// Decimal literal as written (`4.2`, `4.`)
    Real(String),
    /// Approximate numeric literal as written (`4.2e1`)
    ApproxNum(String),
    /// String literal, unescaped (`'it''s'` holds `it's`)
    String(String),
    /// Quoted value scanned in date/time mode, kept verbatim
    DateTime(String),

    // Names and keywords
    /// Bare identifier
    Name(String),
    /// Identifier escaped with `[...]` or `"..."`
    QuotedName(String),
    /// Array index suffix: `[3]` or `[]`
    ArrayIndex(Option<u32>),
    /// Reserved keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// <> or !=
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// ->
    Arrow,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ?
    Question,
    /// $
    Dollar,

    // Special
    /// End of input
    Eof,
    /// Character sequence that is not a token in the current mode
    Error(String),
}

impl TokenKind {
    /// Whether this token carries a literal value.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Integer(_)
                | Self::Real(_)
                | Self::ApproxNum(_)
                | Self::String(_)
                | Self::DateTime(_)
        )
    }

    /// Whether this token is a comparison operator.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a reserved keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the identifier text for bare and escaped names.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Name(name) | TokenKind::QuotedName(name) => Some(name),
            _ => None,
        }
    }

    /// True if this is an unescaped name spelling `keyword`.
    ///
    /// Contextual keywords are recognised this way.
    #[must_use]
    pub fn is_word(&self, keyword: Keyword) -> bool {
        match &self.kind {
            TokenKind::Keyword(kw) => *kw == keyword,
            TokenKind::Name(name) => name.eq_ignore_ascii_case(keyword.as_str()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("ecsqloptions"), Some(Keyword::Ecsqloptions));
        assert_eq!(Keyword::from_str("Row_Number"), Some(Keyword::RowNumber));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_round_trips_through_as_str() {
        for kw in [
            Keyword::CurrentTimestamp,
            Keyword::NavigationValue,
            Keyword::GroupConcat,
            Keyword::Ecsqloptions,
            Keyword::Unbounded,
        ] {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn test_reserved_and_contextual() {
        assert!(Keyword::Select.is_reserved());
        assert!(Keyword::Only.is_reserved());
        assert!(!Keyword::Date.is_reserved());
        assert!(!Keyword::Rows.is_reserved());
        assert!(!Keyword::Max.is_reserved());
    }

    #[test]
    fn test_token_is_word() {
        let name = Token::new(TokenKind::Name(String::from("rows")), Span::new(0, 4));
        let quoted = Token::new(TokenKind::QuotedName(String::from("rows")), Span::new(0, 6));
        let reserved = Token::new(TokenKind::Keyword(Keyword::From), Span::new(0, 4));
        assert!(name.is_word(Keyword::Rows));
        assert!(!quoted.is_word(Keyword::Rows));
        assert!(reserved.is_word(Keyword::From));
        assert_eq!(quoted.as_name(), Some("rows"));
    }
}

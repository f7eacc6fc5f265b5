//! Parse tree nodes.

use serde::Serialize;

use super::RuleTag;
use crate::lexer::Keyword;

/// Index of a node inside an [`Arena`](super::Arena) or a
/// [`ParseTree`](super::ParseTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// Coarse classification of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rule,
    List,
    CommaList,
    DotList,
    NameLeaf,
    PunctuationLeaf,
    KeywordLeaf,
    LiteralLeaf,
    ArrayIndexLeaf,
}

impl Shape {
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        !matches!(self, Self::Rule | Self::List | Self::CommaList | Self::DotList)
    }

    /// True for the flattened repetition shapes.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::List | Self::CommaList | Self::DotList)
    }
}

/// The kind of value a literal leaf holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    String,
    Integer,
    Real,
    ApproxNum,
    DateTime,
}

/// A parse tree node.
///
/// Interior nodes own an ordered list of children and carry a [`RuleTag`];
/// leaves carry text and no tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNode {
    /// Fixed-arity interior node; child count and order depend on the
    /// production.
    Rule { tag: RuleTag, children: Vec<NodeId> },
    /// Items separated by whitespace or keywords.
    List { tag: RuleTag, children: Vec<NodeId> },
    /// Comma-separated items, commas not kept.
    CommaList { tag: RuleTag, children: Vec<NodeId> },
    /// Dot-separated path segments, dots not kept.
    DotList { tag: RuleTag, children: Vec<NodeId> },
    Name(String),
    Punctuation(String),
    Keyword(Keyword),
    Literal { kind: LiteralKind, text: String },
    /// Array index suffix as written, e.g. `[3]`.
    ArrayIndex(String),
}

impl ParseNode {
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::Rule { .. } => Shape::Rule,
            Self::List { .. } => Shape::List,
            Self::CommaList { .. } => Shape::CommaList,
            Self::DotList { .. } => Shape::DotList,
            Self::Name(_) => Shape::NameLeaf,
            Self::Punctuation(_) => Shape::PunctuationLeaf,
            Self::Keyword(_) => Shape::KeywordLeaf,
            Self::Literal { .. } => Shape::LiteralLeaf,
            Self::ArrayIndex(_) => Shape::ArrayIndexLeaf,
        }
    }

    /// The rule tag of an interior node.
    #[must_use]
    pub const fn rule_tag(&self) -> Option<RuleTag> {
        match self {
            Self::Rule { tag, .. }
            | Self::List { tag, .. }
            | Self::CommaList { tag, .. }
            | Self::DotList { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    /// The text of a leaf. Keywords report their canonical spelling.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Name(text)
            | Self::Punctuation(text)
            | Self::ArrayIndex(text)
            | Self::Literal { text, .. } => Some(text),
            Self::Keyword(kw) => Some(kw.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match self {
            Self::Rule { children, .. }
            | Self::List { children, .. }
            | Self::CommaList { children, .. }
            | Self::DotList { children, .. } => children,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            Self::Rule { children, .. }
            | Self::List { children, .. }
            | Self::CommaList { children, .. }
            | Self::DotList { children, .. } => Some(children),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.shape().is_leaf()
    }

    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    #[must_use]
    pub const fn literal_kind(&self) -> Option<LiteralKind> {
        match self {
            Self::Literal { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True for a punctuation leaf spelling `text`.
    #[must_use]
    pub fn is_punctuation(&self, text: &str) -> bool {
        matches!(self, Self::Punctuation(p) if p == text)
    }
}

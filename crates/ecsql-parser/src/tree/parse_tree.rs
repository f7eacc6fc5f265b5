//! The owned result of a successful parse.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::{LiteralKind, NodeId, ParseNode, RuleTag, Shape};

/// A parse tree.
///
/// Nodes are stored in pre-order; the root is always the first node and
/// every stored node is reachable from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
}

impl ParseTree {
    pub(crate) const fn from_nodes(nodes: Vec<ParseNode>) -> Self {
        Self { nodes }
    }

    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        self.node(NodeId::from_index(0))
    }

    #[must_use]
    pub const fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.nodes.len()).map(|i| self.node(NodeId::from_index(i)))
    }

    /// All interior nodes tagged `tag`, in pre-order.
    pub fn find_all(&self, tag: RuleTag) -> impl Iterator<Item = NodeRef<'_>> {
        self.iter().filter(move |n| n.tag() == Some(tag))
    }

    /// The first interior node tagged `tag`, in pre-order.
    #[must_use]
    pub fn find(&self, tag: RuleTag) -> Option<NodeRef<'_>> {
        self.find_all(tag).next()
    }

    /// Renders the tree back to ECSQL text. See [`NodeRef::to_sql`].
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.root().to_sql()
    }
}

/// A borrowed handle to one node of a [`ParseTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t ParseTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn node(&self) -> &'t ParseNode {
        &self.tree.nodes[self.id.index()]
    }

    #[must_use]
    pub fn tag(&self) -> Option<RuleTag> {
        self.node().rule_tag()
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.node().shape()
    }

    #[must_use]
    pub fn text(&self) -> Option<&'t str> {
        self.node().text()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// True for an interior node with no children, i.e. an absent optional
    /// part.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_leaf() && self.node().children().is_empty()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.node().children().len()
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Option<Self> {
        self.node()
            .children()
            .get(index)
            .map(|id| self.tree.node(*id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        self.node().children().iter().map(move |id| tree.node(*id))
    }

    /// This node and all nodes below it, in pre-order.
    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        let mut stack = vec![self.id];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(tree.nodes[id.index()].children().iter().rev());
            Some(tree.node(id))
        })
    }

    /// The first node tagged `tag` in this subtree, including this node.
    #[must_use]
    pub fn find(&self, tag: RuleTag) -> Option<Self> {
        self.descendants().find(|n| n.tag() == Some(tag))
    }

    /// Leaf texts of this subtree, left to right.
    #[must_use]
    pub fn leaf_texts(&self) -> Vec<&'t str> {
        self.descendants().filter_map(|n| n.text()).collect()
    }

    #[must_use]
    pub fn to_sql(&self) -> String {
        super::unparse::render(*self)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match self.node() {
            ParseNode::Rule { tag, .. } => writeln!(f, "{tag}")?,
            ParseNode::List { tag, .. } => writeln!(f, "{tag} (list)")?,
            ParseNode::CommaList { tag, .. } => writeln!(f, "{tag} (comma list)")?,
            ParseNode::DotList { tag, .. } => writeln!(f, "{tag} (dot list)")?,
            ParseNode::Name(name) => writeln!(f, "name {name}")?,
            ParseNode::Punctuation(p) => writeln!(f, "'{p}'")?,
            ParseNode::Keyword(kw) => writeln!(f, "{}", kw.as_str())?,
            ParseNode::Literal { kind, text } => writeln!(f, "{} {text}", literal_label(*kind))?,
            ParseNode::ArrayIndex(index) => writeln!(f, "index {index}")?,
        }
        for child in self.children() {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

const fn literal_label(kind: LiteralKind) -> &'static str {
    match kind {
        LiteralKind::String => "string",
        LiteralKind::Integer => "integer",
        LiteralKind::Real => "real",
        LiteralKind::ApproxNum => "approxnum",
        LiteralKind::DateTime => "datetime",
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node", self.node())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root().fmt_indented(f, 0)
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node();
        let mut map = serializer.serialize_map(None)?;
        if let Some(tag) = node.rule_tag() {
            map.serialize_entry("tag", &tag)?;
        }
        map.serialize_entry("shape", &node.shape())?;
        if let Some(kind) = node.literal_kind() {
            map.serialize_entry("kind", &kind)?;
        }
        if let Some(text) = node.text() {
            map.serialize_entry("text", text)?;
        }
        if !node.is_leaf() {
            map.serialize_entry("children", &Children(*self))?;
        }
        map.end()
    }
}

struct Children<'t>(NodeRef<'t>);

impl Serialize for Children<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.child_count()))?;
        for child in self.0.children() {
            seq.serialize_element(&child)?;
        }
        seq.end()
    }
}

impl Serialize for ParseTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

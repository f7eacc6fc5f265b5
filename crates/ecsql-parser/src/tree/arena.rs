//! Per-parse node pool.

use super::{LiteralKind, NodeId, ParseNode, ParseTree, RuleTag};
use crate::lexer::Keyword;

/// Owns every node allocated while parsing one statement.
///
/// Dropping the arena releases all of its nodes at once, attached or not.
/// On success [`Arena::into_tree`] moves the nodes reachable from the root
/// into a [`ParseTree`].
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<ParseNode>,
}

impl Arena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn alloc(&mut self, node: ParseNode) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &ParseNode {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).children()
    }

    #[must_use]
    pub fn rule_tag(&self, id: NodeId) -> Option<RuleTag> {
        self.get(id).rule_tag()
    }

    /// Allocates a `Rule` node owning `children` in order.
    pub fn rule(&mut self, tag: RuleTag, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.alloc(ParseNode::Rule {
            tag,
            children: children.into_iter().collect(),
        })
    }

    /// Allocates a childless `Rule` node, used for absent optional parts.
    pub fn empty(&mut self, tag: RuleTag) -> NodeId {
        self.rule(tag, [])
    }

    pub fn list(&mut self, tag: RuleTag) -> NodeId {
        self.alloc(ParseNode::List {
            tag,
            children: Vec::new(),
        })
    }

    pub fn comma_list(&mut self, tag: RuleTag) -> NodeId {
        self.alloc(ParseNode::CommaList {
            tag,
            children: Vec::new(),
        })
    }

    pub fn dot_list(&mut self, tag: RuleTag) -> NodeId {
        self.alloc(ParseNode::DotList {
            tag,
            children: Vec::new(),
        })
    }

    /// Appends `child` to an interior node. Leaves are left untouched.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.nodes[parent.index()].children_mut() {
            children.push(child);
        }
    }

    pub fn name(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(ParseNode::Name(text.into()))
    }

    pub fn punct(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(ParseNode::Punctuation(text.into()))
    }

    pub fn keyword(&mut self, keyword: Keyword) -> NodeId {
        self.alloc(ParseNode::Keyword(keyword))
    }

    pub fn literal(&mut self, kind: LiteralKind, text: impl Into<String>) -> NodeId {
        self.alloc(ParseNode::Literal {
            kind,
            text: text.into(),
        })
    }

    pub fn array_index(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(ParseNode::ArrayIndex(text.into()))
    }

    /// Folds `text` into an existing literal leaf, separated by a blank.
    /// The merged literal is a string. Returns false if `id` is not a
    /// literal.
    pub fn fold_literal(&mut self, id: NodeId, text: &str) -> bool {
        match &mut self.nodes[id.index()] {
            ParseNode::Literal { kind, text: existing } => {
                existing.push(' ');
                existing.push_str(text);
                *kind = LiteralKind::String;
                true
            }
            _ => false,
        }
    }

    /// Moves the subtree under `root` into a [`ParseTree`].
    ///
    /// Nodes are renumbered in pre-order, so the root becomes node 0 and
    /// nodes that were never attached are dropped with the arena.
    #[must_use]
    pub fn into_tree(mut self, root: NodeId) -> ParseTree {
        let mut nodes: Vec<ParseNode> = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Option<usize>)> = vec![(root, None)];

        while let Some((old, parent)) = stack.pop() {
            let new_index = nodes.len();
            let mut node = std::mem::replace(
                &mut self.nodes[old.index()],
                ParseNode::Punctuation(String::new()),
            );
            let children = node.children_mut().map(std::mem::take).unwrap_or_default();
            nodes.push(node);

            if let Some(parent) = parent {
                if let Some(siblings) = nodes[parent].children_mut() {
                    siblings.push(NodeId::from_index(new_index));
                }
            }
            for child in children.into_iter().rev() {
                stack.push((child, Some(new_index)));
            }
        }

        ParseTree::from_nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Shape;

    #[test]
    fn test_append_keeps_order() {
        let mut arena = Arena::new();
        let list = arena.comma_list(RuleTag::ValueExpCommalist);
        let a = arena.name("a");
        let b = arena.name("b");
        arena.append(list, a);
        arena.append(list, b);
        assert_eq!(arena.children(list), &[a, b]);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_append_to_leaf_is_ignored() {
        let mut arena = Arena::new();
        let leaf = arena.name("a");
        let other = arena.name("b");
        arena.append(leaf, other);
        assert!(arena.children(leaf).is_empty());
    }

    #[test]
    fn test_fold_literal() {
        let mut arena = Arena::new();
        let lit = arena.literal(LiteralKind::Integer, "12");
        assert!(arena.fold_literal(lit, "apples"));
        assert_eq!(arena.get(lit).text(), Some("12 apples"));
        assert_eq!(arena.get(lit).literal_kind(), Some(LiteralKind::String));
        let name = arena.name("x");
        assert!(!arena.fold_literal(name, "y"));
    }

    #[test]
    fn test_into_tree_drops_unattached_nodes_and_renumbers() {
        let mut arena = Arena::new();
        let orphan = arena.name("orphan");
        let a = arena.name("a");
        let b = arena.punct("*");
        let path = arena.dot_list(RuleTag::PropertyPath);
        arena.append(path, a);
        arena.append(path, b);
        let root = arena.rule(RuleTag::ColumnRef, [path]);
        let _ = orphan;

        let tree = arena.into_tree(root);
        assert_eq!(tree.len(), 4);
        let root = tree.root();
        assert_eq!(root.id().index(), 0);
        assert_eq!(root.tag(), Some(RuleTag::ColumnRef));
        let path = root.child(0).unwrap();
        assert_eq!(path.shape(), Shape::DotList);
        let texts: Vec<_> = path.children().filter_map(|c| c.text()).collect();
        assert_eq!(texts, ["a", "*"]);
    }
}

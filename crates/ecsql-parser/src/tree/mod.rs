//! Parse tree model.
//!
//! Nodes live in an index-addressed pool. While parsing they are allocated
//! in an [`Arena`]; a successful parse compacts the reachable nodes into a
//! [`ParseTree`].

mod arena;
mod node;
mod parse_tree;
mod rule;
mod unparse;

pub use arena::Arena;
pub use node::{LiteralKind, NodeId, ParseNode, Shape};
pub use parse_tree::{NodeRef, ParseTree};
pub use rule::RuleTag;

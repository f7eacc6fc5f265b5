//! Renders a tree back to ECSQL text.

use super::{LiteralKind, NodeRef, ParseNode};
use crate::lexer::Keyword;

/// Concatenates the leaves of `node`, quoting literals and escaping names
/// so that the output parses back to the same tree. Comma and dot lists get
/// their separators back.
pub(super) fn render(node: NodeRef<'_>) -> String {
    let mut writer = Writer::default();
    writer.node(node);
    writer.out
}

#[derive(Default)]
struct Writer {
    out: String,
    glue_next: bool,
    after_name: bool,
}

impl Writer {
    fn node(&mut self, node: NodeRef<'_>) {
        let separator = match node.node() {
            ParseNode::CommaList { .. } => Some(","),
            ParseNode::DotList { .. } => Some("."),
            _ => None,
        };
        if node.is_leaf() {
            self.leaf(node.node());
            return;
        }
        for (i, child) in node.children().enumerate() {
            if let (Some(separator), true) = (separator, i > 0) {
                self.punctuation(separator);
                self.after_name = false;
            }
            self.node(child);
        }
    }

    fn leaf(&mut self, leaf: &ParseNode) {
        match leaf {
            ParseNode::Punctuation(p) => self.punctuation(p),
            ParseNode::ArrayIndex(index) => {
                self.out.push_str(index);
                self.glue_next = false;
            }
            _ => self.word(&leaf_text(leaf)),
        }
        self.after_name = matches!(leaf, ParseNode::Name(_));
    }

    fn punctuation(&mut self, p: &str) {
        // ':' separates class names but also starts named parameters
        let glue_before = matches!(p, "," | ")" | ".") || (p == ":" && self.after_name);
        if !glue_before {
            self.space();
        }
        self.out.push_str(p);
        self.glue_next = matches!(p, "(" | "." | ":");
    }

    fn word(&mut self, text: &str) {
        self.space();
        self.out.push_str(text);
        self.glue_next = false;
    }

    fn space(&mut self) {
        if !self.out.is_empty() && !self.glue_next {
            self.out.push(' ');
        }
    }
}

fn leaf_text(node: &ParseNode) -> String {
    match node {
        ParseNode::Name(name) => escape_name(name),
        ParseNode::Literal {
            kind: LiteralKind::String | LiteralKind::DateTime,
            text,
        } => quote(text, '\''),
        ParseNode::Keyword(kw) => kw.as_str().to_string(),
        ParseNode::Punctuation(text)
        | ParseNode::Literal { text, .. }
        | ParseNode::ArrayIndex(text) => text.clone(),
        ParseNode::Rule { .. }
        | ParseNode::List { .. }
        | ParseNode::CommaList { .. }
        | ParseNode::DotList { .. } => String::new(),
    }
}

fn quote(text: &str, delimiter: char) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(delimiter);
    for c in text.chars() {
        if c == delimiter {
            quoted.push(delimiter);
        }
        quoted.push(c);
    }
    quoted.push(delimiter);
    quoted
}

/// Names that would not lex back as the same bare name are escaped:
/// brackets where possible, double quotes otherwise.
fn escape_name(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && Keyword::from_str(name).is_none();
    if plain {
        return name.to_string();
    }

    let bracket_safe = !name.is_empty()
        && !name.contains(']')
        && !name.chars().all(|c| c.is_ascii_digit());
    if bracket_safe {
        format!("[{name}]")
    } else {
        quote(name, '"')
    }
}

//! Tagged text tree and recursive flattening.
//!
//! Titles on result pages may contain nested formatting spans
//! (`Fast <i>VM</i> Migration`). The tree keeps only what matters for text
//! extraction: text leaves and containers of children.

use scraper::ElementRef;

/// A node of a text-bearing markup fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, whitespace preserved
    Text(String),
    /// Any element; only its children matter
    Element(Vec<Node>),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn element(children: Vec<Node>) -> Self {
        Node::Element(children)
    }

    /// Convert a parsed HTML element into a [`Node`] tree.
    ///
    /// Comments, doctypes and processing instructions are dropped.
    pub fn from_element(element: ElementRef<'_>) -> Self {
        let children = element
            .children()
            .filter_map(|child| match child.value() {
                scraper::Node::Text(text) => Some(Node::Text((**text).to_owned())),
                scraper::Node::Element(_) => ElementRef::wrap(child).map(Node::from_element),
                _ => None,
            })
            .collect();
        Node::Element(children)
    }
}

/// Concatenate all text in document order, at any nesting depth.
pub fn flatten_text(node: &Node) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(children) => {
            for child in children {
                push_text(child, out);
            }
        }
    }
}

use crate::doc::*;
use std::borrow::Borrow;

/// Renders nodes as plain text: markup is dropped, and only the text that a reader would see is kept.
///
/// Footnotes (collected or not) don't contribute any text, since they aren't part of the sentence they annotate. Runs of
/// whitespace collapse to a single space, and the result is trimmed.
pub fn nodes_to_plain_string<N: Borrow<Node>>(nodes: &[N]) -> String {
    let mut raw = String::with_capacity(nodes.len() * 8); // random guess
    build_nodes(&mut raw, nodes);
    normalize_whitespace(&raw)
}

fn build_nodes<N: Borrow<Node>>(out: &mut String, nodes: &[N]) {
    for node in nodes {
        build_node(out, node.borrow());
    }
}

fn build_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(Text { value }) => out.push_str(value),
        Node::Footnote(_) | Node::FootnoteMark(_) => {}
        Node::Element(Element { children, .. })
        | Node::Heading(Heading { children, .. })
        | Node::Include(Include { children, .. })
        | Node::Link(Link { children, .. })
        | Node::Toc(Toc { children, .. }) => build_nodes(out, children),
    }
}

fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

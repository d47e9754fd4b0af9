use crate::doc::Node;
use std::slice;

/// What a [`MutNodeVisitor`] wants to happen after it visits a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Visit {
    /// Continue into the node's children, as they are after the visit.
    Descend,
    /// Don't look at this node's children.
    Skip,
}

pub trait MutNodeVisitor {
    /// Visits a single node. Implementations should _not_ traverse down the tree themselves; return [`Visit::Descend`]
    /// instead.
    ///
    /// The visitor may replace the node or its children. The traversal descends into whatever is there once this
    /// method returns, so content the visitor splices in gets visited too.
    fn visit(&mut self, node: &mut Node) -> Visit;
}

/// Pre-order traversal of `nodes` and everything under them.
pub fn traverse_all<V: MutNodeVisitor>(nodes: &mut [Node], visitor: &mut V) {
    for node in nodes {
        traverse(node, visitor);
    }
}

pub fn traverse<V: MutNodeVisitor>(node: &mut Node, visitor: &mut V) {
    if visitor.visit(node) == Visit::Skip {
        return;
    }
    if let Some(children) = node.children_mut() {
        traverse_all(children, visitor);
    }
}

/// Read-only pre-order iteration over `nodes` and all their descendants, in document order.
pub fn pre_order(nodes: &[Node]) -> PreOrder<'_> {
    PreOrder {
        stack: vec![nodes.iter()],
    }
}

pub struct PreOrder<'a> {
    stack: Vec<slice::Iter<'a, Node>>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    let children = node.children();
                    if !children.is_empty() {
                        self.stack.push(children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::tree_test_utils::*;
    use crate::doc::Text;

    #[test]
    fn pre_order_is_document_order() {
        let nodes = vec![
            el("p", vec![text("a"), el("em", vec![text("b")])]),
            text("c"),
            el("div", vec![]),
        ];
        let texts: Vec<_> = pre_order(&nodes)
            .filter_map(|node| match node {
                Node::Text(Text { value }) => Some(value.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(pre_order(&nodes).count(), 6);
    }

    #[test]
    fn pre_order_empty() {
        assert_eq!(pre_order(&[]).count(), 0);
    }

    #[test]
    fn visitor_sees_replaced_children() {
        struct Splicer {
            seen: Vec<String>,
        }

        impl MutNodeVisitor for Splicer {
            fn visit(&mut self, node: &mut Node) -> Visit {
                match node {
                    Node::Text(Text { value }) => self.seen.push(value.clone()),
                    Node::Element(element) if element.tag == "slot" => {
                        element.children = vec![text("spliced")];
                    }
                    _ => {}
                }
                Visit::Descend
            }
        }

        let mut nodes = vec![text("before"), el("slot", vec![]), text("after")];
        let mut splicer = Splicer { seen: vec![] };
        traverse_all(&mut nodes, &mut splicer);
        assert_eq!(splicer.seen, vec!["before", "spliced", "after"]);
    }

    #[test]
    fn skip_stops_descent() {
        struct SkipEverything {
            visits: usize,
        }

        impl MutNodeVisitor for SkipEverything {
            fn visit(&mut self, _node: &mut Node) -> Visit {
                self.visits += 1;
                Visit::Skip
            }
        }

        let mut nodes = vec![el("p", vec![text("a"), text("b")]), text("c")];
        let mut visitor = SkipEverything { visits: 0 };
        traverse_all(&mut nodes, &mut visitor);
        assert_eq!(visitor.visits, 2);
    }
}

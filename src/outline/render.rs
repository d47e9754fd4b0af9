use crate::doc::{Element, Node};
use crate::outline::OutlineNode;
use std::collections::BTreeMap;

/// The class on the top-level list of a rendered table of contents.
pub const TOC_LIST_CLASS: &str = "toc";

/// Renders an outline as nested ordered lists.
///
/// The root itself isn't rendered; its children become the items of an `<ol class="toc">`. Each item links to its
/// heading, and holds a nested `<ol>` of its own children if it has any. Placeholder items have no link, only the nested
/// list.
///
/// An outline whose root has no children renders to nothing.
pub fn render_outline(outline: &OutlineNode) -> Vec<Node> {
    if outline.children.is_empty() {
        return Vec::new();
    }
    let mut list = render_list(&outline.children);
    if let Node::Element(element) = &mut list {
        element.attrs.insert("class".to_string(), TOC_LIST_CLASS.to_string());
    }
    vec![list]
}

fn render_list(items: &[OutlineNode]) -> Node {
    Node::element("ol", items.iter().map(render_item).collect())
}

fn render_item(item: &OutlineNode) -> Node {
    let mut li_children = Vec::with_capacity(2);
    if let Some(target_id) = &item.target_id {
        li_children.push(Node::Element(Element {
            tag: "a".to_string(),
            attrs: BTreeMap::from([("href".to_string(), format!("#{target_id}"))]),
            children: vec![Node::text(&item.caption)],
        }));
    }
    if !item.children.is_empty() {
        li_children.push(render_list(&item.children));
    }
    Node::element("li", li_children)
}

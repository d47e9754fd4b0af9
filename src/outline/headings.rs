use crate::doc::walk::{pre_order, traverse_all, MutNodeVisitor, Visit};
use crate::doc::{nodes_to_plain_string, Heading, Node};
use crate::util::id_assigner::IdAssigner;

/// Prefix for the ids given to headings that don't have one.
pub const GENERATED_ID_PREFIX: &str = "toc-";

/// What the outline builder needs to know about a heading.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeadingDescriptor {
    pub level: u8,
    pub id: String,
    /// The heading's text, without any markup.
    pub caption: String,
    pub classes: Vec<String>,
}

/// Finds every heading under `nodes`, in document order.
///
/// Headings without an id are given one (`toc-1`, `toc-2`, …), so the table of contents has something to link to.
/// Generated ids never reuse a number that an existing `toc-<n>` id already has.
pub fn scan_headings(nodes: &mut [Node]) -> Vec<HeadingDescriptor> {
    let existing_ids = pre_order(nodes).filter_map(|node| match node {
        Node::Heading(Heading { id: Some(id), .. }) => Some(id.as_str()),
        _ => None,
    });
    let mut assigner = HeadingIds {
        ids: IdAssigner::new(GENERATED_ID_PREFIX, existing_ids),
    };
    traverse_all(nodes, &mut assigner);
    heading_descriptors(nodes)
}

/// Describes the headings under `nodes`, in document order, without changing anything.
///
/// Headings without an id get an empty one; run [`scan_headings`] over the whole article first to avoid that.
pub fn heading_descriptors(nodes: &[Node]) -> Vec<HeadingDescriptor> {
    let mut found = Vec::new();
    describe_into(&mut found, nodes);
    found
}

fn describe_into(found: &mut Vec<HeadingDescriptor>, nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::Heading(heading) => found.push(HeadingDescriptor {
                level: heading.level,
                id: heading.id.clone().unwrap_or_default(),
                caption: nodes_to_plain_string(&heading.children),
                classes: heading.classes.clone(),
            }),
            // A rendered table of contents only has links to headings, never headings.
            Node::Toc(_) => {}
            _ => describe_into(found, node.children()),
        }
    }
}

struct HeadingIds {
    ids: IdAssigner,
}

impl MutNodeVisitor for HeadingIds {
    fn visit(&mut self, node: &mut Node) -> Visit {
        match node {
            Node::Heading(heading) => {
                if heading.id.is_none() {
                    heading.id = Some(self.ids.next_id());
                }
                Visit::Skip
            }
            Node::Toc(_) => Visit::Skip,
            _ => Visit::Descend,
        }
    }
}

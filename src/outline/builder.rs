use crate::outline::HeadingDescriptor;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::mem;

/// A node in a reconstructed heading hierarchy.
///
/// Every non-root node's level is exactly one more than its parent's. Where the document skips levels (an `h4` directly
/// under an `h2`, say), the gaps are filled with placeholders: nodes with no target and an empty caption.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct OutlineNode {
    pub level: u8,
    pub caption: String,
    /// The id of the heading this node links to; `None` for the root and for placeholders.
    pub target_id: Option<String>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn is_placeholder(&self) -> bool {
        self.target_id.is_none()
    }
}

/// A heading couldn't be placed in the outline, because no ancestor sits at the level directly above it.
///
/// This means the document's nesting is inconsistent with where the outline is rooted: for example, a table of contents
/// declared to live inside a level-2 section, in a document that has level-2 headings of its own.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructuralError {
    pub level: u8,
    pub caption: String,
    pub root_level: u8,
}

impl Display for StructuralError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "heading {:?} (level {}) can't be placed in an outline rooted at level {}",
            self.caption, self.level, self.root_level
        )
    }
}

impl std::error::Error for StructuralError {}

/// Builds the outline for a sequence of headings, in document order.
///
/// The root sits one level above the shallowest heading that isn't excluded. Headings for which `exclude` returns `true`
/// are skipped entirely.
///
/// Once all headings are placed, a root with an empty caption and exactly one child is replaced by that child, for as
/// long as that holds. This strips the redundant wrapping level of a document with a single top-level heading.
///
/// ```
/// use wikipage::outline::*;
///
/// fn h(level: u8, caption: &str) -> HeadingDescriptor {
///     HeadingDescriptor { level, id: caption.to_lowercase(), caption: caption.to_string(), classes: vec![] }
/// }
///
/// let outline = build_outline(&[h(2, "A"), h(4, "B"), h(2, "C")], |_| false).unwrap();
///
/// assert_eq!(outline.level, 1);
/// assert_eq!(outline.children.len(), 2);
/// let a = &outline.children[0];
/// assert_eq!(a.caption, "A");
/// assert!(a.children[0].is_placeholder());
/// assert_eq!(a.children[0].children[0].caption, "B");
/// ```
pub fn build_outline<F>(headings: &[HeadingDescriptor], exclude: F) -> Result<OutlineNode, StructuralError>
where
    F: Fn(&HeadingDescriptor) -> bool,
{
    let min_level = headings
        .iter()
        .filter(|h| !exclude(h))
        .map(|h| h.level)
        .min()
        .unwrap_or(1);
    build_outline_at(min_level.saturating_sub(1), headings, exclude)
}

/// Like [`build_outline`], but with the root at a fixed level.
///
/// Any heading (that isn't excluded) at or above `root_level` results in a [`StructuralError`].
pub fn build_outline_at<F>(root_level: u8, headings: &[HeadingDescriptor], exclude: F) -> Result<OutlineNode, StructuralError>
where
    F: Fn(&HeadingDescriptor) -> bool,
{
    let mut builder = OutlineBuilder::new(root_level);
    for heading in headings.iter().filter(|h| !exclude(h)) {
        builder.push(heading)?;
    }
    Ok(builder.build())
}

/// The outline under construction, as an arena of nodes that point to their parents by index.
///
/// Index 0 is always the root.
pub struct OutlineBuilder {
    nodes: Vec<ArenaNode>,
    cursor: usize,
}

struct ArenaNode {
    level: u8,
    caption: String,
    target_id: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl OutlineBuilder {
    pub fn new(root_level: u8) -> Self {
        Self {
            nodes: vec![ArenaNode {
                level: root_level,
                caption: String::new(),
                target_id: None,
                parent: None,
                children: Vec::new(),
            }],
            cursor: 0,
        }
    }

    /// Places the next heading.
    pub fn push(&mut self, heading: &HeadingDescriptor) -> Result<(), StructuralError> {
        let cursor_level = self.nodes[self.cursor].level;
        let mut parent = if heading.level <= cursor_level {
            self.ancestor_at(heading)?
        } else {
            self.cursor
        };
        // Fill any gap with placeholders, one level at a time.
        for level in (self.nodes[parent].level + 1)..heading.level {
            parent = self.append(parent, level, String::new(), None);
        }
        self.cursor = self.append(parent, heading.level, heading.caption.clone(), Some(heading.id.clone()));
        Ok(())
    }

    /// Finishes the outline, collapsing any redundant wrapping root.
    pub fn build(mut self) -> OutlineNode {
        let root = self.materialize(0);
        collapse(root)
    }

    /// Walks up from the cursor until a node at exactly `heading.level - 1`.
    fn ancestor_at(&self, heading: &HeadingDescriptor) -> Result<usize, StructuralError> {
        let not_found = || StructuralError {
            level: heading.level,
            caption: heading.caption.clone(),
            root_level: self.nodes[0].level,
        };
        let target = heading.level.checked_sub(1).ok_or_else(not_found)?;
        let mut at = self.cursor;
        loop {
            let node = &self.nodes[at];
            if node.level == target {
                return Ok(at);
            }
            if node.level < target {
                return Err(not_found());
            }
            match node.parent {
                Some(parent) => at = parent,
                None => return Err(not_found()),
            }
        }
    }

    fn append(&mut self, parent: usize, level: u8, caption: String, target_id: Option<String>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(ArenaNode {
            level,
            caption,
            target_id,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    fn materialize(&mut self, idx: usize) -> OutlineNode {
        let child_indices = mem::take(&mut self.nodes[idx].children);
        let children = child_indices.into_iter().map(|child| self.materialize(child)).collect();
        let node = &mut self.nodes[idx];
        OutlineNode {
            level: node.level,
            caption: mem::take(&mut node.caption),
            target_id: node.target_id.take(),
            children,
        }
    }
}

fn collapse(mut root: OutlineNode) -> OutlineNode {
    while root.children.len() == 1 && root.caption.is_empty() {
        let Some(only_child) = root.children.pop() else {
            break;
        };
        root = only_child;
    }
    root
}

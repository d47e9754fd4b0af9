use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub use elem::*;

/// The numeric id the server assigns to every article.
pub type ArticleId = u64;

/// A full article page, as produced by the server's renderer.
///
/// A page holds three regions:
///
/// - the main [`Article`], whose body is what the reader came for;
/// - the included articles, which the server ships detached alongside the main article so that
///   [include placeholders](Include) can splice them in;
/// - the [`Aside`], which holds the footnote list.
///
/// Pages are usually read from JSON:
///
/// ```
/// use wikipage::doc::*;
///
/// let json = r#"{
///     "article": {"id": 1, "body": [{"kind": "text", "value": "hello"}]},
///     "included": [{"id": 2, "body": []}]
/// }"#;
/// let page: Page = serde_json::from_str(json).unwrap();
///
/// assert_eq!(page.article.id, 1);
/// assert_eq!(page.article.body, vec![Node::text("hello")]);
/// assert_eq!(page.included.len(), 1);
/// assert_eq!(page.aside.footnotes, Some(Vec::new())); // the container starts out present, but empty
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    pub article: Article,
    #[serde(default)]
    pub included: Vec<Article>,
    #[serde(default)]
    pub aside: Aside,
}

/// One article: its id and its rendered body.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    #[serde(default)]
    pub body: Vec<Node>,
}

/// The aside region of a page.
///
/// [`Aside::footnotes`] is the footnotes container. It is `Some` (possibly empty) while the container exists, and `None`
/// once it has been removed because the article had no footnotes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aside {
    #[serde(default = "Aside::empty_footnotes")]
    pub footnotes: Option<Vec<FootnoteEntry>>,
}

impl Default for Aside {
    fn default() -> Self {
        Self {
            footnotes: Self::empty_footnotes(),
        }
    }
}

impl Aside {
    fn empty_footnotes() -> Option<Vec<FootnoteEntry>> {
        Some(Vec::new())
    }
}

/// An entry in the aside's footnote list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FootnoteEntry {
    /// 1-based, in the order the footnotes were found.
    pub number: u64,
    /// The anchor id, `footnote-<number>`.
    pub id: String,
    #[serde(default)]
    pub content: Vec<Node>,
}

/// A single node of the document tree.
///
/// Most of the page is made of generic [`Element`]s; the other variants are the node kinds that the post-processing
/// passes read or write.
///
/// In JSON, nodes are tagged by a `"kind"` field:
///
/// ```
/// use wikipage::doc::*;
///
/// let json = r##"[
///     {"kind": "heading", "level": 2, "id": "intro", "children": [{"kind": "text", "value": "Intro"}]},
///     {"kind": "link", "href": "Some Title#part", "children": [{"kind": "text", "value": "see here"}]},
///     {"kind": "toc"}
/// ]"##;
/// let nodes: Vec<Node> = serde_json::from_str(json).unwrap();
///
/// assert_eq!(
///     nodes,
///     vec![
///         Node::Heading(Heading {
///             level: 2,
///             id: Some("intro".to_string()),
///             classes: vec![],
///             children: vec![Node::text("Intro")],
///         }),
///         Node::Link(Link {
///             href: "Some Title#part".to_string(),
///             status: None,
///             children: vec![Node::text("see here")],
///         }),
///         Node::Toc(Toc { level: None, children: vec![] }),
///     ]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A generic container (or any other element): `<div>`, `<p>`, `<em>`, and so on.
    Element(Element),
    Heading(Heading),
    Text(Text),
    /// An inline footnote fragment that hasn't been collected yet.
    Footnote(Footnote),
    /// The marker a collected footnote leaves behind.
    FootnoteMark(FootnoteMark),
    Include(Include),
    Link(Link),
    Toc(Toc),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Text { value: value.into() })
    }

    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Element(Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children,
        })
    }

    /// This node's children. Terminal nodes ([`Node::Text`] and [`Node::FootnoteMark`]) have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(Element { children, .. })
            | Node::Heading(Heading { children, .. })
            | Node::Footnote(Footnote { children })
            | Node::Include(Include { children, .. })
            | Node::Link(Link { children, .. })
            | Node::Toc(Toc { children, .. }) => children,
            Node::Text(_) | Node::FootnoteMark(_) => &[],
        }
    }

    /// Mutable access to this node's children, or `None` for terminal nodes.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element(Element { children, .. })
            | Node::Heading(Heading { children, .. })
            | Node::Footnote(Footnote { children })
            | Node::Include(Include { children, .. })
            | Node::Link(Link { children, .. })
            | Node::Toc(Toc { children, .. }) => Some(children),
            Node::Text(_) | Node::FootnoteMark(_) => None,
        }
    }
}

/// The structs behind each [`Node`] variant.
pub mod elem {
    use super::*;

    /// Any element the passes don't treat specially.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Element {
        pub tag: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub attrs: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub children: Vec<Node>,
    }

    impl Element {
        pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.attrs.insert(name.into(), value.into());
            self
        }
    }

    /// A heading, `<h1>` through `<h6>`.
    ///
    /// Headings without an id get one when the table of contents is built, so that the contents can link to them.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Heading {
        pub level: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub classes: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub children: Vec<Node>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Text {
        pub value: String,
    }

    /// Footnote content, inline at the point it was written.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Footnote {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub children: Vec<Node>,
    }

    /// A short link to a footnote in the aside. Displays as its number.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct FootnoteMark {
        pub number: u64,
        /// `#footnote-<number>`
        pub target: String,
    }

    /// Marks where another article's content should be spliced in.
    ///
    /// The title is matched exactly (case-sensitively) against the page's include titles.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Include {
        pub title: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub children: Vec<Node>,
    }

    /// An internal wiki link.
    ///
    /// Before link resolution, `href` is the raw (possibly percent-encoded) title the author linked to, optionally with
    /// a `#anchor`. Afterwards it's a site path, and `status` says whether the target exists.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Link {
        pub href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub status: Option<LinkStatus>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub children: Vec<Node>,
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LinkStatus {
        /// The link's target is a known article.
        Available,
        /// Dangling link.
        Missing,
    }

    impl Display for LinkStatus {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(match self {
                LinkStatus::Available => "available",
                LinkStatus::Missing => "missing",
            })
        }
    }

    /// Where a table of contents goes.
    ///
    /// If `level` is set, it's the heading level of the sectioning container the marker sits in: the contents will be
    /// rooted at that level, and every heading in the article has to be deeper than it.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Toc {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub level: Option<u8>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub children: Vec<Node>,
    }

    macro_rules! from_for_node {
        ($($variant:ident),* $(,)?) => {
            $(
            impl From<$variant> for Node {
                fn from(value: $variant) -> Self {
                    Node::$variant(value)
                }
            }
            )*
        };
    }

    from_for_node! { Element, Heading, Text, Footnote, FootnoteMark, Include, Link, Toc }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::tree_test_utils::*;

    #[test]
    fn aside_null_means_removed() {
        let page: Page = serde_json::from_str(r#"{"article": {"id": 3}, "aside": {"footnotes": null}}"#).unwrap();
        assert_eq!(page.aside.footnotes, None);
        assert_eq!(page.article.body, vec![]);
    }

    #[test]
    fn element_attrs_round_trip() {
        let node: Node = Element {
            tag: "div".to_string(),
            attrs: BTreeMap::new(),
            children: vec![text("inside")],
        }
        .with_attr("class", "box")
        .into();
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"element","tag":"div","attrs":{"class":"box"},"children":[{"kind":"text","value":"inside"}]}"#
        );
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn link_status_serializes_snake_case() {
        let node = Node::Link(Link {
            href: "/Alpha".to_string(),
            status: Some(LinkStatus::Available),
            children: vec![],
        });
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"kind":"link","href":"/Alpha","status":"available"}"#
        );
    }

    #[test]
    fn terminal_nodes_have_no_children() {
        let mut mark = Node::FootnoteMark(FootnoteMark {
            number: 1,
            target: "#footnote-1".to_string(),
        });
        assert!(mark.children().is_empty());
        assert!(mark.children_mut().is_none());

        let mut para = el("p", vec![text("a"), text("b")]);
        assert_eq!(para.children().len(), 2);
        para.children_mut().unwrap().clear();
        assert!(para.children().is_empty());
    }
}

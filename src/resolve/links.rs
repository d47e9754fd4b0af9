use crate::doc::walk::{pre_order, traverse_all, MutNodeVisitor, Visit};
use crate::doc::{Link, LinkStatus, Node, Page, Text, TitleIndex};
use crate::resolve::{decode_uri, split_anchor, title_to_path};
use fancy_regex::Regex;
use log::{debug, warn};
use std::sync::OnceLock;

/// What [`resolve_links`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// How many links point to known articles.
    pub available: usize,
    /// The decoded targets of the links that don't, in document order.
    pub missing: Vec<String>,
}

/// Rewrites every internal link on the page into a site path, and marks whether its target exists.
///
/// This covers the main article, any included articles that weren't spliced in, and the aside's footnotes. Links with an
/// absolute href (a scheme like `https:`, or a leading `/`) are left alone; in particular, this means that resolving a
/// page twice doesn't change the result.
///
/// See [`resolve_link`] for how each link is rewritten.
pub fn resolve_links(page: &mut Page, index: &TitleIndex) -> LinkReport {
    let mut resolver = LinkResolver {
        index,
        report: LinkReport::default(),
    };
    traverse_all(&mut page.article.body, &mut resolver);
    for article in &mut page.included {
        traverse_all(&mut article.body, &mut resolver);
    }
    if let Some(footnotes) = &mut page.aside.footnotes {
        for entry in footnotes {
            traverse_all(&mut entry.content, &mut resolver);
        }
    }
    resolver.report
}

/// Rewrites a single internal link.
///
/// The href is [decoded](decode_uri) and split at the first `#`. The part before it is looked up (ignoring case) in the
/// index:
///
/// - if found, the href becomes `/` plus the target's [path](title_to_path), followed by the `#anchor` if there was one;
/// - if not, the href becomes `/` plus the whole decoded href.
///
/// If the link's only child is a text equal to its decoded href, and that has an anchor, the text becomes
/// `path (anchor)`. Any other children are kept as they are.
///
/// ```
/// use wikipage::doc::*;
/// use wikipage::resolve::resolve_link;
///
/// let index: TitleIndex = [
///     ("alpha", LinkTarget { canonical_title: "Alpha".to_string(), article_id: 1 }),
/// ].into_iter().collect();
///
/// let mut link = Link { href: "alpha#sec1".to_string(), status: None, children: vec![Node::text("alpha#sec1")] };
/// assert_eq!(resolve_link(&mut link, &index), LinkStatus::Available);
/// assert_eq!(link.href, "/Alpha#sec1");
/// assert_eq!(link.children, vec![Node::text("alpha (sec1)")]);
///
/// let mut link = Link { href: "bravo".to_string(), status: None, children: vec![] };
/// assert_eq!(resolve_link(&mut link, &index), LinkStatus::Missing);
/// assert_eq!(link.href, "/bravo");
/// ```
pub fn resolve_link(link: &mut Link, index: &TitleIndex) -> LinkStatus {
    let decoded = decode_uri(&link.href).into_owned();
    let (path, anchor) = split_anchor(&decoded);

    let (href, status) = match index.get(path) {
        Some(target) => {
            let mut href = format!("/{}", title_to_path(&target.canonical_title));
            if let Some(anchor) = anchor {
                href.push('#');
                href.push_str(anchor);
            }
            (href, LinkStatus::Available)
        }
        None => (format!("/{decoded}"), LinkStatus::Missing),
    };

    if let (Some(anchor), [Node::Text(Text { value })]) = (anchor, link.children.as_slice()) {
        if *value == decoded {
            link.children = vec![Node::text(format!("{path} ({anchor})"))];
        }
    }
    link.href = href;
    link.status = Some(status);
    status
}

/// Whether an href points inside the wiki, as opposed to another site or an absolute path on this one.
///
/// ```
/// use wikipage::resolve::is_internal_href;
///
/// assert!(is_internal_href("Some Article"));
/// assert!(!is_internal_href("https://example.com"));
/// assert!(!is_internal_href("/Already Resolved"));
/// ```
pub fn is_internal_href(href: &str) -> bool {
    static ABSOLUTE_HREF: OnceLock<Result<Regex, fancy_regex::Error>> = OnceLock::new();
    let re = match ABSOLUTE_HREF.get_or_init(|| Regex::new(r"^([a-zA-Z0-9]+:|/)")) {
        Ok(re) => re,
        Err(err) => {
            warn!("invalid absolute-href pattern: {err}");
            return false;
        }
    };
    match re.is_match(href) {
        Ok(is_absolute) => !is_absolute,
        Err(err) => {
            warn!("couldn't check href {href:?}: {err}");
            false
        }
    }
}

/// The raw hrefs of all internal links under `nodes`, in document order.
///
/// These are the titles a server needs to look up to build the page's [`TitleIndex`].
pub fn wiki_links(nodes: &[Node]) -> Vec<&str> {
    pre_order(nodes)
        .filter_map(|node| match node {
            Node::Link(Link { href, .. }) if is_internal_href(href) => Some(href.as_str()),
            _ => None,
        })
        .collect()
}

struct LinkResolver<'a> {
    index: &'a TitleIndex,
    report: LinkReport,
}

impl MutNodeVisitor for LinkResolver<'_> {
    fn visit(&mut self, node: &mut Node) -> Visit {
        let Node::Link(link) = node else {
            return Visit::Descend;
        };
        if !is_internal_href(&link.href) {
            return Visit::Descend;
        }
        match resolve_link(link, self.index) {
            LinkStatus::Available => self.report.available += 1,
            LinkStatus::Missing => {
                debug!("link target {:?} doesn't exist", link.href);
                self.report.missing.push(link.href[1..].to_string());
            }
        }
        Visit::Skip
    }
}

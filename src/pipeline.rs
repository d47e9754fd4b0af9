//! Runs all the passes over a page, in order.
use crate::doc::walk::pre_order;
use crate::doc::{Node, Page, PageMetadata};
use crate::outline::{
    build_outline, build_outline_at, heading_descriptors, render_outline, scan_headings, HeadingDescriptor,
    StructuralError,
};
use crate::resolve::{collect_footnotes, resolve_includes, resolve_links, IncludeReport, LinkReport};
use derive_builder::Builder;
use log::debug;
use std::fmt::{Display, Formatter};

/// The heading class that's left out of tables of contents by default.
pub const DOWNLOADS_CLASS: &str = "downloads";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Builder)]
pub struct PipelineOptions {
    /// Headings with any of these classes don't appear in tables of contents.
    #[builder(default = "vec![DOWNLOADS_CLASS.to_string()]")]
    pub toc_exclude_classes: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            toc_exclude_classes: vec![DOWNLOADS_CLASS.to_string()],
        }
    }
}

/// What a [`Pipeline::run`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub includes: IncludeReport,
    /// How many footnotes were moved to the aside.
    pub footnotes: usize,
    /// How many tables of contents were filled in.
    pub tocs: usize,
    pub links: LinkReport,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PipelineError {
    /// A table of contents couldn't be built.
    Outline(StructuralError),
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Outline(err) => write!(f, "couldn't build table of contents: {err}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Outline(err) => Some(err),
        }
    }
}

impl From<StructuralError> for PipelineError {
    fn from(value: StructuralError) -> Self {
        Self::Outline(value)
    }
}

/// Turns a page as the server produced it into its final form.
///
/// The passes run in a fixed order, since each depends on the ones before it:
///
/// 1. [includes](resolve_includes) are spliced in, so everything after sees the full article;
/// 2. [footnotes](collect_footnotes) are moved to the aside;
/// 3. every [table of contents](crate::doc::Toc) in the main article is filled in. One with a declared level lists the
///    headings that follow it in its section; one without lists the whole article;
/// 4. [links](resolve_links) are resolved, including the links in the footnotes.
///
/// ```
/// use wikipage::doc::*;
/// use wikipage::pipeline::{Pipeline, PipelineOptions};
///
/// let mut page: Page = serde_json::from_str(r#"{
///     "article": {"id": 1, "body": [
///         {"kind": "toc"},
///         {"kind": "heading", "level": 2, "children": [{"kind": "text", "value": "Intro"}]},
///         {"kind": "heading", "level": 2, "children": [{"kind": "text", "value": "Details"}]}
///     ]}
/// }"#).unwrap();
///
/// let report = Pipeline::new(PipelineOptions::default())
///     .run(&mut page, &PageMetadata::default())
///     .unwrap();
///
/// assert_eq!(report.tocs, 1);
/// assert_eq!(page.aside.footnotes, None); // no footnotes, so the list is gone
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Runs every pass over the page. On error, the page may have been partially processed.
    pub fn run(&self, page: &mut Page, metadata: &PageMetadata) -> Result<PipelineReport, PipelineError> {
        let mut include_titles = metadata.include_titles.clone();
        let includes = resolve_includes(&mut page.article, &mut include_titles, &mut page.included);
        let footnotes = collect_footnotes(page).len();
        let tocs = self.fill_tocs(&mut page.article.body)?;
        let links = resolve_links(page, &metadata.link_targets);

        debug!(
            "article {}: spliced {} include(s), collected {footnotes} footnote(s), built {tocs} toc(s), resolved {} link(s) ({} missing)",
            page.article.id,
            includes.spliced.len(),
            links.available + links.missing.len(),
            links.missing.len(),
        );
        Ok(PipelineReport {
            includes,
            footnotes,
            tocs,
            links,
        })
    }

    fn fill_tocs(&self, body: &mut [Node]) -> Result<usize, StructuralError> {
        if !pre_order(body).any(|node| matches!(node, Node::Toc(_))) {
            return Ok(0);
        }
        let headings = scan_headings(body);
        let mut filled = 0;
        self.fill_tocs_in(body, &headings, &mut filled)?;
        Ok(filled)
    }

    /// Fills every toc under `nodes`. A toc with a declared level only covers the headings that follow it within its
    /// own container; one without covers the whole article.
    fn fill_tocs_in(
        &self,
        nodes: &mut [Node],
        article_headings: &[HeadingDescriptor],
        filled: &mut usize,
    ) -> Result<(), StructuralError> {
        let exclude = |h: &HeadingDescriptor| h.classes.iter().any(|class| self.options.toc_exclude_classes.contains(class));
        for idx in 0..nodes.len() {
            let (up_to_here, following) = nodes.split_at_mut(idx + 1);
            match &mut up_to_here[idx] {
                Node::Toc(toc) => {
                    let outline = match toc.level {
                        Some(level) => build_outline_at(level, &heading_descriptors(following), exclude)?,
                        None => build_outline(article_headings, exclude)?,
                    };
                    toc.children = render_outline(&outline);
                    *filled += 1;
                }
                node => {
                    if let Some(children) = node.children_mut() {
                        self.fill_tocs_in(children, article_headings, filled)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::*;

    #[test]
    fn default_options_exclude_downloads() {
        assert_eq!(PipelineOptions::default().toc_exclude_classes, vec!["downloads"]);
        let built = PipelineOptionsBuilder::default().build().unwrap();
        assert_eq!(built, PipelineOptions::default());
    }

    #[test]
    fn full_run() {
        let mut page = page(vec![
            toc(),
            heading(2, None, "Intro"),
            el("p", vec![text("see "), link("alpha", vec![text("alpha")]), footnote(vec![text("note")])]),
            include("Appendix", vec![]),
        ]);
        page.included.push(article(
            2,
            vec![heading(2, Some("app"), "Appendix"), footnote(vec![link("missing page", vec![])])],
        ));
        let metadata = PageMetadata {
            include_titles: [("Appendix", 2)].into_iter().collect(),
            link_targets: [(
                "alpha",
                LinkTarget {
                    canonical_title: "Alpha".to_string(),
                    article_id: 7,
                },
            )]
            .into_iter()
            .collect(),
        };

        let report = Pipeline::default().run(&mut page, &metadata).unwrap();

        assert_eq!(report.includes.spliced, vec!["Appendix"]);
        assert_eq!(report.footnotes, 2);
        assert_eq!(report.tocs, 1);
        assert_eq!(report.links.available, 1);
        assert_eq!(report.links.missing, vec!["missing page"]);

        assert!(page.included.is_empty());
        assert_eq!(
            page.article.body,
            vec![
                Node::Toc(Toc {
                    level: None,
                    children: vec![el_with(
                        "ol",
                        [("class", "toc")],
                        vec![
                            el("li", vec![el_with("a", [("href", "#toc-1")], vec![text("Intro")])]),
                            el("li", vec![el_with("a", [("href", "#app")], vec![text("Appendix")])]),
                        ]
                    )],
                }),
                heading(2, Some("toc-1"), "Intro"),
                el(
                    "p",
                    vec![
                        text("see "),
                        Node::Link(Link {
                            href: "/Alpha".to_string(),
                            status: Some(LinkStatus::Available),
                            children: vec![text("alpha")],
                        }),
                        mark(1),
                    ]
                ),
                include("Appendix", vec![heading(2, Some("app"), "Appendix"), mark(2)]),
            ]
        );
        let footnotes = page.aside.footnotes.unwrap();
        assert_eq!(footnotes[0].content, vec![text("note")]);
        assert_eq!(
            footnotes[1].content,
            vec![Node::Link(Link {
                href: "/missing page".to_string(),
                status: Some(LinkStatus::Missing),
                children: vec![],
            })]
        );
    }

    #[test]
    fn excluded_headings_not_in_toc() {
        let mut page = page(vec![
            toc(),
            heading(2, Some("a"), "A"),
            Node::Heading(Heading {
                level: 2,
                id: Some("files".to_string()),
                classes: vec!["downloads".to_string()],
                children: vec![text("Files")],
            }),
            heading(2, Some("b"), "B"),
        ]);
        Pipeline::default().run(&mut page, &PageMetadata::default()).unwrap();
        let Node::Toc(toc) = &page.article.body[0] else {
            panic!("expected toc: {:?}", page.article.body[0]);
        };
        assert_eq!(
            toc.children,
            vec![el_with(
                "ol",
                [("class", "toc")],
                vec![
                    el("li", vec![el_with("a", [("href", "#a")], vec![text("A")])]),
                    el("li", vec![el_with("a", [("href", "#b")], vec![text("B")])]),
                ]
            )]
        );
    }

    #[test]
    fn custom_exclude_classes() {
        let mut page = page(vec![toc(), heading(2, Some("a"), "A")]);
        if let Node::Heading(h) = &mut page.article.body[1] {
            h.classes.push("secret".to_string());
        }
        let options = PipelineOptionsBuilder::default()
            .toc_exclude_classes(vec!["secret".to_string()])
            .build()
            .unwrap();
        Pipeline::new(options).run(&mut page, &PageMetadata::default()).unwrap();
        assert_eq!(page.article.body[0], toc());
    }

    #[test]
    fn toc_at_declared_level() {
        let mut page = page(vec![
            el(
                "section",
                vec![
                    Node::Toc(Toc {
                        level: Some(2),
                        children: vec![],
                    }),
                    heading(3, Some("x"), "X"),
                    heading(3, Some("y"), "Y"),
                ],
            ),
        ]);
        let report = Pipeline::default().run(&mut page, &PageMetadata::default()).unwrap();
        assert_eq!(report.tocs, 1);
    }

    #[test]
    fn declared_level_toc_covers_only_its_section() {
        let mut page = page(vec![
            el(
                "section",
                vec![
                    heading(2, None, "A"),
                    leveled_toc(2),
                    heading(3, None, "A1"),
                    heading(3, None, "A2"),
                    link("alpha", vec![text("alpha")]),
                ],
            ),
            el("section", vec![heading(2, None, "B"), heading(3, None, "B1")]),
        ]);
        let metadata = PageMetadata {
            link_targets: [(
                "alpha",
                LinkTarget {
                    canonical_title: "Alpha".to_string(),
                    article_id: 3,
                },
            )]
            .into_iter()
            .collect(),
            ..PageMetadata::default()
        };

        let report = Pipeline::default().run(&mut page, &metadata).unwrap();

        assert_eq!(report.tocs, 1);
        assert_eq!(report.links.available, 1);
        let Node::Element(section_a) = &page.article.body[0] else {
            panic!("expected a section: {:?}", page.article.body[0]);
        };
        assert_eq!(
            section_a.children[1],
            Node::Toc(Toc {
                level: Some(2),
                children: vec![el_with(
                    "ol",
                    [("class", "toc")],
                    vec![
                        el("li", vec![el_with("a", [("href", "#toc-2")], vec![text("A1")])]),
                        el("li", vec![el_with("a", [("href", "#toc-3")], vec![text("A2")])]),
                    ]
                )],
            })
        );
        assert_eq!(
            section_a.children[4],
            Node::Link(Link {
                href: "/Alpha".to_string(),
                status: Some(LinkStatus::Available),
                children: vec![text("alpha")],
            })
        );
    }

    #[test]
    fn footnote_in_anchor_link_keeps_its_mark() {
        let mut page = page(vec![link("a#b", vec![text("a#b"), footnote(vec![text("n")])])]);

        Pipeline::default().run(&mut page, &PageMetadata::default()).unwrap();

        assert_eq!(
            page.article.body,
            vec![Node::Link(Link {
                href: "/a#b".to_string(),
                status: Some(LinkStatus::Missing),
                children: vec![text("a#b"), mark(1)],
            })]
        );
        assert_eq!(page.aside.footnotes.map(|entries| entries.len()), Some(1));
    }

    #[test]
    fn toc_level_conflict_is_an_error() {
        let mut page = page(vec![
            Node::Toc(Toc {
                level: Some(2),
                children: vec![],
            }),
            heading(3, Some("sub"), "Sub"),
            heading(2, Some("top"), "Top"),
        ]);
        let err = Pipeline::default()
            .run(&mut page, &PageMetadata::default())
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Outline(StructuralError {
                level: 2,
                caption: "Top".to_string(),
                root_level: 2,
            })
        );
        assert_eq!(
            err.to_string(),
            r#"couldn't build table of contents: heading "Top" (level 2) can't be placed in an outline rooted at level 2"#
        );
    }

    #[test]
    fn no_toc_leaves_headings_alone() {
        let mut page = page(vec![heading(2, None, "A")]);
        let report = Pipeline::default().run(&mut page, &PageMetadata::default()).unwrap();
        assert_eq!(report.tocs, 0);
        assert_eq!(page.article.body, vec![heading(2, None, "A")]);
    }

    #[test]
    fn single_heading_gives_empty_toc() {
        // the lone heading becomes the outline's root, which isn't listed
        let mut page = page(vec![toc(), heading(2, Some("a"), "A")]);
        let report = Pipeline::default().run(&mut page, &PageMetadata::default()).unwrap();
        assert_eq!(report.tocs, 1);
        assert_eq!(page.article.body[0], toc());
    }

    #[test]
    fn running_twice_changes_nothing() {
        let mut page = page(vec![
            toc(),
            heading(2, None, "A"),
            el("p", vec![link("b#c", vec![text("b#c")]), footnote(vec![text("n")])]),
        ]);
        let pipeline = Pipeline::default();
        pipeline.run(&mut page, &PageMetadata::default()).unwrap();
        let after_first = page.clone();
        pipeline.run(&mut page, &PageMetadata::default()).unwrap();
        assert_eq!(page, after_first);
    }

    fn leveled_toc(level: u8) -> Node {
        Node::Toc(Toc {
            level: Some(level),
            children: vec![],
        })
    }
}

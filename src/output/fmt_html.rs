use crate::doc::*;
use crate::util::output::{Output, SimpleWrite, Stream};
use log::warn;
use std::io;

/// Tags that are laid out on their own lines.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "header",
    "hr",
    "li",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Tags that never have content or a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Writes pages and nodes as HTML.
///
/// Block elements (paragraphs, list items, headings, and so on) each start on a new line; inline content stays on the
/// line of the block it's in. Nothing is indented.
///
/// A page renders as its main `<article class="main">`, then an `<article class="included">` for each included article
/// that wasn't spliced in, and then the `<aside>` with its footnote list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlWriter {}

impl HtmlWriter {
    pub fn write_page<W: io::Write>(&self, page: &Page, out: W) -> io::Result<()> {
        let mut output = Output::new(Stream(out));
        write_page(&mut output, page);
        output.finish().map(|_| ())
    }

    pub fn write_nodes<W: io::Write>(&self, nodes: &[Node], out: W) -> io::Result<()> {
        let mut output = Output::new(Stream(out));
        write_nodes(&mut output, nodes);
        output.finish().map(|_| ())
    }
}

fn write_page<W: SimpleWrite>(out: &mut Output<W>, page: &Page) {
    write_article(out, &page.article, "main");
    for article in &page.included {
        write_article(out, article, "included");
    }
    out.with_block(|out| {
        out.write_str("<aside>");
        if let Some(footnotes) = &page.aside.footnotes {
            write_block_element(out, "div", &[("class", "footnotes")], |out| {
                write_block_element(out, "ol", &[], |out| {
                    for entry in footnotes {
                        write_block_element(out, "li", &[("id", entry.id.as_str())], |out| {
                            write_nodes(out, &entry.content)
                        });
                    }
                });
            });
        }
        out.write_str("</aside>");
    });
}

fn write_article<W: SimpleWrite>(out: &mut Output<W>, article: &Article, class: &str) {
    let id = article.id.to_string();
    write_block_element(out, "article", &[("class", class), ("data-article-id", id.as_str())], |out| {
        write_nodes(out, &article.body)
    });
}

/// Whether `name` can be written as a tag or attribute name as-is: an ASCII letter, then letters, digits, `-`, `_`, `:`
/// or `.`.
fn is_html_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        }
        _ => false,
    }
}

fn write_nodes<W: SimpleWrite>(out: &mut Output<W>, nodes: &[Node]) {
    if !nodes.iter().any(is_block) {
        nodes.iter().for_each(|node| write_node(out, node));
        return;
    }
    // Among blocks, each run of inline content gets its own line. Runs of just whitespace are layout, and get dropped.
    for run in nodes.chunk_by(|a, b| !is_block(a) && !is_block(b)) {
        match run {
            [node] if is_block(node) => write_node(out, node),
            _ if run.iter().all(is_blank_text) => {}
            _ => out.with_block(|out| run.iter().for_each(|node| write_node(out, node))),
        }
    }
}

fn write_node<W: SimpleWrite>(out: &mut Output<W>, node: &Node) {
    match node {
        Node::Element(Element { tag, attrs, children }) => {
            if !is_html_name(tag) {
                warn!("dropping element with invalid tag {tag:?}; keeping its children");
                write_nodes(out, children);
                return;
            }
            let attrs: Vec<_> = attrs
                .iter()
                .filter(|(k, _)| {
                    let valid = is_html_name(k);
                    if !valid {
                        warn!("dropping invalid attribute {k:?} on <{tag}>");
                    }
                    valid
                })
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            if is_block_tag(tag) {
                write_block_element(out, tag, &attrs, |out| write_nodes(out, children));
            } else {
                write_element(out, tag, &attrs, |out| write_nodes(out, children));
            }
        }
        Node::Heading(Heading {
            level,
            id,
            classes,
            children,
        }) => {
            let tag = format!("h{}", (*level).clamp(1, 6));
            let class = classes.join(" ");
            let mut attrs = Vec::with_capacity(2);
            if let Some(id) = id {
                attrs.push(("id", id.as_str()));
            }
            if !class.is_empty() {
                attrs.push(("class", class.as_str()));
            }
            out.with_block(|out| write_element(out, &tag, &attrs, |out| write_nodes(out, children)));
        }
        Node::Text(Text { value }) => write_escaped(out, value, false),
        Node::Footnote(Footnote { children }) => {
            write_element(out, "span", &[("class", "footnote")], |out| write_nodes(out, children));
        }
        Node::FootnoteMark(FootnoteMark { number, target }) => {
            write_element(out, "a", &[("class", "footnote-mark"), ("href", target.as_str())], |out| {
                out.write_str(&number.to_string())
            });
        }
        Node::Include(Include { title, children }) => {
            let attrs = [("class", "wiki-include"), ("data-article-title", title.as_str())];
            write_block_element(out, "div", &attrs, |out| write_nodes(out, children));
        }
        Node::Link(Link { href, status, children }) => {
            let class = match status {
                Some(status) => format!("wiki-link {status}"),
                None => "wiki-link".to_string(),
            };
            write_element(out, "a", &[("class", class.as_str()), ("href", href.as_str())], |out| write_nodes(out, children));
        }
        Node::Toc(Toc { level, children }) => {
            let level = level.map(|level| level.to_string());
            let mut attrs = vec![("class", "toc")];
            if let Some(level) = &level {
                attrs.push(("data-level", level.as_str()));
            }
            write_block_element(out, "nav", &attrs, |out| write_nodes(out, children));
        }
    }
}

fn write_block_element<W, F>(out: &mut Output<W>, tag: &str, attrs: &[(&str, &str)], children: F)
where
    W: SimpleWrite,
    F: FnOnce(&mut Output<W>),
{
    out.with_block(|out| write_element(out, tag, attrs, children));
}

fn write_element<W, F>(out: &mut Output<W>, tag: &str, attrs: &[(&str, &str)], children: F)
where
    W: SimpleWrite,
    F: FnOnce(&mut Output<W>),
{
    out.write_str("<");
    out.write_str(tag);
    for (name, value) in attrs {
        out.write_str(" ");
        out.write_str(name);
        out.write_str("=\"");
        write_escaped(out, value, true);
        out.write_str("\"");
    }
    out.write_str(">");
    if VOID_TAGS.contains(&tag) {
        return;
    }
    children(out);
    out.write_str("</");
    out.write_str(tag);
    out.write_str(">");
}

fn write_escaped<W: SimpleWrite>(out: &mut Output<W>, text: &str, in_attr: bool) {
    let mut plain_start = 0;
    for (idx, ch) in text.char_indices() {
        let escaped = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' if in_attr => "&quot;",
            _ => continue,
        };
        out.write_str(&text[plain_start..idx]);
        out.write_str(escaped);
        plain_start = idx + ch.len_utf8();
    }
    out.write_str(&text[plain_start..]);
}

fn is_block(node: &Node) -> bool {
    match node {
        Node::Element(Element { tag, .. }) => is_block_tag(tag),
        Node::Heading(_) | Node::Include(_) | Node::Toc(_) => true,
        Node::Text(_) | Node::Footnote(_) | Node::FootnoteMark(_) | Node::Link(_) => false,
    }
}

fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

fn is_blank_text(node: &Node) -> bool {
    matches!(node, Node::Text(Text { value }) if value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::utils_for_test::*;
    use indoc::indoc;

    variants_checker!(VARIANTS_CHECKER = Node {
        Element(_),
        Heading(_),
        Text(_),
        Footnote(_),
        FootnoteMark(_),
        Include(_),
        Link(_),
        Toc(_),
    });

    #[test]
    fn invalid_tag_writes_only_children() {
        check(el("p><script", vec![text("inner")]), "inner");
    }

    #[test]
    fn invalid_attribute_dropped() {
        check(
            el_with("span", [("onclick=\"x\" y", "z"), ("title", "t")], vec![text("s")]),
            "<span title=\"t\">s</span>",
        );
    }

    #[test]
    fn html_names() {
        assert!(is_html_name("data-article-id"));
        assert!(is_html_name("xml:lang"));
        assert!(!is_html_name(""));
        assert!(!is_html_name("1st"));
        assert!(!is_html_name("a b"));
        assert!(!is_html_name("a>"));
    }

    #[test]
    fn inline_element() {
        check(el("em", vec![text("a < b & c")]), "<em>a &lt; b &amp; c</em>");
    }

    #[test]
    fn block_element_with_inline_children() {
        check(
            el_with("p", [("class", "lead")], vec![text("hi "), el("b", vec![text("there")])]),
            "<p class=\"lead\">hi <b>there</b></p>\n",
        );
    }

    #[test]
    fn block_children_get_their_own_lines() {
        check(
            el(
                "div",
                vec![
                    text("\n  "),
                    el("p", vec![text("one")]),
                    text("loose "),
                    el("i", vec![text("text")]),
                    el("p", vec![text("two")]),
                    text("\n"),
                ],
            ),
            indoc! {r#"
                <div>
                <p>one</p>
                loose <i>text</i>
                <p>two</p>
                </div>
            "#},
        );
    }

    #[test]
    fn void_element() {
        check(
            el("p", vec![text("a"), el("br", vec![]), text("b")]),
            "<p>a<br>b</p>\n",
        );
    }

    #[test]
    fn heading_with_id_and_classes() {
        check(
            Node::Heading(Heading {
                level: 2,
                id: Some("toc-1".to_string()),
                classes: vec!["downloads".to_string(), "x".to_string()],
                children: vec![text("Files")],
            }),
            "<h2 id=\"toc-1\" class=\"downloads x\">Files</h2>\n",
        );
    }

    #[test]
    fn heading_level_out_of_range() {
        check(heading(9, None, "deep"), "<h6>deep</h6>\n");
    }

    #[test]
    fn text_escapes_markup_but_not_quotes() {
        check(text("\"quoted\" <tag>"), "\"quoted\" &lt;tag&gt;");
    }

    #[test]
    fn uncollected_footnote() {
        check(footnote(vec![text("note")]), "<span class=\"footnote\">note</span>");
    }

    #[test]
    fn footnote_mark_links_to_entry() {
        check(mark(3), "<a class=\"footnote-mark\" href=\"#footnote-3\">3</a>");
    }

    #[test]
    fn include_is_a_block() {
        check(
            include("Q&A", vec![el("p", vec![text("body")])]),
            "<div class=\"wiki-include\" data-article-title=\"Q&amp;A\">\n<p>body</p>\n</div>\n",
        );
    }

    #[test]
    fn link_statuses() {
        let mut resolved = Link {
            href: "/Why%3f".to_string(),
            status: Some(LinkStatus::Missing),
            children: vec![text("why?")],
        };
        check(
            Node::Link(resolved.clone()),
            "<a class=\"wiki-link missing\" href=\"/Why%3f\">why?</a>",
        );
        resolved.status = None;
        resolved.href = "say \"hi\"".to_string();
        check(Node::Link(resolved), "<a class=\"wiki-link\" href=\"say &quot;hi&quot;\">why?</a>");
    }

    #[test]
    fn toc_with_level() {
        check(
            Node::Toc(Toc {
                level: Some(2),
                children: vec![el_with("ol", [("class", "toc")], vec![el("li", vec![text("x")])])],
            }),
            "<nav class=\"toc\" data-level=\"2\">\n<ol class=\"toc\">\n<li>x</li>\n</ol>\n</nav>\n",
        );
    }

    #[test]
    fn full_page() {
        let mut page = page(vec![heading(2, Some("intro"), "Intro"), el("p", vec![text("body"), mark(1)])]);
        page.included.push(article(4, vec![el("p", vec![text("leftover")])]));
        page.aside.footnotes = Some(vec![FootnoteEntry {
            number: 1,
            id: "footnote-1".to_string(),
            content: vec![text("the note")],
        }]);
        assert_eq!(
            page_to_str(&page),
            indoc! {r##"
                <article class="main" data-article-id="1">
                <h2 id="intro">Intro</h2>
                <p>body<a class="footnote-mark" href="#footnote-1">1</a></p>
                </article>
                <article class="included" data-article-id="4">
                <p>leftover</p>
                </article>
                <aside>
                <div class="footnotes">
                <ol>
                <li id="footnote-1">the note</li>
                </ol>
                </div>
                </aside>
            "##}
        );
    }

    #[test]
    fn page_without_footnote_list() {
        let mut page = page(vec![]);
        page.aside.footnotes = None;
        assert_eq!(
            page_to_str(&page),
            "<article class=\"main\" data-article-id=\"1\"></article>\n<aside></aside>\n"
        );
    }

    #[test]
    fn writes_to_io() {
        let mut bytes = Vec::new();
        HtmlWriter::default().write_nodes(&[el("p", vec![text("é")])], &mut bytes).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "<p>é</p>\n");
    }

    fn page_to_str(page: &Page) -> String {
        let mut out = Output::new(String::new());
        write_page(&mut out, page);
        out.finish().unwrap()
    }

    fn check(node: Node, expect: &str) {
        VARIANTS_CHECKER.see(&node);
        let mut out = Output::new(String::new());
        write_nodes(&mut out, &[node]);
        assert_eq!(out.finish().unwrap(), expect);
    }
}

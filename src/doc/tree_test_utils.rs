#[cfg(test)]
pub(crate) use test_utils::*;

#[cfg(test)]
mod test_utils {
    use crate::doc::*;
    use std::collections::BTreeMap;

    pub(crate) fn text(value: &str) -> Node {
        Node::text(value)
    }

    pub(crate) fn el(tag: &str, children: Vec<Node>) -> Node {
        Node::element(tag, children)
    }

    /// An element with attributes, given as `(name, value)` pairs.
    pub(crate) fn el_with<const N: usize>(tag: &str, attrs: [(&str, &str); N], children: Vec<Node>) -> Node {
        Node::Element(Element {
            tag: tag.to_string(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            children,
        })
    }

    pub(crate) fn heading(level: u8, id: Option<&str>, caption: &str) -> Node {
        Node::Heading(Heading {
            level,
            id: id.map(str::to_string),
            classes: vec![],
            children: vec![text(caption)],
        })
    }

    pub(crate) fn footnote(children: Vec<Node>) -> Node {
        Node::Footnote(Footnote { children })
    }

    pub(crate) fn mark(number: u64) -> Node {
        Node::FootnoteMark(FootnoteMark {
            number,
            target: format!("#footnote-{number}"),
        })
    }

    pub(crate) fn include(title: &str, children: Vec<Node>) -> Node {
        Node::Include(Include {
            title: title.to_string(),
            children,
        })
    }

    pub(crate) fn link(href: &str, children: Vec<Node>) -> Node {
        Node::Link(Link {
            href: href.to_string(),
            status: None,
            children,
        })
    }

    pub(crate) fn toc() -> Node {
        Node::Toc(Toc {
            level: None,
            children: vec![],
        })
    }

    pub(crate) fn article(id: ArticleId, body: Vec<Node>) -> Article {
        Article { id, body }
    }

    pub(crate) fn page(body: Vec<Node>) -> Page {
        Page {
            article: article(1, body),
            included: vec![],
            aside: Aside::default(),
        }
    }
}

use crate::doc::walk::{traverse_all, MutNodeVisitor, Visit};
use crate::doc::{Footnote, FootnoteEntry, FootnoteMark, Node, Page};
use log::debug;
use std::mem;

/// Prefix of the anchor ids of footnote entries: `footnote-1`, `footnote-2`, …
pub const FOOTNOTE_ID_PREFIX: &str = "footnote-";

/// Moves every inline footnote in the main article into the aside's footnote list.
///
/// Each [`Footnote`] fragment is replaced by a [`FootnoteMark`] that links to a new [`FootnoteEntry`] holding the
/// fragment's content. Footnotes are numbered in document order, continuing after any entries the list already has.
/// A footnote inside another footnote is numbered right after its parent, and its mark ends up in the parent's entry.
///
/// If there are no footnotes to collect and the list is empty, the list is removed from the aside altogether.
///
/// Returns the entries that this call added. Running it again on the same page finds nothing, and changes nothing.
pub fn collect_footnotes(page: &mut Page) -> &[FootnoteEntry] {
    let existing = page.aside.footnotes.take().unwrap_or_default();
    let first_new = existing.len();
    let next_number = existing.iter().map(|entry| entry.number).max().unwrap_or(0) + 1;

    let mut collector = FootnoteCollector {
        entries: existing,
        next_number,
    };
    traverse_all(&mut page.article.body, &mut collector);

    if collector.entries.is_empty() {
        debug!("article {} has no footnotes; removing the footnote list", page.article.id);
        return &[];
    }
    let entries = page.aside.footnotes.insert(collector.entries);
    &entries[first_new..]
}

struct FootnoteCollector {
    entries: Vec<FootnoteEntry>,
    next_number: u64,
}

impl MutNodeVisitor for FootnoteCollector {
    fn visit(&mut self, node: &mut Node) -> Visit {
        let Node::Footnote(Footnote { children }) = node else {
            return Visit::Descend;
        };
        let mut content = mem::take(children);

        let number = self.next_number;
        self.next_number += 1;
        let id = format!("{FOOTNOTE_ID_PREFIX}{number}");
        *node = Node::FootnoteMark(FootnoteMark {
            number,
            target: format!("#{id}"),
        });

        // Reserve the entry before looking inside, so that nested footnotes come after this one.
        let slot = self.entries.len();
        self.entries.push(FootnoteEntry {
            number,
            id,
            content: Vec::new(),
        });
        traverse_all(&mut content, self);
        self.entries[slot].content = content;

        Visit::Skip
    }
}

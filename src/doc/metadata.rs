use crate::doc::ArticleId;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// The server-supplied facts about a page that the resolvers need, besides the tree itself.
#[derive(Clone, Default, Debug, PartialEq, Eq, Deserialize)]
pub struct PageMetadata {
    /// Exact article title → article id, for every article the main article includes.
    #[serde(default)]
    pub include_titles: IncludeTitles,
    /// Link target → canonical title, for every link on the page whose target exists.
    #[serde(default)]
    pub link_targets: TitleIndex,
}

/// Maps include titles to article ids. Each title can be consumed at most once.
///
/// Titles are matched exactly: `"Foo"` and `"foo"` are different includes.
#[derive(Clone, Default, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, ArticleId>")]
pub struct IncludeTitles {
    // None means the title has already been consumed.
    by_title: BTreeMap<String, Option<ArticleId>>,
}

/// The result of [`IncludeTitles::lookup`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TitleLookup {
    Available(ArticleId),
    Consumed,
    Unknown,
}

impl IncludeTitles {
    pub fn lookup(&self, title: &str) -> TitleLookup {
        match self.by_title.get(title) {
            Some(Some(id)) => TitleLookup::Available(*id),
            Some(None) => TitleLookup::Consumed,
            None => TitleLookup::Unknown,
        }
    }

    /// Marks a title as used, so that later lookups return [`TitleLookup::Consumed`]. Unknown titles are ignored.
    pub fn consume(&mut self, title: &str) {
        if let Some(slot) = self.by_title.get_mut(title) {
            *slot = None;
        }
    }
}

impl From<BTreeMap<String, ArticleId>> for IncludeTitles {
    fn from(value: BTreeMap<String, ArticleId>) -> Self {
        Self {
            by_title: value.into_iter().map(|(title, id)| (title, Some(id))).collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, ArticleId)> for IncludeTitles {
    fn from_iter<T: IntoIterator<Item = (S, ArticleId)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(title, id)| (title.into(), id))
            .collect::<BTreeMap<_, _>>()
            .into()
    }
}

/// What a link title resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkTarget {
    pub canonical_title: String,
    pub article_id: ArticleId,
}

/// Case-insensitive index from link titles to their [`LinkTarget`]s.
///
/// Keys are lower-cased once, when the index is built. If two titles only differ by case, the one that sorts first
/// wins.
///
/// ```
/// use wikipage::doc::{LinkTarget, TitleIndex};
///
/// let index: TitleIndex = serde_json::from_str(
///     r#"{"Alpha": {"canonical_title": "Alpha (Greek)", "article_id": 7}}"#,
/// ).unwrap();
///
/// let target = index.get("ALPHA").unwrap();
/// assert_eq!(target.canonical_title, "Alpha (Greek)");
/// assert_eq!(index.get("beta"), None);
/// ```
#[derive(Clone, Default, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, LinkTarget>")]
pub struct TitleIndex {
    targets: HashMap<String, LinkTarget>,
}

impl TitleIndex {
    pub fn get(&self, title: &str) -> Option<&LinkTarget> {
        self.targets.get(&title.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl From<BTreeMap<String, LinkTarget>> for TitleIndex {
    fn from(value: BTreeMap<String, LinkTarget>) -> Self {
        let mut folded = BTreeMap::new();
        for (title, target) in value {
            if let Entry::Vacant(entry) = folded.entry(title.to_lowercase()) {
                entry.insert(target);
            }
        }
        Self {
            targets: folded.into_iter().collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, LinkTarget)> for TitleIndex {
    fn from_iter<T: IntoIterator<Item = (S, LinkTarget)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(title, target)| (title.into(), target))
            .collect::<BTreeMap<_, _>>()
            .into()
    }
}

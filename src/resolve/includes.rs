use crate::doc::walk::{traverse_all, MutNodeVisitor, Visit};
use crate::doc::{Article, ArticleId, Include, IncludeTitles, Node, TitleLookup};
use log::{debug, warn};
use std::fmt::{Display, Formatter};

/// What [`resolve_includes`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncludeReport {
    /// Titles of the articles that were spliced in, in the order they were spliced.
    pub spliced: Vec<String>,
    /// Placeholders that were left as they were, and why.
    pub problems: Vec<IncludeProblem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IncludeProblem {
    /// Either the title isn't one of the page's include titles, or it is but the page doesn't have the article.
    ///
    /// `article_id` is set in the latter case.
    LookupMiss {
        title: String,
        article_id: Option<ArticleId>,
    },
    /// The title was already spliced in at an earlier placeholder.
    DuplicateConsumption { title: String },
}

impl Display for IncludeProblem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IncludeProblem::LookupMiss {
                title,
                article_id: None,
            } => write!(f, "no included article titled {title:?}"),
            IncludeProblem::LookupMiss {
                title,
                article_id: Some(id),
            } => write!(f, "included article {id} (titled {title:?}) is not on the page"),
            IncludeProblem::DuplicateConsumption { title } => {
                write!(f, "article {title:?} is included more than once; only the first is used")
            }
        }
    }
}

/// Splices included articles into the article's [`Include`] placeholders.
///
/// Each placeholder's title is looked up (exactly, case-sensitively) in `titles`, and the article with that id is
/// taken out of `included`. Its body is appended to the placeholder's children, and the title is consumed, so a second
/// placeholder for the same title is left alone. Placeholders that can't be resolved are left alone too, and
/// recorded in the report.
///
/// Spliced content is resolved as well, so includes inside included articles work. If `included` has several
/// articles with the same id, the last one wins.
pub fn resolve_includes(article: &mut Article, titles: &mut IncludeTitles, included: &mut Vec<Article>) -> IncludeReport {
    let mut resolver = IncludeResolver {
        titles,
        included,
        report: IncludeReport::default(),
    };
    traverse_all(&mut article.body, &mut resolver);
    resolver.report
}

struct IncludeResolver<'a> {
    titles: &'a mut IncludeTitles,
    included: &'a mut Vec<Article>,
    report: IncludeReport,
}

impl IncludeResolver<'_> {
    fn splice(&mut self, include: &mut Include) -> Result<(), IncludeProblem> {
        let article_id = match self.titles.lookup(&include.title) {
            TitleLookup::Available(id) => id,
            TitleLookup::Consumed => {
                return Err(IncludeProblem::DuplicateConsumption {
                    title: include.title.clone(),
                })
            }
            TitleLookup::Unknown => {
                return Err(IncludeProblem::LookupMiss {
                    title: include.title.clone(),
                    article_id: None,
                })
            }
        };
        let Some(idx) = self.included.iter().rposition(|a| a.id == article_id) else {
            return Err(IncludeProblem::LookupMiss {
                title: include.title.clone(),
                article_id: Some(article_id),
            });
        };
        let spliced = self.included.remove(idx);
        include.children.extend(spliced.body);
        self.titles.consume(&include.title);
        self.report.spliced.push(include.title.clone());
        Ok(())
    }
}

impl MutNodeVisitor for IncludeResolver<'_> {
    fn visit(&mut self, node: &mut Node) -> Visit {
        let Node::Include(include) = node else {
            return Visit::Descend;
        };
        match self.splice(include) {
            Ok(()) => Visit::Descend,
            Err(problem) => {
                match &problem {
                    IncludeProblem::DuplicateConsumption { .. } => warn!("{problem}"),
                    IncludeProblem::LookupMiss { .. } => debug!("{problem}"),
                }
                self.report.problems.push(problem);
                Visit::Skip
            }
        }
    }
}

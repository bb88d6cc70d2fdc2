//! Section scanning: partitions a page into its page-level entry and one entry
//! per member.
//!
//! Member groups are found by walking the children of a node and grouping them
//! under heading elements. Generic member sections and enum value lists only
//! differ in which elements open, fill and close a group, so both run through
//! one [`GroupScanner`] driven by a [`GroupRules`] implementation.

use super::title::{MemberTitleBuilder, TypeTitle, extract_title};
use crate::config::IndexConfiguration;
use crate::html::{HtmlPage, child_elements, extract_text, fragment_text, has_class, inner_text};
use crate::scopes::SearchScopes;
use crate::text::{collapse_summary, keywords_for_title};
use crate::types::{MemberKind, PageMetadata, SearchIndexItem};
use scraper::ElementRef;

/// Per-page values resolved once before scanning.
#[derive(Debug)]
struct ScanContext<'a> {
    href: &'a str,
    type_title: String,
    use_metadata: bool,
    use_metadata_title: bool,
    config: &'a IndexConfiguration,
}

impl ScanContext<'_> {
    /// Opens the entry for a member whose heading is `anchor`.
    fn start_member(&self, kind: MemberKind, anchor: ElementRef<'_>) -> SearchIndexItem {
        let href = format!("{}#{}", self.href, anchor.value().id().unwrap_or_default());
        let title = MemberTitleBuilder::new(
            &self.type_title,
            self.use_metadata_title,
            self.config.strip_site_name_from_title,
        )
        .build(kind, anchor);
        let keywords = self.use_metadata.then(|| keywords_for_title(&title));
        SearchIndexItem::new(href, title, keywords, None)
    }
}

/// What a child element means for the group being collected.
enum Step<'a> {
    /// Close the open group, if any
    Boundary,
    /// Close the open group and start a new one headed by `anchor`
    Open {
        anchor: ElementRef<'a>,
        kind: MemberKind,
    },
    /// Supply the open group's summary, closing it when `close` is set
    Summary { node: ElementRef<'a>, close: bool },
    Skip,
}

/// Classifies children for a [`GroupScanner`].
trait GroupRules {
    fn step<'a>(&mut self, node: ElementRef<'a>) -> Step<'a>;
}

/// Enum value lists: each `dt` with an id opens a value, the following `dd`
/// is its summary, and a group stays open until the next `dt`.
struct EnumValueRules;

impl GroupRules for EnumValueRules {
    fn step<'a>(&mut self, node: ElementRef<'a>) -> Step<'a> {
        let element = node.value();
        match element.name() {
            "dt" if element.id().is_some_and(|id| !id.is_empty()) => Step::Open {
                anchor: node,
                kind: MemberKind::EnumValue,
            },
            "dd" => Step::Summary { node, close: false },
            _ => Step::Skip,
        }
    }
}

/// Member sections: `h2.section` switches the current section, `h3` opens a
/// member, and the next `.summary` element completes it.
struct MemberRules {
    scopes: SearchScopes,
    section: Option<MemberKind>,
}

impl MemberRules {
    const fn new(scopes: SearchScopes) -> Self {
        Self {
            scopes,
            section: None,
        }
    }
}

impl GroupRules for MemberRules {
    fn step<'a>(&mut self, node: ElementRef<'a>) -> Step<'a> {
        let element = node.value();
        if element.name() == "h2" && has_class(node, "section") {
            self.section = element
                .id()
                .and_then(|id| id.parse::<MemberKind>().ok())
                .filter(|kind| *kind != MemberKind::EnumValue);
            return Step::Boundary;
        }

        let Some(kind) = self.section.filter(|kind| self.scopes.contains(kind.scope())) else {
            return Step::Skip;
        };

        if element.name() == "h3" {
            Step::Open { anchor: node, kind }
        } else if has_class(node, "summary") {
            Step::Summary { node, close: true }
        } else {
            Step::Skip
        }
    }
}

/// Walks the children of one node, yielding a finished entry whenever a group closes.
struct GroupScanner<'a, R> {
    children: std::vec::IntoIter<ElementRef<'a>>,
    rules: R,
    open: Option<SearchIndexItem>,
}

impl<'a, R: GroupRules> GroupScanner<'a, R> {
    fn new(children: Vec<ElementRef<'a>>, rules: R) -> Self {
        Self {
            children: children.into_iter(),
            rules,
            open: None,
        }
    }

    fn next_item(&mut self, ctx: &ScanContext<'_>) -> Option<SearchIndexItem> {
        while let Some(node) = self.children.next() {
            match self.rules.step(node) {
                Step::Boundary => {
                    if let Some(done) = self.open.take() {
                        return Some(done);
                    }
                }
                Step::Open { anchor, kind } => {
                    if let Some(done) = self.open.replace(ctx.start_member(kind, anchor)) {
                        return Some(done);
                    }
                }
                Step::Summary { node, close } => {
                    if let Some(open) = self.open.as_mut() {
                        open.summary = collapse_summary(Some(&inner_text(node)), false);
                        if close {
                            return self.open.take();
                        }
                    }
                }
                Step::Skip => {}
            }
        }

        // End of children flushes whatever is still open
        self.open.take()
    }
}

enum Phase<'a> {
    PageItem,
    EnumValues(GroupScanner<'a, EnumValueRules>),
    Members {
        next_node: usize,
        current: Option<GroupScanner<'a, MemberRules>>,
    },
    Done,
}

/// Lazy, single-pass sequence of a page's index entries in document order:
/// the page entry, then enum values, then members of each indexable node.
pub struct SectionScanner<'a> {
    page: &'a HtmlPage,
    metadata: Option<&'a PageMetadata>,
    ctx: ScanContext<'a>,
    is_enum: bool,
    nodes: Vec<ElementRef<'a>>,
    phase: Phase<'a>,
}

/// Scans a parsed page, yielding the entries allowed by the configured scopes.
///
/// Nothing is produced when the scopes are empty or the page head carries a
/// `searchOption=noindex` marker.
pub fn scan<'a>(
    page: &'a HtmlPage,
    href: &'a str,
    metadata: Option<&'a PageMetadata>,
    config: &'a IndexConfiguration,
) -> SectionScanner<'a> {
    let html_title = extract_title(page, config);
    let is_enum = TypeTitle::parse(&html_title, config.strip_site_name_from_title).is_enum();

    let use_metadata = config.use_metadata && metadata.is_some_and(|m| m.is_mref);
    let metadata_title = metadata
        .and_then(|m| m.title.as_deref())
        .filter(|_| config.use_metadata_title && use_metadata);
    let use_metadata_title = metadata_title.is_some();
    let type_title = metadata_title.map_or(html_title, str::to_owned);

    let skip_page = config.search_scopes.is_empty() || page.is_noindex();
    if skip_page {
        tracing::debug!(href, "Page excluded from search index");
    }

    SectionScanner {
        page,
        metadata,
        ctx: ScanContext {
            href,
            type_title,
            use_metadata,
            use_metadata_title,
            config,
        },
        is_enum,
        // Enum articles are not split into sections; their values are read separately
        nodes: if skip_page { Vec::new() } else { page.indexable_nodes(!is_enum) },
        phase: if skip_page { Phase::Done } else { Phase::PageItem },
    }
}

impl<'a> SectionScanner<'a> {
    fn page_item(&self) -> SearchIndexItem {
        let ctx = &self.ctx;
        let (keywords, summary) = if ctx.use_metadata {
            let summary_html = self
                .metadata
                .and_then(|m| m.summary.as_deref())
                .filter(|s| !s.is_empty());
            let summary = match summary_html {
                Some(html) => collapse_summary(Some(&fragment_text(html)), true),
                None => collapse_summary(self.page.head_meta_content("description"), true),
            };
            (Some(keywords_for_title(&ctx.type_title)), summary)
        } else {
            let mut content = String::new();
            for node in &self.nodes {
                extract_text(**node, &mut content);
            }
            (None, collapse_summary(Some(&content), true))
        };

        SearchIndexItem::new(ctx.href, ctx.type_title.clone(), keywords, summary)
    }

    /// Phase that follows the page entry.
    fn member_phase(&self) -> Phase<'a> {
        let scopes = self.ctx.config.search_scopes;
        if scopes.is_types_only() {
            return Phase::Done;
        }
        if self.is_enum && scopes.contains(SearchScopes::ENUM_VALUES) {
            let values = self.page.enum_value_list().map(child_elements).unwrap_or_default();
            return Phase::EnumValues(GroupScanner::new(values, EnumValueRules));
        }
        Phase::Members {
            next_node: 0,
            current: None,
        }
    }
}

impl Iterator for SectionScanner<'_> {
    type Item = SearchIndexItem;

    fn next(&mut self) -> Option<SearchIndexItem> {
        loop {
            match &mut self.phase {
                Phase::PageItem => {
                    let page_item = self
                        .ctx
                        .config
                        .search_scopes
                        .contains(SearchScopes::TYPES)
                        .then(|| self.page_item());
                    self.phase = self.member_phase();
                    if page_item.is_some() {
                        return page_item;
                    }
                }
                Phase::EnumValues(scanner) => {
                    if let Some(item) = scanner.next_item(&self.ctx) {
                        return Some(item);
                    }
                    self.phase = Phase::Members {
                        next_node: 0,
                        current: None,
                    };
                }
                Phase::Members { next_node, current } => {
                    if let Some(scanner) = current {
                        if let Some(item) = scanner.next_item(&self.ctx) {
                            return Some(item);
                        }
                    }
                    let Some(node) = self.nodes.get(*next_node) else {
                        self.phase = Phase::Done;
                        continue;
                    };
                    *next_node += 1;
                    // Section state never carries over from one node to the next
                    *current = Some(GroupScanner::new(
                        child_elements(*node),
                        MemberRules::new(self.ctx.config.search_scopes),
                    ));
                }
                Phase::Done => return None,
            }
        }
    }
}

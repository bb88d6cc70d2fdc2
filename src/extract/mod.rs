//! Index entry extraction from rendered pages.

pub(crate) mod scanner;
pub(crate) mod title;

pub use scanner::{SectionScanner, scan};
pub use title::{MemberTitleBuilder, TypeKind, TypeTitle, extract_title, strip_site_name};

use crate::config::IndexConfiguration;
use crate::html::HtmlPage;
use crate::types::{PageMetadata, SearchIndexItem};

/// Parses `html` and collects every entry the page produces.
pub fn scan_page(
    html: &str,
    href: &str,
    metadata: Option<&PageMetadata>,
    config: &IndexConfiguration,
) -> Vec<SearchIndexItem> {
    let page = HtmlPage::parse(html);
    scan(&page, href, metadata, config).collect()
}

//! Thin layer over the HTML parser: loading pages, the queries the scanner
//! needs, and plain-text extraction.

use crate::error::PageLoadError;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static NOINDEX: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"html > head > meta[name="searchOption"][content="noindex"]"#));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("head > title"));
static HEAD_META: LazyLock<Selector> = LazyLock::new(|| selector("head > meta[name]"));
static SEARCHABLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[class*="data-searchable"]"#));
static ARTICLE: LazyLock<Selector> = LazyLock::new(|| selector("article"));
static ENUM_VALUE_LIST: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"article > h2#fields ~ dl[class="parameters"]"#));

/// Tags rendered inline; text extraction does not pad them with spaces.
const INLINE_TAGS: &[&str] = &[
    "a", "area", "del", "ins", "link", "map", "meta", "abbr", "audio", "b", "bdo", "button",
    "canvas", "cite", "code", "command", "data", "datalist", "dfn", "em", "embed", "i", "iframe",
    "img", "input", "kbd", "keygen", "label", "mark", "math", "meter", "noscript", "object",
    "output", "picture", "progress", "q", "ruby", "samp", "script", "select", "small", "span",
    "strong", "sub", "sup", "svg", "textarea", "time", "var", "video", "wbr",
];

fn is_inline(tag: &str) -> bool {
    INLINE_TAGS.iter().any(|inline| inline.eq_ignore_ascii_case(tag))
}

/// A parsed rendered page.
///
/// Owned by a single page scan and dropped once the page's items are collected.
pub struct HtmlPage {
    document: Html,
}

impl std::fmt::Debug for HtmlPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlPage")
            .field("title", &self.title_text())
            .finish_non_exhaustive()
    }
}

impl HtmlPage {
    /// Parses a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Parses already-read page bytes, attributing decode failures to `path`.
    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self, PageLoadError> {
        let content = String::from_utf8(bytes).map_err(|source| PageLoadError::Encoding {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Returns true when the head carries `<meta name="searchOption" content="noindex">`.
    pub fn is_noindex(&self) -> bool {
        self.document.select(&NOINDEX).next().is_some()
    }

    /// Raw page title: the `<title>` element's text whenever the element exists,
    /// even if empty, otherwise the `<meta name="title">` content.
    pub fn title_text(&self) -> Option<String> {
        if let Some(title) = self.document.select(&TITLE).next() {
            return Some(title.text().collect());
        }
        self.head_meta_content("title").map(str::to_owned)
    }

    /// Content attribute of the first `<meta name="...">` inside `<head>`.
    pub fn head_meta_content(&self, name: &str) -> Option<&str> {
        self.document
            .select(&HEAD_META)
            .find(|el| el.value().attr("name") == Some(name))
            .and_then(|el| el.value().attr("content"))
    }

    /// Nodes whose content is searchable: every element whose class attribute
    /// contains `data-searchable`, followed by every `<article>` not already
    /// included when `include_articles` is set. Document order within each group.
    pub fn indexable_nodes(&self, include_articles: bool) -> Vec<ElementRef<'_>> {
        let mut nodes: Vec<ElementRef<'_>> = self.document.select(&SEARCHABLE).collect();
        if include_articles {
            let mut seen: HashSet<_> = nodes.iter().map(|node| node.id()).collect();
            nodes.extend(
                self.document
                    .select(&ARTICLE)
                    .filter(|article| seen.insert(article.id())),
            );
        }
        nodes
    }

    /// The definition list holding an enum page's values, if present.
    pub fn enum_value_list(&self) -> Option<ElementRef<'_>> {
        self.document.select(&ENUM_VALUE_LIST).next()
    }
}

/// Element children of a node, in document order.
pub fn child_elements(node: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    node.children().filter_map(ElementRef::wrap).collect()
}

/// Concatenated text content of an element.
pub fn inner_text(node: ElementRef<'_>) -> String {
    node.text().collect()
}

/// Returns true when the element's class list contains `class`.
pub fn has_class(node: ElementRef<'_>, class: &str) -> bool {
    node.value().classes().any(|c| c == class)
}

/// Appends the text under `node` to `out`, padding block-level elements with
/// spaces so adjacent blocks do not run together.
pub fn extract_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let is_block = !is_inline(element.name());
            if is_block {
                out.push(' ');
            }
            for child in node.children() {
                extract_text(child, out);
            }
            if is_block {
                out.push(' ');
            }
        }
        Node::Document | Node::Fragment => {
            out.push(' ');
            for child in node.children() {
                extract_text(child, out);
            }
            out.push(' ');
        }
        _ => {}
    }
}

/// Text of the first top-level node of an HTML fragment, such as a metadata summary.
pub fn fragment_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    let mut out = String::new();
    if let Some(first) = parsed.root_element().children().next() {
        extract_text(first, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Class Foo | MySite</title>
  <meta name="description" content="Foo does things.">
</head>
<body>
  <div class="content data-searchable">Searchable <b>bold</b></div>
  <article>
    <h2 id="fields">Fields</h2>
    <dl class="parameters"><dt id="a">A</dt><dd>First.</dd></dl>
  </article>
</body>
</html>"#;

    #[test]
    fn test_title_prefers_title_element() {
        let page = HtmlPage::parse(PAGE);
        check!(page.title_text().as_deref() == Some("Class Foo | MySite"));
    }

    #[test]
    fn test_empty_title_element_still_wins() {
        let page = HtmlPage::parse(
            r#"<html><head><title></title><meta name="title" content="Meta"></head></html>"#,
        );
        check!(page.title_text().as_deref() == Some(""));
    }

    #[test]
    fn test_title_falls_back_to_meta() {
        let page =
            HtmlPage::parse(r#"<html><head><meta name="title" content="Meta Title"></head></html>"#);
        check!(page.title_text().as_deref() == Some("Meta Title"));
    }

    #[test]
    fn test_missing_title() {
        let page = HtmlPage::parse("<html><head></head><body></body></html>");
        check!(page.title_text().is_none());
    }

    #[test]
    fn test_meta_description() {
        let page = HtmlPage::parse(PAGE);
        check!(page.head_meta_content("description") == Some("Foo does things."));
    }

    #[test]
    fn test_noindex_marker() {
        let page = HtmlPage::parse(
            r#"<html><head><meta name="searchOption" content="noindex"></head></html>"#,
        );
        check!(page.is_noindex());
        check!(!HtmlPage::parse(PAGE).is_noindex());
    }

    #[test]
    fn test_indexable_nodes_union() {
        let page = HtmlPage::parse(PAGE);
        let with_articles = page.indexable_nodes(true);
        check!(with_articles.len() == 2);
        check!(with_articles[0].value().name() == "div");
        check!(with_articles[1].value().name() == "article");
        check!(page.indexable_nodes(false).len() == 1);
    }

    #[test]
    fn test_searchable_article_not_duplicated() {
        let page = HtmlPage::parse(
            r#"<html><body><article class="data-searchable">x</article></body></html>"#,
        );
        check!(page.indexable_nodes(true).len() == 1);
    }

    #[test]
    fn test_enum_value_list() {
        let page = HtmlPage::parse(PAGE);
        let_assert!(Some(list) = page.enum_value_list());
        check!(child_elements(list).len() == 2);
    }

    #[test]
    fn test_extract_text_pads_blocks_only() {
        let page = HtmlPage::parse("<html><body><div><p>One</p><p>Two <b>bold</b>er</p></div></body></html>");
        let nodes = page.document.select(&selector("div")).collect::<Vec<_>>();
        let mut out = String::new();
        extract_text(*nodes[0], &mut out);
        check!(out == "  One  Two bolder  ");
    }

    #[test]
    fn test_extract_text_skips_comments() {
        let page = HtmlPage::parse("<html><body><div>Visible<!-- hidden --> text</div></body></html>");
        let nodes = page.document.select(&selector("div")).collect::<Vec<_>>();
        let mut out = String::new();
        extract_text(*nodes[0], &mut out);
        check!(out == " Visible text ");
    }

    #[test]
    fn test_fragment_text_uses_first_node() {
        check!(fragment_text("<p>First <code>x</code>.</p><p>Second.</p>").trim() == "First x.");
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let path = Path::new("page.html");
        let_assert!(
            Err(PageLoadError::Encoding { .. }) = HtmlPage::from_bytes(path, vec![0xff, 0xfe, 0x00])
        );
    }
}

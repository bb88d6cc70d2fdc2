//! Page and member title derivation.
//!
//! Titles of type pages look like `Class Foo | MySite` (or `Foo Class`), and
//! member titles are spliced around the bare type name found inside them. The
//! index arithmetic for that lives in [`TypeTitle`] so the scanner never touches it.

use crate::config::IndexConfiguration;
use crate::html::{HtmlPage, inner_text};
use crate::text::collapse_whitespace;
use crate::types::MemberKind;
use scraper::ElementRef;
use std::ops::Range;

/// Kind words that qualify a type page title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Namespace,
}

impl TypeKind {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "Class" => Some(Self::Class),
            "Struct" => Some(Self::Struct),
            "Interface" => Some(Self::Interface),
            "Enum" => Some(Self::Enum),
            "Delegate" => Some(Self::Delegate),
            "Namespace" => Some(Self::Namespace),
            _ => None,
        }
    }
}

/// Derives a page's title from its head.
///
/// The `<title>` element wins whenever it exists, falling back to
/// `<meta name="title">`. With `strip_site_name_from_title`, everything from the
/// last `|` onward is cut.
pub fn extract_title(page: &HtmlPage, config: &IndexConfiguration) -> String {
    let title = collapse_whitespace(page.title_text().as_deref().unwrap_or_default(), false);
    if config.strip_site_name_from_title {
        strip_site_name(&title).to_string()
    } else {
        title
    }
}

/// Cuts `title` at its last `|`, dropping whitespace before the bar.
pub fn strip_site_name(title: &str) -> &str {
    match title.rfind('|') {
        Some(bar) => title[..bar].trim_end(),
        None => title.trim_end(),
    }
}

/// Location of the bare type name inside a type page title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTitle {
    /// Kind word found next to the name, if any
    pub kind: Option<TypeKind>,
    /// Byte range of the bare type name
    pub name: Range<usize>,
    /// Byte offset where the remainder of the title (e.g. ` | Site`) starts
    pub rest: usize,
}

impl TypeTitle {
    /// Parses `title`, which may still carry a ` | Site` suffix unless
    /// `site_name_stripped` says it was already removed.
    ///
    /// The first two space-separated words (before any site suffix) are
    /// inspected. If one of them is a kind word the other is the type name;
    /// otherwise the second word is taken as the name. A single-word title is
    /// its own name. The remainder always starts after the last inspected word.
    pub fn parse(title: &str, site_name_stripped: bool) -> Self {
        let body_end = if site_name_stripped {
            title.len()
        } else {
            match title.rfind('|') {
                Some(bar) => title[..bar].trim_end().len(),
                None => title.len(),
            }
        };
        let body = &title[..body_end];

        let first_end = body.find(' ').unwrap_or(body.len());
        let first = 0..first_end;
        if first_end == body.len() {
            return Self {
                kind: TypeKind::from_word(&body[first.clone()]),
                rest: first.end,
                name: first,
            };
        }

        let second_start = first_end + 1;
        let second_end = body[second_start..]
            .find(' ')
            .map_or(body.len(), |i| second_start + i);
        let second = second_start..second_end;

        let first_kind = TypeKind::from_word(&body[first.clone()]);
        let second_kind = TypeKind::from_word(&body[second.clone()]);
        match (first_kind, second_kind) {
            (None, Some(kind)) => Self {
                kind: Some(kind),
                name: first,
                rest: second_end,
            },
            (kind, _) => Self {
                kind,
                name: second,
                rest: second_end,
            },
        }
    }

    pub fn is_enum(&self) -> bool {
        self.kind == Some(TypeKind::Enum)
    }
}

/// Composes member display titles from a page's type title.
#[derive(Debug, Clone, Copy)]
pub struct MemberTitleBuilder<'a> {
    type_title: &'a str,
    used_metadata_title: bool,
    site_name_stripped: bool,
}

impl<'a> MemberTitleBuilder<'a> {
    pub const fn new(type_title: &'a str, used_metadata_title: bool, site_name_stripped: bool) -> Self {
        Self {
            type_title,
            used_metadata_title,
            site_name_stripped,
        }
    }

    /// Title for the member whose heading is `node`.
    pub fn build(&self, kind: MemberKind, node: ElementRef<'_>) -> String {
        self.build_for_name(kind, &collapse_whitespace(&inner_text(node), false))
    }

    /// Title for a member named `member_name`.
    ///
    /// Metadata titles are already well formed, so the member name is appended
    /// as `Title.Member`. HTML titles become `Label Type.Member<rest>`, where
    /// `<rest>` is whatever followed the type name (typically ` | Site`).
    pub fn build_for_name(&self, kind: MemberKind, member_name: &str) -> String {
        if self.used_metadata_title {
            return format!("{}.{}", self.type_title, member_name);
        }

        let parsed = TypeTitle::parse(self.type_title, self.site_name_stripped);
        format!(
            "{}{}.{}{}",
            kind.label(),
            &self.type_title[parsed.name],
            member_name,
            &self.type_title[parsed.rest..]
        )
    }
}

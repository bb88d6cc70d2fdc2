use crate::error::IndexError;
use crate::scopes::SearchScopes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// One entry of the search index: a page or one member of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexItem {
    /// Unique key within the index, may carry a `#fragment`
    pub href: String,
    /// Human-readable display title
    pub title: String,
    /// Space-separated keyword expansion, only present in metadata mode
    pub keywords: Option<String>,
    /// Normalized prose excerpt
    pub summary: Option<String>,
}

impl SearchIndexItem {
    pub fn new(
        href: impl Into<String>,
        title: impl Into<String>,
        keywords: Option<String>,
        summary: Option<String>,
    ) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
            keywords,
            summary,
        }
    }
}

/// Per-page metadata attached to a manifest entry.
///
/// Only consulted when metadata mode is enabled for the build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// Whether the page was generated from API reference metadata
    pub is_mref: bool,
    pub title: Option<String>,
    /// Summary as an HTML fragment
    pub summary: Option<String>,
}

impl PageMetadata {
    /// Reads the recognized keys (`IsMRef`, `Title`, `Summary`) from a raw metadata map.
    /// Values of an unexpected type are treated as absent.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            is_mref: map.get("IsMRef").and_then(Value::as_bool).unwrap_or(false),
            title: map.get("Title").and_then(Value::as_str).map(str::to_owned),
            summary: map.get("Summary").and_then(Value::as_str).map(str::to_owned),
        }
    }
}

/// Kind of member a group of nodes describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Event,
    EnumValue,
}

impl MemberKind {
    const ALL: [Self; 5] = [
        Self::Method,
        Self::Property,
        Self::Field,
        Self::Event,
        Self::EnumValue,
    ];

    /// Label prepended to member titles.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Method => "Method ",
            Self::Property => "Property ",
            Self::Field => "Field ",
            Self::Event => "Event ",
            Self::EnumValue => "Enum Value ",
        }
    }

    /// Scope flag gating extraction of this kind.
    pub const fn scope(self) -> SearchScopes {
        match self {
            Self::Method => SearchScopes::METHODS,
            Self::Property => SearchScopes::PROPERTIES,
            Self::Field => SearchScopes::FIELDS,
            Self::Event => SearchScopes::EVENTS,
            Self::EnumValue => SearchScopes::ENUM_VALUES,
        }
    }

    /// Section identifier as it appears in page markup.
    pub const fn section_id(self) -> &'static str {
        match self {
            Self::Method => "methods",
            Self::Property => "properties",
            Self::Field => "fields",
            Self::Event => "events",
            Self::EnumValue => "enum values",
        }
    }
}

impl FromStr for MemberKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.section_id() == s)
            .ok_or_else(|| IndexError::UnsupportedSection(s.to_string()))
    }
}

//! Page discovery: which rendered files make up the site, and their metadata.

use crate::error::{IndexError, Result};
use crate::types::PageMetadata;
use ignore::WalkBuilder;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// File name of the table-of-contents pages, which are never indexed.
const TOC_FILE_NAME: &str = "toc.html";

/// A rendered page to index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    /// Path relative to the output directory; also the entry's href
    pub relative_path: String,
    pub metadata: Option<PageMetadata>,
}

impl PageSource {
    pub fn new(relative_path: impl Into<String>, metadata: Option<PageMetadata>) -> Self {
        Self {
            relative_path: relative_path.into(),
            metadata,
        }
    }
}

/// Build manifest written by the site generator (`manifest.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub files: Vec<ManifestItem>,
}

/// One source file of the build and the outputs rendered from it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestItem {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Output files keyed by extension (e.g. `.html`)
    #[serde(default)]
    pub output: HashMap<String, OutputFileInfo>,
    /// Per-file metadata, either nested under `metadata` or as extra keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputFileInfo {
    pub relative_path: String,
}

impl ManifestItem {
    fn metadata(&self) -> PageMetadata {
        match self.extra.get("metadata") {
            Some(Value::Object(nested)) => PageMetadata::from_map(nested),
            _ => PageMetadata::from_map(&self.extra),
        }
    }

    fn html_output(&self) -> Option<&OutputFileInfo> {
        self.output
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(".html"))
            .map(|(_, info)| info)
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| IndexError::json(path, e))
    }

    /// HTML outputs of every non-TOC file, in manifest order.
    pub fn html_pages(&self) -> Vec<PageSource> {
        self.files
            .iter()
            .filter(|item| item.kind != "Toc")
            .filter_map(|item| {
                item.html_output()
                    .map(|output| PageSource::new(&output.relative_path, Some(item.metadata())))
            })
            .collect()
    }
}

/// Finds rendered pages by walking `output_dir` when no manifest is available.
///
/// Every `*.html` file except `toc.html` is returned, sorted by path, without metadata.
pub fn discover_pages(output_dir: &Path) -> Vec<PageSource> {
    let mut pages: Vec<PageSource> = WalkBuilder::new(output_dir)
        .standard_filters(false)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| {
            let path = entry.path();
            path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
                && path.file_name().is_some_and(|name| name != TOC_FILE_NAME)
        })
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(output_dir).ok()?;
            let href = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Some(PageSource::new(href, None))
        })
        .collect();

    pages.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    tracing::debug!(count = pages.len(), dir = %output_dir.display(), "Discovered pages");
    pages
}

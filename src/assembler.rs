//! Index assembly: scans every page of a site and writes the merged `index.json`.

use crate::config::IndexConfiguration;
use crate::error::{IndexError, PageLoadError, Result};
use crate::extract::scan;
use crate::html::HtmlPage;
use crate::manifest::PageSource;
use crate::types::SearchIndexItem;
use futures::StreamExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Name of the search index artifact inside the output directory.
pub const INDEX_FILE_NAME: &str = "index.json";

/// Concurrency used when none is configured.
fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(4, NonZeroUsize::get)
}

/// The merged search index, keyed by href in ordinal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchIndex(BTreeMap<String, SearchIndexItem>);

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` under its href, replacing any earlier entry.
    pub fn insert(&mut self, item: SearchIndexItem) {
        self.0.insert(item.href.clone(), item);
    }

    pub fn get(&self, href: &str) -> Option<&SearchIndexItem> {
        self.0.get(href)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending href order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchIndexItem> {
        self.0.values()
    }

    /// Writes the index as indented JSON, replacing `path` atomically.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| IndexError::json(path, e))?;

        let mut temp = path.as_os_str().to_owned();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| IndexError::io(&temp, e))?;
        if let Err(e) = tokio::fs::rename(&temp, path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(IndexError::io(path, e));
        }

        tracing::debug!(path = %path.display(), entries = self.len(), "Wrote search index");
        Ok(())
    }
}

impl Extend<SearchIndexItem> for SearchIndex {
    fn extend<T: IntoIterator<Item = SearchIndexItem>>(&mut self, iter: T) {
        for item in iter {
            self.insert(item);
        }
    }
}

/// Counts reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages_scanned: usize,
    pub pages_skipped: usize,
    pub items: usize,
}

/// Builds the search index for a rendered site.
#[derive(Debug, Clone)]
pub struct IndexAssembler {
    config: IndexConfiguration,
    concurrency: usize,
    cancel: CancellationToken,
}

impl IndexAssembler {
    pub fn new(config: IndexConfiguration) -> Self {
        Self {
            config,
            concurrency: default_concurrency(),
            cancel: CancellationToken::new(),
        }
    }

    /// Limits how many pages are read and scanned at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Uses `cancel` to stop the build between pages.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the whole stage: checks preconditions, scans `pages` and replaces
    /// `<output_dir>/index.json` with the result.
    ///
    /// Returns without touching the output when there are no pages.
    pub async fn process(&self, output_dir: &Path, pages: &[PageSource]) -> Result<BuildSummary> {
        if output_dir.as_os_str().is_empty() {
            return Err(IndexError::MissingOutputDirectory);
        }
        if pages.is_empty() {
            tracing::info!("No HTML pages to index");
            return Ok(BuildSummary::default());
        }

        let index_path = output_dir.join(INDEX_FILE_NAME);
        if !tokio::fs::try_exists(&index_path).await.unwrap_or(false) {
            return Err(IndexError::MissingIndexFile(index_path));
        }

        let started = Instant::now();
        let (index, summary) = self.build_index(output_dir, pages).await?;
        index.write_to(&index_path).await?;

        tracing::info!(
            pages = summary.pages_scanned,
            skipped = summary.pages_skipped,
            items = summary.items,
            elapsed_ms = started.elapsed().as_millis(),
            "Search index written to {}",
            index_path.display()
        );
        Ok(summary)
    }

    /// Scans `pages` relative to `output_dir` and merges their entries.
    ///
    /// Pages are scanned concurrently but merged in input order, so for a
    /// duplicated href the entry of the later page wins. Pages that cannot be
    /// loaded are skipped with a warning.
    pub async fn build_index(
        &self,
        output_dir: &Path,
        pages: &[PageSource],
    ) -> Result<(SearchIndex, BuildSummary)> {
        let mut index = SearchIndex::new();
        let mut summary = BuildSummary::default();

        let results = futures::stream::iter(pages)
            .map(|page| self.scan_page_file(output_dir, page))
            .buffered(self.concurrency);
        let mut results = std::pin::pin!(results);

        while let Some(outcome) = results.next().await {
            match outcome? {
                Ok(items) => {
                    summary.pages_scanned += 1;
                    index.extend(items);
                }
                Err(e) => {
                    summary.pages_skipped += 1;
                    tracing::warn!("{}", e);
                }
            }
        }

        summary.items = index.len();
        Ok((index, summary))
    }

    async fn scan_page_file(
        &self,
        output_dir: &Path,
        page: &PageSource,
    ) -> Result<std::result::Result<Vec<SearchIndexItem>, PageLoadError>> {
        if self.cancel.is_cancelled() {
            return Err(IndexError::Cancelled);
        }

        let path = output_dir.join(&page.relative_path);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(source) => return Ok(Err(PageLoadError::io(path, source))),
        };

        let href = page.relative_path.clone();
        let metadata = page.metadata.clone();
        let config = self.config;
        let task_path = path.clone();

        // Parsing and scanning are CPU bound
        let scanned = tokio::task::spawn_blocking(move || {
            let document = HtmlPage::from_bytes(&task_path, bytes)?;
            let items: Vec<_> = scan(&document, &href, metadata.as_ref(), &config).collect();
            tracing::debug!(href = %href, count = items.len(), "Scanned page");
            Ok::<_, PageLoadError>(items)
        })
        .await;

        Ok(scanned.unwrap_or_else(|e| {
            Err(PageLoadError::Task {
                path,
                message: e.to_string(),
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn item(href: &str, title: &str) -> SearchIndexItem {
        SearchIndexItem::new(href, title, None, None)
    }

    #[test]
    fn test_insert_last_write_wins() {
        let mut index = SearchIndex::new();
        index.insert(item("a.html#x", "first"));
        index.insert(item("a.html#x", "second"));
        check!(index.len() == 1);
        check!(index.get("a.html#x").map(|i| i.title.as_str()) == Some("second"));
    }

    #[test]
    fn test_iteration_is_ordinal() {
        let mut index = SearchIndex::new();
        index.extend([item("b.html", "b"), item("B.html", "B"), item("a.html#z", "az"), item("a.html", "a")]);
        let hrefs: Vec<_> = index.iter().map(|i| i.href.as_str()).collect();
        check!(hrefs == ["B.html", "a.html", "a.html#z", "b.html"]);
    }

    #[test]
    fn test_serializes_as_href_map() {
        let mut index = SearchIndex::new();
        index.insert(SearchIndexItem::new("p.html", "P", Some("P".to_string()), None));
        let json = serde_json::to_value(&index).unwrap();
        check!(
            json == serde_json::json!({
                "p.html": { "href": "p.html", "title": "P", "keywords": "P", "summary": null }
            })
        );
    }

    #[test]
    fn test_with_concurrency_floor() {
        let assembler = IndexAssembler::new(IndexConfiguration::default()).with_concurrency(0);
        check!(assembler.concurrency == 1);
    }
}

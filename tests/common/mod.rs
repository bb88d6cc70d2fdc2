//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `site`: an empty rendered site with a placeholder `index.json`
//! - `class_site`: a site holding one class page (`api/Foo.html`) with all
//!   four member sections, and one enum page (`api/Color.html`)
//!
//! Pages are plain HTML strings built with [`page`], so each test can see
//! exactly what markup it scans.

use doc_search_index::{IndexConfiguration, PageSource, SearchScopes};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wraps `body` in a document whose `<head>` holds `title` and any extra `head` markup.
pub fn page(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><title>{}</title>{}</head><body>{}</body></html>",
        title, head, body
    )
}

/// A class page laid out the way the site generator renders reference pages.
pub const CLASS_BODY: &str = r#"
<article class="content wrap" id="_content">
  <h1 id="Foo">Class Foo</h1>
  <div class="markdown summary"><p>Represents a <code>Foo</code>.</p></div>
  <h2 class="section" id="properties">Properties</h2>
  <h3 id="size">Size</h3>
  <div class="markdown summary">Gets the size. In bytes.</div>
  <h2 class="section" id="methods">Methods</h2>
  <h3 id="bar">Bar()</h3>
  <div class="markdown summary">Does a thing.</div>
  <h3 id="baz">Baz(int, string)</h3>
  <div class="markdown summary">Does another thing.</div>
  <h2 class="section" id="events">Events</h2>
  <h3 id="changed">Changed</h3>
  <div class="markdown summary">Raised on change.</div>
  <h2 class="section" id="fields">Fields</h2>
  <h3 id="count">Count</h3>
  <div class="markdown summary">Number of things.</div>
</article>
"#;

/// An enum page with two values.
#[allow(dead_code)] // Used by some integration test crates only
pub const ENUM_BODY: &str = r#"
<article class="content wrap" id="_content">
  <h1 id="Color">Enum Color</h1>
  <div class="markdown summary"><p>Colors.</p></div>
  <h2 id="fields">Fields</h2>
  <dl class="parameters">
    <dt id="red"><code>Red = 0</code></dt>
    <dd>The color red.</dd>
    <dt id="green"><code>Green = 1</code></dt>
    <dd>The color green.</dd>
  </dl>
</article>
"#;

/// Configuration with the given scopes and everything else at its default.
pub fn config_with(scopes: SearchScopes) -> IndexConfiguration {
    IndexConfiguration {
        search_scopes: scopes,
        ..IndexConfiguration::default()
    }
}

/// A temporary rendered-site output directory.
///
/// Cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempSite {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempSite {
    /// Creates an empty output directory.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Creates an output directory with a placeholder `index.json`, as left by
    /// the upstream search index stage.
    pub fn with_index() -> Self {
        let site = Self::new();
        site.create_file("index.json", "{}");
        site
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file, along with its parent directories.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: impl AsRef<[u8]>) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Reads back the `index.json` artifact as JSON.
    ///
    /// # Panics
    /// Panics if the file is missing or not JSON.
    pub fn read_index(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.root.join("index.json"))
            .expect("Failed to read index.json");
        serde_json::from_str(&content).expect("index.json is not valid JSON")
    }

    /// Raw text of `index.json`.
    pub fn read_index_text(&self) -> String {
        std::fs::read_to_string(self.root.join("index.json")).expect("Failed to read index.json")
    }
}

/// Pages without metadata, in the given order.
#[allow(dead_code)] // Used by some integration test crates only
pub fn sources(paths: &[&str]) -> Vec<PageSource> {
    paths.iter().map(|path| PageSource::new(*path, None)).collect()
}

#[allow(dead_code)]
#[fixture]
pub fn site() -> TempSite {
    TempSite::with_index()
}

#[allow(dead_code)]
#[fixture]
pub fn class_site() -> TempSite {
    let site = TempSite::with_index();
    site.create_file("api/Foo.html", page("Class Foo | MySite", "", CLASS_BODY));
    site.create_file("api/Color.html", page("Enum Color | MySite", "", ENUM_BODY));
    site
}

use crate::config::{SCOPES_KEY, STRIP_SITE_NAME_KEY, USE_METADATA_KEY, USE_METADATA_TITLE_KEY};
use clap::Parser;
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "doc-search-index")]
#[command(about = "Build a member-level search index for a rendered documentation site", long_about = None)]
pub struct Cli {
    /// Output directory of the site build (must contain index.json)
    pub output_dir: PathBuf,

    /// Build manifest listing the rendered pages [default: <OUTPUT_DIR>/manifest.json]
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Global metadata file (.json, docfx.json or .toml)
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Restrict indexing to these scopes (repeatable)
    #[arg(short, long = "scope", value_name = "NAME")]
    pub scopes: Vec<String>,

    /// Build summaries and keywords from page metadata
    #[arg(long)]
    pub use_metadata: bool,

    /// Ignore metadata titles even in metadata mode
    #[arg(long)]
    pub no_metadata_title: bool,

    /// Drop the ` | Site` suffix from page titles
    #[arg(long)]
    pub strip_site_name: bool,

    /// Number of pages scanned concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Log per-page detail
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Manifest path, explicit or the default location inside the output directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.output_dir.join("manifest.json"))
    }

    /// Writes flag overrides into the global metadata map.
    pub fn apply_overrides(&self, metadata: &mut Map<String, Value>) {
        if !self.scopes.is_empty() {
            let names = self.scopes.iter().cloned().map(Value::String).collect();
            metadata.insert(SCOPES_KEY.to_string(), Value::Array(names));
        }
        if self.use_metadata {
            metadata.insert(USE_METADATA_KEY.to_string(), Value::Bool(true));
        }
        if self.no_metadata_title {
            metadata.insert(USE_METADATA_TITLE_KEY.to_string(), Value::Bool(false));
        }
        if self.strip_site_name {
            metadata.insert(STRIP_SITE_NAME_KEY.to_string(), Value::Bool(true));
        }
    }
}

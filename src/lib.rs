pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod html;
pub mod manifest;
pub mod scopes;
pub mod text;
pub mod tracing;
pub mod types;

pub use assembler::{BuildSummary, INDEX_FILE_NAME, IndexAssembler, SearchIndex};
pub use config::IndexConfiguration;
pub use error::{IndexError, PageLoadError, Result};
pub use extract::{scan, scan_page};
pub use manifest::{Manifest, PageSource, discover_pages};
pub use scopes::SearchScopes;
pub use types::{MemberKind, PageMetadata, SearchIndexItem};

//! Build configuration derived from the site's global metadata.

use crate::error::{IndexError, Result};
use crate::scopes::SearchScopes;
use serde_json::{Map, Value};
use std::path::Path;

pub const ENABLE_SEARCH_KEY: &str = "_enableSearch";
pub const USE_METADATA_KEY: &str = "_searchIndexUseMetadata";
pub const USE_METADATA_TITLE_KEY: &str = "_searchIndexUseMetadataTitle";
pub const SCOPES_KEY: &str = "_searchIndexScopes";
pub const STRIP_SITE_NAME_KEY: &str = "_searchIndexStripSiteNameFromTitle";

/// Settings shared read-only by every page scan of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfiguration {
    /// Build summaries and keywords from page metadata for API reference pages
    pub use_metadata: bool,
    /// Prefer the metadata title over the HTML title in metadata mode
    pub use_metadata_title: bool,
    pub search_scopes: SearchScopes,
    /// Cut ` | Site` suffixes from page titles
    pub strip_site_name_from_title: bool,
}

impl Default for IndexConfiguration {
    fn default() -> Self {
        Self {
            use_metadata: false,
            use_metadata_title: true,
            search_scopes: SearchScopes::ALL,
            strip_site_name_from_title: false,
        }
    }
}

impl IndexConfiguration {
    /// Derives the configuration from global metadata.
    ///
    /// Also makes sure `_enableSearch` is set, defaulting it to `true`.
    pub fn from_metadata(metadata: &mut Map<String, Value>) -> Result<Self> {
        metadata
            .entry(ENABLE_SEARCH_KEY)
            .or_insert(Value::Bool(true));

        let defaults = Self::default();
        let config = Self {
            use_metadata: read_bool(metadata, USE_METADATA_KEY)?.unwrap_or(defaults.use_metadata),
            use_metadata_title: read_bool(metadata, USE_METADATA_TITLE_KEY)?
                .unwrap_or(defaults.use_metadata_title),
            search_scopes: read_scopes(metadata)?.unwrap_or(defaults.search_scopes),
            strip_site_name_from_title: read_bool(metadata, STRIP_SITE_NAME_KEY)?
                .unwrap_or(defaults.strip_site_name_from_title),
        };

        tracing::debug!(
            use_metadata = config.use_metadata,
            use_metadata_title = config.use_metadata_title,
            scopes = %config.search_scopes,
            strip_site_name = config.strip_site_name_from_title,
            "Derived search index configuration"
        );

        Ok(config)
    }
}

fn read_bool(metadata: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match metadata.get(key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(IndexError::InvalidOption {
            key: key.to_string(),
            expected: "a boolean",
        }),
    }
}

fn read_scopes(metadata: &Map<String, Value>) -> Result<Option<SearchScopes>> {
    let Some(value) = metadata.get(SCOPES_KEY) else {
        return Ok(None);
    };
    let Value::Array(entries) = value else {
        tracing::warn!(key = SCOPES_KEY, "Scope list is not an array, using all scopes");
        return Ok(None);
    };

    let names = entries
        .iter()
        .map(|entry| {
            entry.as_str().ok_or_else(|| IndexError::InvalidScope(entry.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    SearchScopes::from_names(names).map(Some)
}

/// Loads global metadata from a configuration file.
///
/// `.toml` files are read as a flat table. Anything else is read as JSON: either
/// a flat metadata object or a `docfx.json` whose `build.globalMetadata` object is used.
pub fn load_metadata_file(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml")) {
        return toml::from_str(&content).map_err(|source| IndexError::Toml {
            path: path.to_path_buf(),
            source,
        });
    }

    let mut root: Map<String, Value> =
        serde_json::from_str(&content).map_err(|e| IndexError::json(path, e))?;
    let global = root
        .get_mut("build")
        .and_then(|build| build.get_mut("globalMetadata"))
        .and_then(Value::as_object_mut)
        .map(std::mem::take);

    Ok(global.unwrap_or(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use serde_json::json;

    fn metadata(value: Value) -> Map<String, Value> {
        let Value::Object(map) = value else {
            panic!("metadata fixture must be an object");
        };
        map
    }

    #[test]
    fn test_defaults() {
        let mut map = Map::new();
        let_assert!(Ok(config) = IndexConfiguration::from_metadata(&mut map));
        check!(config == IndexConfiguration::default());
        check!(!config.use_metadata);
        check!(config.use_metadata_title);
        check!(config.search_scopes == SearchScopes::ALL);
        check!(!config.strip_site_name_from_title);
    }

    #[test]
    fn test_enable_search_inserted_when_absent() {
        let mut map = Map::new();
        let_assert!(Ok(_) = IndexConfiguration::from_metadata(&mut map));
        check!(map.get(ENABLE_SEARCH_KEY) == Some(&Value::Bool(true)));
    }

    #[test]
    fn test_enable_search_preserved() {
        let mut map = metadata(json!({ "_enableSearch": false }));
        let_assert!(Ok(_) = IndexConfiguration::from_metadata(&mut map));
        check!(map.get(ENABLE_SEARCH_KEY) == Some(&Value::Bool(false)));
    }

    #[test]
    fn test_reads_all_keys() {
        let mut map = metadata(json!({
            "_searchIndexUseMetadata": true,
            "_searchIndexUseMetadataTitle": false,
            "_searchIndexScopes": ["types", "Methods", "ENUMVALUES"],
            "_searchIndexStripSiteNameFromTitle": true,
        }));
        let_assert!(Ok(config) = IndexConfiguration::from_metadata(&mut map));
        check!(config.use_metadata);
        check!(!config.use_metadata_title);
        check!(
            config.search_scopes
                == SearchScopes::TYPES | SearchScopes::METHODS | SearchScopes::ENUM_VALUES
        );
        check!(config.strip_site_name_from_title);
    }

    #[test]
    fn test_empty_scope_list_is_none() {
        let mut map = metadata(json!({ "_searchIndexScopes": [] }));
        let_assert!(Ok(config) = IndexConfiguration::from_metadata(&mut map));
        check!(config.search_scopes == SearchScopes::NONE);
    }

    #[test]
    fn test_unknown_scope_is_fatal() {
        let mut map = metadata(json!({ "_searchIndexScopes": ["Types", "Constructors"] }));
        let_assert!(Err(IndexError::InvalidScope(name)) = IndexConfiguration::from_metadata(&mut map));
        check!(name == "Constructors");
    }

    #[test]
    fn test_scope_entries_accept_lists_and_numbers() {
        let mut map = metadata(json!({ "_searchIndexScopes": ["Types, Methods", "16"] }));
        let_assert!(Ok(config) = IndexConfiguration::from_metadata(&mut map));
        check!(config.search_scopes == SearchScopes::TYPES | SearchScopes::METHODS | SearchScopes::FIELDS);
    }

    #[test]
    fn test_non_string_scope_is_fatal() {
        let mut map = metadata(json!({ "_searchIndexScopes": [3] }));
        let_assert!(Err(IndexError::InvalidScope(_)) = IndexConfiguration::from_metadata(&mut map));
    }

    #[test]
    fn test_non_array_scopes_ignored() {
        let mut map = metadata(json!({ "_searchIndexScopes": "Types" }));
        let_assert!(Ok(config) = IndexConfiguration::from_metadata(&mut map));
        check!(config.search_scopes == SearchScopes::ALL);
    }

    #[test]
    fn test_wrong_bool_type_is_fatal() {
        let mut map = metadata(json!({ "_searchIndexUseMetadata": "yes" }));
        let_assert!(
            Err(IndexError::InvalidOption { key, .. }) = IndexConfiguration::from_metadata(&mut map)
        );
        check!(key == USE_METADATA_KEY);
    }

    #[test]
    fn test_load_docfx_json_global_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docfx.json");
        std::fs::write(
            &path,
            r#"{ "build": { "globalMetadata": { "_searchIndexUseMetadata": true } } }"#,
        )
        .unwrap();

        let_assert!(Ok(map) = load_metadata_file(&path));
        check!(map.get(USE_METADATA_KEY) == Some(&Value::Bool(true)));
        check!(!map.contains_key("build"));
    }

    #[test]
    fn test_load_flat_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, r#"{ "_searchIndexScopes": ["Types"] }"#).unwrap();

        let_assert!(Ok(mut map) = load_metadata_file(&path));
        let_assert!(Ok(config) = IndexConfiguration::from_metadata(&mut map));
        check!(config.search_scopes == SearchScopes::TYPES);
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.toml");
        std::fs::write(
            &path,
            "_searchIndexStripSiteNameFromTitle = true\n_searchIndexScopes = [\"Types\", \"Fields\"]\n",
        )
        .unwrap();

        let_assert!(Ok(mut map) = load_metadata_file(&path));
        let_assert!(Ok(config) = IndexConfiguration::from_metadata(&mut map));
        check!(config.strip_site_name_from_title);
        check!(config.search_scopes == SearchScopes::TYPES | SearchScopes::FIELDS);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let_assert!(Err(IndexError::Json { .. }) = load_metadata_file(&path));
    }
}

//! Source catalog resolution.
//!
//! The provider's spell index is keyed by short codes (`PHB`, `XGE`, ...).
//! Full source names live in a separate script asset, so resolution is:
//!
//! 1. Extract `short -> full name` pairs from the header script
//! 2. Fetch the index (`short -> file suffix`)
//! 3. Relabel index keys with full names, falling back to the short code
//! 4. Keep allow-listed sources, report the rest as removed

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{AllowList, ProviderEndpoints};
use crate::error::{AcquisitionError, Result};
use crate::transport::Fetch;

// Entry grammars in the header script. They are an external contract: if the
// provider reformats the asset, extraction comes back empty and resolution
// fails loudly.
static BOOK_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""book\.html","([^"]+)",\{aHash:"([^"]+)"\}"#).expect("valid book pattern")
});
static ADVENTURE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""adventure\.html","([^"]+)",\{isSide:!0,aHash:"([^"]+)"\}"#)
        .expect("valid adventure pattern")
});
static RELEASE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"release/5eTools\.(.+?)\.zip").expect("valid release pattern")
});

/// Short code to full source name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable(BTreeMap<String, String>);

impl TranslationTable {
    /// Full name for `short`, or `short` itself when untranslated.
    pub fn resolve<'a>(&'a self, short: &'a str) -> &'a str {
        self.0.get(short).map(String::as_str).unwrap_or(short)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Extract the translation table from the header script text.
///
/// Book entries are read before adventure entries; a later entry for the same
/// short code wins.
pub fn extract_translation_table(script: &str) -> TranslationTable {
    BOOK_ENTRY
        .captures_iter(script)
        .chain(ADVENTURE_ENTRY.captures_iter(script))
        .map(|caps| (caps[2].to_string(), caps[1].to_string()))
        .collect()
}

/// Extract the release version from the version page text.
pub fn extract_release_version(page: &str) -> Option<String> {
    RELEASE_VERSION
        .captures(page)
        .map(|caps| caps[1].to_string())
}

/// One downloadable source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical full name (or the short code when untranslated).
    pub name: String,
    /// Provider short code.
    pub short: String,
    /// File suffix appended to the data URL.
    pub suffix: String,
}

/// Allow-listed sources in provider order, plus what was filtered out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCatalog {
    entries: Vec<CatalogEntry>,
    removed: Vec<String>,
    translations: TranslationTable,
}

impl SourceCatalog {
    /// Build a catalog from a parsed index object.
    ///
    /// Index values that are not strings are skipped.
    pub fn build(
        index: &Map<String, Value>,
        translations: TranslationTable,
        allow_list: &AllowList,
    ) -> Self {
        let mut entries = Vec::new();
        let mut removed = Vec::new();

        for (short, suffix) in index {
            let Some(suffix) = suffix.as_str() else {
                tracing::warn!("Ignoring index entry {} with non-string value", short);
                continue;
            };

            let name = translations.resolve(short).to_string();
            if allow_list.contains(&name) {
                entries.push(CatalogEntry {
                    name,
                    short: short.clone(),
                    suffix: suffix.to_string(),
                });
            } else {
                removed.push(name);
            }
        }

        Self {
            entries,
            removed,
            translations,
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Full names of index sources excluded by the allow-list.
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn translations(&self) -> &TranslationTable {
        &self.translations
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fetches the provider assets and builds a [`SourceCatalog`].
pub struct CatalogResolver<'a, F> {
    fetcher: &'a F,
    endpoints: &'a ProviderEndpoints,
    allow_list: &'a AllowList,
}

impl<'a, F: Fetch> CatalogResolver<'a, F> {
    pub fn new(fetcher: &'a F, endpoints: &'a ProviderEndpoints, allow_list: &'a AllowList) -> Self {
        Self {
            fetcher,
            endpoints,
            allow_list,
        }
    }

    pub fn resolve_catalog(&self) -> Result<SourceCatalog> {
        let translations = self.fetch_translations()?;
        let index = self.fetch_index()?;

        let catalog = SourceCatalog::build(&index, translations, self.allow_list);

        let allowed: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        tracing::info!("Allowed sources: {}", allowed.join(", "));
        if !catalog.removed().is_empty() {
            tracing::info!("Removed sources: {}", catalog.removed().join(", "));
        }

        Ok(catalog)
    }

    fn fetch_translations(&self) -> Result<TranslationTable> {
        let script = self.fetcher.fetch_text(&self.endpoints.header_url)?;
        let translations = extract_translation_table(&script);

        if translations.is_empty() {
            return Err(AcquisitionError::EmptyTranslationTable {
                url: self.endpoints.header_url.clone(),
            });
        }

        tracing::debug!("Extracted {} source translations", translations.len());
        Ok(translations)
    }

    fn fetch_index(&self) -> Result<Map<String, Value>> {
        let body = self.fetcher.fetch_text(&self.endpoints.index_url)?;

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(index)) => Ok(index),
            Ok(other) => Err(AcquisitionError::MalformedIndex(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
            Err(e) => Err(AcquisitionError::MalformedIndex(e.to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Provider endpoints and the source allow-list.

use serde::{Deserialize, Serialize};

pub const DEFAULT_VERSION_URL: &str = "https://get.5e.tools/";
pub const DEFAULT_HEADER_URL: &str = "https://5etools.com/js/header.js";
pub const DEFAULT_INDEX_URL: &str = "https://5etools.com/data/spells/index.json";
pub const DEFAULT_DATA_URL: &str = "https://5etools.com/data/spells/";

/// Sources drawn from unless overridden.
pub const DEFAULT_ALLOWED_SOURCES: &[&str] = &[
    "Player's Handbook",
    "Guildmasters' Guide to Ravnica",
    "Sword Coast Adventurer's Guide",
    "Xanathar's Guide to Everything",
    "Explorer's Guide to Wildemount",
    "UA2020PsionicOptionsRevisited",
    "UASorcererAndWarlock",
    "UA2020SpellsAndMagicTattoos",
];

/// URLs of the provider assets used during acquisition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
    /// Page whose download link embeds the current release version.
    pub version_url: String,
    /// Script asset holding the short-code -> full-name translations.
    pub header_url: String,
    /// JSON object mapping short codes to per-source file suffixes.
    pub index_url: String,
    /// Prefix joined with a suffix from the index to fetch one source.
    pub data_base_url: String,
}

impl ProviderEndpoints {
    /// URL of one source's record list.
    pub fn source_url(&self, suffix: &str) -> String {
        if self.data_base_url.ends_with('/') {
            format!("{}{}", self.data_base_url, suffix)
        } else {
            format!("{}/{}", self.data_base_url, suffix)
        }
    }
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            version_url: DEFAULT_VERSION_URL.to_string(),
            header_url: DEFAULT_HEADER_URL.to_string(),
            index_url: DEFAULT_INDEX_URL.to_string(),
            data_base_url: DEFAULT_DATA_URL.to_string(),
        }
    }
}

/// Full source names that may be drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(Vec<String>);

impl AllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|allowed| allowed == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_SOURCES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_joins_once() {
        let mut endpoints = ProviderEndpoints::default();
        assert_eq!(
            endpoints.source_url("spells-phb.json"),
            "https://5etools.com/data/spells/spells-phb.json"
        );

        endpoints.data_base_url = "http://localhost/data".to_string();
        assert_eq!(
            endpoints.source_url("spells-xge.json"),
            "http://localhost/data/spells-xge.json"
        );
    }

    #[test]
    fn test_default_allow_list() {
        let allow = AllowList::default();
        assert!(allow.contains("Player's Handbook"));
        assert!(!allow.contains("Tasha's Cauldron of Everything"));
    }
}

//! Runtime configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use spellbook_catalog::transport::DEFAULT_TIMEOUT;
use spellbook_catalog::{AllowList, ProviderEndpoints};

/// Everything the binary needs besides the command-line arguments.
#[derive(Clone, Debug)]
pub struct SpellbookConfig {
    pub cache_dir: PathBuf,
    pub endpoints: ProviderEndpoints,
    pub http_timeout: Duration,
    pub allow_list: AllowList,
}

impl Default for SpellbookConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            endpoints: ProviderEndpoints::default(),
            http_timeout: DEFAULT_TIMEOUT,
            allow_list: AllowList::default(),
        }
    }
}

impl SpellbookConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SPELLBOOK_CACHE_DIR` - Cache directory (default: platform cache dir)
    /// - `SPELLBOOK_VERSION_URL` - Page carrying the release download link
    /// - `SPELLBOOK_HEADER_URL` - Script asset with source name translations
    /// - `SPELLBOOK_INDEX_URL` - Spell source index
    /// - `SPELLBOOK_DATA_URL` - Prefix for per-source spell files
    /// - `SPELLBOOK_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
    /// - `SPELLBOOK_ALLOWED_SOURCES` - Comma-separated full source names
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("SPELLBOOK_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }

        // Endpoint overrides
        if let Some(url) = lookup("SPELLBOOK_VERSION_URL") {
            config.endpoints.version_url = url;
        }
        if let Some(url) = lookup("SPELLBOOK_HEADER_URL") {
            config.endpoints.header_url = url;
        }
        if let Some(url) = lookup("SPELLBOOK_INDEX_URL") {
            config.endpoints.index_url = url;
        }
        if let Some(url) = lookup("SPELLBOOK_DATA_URL") {
            config.endpoints.data_base_url = url;
        }

        if let Some(secs) = read_var::<u64>(&lookup, "SPELLBOOK_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(sources) = lookup("SPELLBOOK_ALLOWED_SOURCES") {
            let names = parse_source_list(&sources);
            if !names.is_empty() {
                config.allow_list = AllowList::new(names);
            }
        }

        config
    }
}

/// Platform cache directory for spellbook.
///
/// - macOS: `~/Library/Caches/spellbook`
/// - Linux: `~/.cache/spellbook` (or `$XDG_CACHE_HOME/spellbook`)
/// - Windows: `%LOCALAPPDATA%\spellbook\cache`
/// - Fallback: `./spellbook_cache`
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "spellbook")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./spellbook_cache"))
}

fn parse_source_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

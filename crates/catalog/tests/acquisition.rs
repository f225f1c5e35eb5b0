use spellbook_catalog::{
    AcquisitionError, AllowList, CorpusAcquirer, CorpusRepository, FileCorpusRepository,
    ProviderEndpoints, StaticFetcher, TransportError,
};
use std::fs;
use tempfile::TempDir;

const HEADER: &str = r#"
    ["book.html","Player's Handbook",{aHash:"PHB"}],
    ["book.html","Xanathar's Guide to Everything",{aHash:"XGE"}],
    ["book.html","Tasha's Cauldron of Everything",{aHash:"TCE"}],
"#;

const INDEX: &str = r#"{
    "PHB": "spells-phb.json",
    "TCE": "spells-tce.json",
    "UASorcererAndWarlock": "spells-ua-saw.json",
    "XGE": "spells-xge.json"
}"#;

const PHB: &str = r#"{"spell":[
    {"name":"Fire Bolt","source":"PHB","level":0,"components":{"v":true,"s":true},
     "duration":[{"type":"instant"}]},
    {"name":"Identify","source":"PHB","level":1,
     "components":{"v":true,"s":true,"m":"a pearl worth at least 100 gp and an owl feather"},
     "duration":[{"type":"instant"}],"meta":{"ritual":true}}
]}"#;

const UA: &str = r#"{"spell":[
    {"name":"Spirit of Death","source":"UASorcererAndWarlock","level":4,
     "components":{"v":true,"s":true,"m":{"text":"a gilded playing card worth at least 400 gp","cost":40000}},
     "duration":[{"type":"timed","concentration":true}]}
]}"#;

const XGE: &str = r#"{"spell":[
    {"name":"Toll the Dead","source":"XGE","level":0,"components":{"v":true,"s":true},
     "duration":[{"type":"instant"}]}
]}"#;

fn version_page(version: &str) -> String {
    format!(r#"<a href="https://example.invalid/release/5eTools.{version}.zip">Download</a>"#)
}

/// Fetcher serving a consistent provider release.
fn provider(endpoints: &ProviderEndpoints, version: &str) -> StaticFetcher {
    let fetcher = StaticFetcher::new();
    fetcher
        .respond(&endpoints.version_url, version_page(version))
        .respond(&endpoints.header_url, HEADER)
        .respond(&endpoints.index_url, INDEX)
        .respond(endpoints.source_url("spells-phb.json"), PHB)
        .respond(endpoints.source_url("spells-ua-saw.json"), UA)
        .respond(endpoints.source_url("spells-xge.json"), XGE);
    fetcher
}

fn source_requests(fetcher: &StaticFetcher, endpoints: &ProviderEndpoints) -> usize {
    fetcher
        .requests()
        .iter()
        .filter(|url| url.starts_with(&endpoints.data_base_url) && *url != &endpoints.index_url)
        .count()
}

fn names(corpus: &spellbook_core::Corpus) -> Vec<String> {
    corpus.iter().map(|spell| spell.name.clone()).collect()
}

/// A fresh cache downloads every allowed source in index order.
#[test]
fn test_first_run_downloads_allowed_sources() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    let corpus = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("acquisition should succeed");

    assert_eq!(
        names(&corpus),
        vec!["Fire Bolt", "Identify", "Spirit of Death", "Toll the Dead"]
    );
    assert_eq!(source_requests(&fetcher, &endpoints), 3);
    assert_eq!(
        fetcher.request_count(&endpoints.source_url("spells-tce.json")),
        0,
        "removed sources are never fetched"
    );

    let metadata = repository.load_metadata().expect("metadata").expect("saved");
    assert_eq!(metadata.version, "v1.0.0");
}

/// A second run against the same release reads the cache only.
#[test]
fn test_unchanged_version_reuses_cache() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    let first = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("first run");
    fetcher.clear_requests();

    let second = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("second run");

    assert_eq!(first, second);
    assert_eq!(fetcher.requests(), vec![endpoints.version_url.clone()]);
}

/// A new remote release replaces the cached one.
#[test]
fn test_new_version_refreshes_cache() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("first run");

    fetcher.respond(&endpoints.version_url, version_page("v1.1.0"));
    fetcher.respond(
        endpoints.source_url("spells-xge.json"),
        r#"{"spell":[{"name":"Mind Sliver","source":"XGE","level":0,"components":{"v":true}}]}"#,
    );
    fetcher.clear_requests();

    let corpus = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("second run");

    assert_eq!(source_requests(&fetcher, &endpoints), 3);
    assert!(names(&corpus).contains(&"Mind Sliver".to_string()));
    assert!(!names(&corpus).contains(&"Toll the Dead".to_string()));
    assert_eq!(
        repository.load_metadata().unwrap().unwrap().version,
        "v1.1.0"
    );
}

/// A failing source aborts the run, names the source, and leaves the cache alone.
#[test]
fn test_source_failure_keeps_previous_cache() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("first run");
    let snapshot_before = fs::read(repository.snapshot_path()).unwrap();

    fetcher.respond(&endpoints.version_url, version_page("v2.0.0"));
    fetcher.forget(&endpoints.source_url("spells-xge.json"));

    let err = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .unwrap_err();

    match err {
        AcquisitionError::SourceFetch { name, source } => {
            assert_eq!(name, "Xanathar's Guide to Everything");
            assert!(matches!(source, TransportError::Status { status: 404, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(repository.load_metadata().unwrap().unwrap().version, "v1.0.0");
    assert_eq!(fs::read(repository.snapshot_path()).unwrap(), snapshot_before);
}

/// An unparseable source payload is reported against that source.
#[test]
fn test_malformed_source_payload() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    fetcher.respond(endpoints.source_url("spells-phb.json"), r#"{"spells":[]}"#);
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    let err = CorpusAcquirer::new(fetcher, &repository)
        .acquire_corpus()
        .unwrap_err();

    assert!(matches!(
        err,
        AcquisitionError::MalformedRecords { ref name, .. } if name == "Player's Handbook"
    ));
    assert!(repository.load_metadata().unwrap().is_none());
}

/// A version page without a release link is fatal.
#[test]
fn test_missing_version_is_fatal() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    fetcher.respond(&endpoints.version_url, "<html>down for maintenance</html>");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    let err = CorpusAcquirer::new(fetcher, &repository)
        .acquire_corpus()
        .unwrap_err();
    assert!(matches!(err, AcquisitionError::VersionNotFound { .. }));
}

/// A cache that no longer parses is downloaded again.
#[test]
fn test_corrupted_cache_is_refetched() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("first run");
    fs::write(repository.snapshot_path(), b"{\"version\":").unwrap();
    fetcher.clear_requests();

    let corpus = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("refetch");

    assert_eq!(corpus.len(), 4);
    assert_eq!(source_requests(&fetcher, &endpoints), 3);
}

/// Unreadable metadata is a cache miss, not a fatal error.
#[test]
fn test_corrupted_metadata_is_refetched() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("first run");
    fs::write(repository.metadata_path(), b"{\"vers").unwrap();
    fetcher.clear_requests();

    let corpus = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("refetch");

    assert_eq!(corpus.len(), 4);
    assert_eq!(source_requests(&fetcher, &endpoints), 3);
    assert_eq!(
        repository.load_metadata().expect("metadata rewritten").unwrap().version,
        "v1.0.0"
    );
}

/// Same-named spells from different sources are all kept, in catalog order.
#[test]
fn test_duplicates_across_sources_are_kept() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    fetcher.respond(
        endpoints.source_url("spells-xge.json"),
        r#"{"spell":[
            {"name":"Fire Bolt","source":"XGE","level":0,"components":{"v":true,"s":true}}
        ]}"#,
    );
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    let fresh = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("first run");

    assert_eq!(
        names(&fresh),
        vec!["Fire Bolt", "Identify", "Spirit of Death", "Fire Bolt"]
    );
    let fire_bolt_sources: Vec<&str> = fresh
        .iter()
        .filter(|spell| spell.name == "Fire Bolt")
        .map(|spell| spell.source.as_str())
        .collect();
    assert_eq!(fire_bolt_sources, vec!["PHB", "XGE"]);

    fetcher.clear_requests();
    let cached = CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("cached run");

    assert_eq!(source_requests(&fetcher, &endpoints), 0);
    assert_eq!(cached, fresh);
}

/// A snapshot whose embedded version disagrees with the metadata is not trusted.
#[test]
fn test_mismatched_snapshot_is_refetched() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("first run");
    fs::write(repository.metadata_path(), br#"{"version":"v9.9.9"}"#).unwrap();
    fetcher.respond(&endpoints.version_url, version_page("v9.9.9"));
    fetcher.clear_requests();

    CorpusAcquirer::new(fetcher.clone(), &repository)
        .acquire_corpus()
        .expect("refetch");

    assert_eq!(source_requests(&fetcher, &endpoints), 3);
    let snapshot = repository.load_snapshot().unwrap().unwrap();
    assert_eq!(snapshot.version, "v9.9.9");
}

/// Untranslated short codes are allow-listed by the code itself.
#[test]
fn test_untranslated_source_uses_short_code() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints::default();
    let fetcher = provider(&endpoints, "v1.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    let acquirer = CorpusAcquirer::new(fetcher, &repository)
        .with_allow_list(AllowList::new(["UASorcererAndWarlock"]));
    let snapshot = acquirer.acquire_snapshot().expect("snapshot");

    assert_eq!(snapshot.catalog.len(), 1);
    assert_eq!(snapshot.catalog.entries()[0].name, "UASorcererAndWarlock");
    assert_eq!(
        snapshot.catalog.removed(),
        [
            "Player's Handbook",
            "Tasha's Cauldron of Everything",
            "Xanathar's Guide to Everything",
        ]
    );
}

/// Endpoint overrides are honored for every request.
#[test]
fn test_custom_endpoints() {
    let temp = TempDir::new().expect("temp dir");
    let endpoints = ProviderEndpoints {
        version_url: "http://mirror.local/version".to_string(),
        header_url: "http://mirror.local/header.js".to_string(),
        index_url: "http://mirror.local/data/index.json".to_string(),
        data_base_url: "http://mirror.local/data".to_string(),
    };
    let fetcher = provider(&endpoints, "v3.0.0");
    let repository = FileCorpusRepository::new(temp.path()).expect("repository");

    let corpus = CorpusAcquirer::new(fetcher.clone(), &repository)
        .with_endpoints(endpoints.clone())
        .acquire_corpus()
        .expect("acquisition should succeed");

    assert_eq!(corpus.len(), 4);
    assert!(
        fetcher
            .requests()
            .iter()
            .all(|url| url.starts_with("http://mirror.local/"))
    );
}

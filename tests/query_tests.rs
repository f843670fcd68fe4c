use linkeater::ingest::IngestPipeline;
use linkeater::query::{Query, QueryEngine, QueryError};
use linkeater::storage::{author_partition, Store, StoreError, URLS};

fn seeded() -> (tempfile::TempDir, Store, QueryEngine) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("data")).unwrap();
    let pipeline = IngestPipeline::new(store.clone());
    pipeline
        .ingest(&["http://a.com/x".to_string()], "alice")
        .unwrap();
    pipeline.ingest(&["http://b.com/y".to_string()], "bob").unwrap();
    let engine = QueryEngine::new(store.clone());
    (dir, store, engine)
}

fn urls_of(links: &[linkeater::storage::Link]) -> Vec<&str> {
    links.iter().map(|l| l.url.as_str()).collect()
}

#[test]
fn test_parse_discriminates_patterns_from_authors() {
    assert_eq!(Query::parse("/a\\.com/"), Query::Pattern("a\\.com"));
    assert_eq!(Query::parse("  /x/  "), Query::Pattern("x"));
    assert_eq!(Query::parse("//"), Query::Pattern(""));
    assert_eq!(Query::parse("alice"), Query::Author("alice"));
    assert_eq!(Query::parse(" alice "), Query::Author("alice"));
    assert_eq!(Query::parse("/"), Query::Author("/"));
    assert_eq!(Query::parse("/half"), Query::Author("/half"));
}

#[test]
fn test_pattern_search_matches_urls() {
    let (_dir, _store, engine) = seeded();

    let links = engine.query("/a\\.com/").unwrap();
    assert_eq!(urls_of(&links), vec!["http://a.com/x"]);
    assert_eq!(links[0].author, "alice");
}

#[test]
fn test_pattern_search_spans_all_authors() {
    let (_dir, _store, engine) = seeded();

    let links = engine.query("/^http:/").unwrap();
    assert_eq!(urls_of(&links), vec!["http://a.com/x", "http://b.com/y"]);
}

#[test]
fn test_pattern_without_matches_is_empty_not_error() {
    let (_dir, _store, engine) = seeded();
    assert!(engine.query("/nowhere\\.org/").unwrap().is_empty());
}

#[test]
fn test_invalid_pattern_is_bad_pattern() {
    let (_dir, _store, engine) = seeded();

    assert!(matches!(
        engine.query("/[unbalanced/"),
        Err(QueryError::BadPattern(_))
    ));
    assert!(matches!(
        engine.search_pattern("(open"),
        Err(QueryError::BadPattern(_))
    ));
}

#[test]
fn test_attribution_search() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let pipeline = IngestPipeline::new(store.clone());
    pipeline.ingest(&["http://x.com".to_string()], "alice").unwrap();
    pipeline.ingest(&["http://y.com".to_string()], "bob").unwrap();

    let links = QueryEngine::new(store).query("alice").unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, "http://x.com");
    assert_eq!(links[0].author, "alice");
}

#[test]
fn test_unknown_author_is_empty_not_error() {
    let (_dir, _store, engine) = seeded();
    assert!(engine.query("carol").unwrap().is_empty());
    assert!(engine.links_by_author("").unwrap().is_empty());
}

#[test]
fn test_author_lookup_is_exact() {
    let (_dir, _store, engine) = seeded();
    assert!(engine.query("Alice").unwrap().is_empty());
    assert!(engine.query("ali").unwrap().is_empty());
}

#[test]
fn test_undecodable_entries_are_skipped() {
    let (_dir, store, engine) = seeded();
    store
        .write(|scope| -> Result<(), StoreError> {
            scope
                .partition_or_create(URLS)?
                .put("http://a.com/broken", b"garbage")?;
            scope
                .partition_or_create(&author_partition("alice"))?
                .put("http://a.com/broken", b"garbage")
        })
        .unwrap();

    let by_pattern = engine.query("/a\\.com/").unwrap();
    assert_eq!(urls_of(&by_pattern), vec!["http://a.com/x"]);

    let by_author = engine.query("alice").unwrap();
    assert_eq!(urls_of(&by_author), vec!["http://a.com/x"]);
}

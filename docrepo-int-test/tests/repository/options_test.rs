use docrepo::config::{CollectionUri, RepositoryOptions};
use docrepo::errors::ErrorKind;
use docrepo::query::FeedOptions;

#[test]
fn test_collection_uri_parsing() {
    let uri = CollectionUri::parse("dbs/fakeDb/colls/fakeCol").unwrap();
    assert_eq!(uri.database_id(), "fakeDb");
    assert_eq!(uri.collection_id(), "fakeCol");
    assert_eq!(uri.link(), "dbs/fakeDb/colls/fakeCol");
    assert_eq!(CollectionUri::parse("/dbs/fakeDb/colls/fakeCol/").unwrap(), uri);
    assert_eq!("dbs/fakeDb/colls/fakeCol".parse::<CollectionUri>().unwrap(), uri);

    for link in [
        "",
        "dbs/fakeDb",
        "dbs//colls/fakeCol",
        "databases/fakeDb/colls/fakeCol",
        "dbs/fakeDb/colls/fakeCol/docs/d1",
        "dbs/fake?Db/colls/fakeCol",
    ] {
        let err = CollectionUri::parse(link).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConfigurationError, "{}", link);
    }
}

#[test]
fn test_repository_options_defaults() {
    let options = RepositoryOptions::builder()
        .collection_link("dbs/fakeDb/colls/fakeCol")
        .build()
        .unwrap();
    assert_eq!(options.collection_uri().collection_id(), "fakeCol");
    assert_eq!(options.max_item_count(), None);
    assert!(options.populate_query_metrics());
    assert!(!options.enforce_partition_scope());
}

#[test]
fn test_repository_options_validation() {
    let err = RepositoryOptions::builder().build().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ConfigurationError);

    let err = RepositoryOptions::builder()
        .collection_link("dbs/fakeDb/colls/fakeCol")
        .max_item_count(0)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ConfigurationError);

    // the first invalid setting wins
    let err = RepositoryOptions::builder()
        .collection_link("fakeCol")
        .max_item_count(0)
        .build()
        .unwrap_err();
    assert!(err.message().contains("fakeCol"));
}

#[test]
fn test_feed_options_for_partition() {
    let scoped = FeedOptions::for_partition(Some("o00042"));
    assert_eq!(scoped.partition_key.as_deref(), Some("o00042"));
    assert!(!scoped.enable_cross_partition_query);
    assert!(scoped.validate().is_ok());

    for key in [None, Some("")] {
        let cross = FeedOptions::for_partition(key);
        assert_eq!(cross.partition_key, None);
        assert!(cross.enable_cross_partition_query);
        assert!(cross.validate().is_ok());
    }

    let both = FeedOptions {
        partition_key: Some("o1".to_string()),
        enable_cross_partition_query: true,
        ..FeedOptions::default()
    };
    assert_eq!(both.validate().unwrap_err().kind(), &ErrorKind::InvalidOperation);
    assert!(FeedOptions::default().validate().is_err());
}

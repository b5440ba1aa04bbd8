use docrepo::config::CollectionUri;
use docrepo::doc;
use docrepo::errors::{ErrorKind, RepoError, RepoResult};
use docrepo::filter::{all, field};
use docrepo::metrics::QueryOutcome;
use docrepo::repository::DocumentRepository;
use docrepo_int_test::model::InternalDroneUtilization;
use docrepo_int_test::test_util::{
    create_test_context, ids, other_utilization, owner_utilization, page, ScriptedDocumentClient,
    SpyDocumentClient, DATABASE_ID, OWNER,
};
use std::sync::Arc;

#[tokio::test]
async fn test_failure_mid_query() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let client = ScriptedDocumentClient::new(vec![
        page(&owner_utilization(), 3.5),
        Err(RepoError::new(
            "Connection reset while reading page 2",
            ErrorKind::QueryExecutionError,
        )),
    ]);
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(client), |options| options)?;

    let err = repo.get_items(all(), Some(OWNER)).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::QueryExecutionError);
    assert!(err.message().contains("page 2"));

    let records = ctx.recorder().records();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].outcome,
        QueryOutcome::Failed(ErrorKind::QueryExecutionError)
    );
    assert_eq!(records[0].page_count, 1);
    assert_eq!(records[0].request_charge, 3.5);
    Ok(())
}

#[tokio::test]
async fn test_throttling_is_not_retried() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let spy = SpyDocumentClient::new(Arc::new(ScriptedDocumentClient::new(vec![Err(
        RepoError::new("Request rate is large", ErrorKind::Throttled),
    )])));
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(spy.clone()), |options| options)?;

    let err = repo.get_items(all(), Some(OWNER)).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Throttled);
    assert_eq!(spy.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_collection() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let missing = CollectionUri::new(DATABASE_ID, "missing")?;
    let repo: DocumentRepository<InternalDroneUtilization> = ctx
        .repository_with(Arc::new(ctx.client().clone()), |options| options.collection_uri(missing))?;

    let err = repo.get_all(None).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::QueryExecutionError);
    assert_eq!(ctx.client().query_count(), 1);
    assert!(!ctx.recorder().records()[0].is_success());
    Ok(())
}

#[tokio::test]
async fn test_unreadable_document() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;
    ctx.client().upsert_document(
        ctx.uri(),
        doc! {
            id: "d0009",
            partition_key: OWNER,
            owner_id: OWNER,
            year: 2019,
            month: "June",
            traveled_miles: 1.0,
            assigned_hours: 1.0,
            document_type: "InternalDroneUtilization",
        },
    )?;
    let repo: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;

    let err = repo.get_items(all(), Some(OWNER)).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    assert!(err.message().contains("d0009"));
    assert!(err
        .cause()
        .is_some_and(|cause| cause.message().contains("month")));

    // the other owners are unaffected
    let other = repo.get_items(field("month").eq(6), Some("o00043")).await?;
    assert_eq!(ids(&other), vec!["d0003"]);
    Ok(())
}

#[tokio::test]
async fn test_invalid_filter() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    let repo: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;

    let err = repo
        .get_items(field("owner_id").regex("o(0"), Some(OWNER))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::FilterError);
    assert_eq!(ctx.client().query_count(), 0);
    assert_eq!(
        ctx.recorder().last().map(|record| record.outcome),
        Some(QueryOutcome::Failed(ErrorKind::FilterError))
    );
    Ok(())
}

#[tokio::test]
async fn test_misrouted_documents_are_counted() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let mut mixed = owner_utilization();
    mixed.extend(other_utilization());
    let client = Arc::new(ScriptedDocumentClient::new(vec![page(&mixed, 4.0)]));

    let trusting: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(client.clone(), |options| options)?;
    let items = trusting.get_items(all(), Some(OWNER)).await?;
    assert_eq!(items.len(), 5);
    assert_eq!(ctx.recorder().last().map(|r| r.partition_mismatches), Some(3));

    let enforcing: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(client, |options| options.enforce_partition_scope(true))?;
    let items = enforcing.get_items(all(), Some(OWNER)).await?;
    assert_eq!(ids(&items), vec!["d0001", "d0002"]);
    let record = ctx.recorder().last().expect("two records");
    assert_eq!(record.partition_mismatches, 3);
    assert_eq!(record.item_count, 5);
    assert!(record.is_success());
    Ok(())
}

use docrepo::errors::{ErrorKind, RepoError, RepoResult};
use docrepo::filter::{all, field};
use docrepo::metrics::{CompositeMetricsSink, QueryOutcome, RepositoryMetricsTracker};
use docrepo::repository::DocumentRepository;
use docrepo_int_test::model::InternalDroneUtilization;
use docrepo_int_test::test_util::{
    create_test_context, other_utilization, owner_utilization, FailingMetricsSink,
    RecordingMetricsSink, ScriptedDocumentClient, COLLECTION_ID, OWNER,
};
use std::sync::Arc;

#[tokio::test]
async fn test_one_record_per_successful_call() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;
    let repo: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;

    repo.get_items(all(), Some(OWNER)).await?;

    let started = ctx.recorder().started();
    let records = ctx.recorder().records();
    assert_eq!(started.len(), 1);
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.scope(), started[0]);
    assert_eq!(record.collection, COLLECTION_ID);
    assert_eq!(record.partition_key.as_deref(), Some(OWNER));
    assert_eq!(record.outcome, QueryOutcome::Succeeded);
    assert_eq!(record.item_count, 2);
    assert_eq!(record.page_count, 1);
    assert!(record.request_charge > 0.0);
    Ok(())
}

#[tokio::test]
async fn test_one_record_per_failed_call() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let client = ScriptedDocumentClient::new(vec![Err(RepoError::new(
        "Request rate is large",
        ErrorKind::Throttled,
    ))]);
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(client), |options| options)?;

    assert!(repo.get_items(all(), None).await.is_err());

    assert_eq!(ctx.recorder().started().len(), 1);
    let records = ctx.recorder().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, QueryOutcome::Failed(ErrorKind::Throttled));
    assert_eq!(records[0].partition_key, None);
    Ok(())
}

#[tokio::test]
async fn test_statistics_per_partition() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;
    let repo: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;

    repo.get_items(all(), Some(OWNER)).await?;
    repo.get_items(field("month").eq(6), Some(OWNER)).await?;
    repo.get_items(all(), Some("o00043")).await?;
    repo.get_items(all(), None).await?;

    let owner = ctx
        .statistics()
        .statistics(COLLECTION_ID, Some(OWNER))
        .expect("owner was queried");
    assert_eq!(owner.queries, 2);
    assert_eq!(owner.succeeded, 2);
    assert_eq!(owner.items, 4);

    let cross = ctx
        .statistics()
        .statistics(COLLECTION_ID, None)
        .expect("cross partition was queried");
    assert_eq!(cross.queries, 1);
    assert_eq!(cross.items, 5);

    let total = ctx.statistics().collection_statistics(COLLECTION_ID);
    assert_eq!(total.queries, 4);
    assert_eq!(total.failed, 0);
    assert_eq!(ctx.statistics().dimensions().len(), 3);
    assert!(total.average_request_charge() > 0.0);
    Ok(())
}

#[tokio::test]
async fn test_sink_failure_does_not_mask_results() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;

    let options = ctx.options().build()?;
    let repo: DocumentRepository<InternalDroneUtilization> = DocumentRepository::new(
        Arc::new(ctx.client().clone()),
        options,
        RepositoryMetricsTracker::new(FailingMetricsSink),
    );

    let items = repo.get_items(all(), Some(OWNER)).await?;
    assert_eq!(items.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_sink_failure_does_not_mask_query_errors() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let options = ctx.options().build()?;
    let repo: DocumentRepository<InternalDroneUtilization> = DocumentRepository::new(
        Arc::new(ScriptedDocumentClient::new(vec![Err(RepoError::new(
            "partition is unavailable",
            ErrorKind::QueryExecutionError,
        ))])),
        options,
        RepositoryMetricsTracker::new(FailingMetricsSink),
    );

    let err = repo.get_items(all(), None).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::QueryExecutionError);
    Ok(())
}

#[tokio::test]
async fn test_failing_sink_does_not_starve_others() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;

    let recorder = RecordingMetricsSink::default();
    let metrics = RepositoryMetricsTracker::new(
        CompositeMetricsSink::new()
            .with_sink(FailingMetricsSink)
            .with_sink(recorder.clone()),
    );
    let repo: DocumentRepository<InternalDroneUtilization> =
        DocumentRepository::new(Arc::new(ctx.client().clone()), ctx.options().build()?, metrics);

    repo.get_items(all(), None).await?;
    assert_eq!(recorder.records().len(), 1);
    assert!(recorder.records()[0].is_success());
    Ok(())
}

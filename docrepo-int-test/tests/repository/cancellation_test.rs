use docrepo::errors::RepoResult;
use docrepo::filter::all;
use docrepo::metrics::QueryOutcome;
use docrepo::repository::DocumentRepository;
use docrepo_int_test::model::InternalDroneUtilization;
use docrepo_int_test::test_util::{
    create_test_context, owner_utilization, page, StallingDocumentClient, OWNER,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_timeout_records_cancellation() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let client = StallingDocumentClient::new(None);
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(client.clone()), |options| options)?;

    let result = tokio::time::timeout(Duration::from_millis(50), repo.get_items(all(), Some(OWNER))).await;
    assert!(result.is_err());

    assert!(client.dropped());
    let records = ctx.recorder().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, QueryOutcome::Cancelled);
    assert_eq!(records[0].partition_key.as_deref(), Some(OWNER));
    Ok(())
}

#[tokio::test]
async fn test_cancellation_keeps_partial_cost() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let client = StallingDocumentClient::new(Some(page(&owner_utilization(), 2.5)?));
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(client.clone()), |options| options)?;

    let result = tokio::time::timeout(Duration::from_millis(50), repo.get_all(None)).await;
    assert!(result.is_err());

    let record = ctx.recorder().last().expect("cancelled query is recorded");
    assert_eq!(record.outcome, QueryOutcome::Cancelled);
    assert_eq!(record.page_count, 1);
    assert_eq!(record.item_count, 2);
    assert_eq!(record.request_charge, 2.5);

    let stats = ctx.statistics().collection_statistics(record.collection.as_str());
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.succeeded, 0);
    Ok(())
}

#[tokio::test]
async fn test_aborted_task_records_cancellation() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let client = StallingDocumentClient::new(None);
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(client.clone()), |options| options)?;

    let handle = tokio::spawn(async move { repo.get_all(None).await });
    for _ in 0..100 {
        if !ctx.recorder().started().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(ctx.recorder().started().len(), 1);

    handle.abort();
    let joined = handle.await;
    assert!(joined.is_err_and(|err| err.is_cancelled()));

    assert!(client.dropped());
    assert_eq!(
        ctx.recorder().last().map(|record| record.outcome),
        Some(QueryOutcome::Cancelled)
    );
    Ok(())
}

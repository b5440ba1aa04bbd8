use docrepo::errors::RepoResult;
use docrepo::filter::{all, field};
use docrepo::repository::{DocumentEntity, DocumentRepository};
use docrepo_int_test::model::{Delivery, DeliveryStatus, InternalDroneUtilization};
use docrepo_int_test::test_util::{
    create_test_context, ids, other_utilization, owner_utilization, SpyDocumentClient, OWNER,
};
use rand::Rng;
use std::sync::Arc;

#[tokio::test]
async fn test_scoped_query_for_owner() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;

    let spy = SpyDocumentClient::new(Arc::new(ctx.client().clone()));
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(spy.clone()), |options| options)?;

    let items = repo.get_items(all(), Some(OWNER)).await?;
    assert_eq!(ids(&items), vec!["d0001", "d0002"]);
    assert!(items.iter().all(|item| item.owner_id == OWNER));

    let calls = spy.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].collection, *ctx.uri());
    assert_eq!(calls[0].options.partition_key.as_deref(), Some(OWNER));
    assert!(!calls[0].options.enable_cross_partition_query);
    assert!(calls[0].options.validate().is_ok());
    Ok(())
}

#[tokio::test]
async fn test_cross_partition_query() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;

    let spy = SpyDocumentClient::new(Arc::new(ctx.client().clone()));
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(spy.clone()), |options| options)?;

    let items = repo.get_items(all(), None).await?;
    assert_eq!(ids(&items), vec!["d0001", "d0002", "d0003", "d0004", "d0005"]);

    let options = spy.last_options().expect("one query issued");
    assert_eq!(options.partition_key, None);
    assert!(options.enable_cross_partition_query);
    assert_eq!(spy.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_empty_partition_key_is_cross_partition() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;

    let spy = SpyDocumentClient::new(Arc::new(ctx.client().clone()));
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(spy.clone()), |options| options)?;

    let items = repo.get_items(all(), Some("")).await?;
    assert_eq!(items.len(), 5);

    let options = spy.last_options().expect("one query issued");
    assert_eq!(options.partition_key, None);
    assert!(options.enable_cross_partition_query);

    let record = ctx.recorder().last().expect("one record");
    assert!(record.is_cross_partition());
    Ok(())
}

#[tokio::test]
async fn test_filter_is_pushed_to_the_store() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;

    let spy = SpyDocumentClient::new(Arc::new(ctx.client().clone()));
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(spy.clone()), |options| options)?;

    let june = field("month").eq(6).and(field("year").eq(2019));
    let items = repo.get_items(june, None).await?;
    assert_eq!(ids(&items), vec!["d0001", "d0002", "d0003", "d0005"]);

    let busy = repo.get_items(field("traveled_miles").gt(10.0), Some(OWNER)).await?;
    assert_eq!(ids(&busy), vec!["d0002"]);

    let text = &spy.calls()[0].query_text;
    assert!(text.starts_with("SELECT * FROM root WHERE "));
    assert!(text.contains(r#"root["month"]"#));
    assert!(text.contains(r#"root["document_type"]"#));
    Ok(())
}

#[tokio::test]
async fn test_only_own_document_type_is_returned() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&[
        Delivery::new("x0001", OWNER, "drone-1", DeliveryStatus::InFlight),
        Delivery::new("x0002", OWNER, "drone-2", DeliveryStatus::Completed),
        Delivery::new("x0003", "o00043", "drone-1", DeliveryStatus::Created),
    ])?;

    let utilization: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;
    let items = utilization.get_all(Some(OWNER)).await?;
    assert_eq!(ids(&items), vec!["d0001", "d0002"]);
    assert!(items
        .iter()
        .all(|item| item.document_type == InternalDroneUtilization::DOCUMENT_TYPE));

    let deliveries: DocumentRepository<Delivery> = ctx.repository()?;
    let in_flight = deliveries
        .get_items(field("status").eq("in_flight"), None)
        .await?;
    assert_eq!(ids(&in_flight), vec!["x0001"]);
    assert_eq!(in_flight[0].status, DeliveryStatus::InFlight);
    assert_eq!(deliveries.count(all(), None).await?, 3);
    Ok(())
}

#[tokio::test]
async fn test_get_item_and_count() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;
    let repo: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;

    let item = repo.get_item("d0002", Some(OWNER)).await?.expect("d0002 exists");
    assert_eq!(item.traveled_miles, 32.0);
    assert_eq!(item.assigned_hours, 2.0);

    assert!(repo.get_item("d0003", Some(OWNER)).await?.is_none());
    assert!(repo.get_item("d0003", None).await?.is_some());
    assert_eq!(repo.count(field("month").eq(7), None).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_repeated_calls_return_the_same_set() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;
    let repo: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;

    for partition_key in [Some(OWNER), None] {
        let first = repo.get_items(field("month").eq(6), partition_key).await?;
        let second = repo.get_items(field("month").eq(6), partition_key).await?;
        assert_eq!(ids(&first), ids(&second));
    }
    assert_eq!(ctx.client().query_count(), 4);
    Ok(())
}

#[tokio::test]
async fn test_paged_results_are_drained() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;
    let repo: DocumentRepository<InternalDroneUtilization> =
        ctx.repository_with(Arc::new(ctx.client().clone()), |options| options.max_item_count(2))?;

    let items = repo.get_all(None).await?;
    assert_eq!(items.len(), 5);

    let record = ctx.recorder().last().expect("one record");
    assert_eq!(record.page_count, 3);
    assert_eq!(record.item_count, 5);
    // first page: 2.0 base + 0.05 * 5 scanned + 1.0 * 3 partitions, then 1.0 per page
    assert_eq!(record.request_charge, 7.25);
    Ok(())
}

#[tokio::test]
async fn test_scoped_results_stay_in_partition() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let owners: Vec<String> = (0..6).map(|i| format!("o{:05}", i)).collect();
    let mut rng = rand::rng();

    let mut expected = vec![0usize; owners.len()];
    let mut seeded = Vec::new();
    for i in 0..120 {
        let owner = rng.random_range(0..owners.len());
        expected[owner] += 1;
        seeded.push(InternalDroneUtilization::new(
            &format!("d{:04}", i),
            &owners[owner],
            2019,
            rng.random_range(1..=12),
            rng.random_range(0.0..100.0),
            rng.random_range(0.0..8.0),
        ));
    }
    ctx.seed(&seeded)?;

    let repo: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;
    for (owner, count) in owners.iter().zip(expected) {
        let items = repo.get_items(all(), Some(owner)).await?;
        assert_eq!(items.len(), count);
        assert!(items.iter().all(|item| item.partition_key() == owner));
    }

    assert_eq!(repo.get_all(None).await?.len(), 120);
    let records = ctx.recorder().records();
    assert_eq!(records.len(), owners.len() + 1);
    assert!(records.iter().all(|record| record.partition_mismatches == 0));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() -> RepoResult<()> {
    let ctx = create_test_context()?;
    ctx.seed(&owner_utilization())?;
    ctx.seed(&other_utilization())?;
    let repo: DocumentRepository<InternalDroneUtilization> = ctx.repository()?;

    let mut handles = Vec::new();
    for partition_key in [Some(OWNER), Some("o00043"), None, Some(OWNER)] {
        let repo = repo.clone();
        let partition_key = partition_key.map(str::to_string);
        handles.push(tokio::spawn(async move {
            repo.get_items(all(), partition_key.as_deref()).await
        }));
    }

    let mut sizes = Vec::new();
    for handle in handles {
        sizes.push(handle.await.expect("task completes")?.len());
    }
    assert_eq!(sizes, vec![2, 2, 5, 2]);

    let records = ctx.recorder().records();
    assert_eq!(records.len(), 4);
    let mut activities: Vec<_> = records.iter().map(|record| record.activity_id).collect();
    activities.sort();
    activities.dedup();
    assert_eq!(activities.len(), 4);
    Ok(())
}

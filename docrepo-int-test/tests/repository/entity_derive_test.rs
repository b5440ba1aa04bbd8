use docrepo::common::{Convertible, Value};
use docrepo::config::CollectionUri;
use docrepo::errors::{ErrorKind, RepoResult};
use docrepo::filter::field;
use docrepo::repository::{validate_entity, DocumentEntity, DocumentRepository};
use docrepo::store::memory::InMemoryDocumentClient;
use docrepo_int_test::model::{Delivery, DeliveryStatus, InternalDroneUtilization, Invoice};
use docrepo_int_test::test_util::{create_test_context, ids, DATABASE_ID};
use std::sync::Arc;

#[test]
fn test_default_descriptor() {
    assert_eq!(InternalDroneUtilization::DOCUMENT_TYPE, "InternalDroneUtilization");
    assert_eq!(InternalDroneUtilization::ID_FIELD, "id");
    assert_eq!(InternalDroneUtilization::PARTITION_KEY_FIELD, "partition_key");
    assert_eq!(InternalDroneUtilization::DOCUMENT_TYPE_FIELD, "document_type");
    assert_eq!(Delivery::DOCUMENT_TYPE, "DroneDelivery");
}

#[test]
fn test_custom_descriptor() {
    assert_eq!(Invoice::DOCUMENT_TYPE, "Invoice");
    assert_eq!(Invoice::ID_FIELD, "id");
    assert_eq!(Invoice::PARTITION_KEY_FIELD, "ownerId");
    assert_eq!(Invoice::DOCUMENT_TYPE_FIELD, "docType");

    let invoice = Invoice::new("i1", "o1", 12.5);
    assert_eq!(invoice.id(), "i1");
    assert_eq!(invoice.partition_key(), "o1");
    assert_eq!(invoice.document_type(), "Invoice");
    assert!(validate_entity(&invoice).is_ok());
}

#[test]
fn test_struct_conversion() -> RepoResult<()> {
    let mut invoice = Invoice::new("i1", "o1", 12.5);
    invoice.lines = vec!["rotor".to_string(), "battery".to_string()];
    invoice.cached_total = Some(99.0);

    let value = invoice.to_value()?;
    let document = value.as_document().expect("struct maps to a document");
    assert_eq!(document.get("id"), Value::from("i1"));
    assert_eq!(document.get("ownerId"), Value::from("o1"));
    assert_eq!(document.get("docType"), Value::from("Invoice"));
    assert_eq!(document.get("lines.1"), Value::from("battery"));
    assert!(!document.contains_key("cached_total"));
    assert!(!document.contains_key("owner"));

    let restored = Invoice::from_value(&value)?;
    assert_eq!(restored.lines, invoice.lines);
    assert_eq!(restored.cached_total, None);
    Ok(())
}

#[test]
fn test_optional_fields_tolerate_missing_data() -> RepoResult<()> {
    let mut delivery = Delivery::new("x1", "o1", "drone-7", DeliveryStatus::Completed);
    let value = delivery.to_value()?;
    assert_eq!(value.as_document().map(|d| d.get("note")), Some(Value::Null));

    delivery.note = Some("left at door".to_string());
    let restored = Delivery::from_value(&delivery.to_value()?)?;
    assert_eq!(restored, delivery);
    Ok(())
}

#[test]
fn test_enum_conversion() -> RepoResult<()> {
    assert_eq!(DeliveryStatus::InFlight.to_value()?, Value::from("in_flight"));
    assert_eq!(DeliveryStatus::Created.to_value()?, Value::from("Created"));
    assert_eq!(
        DeliveryStatus::from_value(&Value::from("Completed"))?,
        DeliveryStatus::Completed
    );

    let err = DeliveryStatus::from_value(&Value::from("Lost")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    let err = DeliveryStatus::from_value(&Value::from(3)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    Ok(())
}

#[test]
fn test_non_document_value_is_rejected() {
    let err = InternalDroneUtilization::from_value(&Value::from("d0001")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
}

#[tokio::test]
async fn test_repository_uses_stored_field_names() -> RepoResult<()> {
    let ctx = create_test_context()?;
    let client = InMemoryDocumentClient::new();
    let invoices = CollectionUri::new(DATABASE_ID, "invoices")?;
    client.create_collection(&invoices, "/ownerId")?;
    for (id, owner, amount) in [("i1", "o1", 50.0), ("i2", "o1", 150.0), ("i3", "o2", 250.0)] {
        client.upsert_entity(&invoices, &Invoice::new(id, owner, amount))?;
    }

    let repo: DocumentRepository<Invoice> = ctx.repository_with(Arc::new(client), |options| {
        options.collection_uri(invoices.clone())
    })?;

    let large = repo.get_items(field("amount").gt(100.0), Some("o1")).await?;
    assert_eq!(ids(&large), vec!["i2"]);

    let item = repo.get_item("i3", None).await?.expect("i3 exists");
    assert_eq!(item.owner, "o2");
    assert_eq!(repo.count(field("amount").gte(50.0), None).await?, 3);
    Ok(())
}

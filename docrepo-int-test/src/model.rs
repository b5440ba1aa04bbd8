use docrepo::repository::new_document_type;
use docrepo_derive::{Convertible, DocumentEntity};

/// Drone utilization of one owner for one month.
#[derive(Debug, Clone, PartialEq, Default, Convertible, DocumentEntity)]
pub struct InternalDroneUtilization {
    pub id: String,
    pub partition_key: String,
    pub owner_id: String,
    pub year: i32,
    pub month: u32,
    pub traveled_miles: f64,
    pub assigned_hours: f64,
    pub document_type: String,
}

impl InternalDroneUtilization {
    pub fn new(id: &str, owner_id: &str, year: i32, month: u32, traveled_miles: f64, assigned_hours: f64) -> Self {
        InternalDroneUtilization {
            id: id.to_string(),
            partition_key: owner_id.to_string(),
            owner_id: owner_id.to_string(),
            year,
            month,
            traveled_miles,
            assigned_hours,
            document_type: new_document_type::<InternalDroneUtilization>(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Convertible)]
pub enum DeliveryStatus {
    #[default]
    Created,
    #[converter(rename = "in_flight")]
    InFlight,
    Completed,
}

/// A delivery stored in the same collection as the utilization documents.
#[derive(Debug, Clone, PartialEq, Default, Convertible, DocumentEntity)]
#[document(type_name = "DroneDelivery")]
pub struct Delivery {
    pub id: String,
    pub partition_key: String,
    pub drone_id: String,
    pub status: DeliveryStatus,
    pub note: Option<String>,
    pub document_type: String,
}

impl Delivery {
    pub fn new(id: &str, owner_id: &str, drone_id: &str, status: DeliveryStatus) -> Self {
        Delivery {
            id: id.to_string(),
            partition_key: owner_id.to_string(),
            drone_id: drone_id.to_string(),
            status,
            note: None,
            document_type: new_document_type::<Delivery>(),
        }
    }
}

/// An invoice partitioned on its owner, with store-style field names.
#[derive(Debug, Clone, PartialEq, Default, Convertible, DocumentEntity)]
#[document(type_name = "Invoice", id = "invoice_id", partition_key = "owner", document_type = "kind")]
#[converter(ignored = "cached_total")]
pub struct Invoice {
    #[converter(rename = "id")]
    pub invoice_id: String,
    #[converter(rename = "ownerId")]
    pub owner: String,
    pub amount: f64,
    pub lines: Vec<String>,
    #[converter(rename = "docType")]
    pub kind: String,
    pub cached_total: Option<f64>,
}

impl Invoice {
    pub fn new(invoice_id: &str, owner: &str, amount: f64) -> Self {
        Invoice {
            invoice_id: invoice_id.to_string(),
            owner: owner.to_string(),
            amount,
            lines: vec![],
            kind: new_document_type::<Invoice>(),
            cached_total: None,
        }
    }
}

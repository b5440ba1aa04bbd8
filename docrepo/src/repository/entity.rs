use crate::common::{Convertible, DOC_ID};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::filter::{field, Filter};

/// Default stored name of the partition key field.
pub const PARTITION_KEY: &str = "partition_key";
/// Default stored name of the document type field.
pub const DOCUMENT_TYPE: &str = "document_type";

/// Contract every document stored through a repository satisfies.
///
/// # Purpose
/// Gives the repository the identity, partition key and type tag of an
/// entity without knowing its concrete type. The type tag lets several
/// entity kinds share one collection; the repository only returns documents
/// whose tag equals [DocumentEntity::DOCUMENT_TYPE].
///
/// # Characteristics
/// - The descriptor is static: the type tag and stored field names are
///   associated constants, resolved at compile time
/// - `partition_key()` must stay the same for the lifetime of a document
/// - Usually implemented by `#[derive(DocumentEntity)]`
///
/// # Usage
/// ```ignore
/// #[derive(Convertible, DocumentEntity, Default)]
/// pub struct InternalDroneUtilization {
///     id: String,
///     partition_key: String,
///     owner_id: String,
///     document_type: String,
/// }
///
/// #[derive(Convertible, DocumentEntity, Default)]
/// #[document(type_name = "Invoice", partition_key = "owner")]
/// pub struct InvoiceDocument {
///     id: String,
///     owner: String,
///     document_type: String,
/// }
/// ```
pub trait DocumentEntity: Convertible<Output = Self> + Send + Sync + Sized + 'static {
    /// Type tag stored in every document of this kind.
    const DOCUMENT_TYPE: &'static str;
    /// Stored name of the identity field.
    const ID_FIELD: &'static str = DOC_ID;
    /// Stored name of the partition key field.
    const PARTITION_KEY_FIELD: &'static str = PARTITION_KEY;
    /// Stored name of the type tag field.
    const DOCUMENT_TYPE_FIELD: &'static str = DOCUMENT_TYPE;

    fn id(&self) -> &str;

    fn partition_key(&self) -> &str;

    fn document_type(&self) -> &str;
}

/// Returns the type tag new entities of `T` should carry.
pub fn new_document_type<T: DocumentEntity>() -> String {
    T::DOCUMENT_TYPE.to_string()
}

/// Filter selecting only documents tagged with `T`'s type.
pub fn document_type_filter<T: DocumentEntity>() -> Filter {
    field(T::DOCUMENT_TYPE_FIELD).eq(T::DOCUMENT_TYPE)
}

/// Checks that an entity carries a non-empty id and partition key and the
/// type tag of its own kind.
pub fn validate_entity<T: DocumentEntity>(entity: &T) -> RepoResult<()> {
    if entity.id().is_empty() {
        log::error!("{} entity has an empty id", T::DOCUMENT_TYPE);
        return Err(RepoError::new(
            &format!("{} entity id cannot be empty", T::DOCUMENT_TYPE),
            ErrorKind::InvalidOperation,
        ));
    }

    if entity.partition_key().is_empty() {
        log::error!("{} entity {} has an empty partition key", T::DOCUMENT_TYPE, entity.id());
        return Err(RepoError::new(
            &format!("{} entity partition key cannot be empty", T::DOCUMENT_TYPE),
            ErrorKind::InvalidOperation,
        ));
    }

    if entity.document_type() != T::DOCUMENT_TYPE {
        log::error!(
            "Entity {} is tagged {:?} but its type is {}",
            entity.id(),
            entity.document_type(),
            T::DOCUMENT_TYPE
        );
        return Err(RepoError::new(
            &format!(
                "Document type {:?} does not match {}",
                entity.document_type(),
                T::DOCUMENT_TYPE
            ),
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}

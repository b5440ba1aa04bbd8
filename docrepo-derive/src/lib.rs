#![recursion_limit = "128"]
//! # docrepo Derive Macros
//!
//! Procedural macros deriving the docrepo entity traits.
//!
//! ## Macros
//!
//! ### `Convertible`
//!
//! Derives `docrepo::common::Convertible` for structs with named fields and
//! for enums with unit variants.
//!
//! - **Struct attribute**: `#[converter(ignored = "a, b")]` skips fields; they
//!   are rebuilt with `Default::default()`
//! - **Field / variant attribute**: `#[converter(rename = "...")]` changes the
//!   stored name
//!
//! ### `DocumentEntity`
//!
//! Derives `docrepo::repository::DocumentEntity`. Works together with
//! `Convertible`.
//!
//! - **Struct attribute**: `#[document(type_name = "...", id = "...",
//!   partition_key = "...", document_type = "...")]`, all optional. The type
//!   tag defaults to the struct name; the three fields default to `id`,
//!   `partition_key` and `document_type` and must be `String`s
//!
//! # Examples
//!
//! ```rust,ignore
//! use docrepo_derive::{Convertible, DocumentEntity};
//!
//! #[derive(Convertible, DocumentEntity, Default)]
//! #[document(partition_key = "owner_id")]
//! pub struct InternalDroneUtilization {
//!     pub id: String,
//!     #[converter(rename = "ownerId")]
//!     pub owner_id: String,
//!     pub traveled_miles: f64,
//!     pub document_type: String,
//! }
//! ```

extern crate proc_macro;
mod attributes;
mod convertible;
mod document_entity;

use crate::convertible::{generate_convertible_for_enum, generate_convertible_for_struct};
use crate::document_entity::generate_entity_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives the `Convertible` trait.
///
/// Structs map to documents keyed by field name (or its `rename`). Enums
/// with unit variants map to the variant name as a string.
///
/// # Errors
///
/// Returns a compile error for unions, tuple or unit structs, and enum
/// variants that carry data.
#[proc_macro_derive(Convertible, attributes(converter))]
pub fn derive_convert(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    let result = match ast.data {
        Data::Struct(ref data) => generate_convertible_for_struct(&ast, data),
        Data::Enum(ref data) => generate_convertible_for_enum(&ast, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast,
            "Cannot derive Convertible for unions",
        )),
    };

    match result {
        Ok(token_stream) => token_stream,
        Err(e) => {
            let error = syn::Error::new(
                e.span(),
                format!("Failed to derive Convertible for '{}': {}", ast.ident, e),
            );
            error.to_compile_error().into()
        }
    }
}

/// Derives the `DocumentEntity` trait.
///
/// # Errors
///
/// Returns a compile error if applied to an enum or union, if an attribute
/// names a field the struct does not have, or on an unknown attribute.
#[proc_macro_derive(DocumentEntity, attributes(document))]
pub fn derive_document_entity(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_entity_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => {
                let error = syn::Error::new(
                    e.span(),
                    format!(
                        "Failed to derive DocumentEntity for struct '{}': {}",
                        ast.ident, e
                    ),
                );
                error.to_compile_error().into()
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive DocumentEntity for enums or unions. Only structs are supported.",
            );
            error.to_compile_error().into()
        }
    }
}

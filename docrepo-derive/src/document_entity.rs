use crate::attributes::stored_name;
use proc_macro::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Error, Field, Fields, Ident, LitStr, Result};

const DEFAULT_ID: &str = "id";
const DEFAULT_PARTITION_KEY: &str = "partition_key";
const DEFAULT_DOCUMENT_TYPE: &str = "document_type";

pub(crate) fn generate_entity_for_struct(ast: &DeriveInput, data: &DataStruct) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut type_name = name.to_string();
    let mut id = DEFAULT_ID.to_string();
    let mut partition_key = DEFAULT_PARTITION_KEY.to_string();
    let mut document_type = DEFAULT_DOCUMENT_TYPE.to_string();

    for attr in &ast.attrs {
        if attr.path().is_ident("document") {
            attr.parse_nested_meta(|meta| {
                let s: LitStr = meta.value()?.parse()?;
                if s.value().is_empty() {
                    return Err(meta.error("document attribute values cannot be empty"));
                }

                if meta.path.is_ident("type_name") {
                    type_name = s.value();
                } else if meta.path.is_ident("id") {
                    id = s.value();
                } else if meta.path.is_ident("partition_key") {
                    partition_key = s.value();
                } else if meta.path.is_ident("document_type") {
                    document_type = s.value();
                } else {
                    return Err(meta.error(
                        "Unknown document attribute, expected `type_name`, `id`, `partition_key` or `document_type`",
                    ));
                }
                Ok(())
            })?;
        }
    }

    let fields: Vec<&Field> = match &data.fields {
        Fields::Named(fields) => fields.named.iter().collect(),
        _ => {
            return Err(Error::new_spanned(
                ast,
                "only structs with named fields are supported",
            ))
        }
    };

    let (id_ident, id_field) = find_field(ast, &fields, &id)?;
    let (partition_key_ident, partition_key_field) = find_field(ast, &fields, &partition_key)?;
    let (document_type_ident, document_type_field) = find_field(ast, &fields, &document_type)?;

    let gen = quote! {
        impl #impl_generics docrepo::repository::DocumentEntity for #name #ty_generics #where_clause {
            const DOCUMENT_TYPE: &'static str = #type_name;
            const ID_FIELD: &'static str = #id_field;
            const PARTITION_KEY_FIELD: &'static str = #partition_key_field;
            const DOCUMENT_TYPE_FIELD: &'static str = #document_type_field;

            fn id(&self) -> &str {
                &self.#id_ident
            }

            fn partition_key(&self) -> &str {
                &self.#partition_key_ident
            }

            fn document_type(&self) -> &str {
                &self.#document_type_ident
            }
        }
    };

    Ok(TokenStream::from(gen))
}

/// Finds the field named `field_name` and returns its identifier and stored
/// name.
fn find_field<'a>(ast: &DeriveInput, fields: &[&'a Field], field_name: &str) -> Result<(&'a Ident, String)> {
    for field in fields {
        if let Some(ident) = field.ident.as_ref() {
            if ident == field_name {
                return Ok((ident, stored_name(&field.attrs, field_name)?));
            }
        }
    }
    Err(Error::new_spanned(
        ast,
        format!("Field {} not found in struct", field_name),
    ))
}

use crate::attributes::{ignored_fields, stored_name};
use proc_macro::TokenStream;
use quote::quote;
use syn::{DataEnum, DataStruct, DeriveInput, Error, Fields, Result};

pub(crate) fn generate_convertible_for_struct(ast: &DeriveInput, data: &DataStruct) -> Result<TokenStream> {
    let ignored = ignored_fields(&ast.attrs)?;

    let fields = match &data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(Error::new_spanned(
                ast,
                "only structs with named fields are supported",
            ))
        }
    };

    let name = &ast.ident;
    let type_name = name.to_string();
    let mut puts = Vec::with_capacity(fields.len());
    let mut initializers = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;

        if ignored.contains(&ident.to_string()) {
            initializers.push(quote! { #ident: ::core::default::Default::default() });
            continue;
        }

        let stored = stored_name(&field.attrs, &ident.to_string())?;
        puts.push(quote! {
            doc.put(#stored, docrepo::common::Convertible::to_value(&self.#ident)?)?;
        });
        initializers.push(quote! {
            #ident: docrepo::common::from_value::<#ty>(&doc.get(#stored)).map_err(|err| {
                docrepo::errors::RepoError::new_with_cause(
                    &format!("Failed to read field '{}' of {}", #stored, #type_name),
                    docrepo::errors::ErrorKind::ObjectMappingError,
                    err,
                )
            })?
        });
    }

    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let gen = quote! {
        impl #impl_generics docrepo::common::Convertible for #name #ty_generics #where_clause {
            type Output = Self;

            fn to_value(&self) -> docrepo::errors::RepoResult<docrepo::common::Value> {
                let mut doc = docrepo::common::Document::new();
                #(#puts)*
                Ok(docrepo::common::Value::Document(doc))
            }

            fn from_value(value: &docrepo::common::Value) -> docrepo::errors::RepoResult<Self::Output> {
                match value {
                    docrepo::common::Value::Document(doc) => Ok(#name {
                        #(#initializers,)*
                    }),
                    other => Err(docrepo::errors::RepoError::new(
                        &format!("{} is not a document, cannot read {}", other.type_name(), #type_name),
                        docrepo::errors::ErrorKind::ObjectMappingError,
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

pub(crate) fn generate_convertible_for_enum(ast: &DeriveInput, data: &DataEnum) -> Result<TokenStream> {
    let name = &ast.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut to_value_arms = Vec::with_capacity(data.variants.len());
    let mut from_value_arms = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new_spanned(
                variant,
                "only unit variants are supported",
            ));
        }
        let ident = &variant.ident;
        let stored = stored_name(&variant.attrs, &ident.to_string())?;

        to_value_arms.push(quote! {
            #name::#ident => Ok(docrepo::common::Value::String(#stored.to_string()))
        });
        from_value_arms.push(quote! {
            #stored => Ok(#name::#ident)
        });
    }

    let gen = quote! {
        impl #impl_generics docrepo::common::Convertible for #name #ty_generics #where_clause {
            type Output = Self;

            fn to_value(&self) -> docrepo::errors::RepoResult<docrepo::common::Value> {
                match self {
                    #(#to_value_arms,)*
                }
            }

            fn from_value(value: &docrepo::common::Value) -> docrepo::errors::RepoResult<Self::Output> {
                match value {
                    docrepo::common::Value::String(variant) => match variant.as_str() {
                        #(#from_value_arms,)*
                        other => Err(docrepo::errors::RepoError::new(
                            &format!("'{}' is not a variant of {}", other, #type_name),
                            docrepo::errors::ErrorKind::ObjectMappingError,
                        )),
                    },
                    other => Err(docrepo::errors::RepoError::new(
                        &format!("{} is not a string, cannot read {}", other.type_name(), #type_name),
                        docrepo::errors::ErrorKind::ObjectMappingError,
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

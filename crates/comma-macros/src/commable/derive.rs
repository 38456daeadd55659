//! Implementation of the `#[derive(Commable)]` macro.
//!
//! This macro generates an implementation of the `Commable` trait and
//! accessor name constants for declaring columns.

use std::collections::HashSet;

use heck::ToShoutySnakeCase;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Result,
    Type,
};

use super::attrs::{parse_comma_attrs, FieldRole};

/// Main implementation of the Commable derive macro.
pub fn commable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Commable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Commable can only be derived for structs",
            ))
        }
    };

    let mut value_arms: Vec<TokenStream> = Vec::new();
    let mut nested_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut parent: Option<(&syn::Ident, &Type)> = None;
    let mut const_names: HashSet<String> = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_comma_attrs(&field.attrs)?;

        if attrs.skip {
            continue;
        }

        if attrs.role == FieldRole::Parent {
            if parent.is_some() {
                return Err(Error::new(
                    field.span(),
                    "Commable supports a single #[comma(parent)] field",
                ));
            }
            parent = Some((field_name, &field.ty));
            continue;
        }

        let span = if attrs.rename.is_some() {
            attrs.span
        } else {
            field.span()
        };
        let accessor = attrs
            .rename
            .unwrap_or_else(|| field_name.to_string().trim_start_matches("r#").to_string());

        let const_name = accessor_constant(&accessor, span)?;
        if !const_names.insert(const_name.to_string()) {
            return Err(Error::new(
                span,
                format!("accessor constant `{}` is generated twice", const_name),
            ));
        }
        field_constants.push(quote! {
            /// Accessor name constant for column declarations.
            pub const #const_name: &'static str = #accessor;
        });

        match attrs.role {
            FieldRole::Nested => {
                let expr = if option_inner(&field.ty).is_some() {
                    quote! {
                        match &self.#field_name {
                            ::std::option::Option::Some(record) => ::comma::Nested::Record(record),
                            ::std::option::Option::None => ::comma::Nested::Absent,
                        }
                    }
                } else {
                    quote! { ::comma::Nested::Record(&self.#field_name) }
                };
                nested_arms.push(quote! {
                    #accessor => ::std::option::Option::Some(#expr),
                });
            }
            _ => {
                value_arms.push(quote! {
                    #accessor => ::std::option::Option::Some(
                        ::comma::ToValue::to_value(&self.#field_name)
                    ),
                });
            }
        }
    }

    // Unknown names fall through to the parent record, if any.
    let (field_fallback, nested_fallback, ancestry) = match parent {
        Some((parent_name, parent_ty)) => (
            quote! { ::comma::Commable::field(&self.#parent_name, name) },
            quote! { ::comma::Commable::nested(&self.#parent_name, name) },
            quote! {
                fn ancestor(&self) -> ::std::option::Option<&dyn ::comma::Commable> {
                    ::std::option::Option::Some(&self.#parent_name)
                }

                fn lineage() -> ::std::vec::Vec<::comma::TypeKey> {
                    let mut keys = ::std::vec![::comma::TypeKey::of::<Self>()];
                    keys.extend(<#parent_ty as ::comma::Commable>::lineage());
                    keys
                }
            },
        ),
        None => (
            quote! { ::std::option::Option::None },
            quote! { ::std::option::Option::None },
            quote! {},
        ),
    };

    let nested_fn = if nested_arms.is_empty() && parent.is_none() {
        quote! {}
    } else {
        quote! {
            fn nested(&self, name: &str) -> ::std::option::Option<::comma::Nested<'_>> {
                match name {
                    #(#nested_arms)*
                    _ => #nested_fallback,
                }
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::comma::Commable for #struct_name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::std::option::Option<::comma::Value> {
                match name {
                    #(#value_arms)*
                    _ => #field_fallback,
                }
            }

            #nested_fn

            #ancestry
        }
    };

    Ok(expanded)
}

/// Returns `T` when `ty` is written as `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// The `SCREAMING_SNAKE_CASE` constant naming an accessor.
fn accessor_constant(accessor: &str, span: Span) -> Result<syn::Ident> {
    let name = accessor.to_shouty_snake_case();
    let mut ident = syn::parse_str::<syn::Ident>(&name).map_err(|_| {
        Error::new(
            span,
            format!("accessor '{}' does not make a valid constant name", accessor),
        )
    })?;
    ident.set_span(span);
    Ok(ident)
}

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Tag that `#[cloudlog(name = "...")]` registers under.
const DEFAULT_TAG_NAME: &str = "cloudlog";

/// Derive macro attaching a compile-time field descriptor to a struct.
///
/// Generates:
///
/// - `EventObject::struct_fields()`: every named field with its current
///   value, consumed by the struct encoder.
/// - `ToValue`: the struct as a nested map (default tag names), so derived
///   structs can be fields of other derived structs.
/// - `From<Self> for Event` (non-generic structs only).
///
/// The struct must implement `Debug`; field types must implement `ToValue`.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, StructEvent)]
/// pub struct Login {
///     #[cloudlog(name = "user_name", short = "u")]
///     pub user: String,
///
///     #[cloudlog(skip)]
///     pub password: String,
///
///     pub timestamp: chrono::DateTime<chrono::Utc>,
/// }
/// ```
///
/// `name = "..."` sets the key under the default `cloudlog` tag; any other
/// `tag = "..."` pair sets the key for a struct encoder configured with that
/// tag. Unannotated fields keep their declared name.
#[proc_macro_derive(StructEvent, attributes(cloudlog))]
pub fn derive_struct_event(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    name,
                    "StructEvent does not support unit structs",
                ));
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "StructEvent only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "StructEvent only supports structs",
            ));
        }
    };

    let mut descriptor_tokens = Vec::new();
    let mut value_tokens = Vec::new();

    for field in fields {
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_ident.unraw().to_string();

        // Parse #[cloudlog(...)] attributes.
        let mut skip = false;
        let mut names: Vec<(String, LitStr)> = Vec::new();

        for attr in &field.attrs {
            if !attr.path().is_ident("cloudlog") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    return Ok(());
                }
                let tag = if meta.path.is_ident("name") {
                    DEFAULT_TAG_NAME.to_string()
                } else if let Some(ident) = meta.path.get_ident() {
                    ident.unraw().to_string()
                } else {
                    return Err(meta.error("expected `skip`, `name = \"...\"` or `<tag> = \"...\"`"));
                };
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(syn::Error::new_spanned(&value, "field name must not be empty"));
                }
                if names.iter().any(|(t, _)| *t == tag) {
                    return Err(meta.error(format!("duplicate name for tag '{tag}'")));
                }
                names.push((tag, value));
                Ok(())
            })?;
        }

        if skip {
            continue;
        }

        let index = descriptor_tokens.len();
        let name_pairs = names.iter().map(|(tag, value)| quote! { (#tag, #value) });

        descriptor_tokens.push(quote! {
            ::cloudlog::FieldDescriptor {
                field: #field_name_str,
                names: &[#(#name_pairs),*],
            }
        });
        value_tokens.push(quote! {
            ::cloudlog::StructField::new(
                &FIELDS[#index],
                ::cloudlog::ToValue::to_value(&self.#field_ident),
            )
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let from_impl = if input.generics.params.is_empty() {
        quote! {
            impl ::std::convert::From<#name> for ::cloudlog::Event {
                fn from(value: #name) -> Self {
                    ::cloudlog::Event::object(value)
                }
            }
        }
    } else {
        quote! {}
    };

    let expanded = quote! {
        impl #impl_generics ::cloudlog::EventObject for #name #ty_generics #where_clause {
            fn struct_fields(
                &self,
            ) -> ::std::option::Option<::std::vec::Vec<::cloudlog::StructField>> {
                const FIELDS: &[::cloudlog::FieldDescriptor] = &[
                    #(#descriptor_tokens),*
                ];
                ::std::option::Option::Some(::std::vec![
                    #(#value_tokens),*
                ])
            }
        }

        impl #impl_generics ::cloudlog::ToValue for #name #ty_generics #where_clause {
            fn to_value(&self) -> ::cloudlog::Value {
                let fields = ::cloudlog::EventObject::struct_fields(self).unwrap_or_default();
                ::cloudlog::Value::Map(::cloudlog::encoder::fields_to_record(
                    fields,
                    ::cloudlog::encoder::DEFAULT_TAG_NAME,
                ))
            }
        }

        #from_impl
    };

    Ok(expanded)
}

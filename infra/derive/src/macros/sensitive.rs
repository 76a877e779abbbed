use super::util::{derived_trait_names, is_option_string, option_inner};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::Parser;
use syn::{Attribute, Field, Fields, Ident, ItemStruct, Lit, LitStr, Meta};

struct ModelFields<'a> {
    id: Option<&'a Ident>,
    tenant_id: &'a Ident,
    tenant: Option<&'a Ident>,
    text: Vec<&'a Ident>,
    optional: Vec<&'a Ident>,
}

/// Expands the `#[sensitive_model]` macro.
pub fn expand_sensitive_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match expand(args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let entity = parse_entity(args, &input.ident)?;
    let fields = classify_fields(input)?;

    let derive_attr = derive_attr(&input.attrs);
    let serde_attr = if input.attrs.iter().any(|attr| attr.path().is_ident("serde")) {
        quote! {}
    } else {
        quote! { #[serde(rename_all = "camelCase", default)] }
    };
    let record_impl = record_impl(input, &entity, &fields);

    Ok(quote! {
        #derive_attr
        #serde_attr
        #input

        #record_impl
    })
}

fn parse_entity(args: TokenStream, ident: &Ident) -> syn::Result<LitStr> {
    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    let mut entity: Option<LitStr> = None;

    for meta in parser.parse2(args)? {
        let Meta::NameValue(name_value) = meta else {
            return Err(syn::Error::new_spanned(meta, "Expected `entity = \"...\"`"));
        };
        if !name_value.path.is_ident("entity") {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "Only `entity = \"...\"` is supported",
            ));
        }
        if entity.is_some() {
            return Err(syn::Error::new_spanned(name_value, "Duplicate `entity` argument"));
        }
        let syn::Expr::Lit(syn::ExprLit { lit: Lit::Str(lit), .. }) = &name_value.value else {
            return Err(syn::Error::new_spanned(
                &name_value.value,
                "Expected string literal for `entity = \"...\"`",
            ));
        };
        if lit.value().trim().is_empty() {
            return Err(syn::Error::new_spanned(lit, "entity name must not be empty"));
        }
        entity = Some(lit.clone());
    }

    Ok(entity.unwrap_or_else(|| LitStr::new(&ident.unraw().to_string(), Span::call_site())))
}

fn classify_fields(input: &ItemStruct) -> syn::Result<ModelFields<'_>> {
    let Fields::Named(named) = &input.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "sensitive_model only supports structs with named fields",
        ));
    };

    let mut id = None;
    let mut tenant_id = None;
    let mut tenant = None;
    let mut text = Vec::new();
    let mut optional = Vec::new();

    for field in &named.named {
        let Some(ident) = field.ident.as_ref() else { continue };
        let is_optional = option_inner(&field.ty).is_some();
        if is_optional {
            optional.push(ident);
        }

        match ident.unraw().to_string().as_str() {
            "id" if is_option_string(&field.ty) => id = Some(ident),
            "id" => return Err(expected_option_string(field, "id")),
            "tenant_id" if is_option_string(&field.ty) => tenant_id = Some(ident),
            "tenant_id" => return Err(expected_option_string(field, "tenant_id")),
            "tenant" if is_optional => tenant = Some(ident),
            "tenant" => {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "`tenant` must be an Option of a relation type with `connect_id()`",
                ));
            },
            _ if is_option_string(&field.ty) => text.push(ident),
            _ => {},
        }
    }

    let Some(tenant_id) = tenant_id else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "sensitive_model requires a `tenant_id: Option<String>` field",
        ));
    };

    Ok(ModelFields { id, tenant_id, tenant, text, optional })
}

fn expected_option_string(field: &Field, name: &str) -> syn::Error {
    syn::Error::new_spanned(&field.ty, format!("`{name}` must be Option<String>"))
}

fn derive_attr(attrs: &[Attribute]) -> TokenStream {
    let derived = derived_trait_names(attrs);
    let wanted = [
        ("Debug", quote! { Debug }),
        ("Clone", quote! { Clone }),
        ("Default", quote! { Default }),
        ("PartialEq", quote! { PartialEq }),
        ("Serialize", quote! { ::serde::Serialize }),
        ("Deserialize", quote! { ::serde::Deserialize }),
    ];
    let tokens: Vec<_> =
        wanted.into_iter().filter(|(name, _)| !derived.contains(*name)).map(|(_, t)| t).collect();

    if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } }
}

fn record_impl(input: &ItemStruct, entity: &LitStr, fields: &ModelFields<'_>) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let ModelFields { id, tenant_id, tenant, text, optional } = fields;

    let text_names: Vec<LitStr> = text
        .iter()
        .map(|ident| LitStr::new(&ident.unraw().to_string(), ident.span()))
        .collect();

    let record_id = id.map_or_else(|| quote! { None }, |id| quote! { self.#id.as_deref() });
    let assign_id = id.map_or_else(
        || quote! { let _ = id; },
        |id| quote! { self.#id = Some(id); },
    );
    let tenant_connect = tenant.map_or_else(
        || quote! { None },
        |tenant| quote! { self.#tenant.as_ref().and_then(|link| link.connect_id()) },
    );

    let (text_field, text_field_mut) = if text.is_empty() {
        (quote! { let _ = name; None }, quote! { let _ = name; None })
    } else {
        (
            quote! {
                match name {
                    #(#text_names => self.#text.as_deref(),)*
                    _ => None,
                }
            },
            quote! {
                match name {
                    #(#text_names => Some(&mut self.#text),)*
                    _ => None,
                }
            },
        )
    };

    quote! {
        #[automatically_derived]
        impl #impl_generics ::chub_domain::SensitiveRecord for #name #ty_generics #where_clause {
            const ENTITY: &'static str = #entity;
            const TEXT_FIELDS: &'static [&'static str] = &[#(#text_names),*];

            #[inline]
            fn record_id(&self) -> Option<&str> {
                #record_id
            }

            #[inline]
            fn assign_id(&mut self, id: String) {
                #assign_id
            }

            #[inline]
            fn tenant_id(&self) -> Option<&str> {
                self.#tenant_id.as_deref().filter(|tenant| !tenant.is_empty())
            }

            #[inline]
            fn tenant_connect(&self) -> Option<&str> {
                #tenant_connect
            }

            fn text_field(&self, name: &str) -> Option<&str> {
                #text_field
            }

            fn text_field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
                #text_field_mut
            }

            fn merge(&mut self, patch: Self) {
                #(
                    if patch.#optional.is_some() {
                        self.#optional = patch.#optional;
                    }
                )*
            }
        }
    }
}

#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the `CareHub` crates: error enums wired for context
//! propagation and record models that the field interceptor can walk by name.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! chub-derive = { path = "../infra/derive" }
//! ```
//!
//! Examples below are `ignore`d; the macros expand to paths in `chub_domain` and
//! `thiserror`, which this crate cannot depend on.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a source field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` if an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]`, and a context field.
///
/// # Example
///
/// ```rust,ignore
/// use chub_derive::chub_error;
/// use std::borrow::Cow;
///
/// #[chub_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read_rows(path: &Path) -> Result<String, StoreError> {
///     std::fs::read_to_string(path).context("Reading legacy export")
/// }
/// ```
#[proc_macro_attribute]
pub fn chub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro that turns a struct into a record the field interceptor understands.
///
/// Implements `chub_domain::SensitiveRecord` for the struct:
///
/// * every `Option<String>` field (other than `id` and `tenant_id`) becomes addressable
///   by its Rust name through `text_field`/`text_field_mut`;
/// * `tenant_id: Option<String>` is required and exposed as the record's tenant;
/// * an optional `tenant` field is consulted for a relation-connect tenant through its
///   `connect_id()` method;
/// * an optional `id: Option<String>` field backs `record_id`/`assign_id`;
/// * `merge` copies every `Some` optional field of a patch onto the record.
///
/// Also injects `Debug`, `Clone`, `Default`, `PartialEq`, `Serialize` and `Deserialize`
/// when missing, plus `#[serde(rename_all = "camelCase", default)]` unless the struct
/// already carries a `#[serde(...)]` attribute.
///
/// # Arguments
///
/// * `entity = "..."` - registry name of the entity (defaults to the struct name).
///
/// # Errors
/// Emits a compile-time error for non-struct items, tuple structs, or a missing
/// `tenant_id: Option<String>` field.
///
/// # Example
///
/// ```rust,ignore
/// use chub_derive::sensitive_model;
///
/// #[sensitive_model(entity = "Resident")]
/// pub struct Resident {
///     pub id: Option<String>,
///     pub tenant_id: Option<String>,
///     pub cpf: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn sensitive_model(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::sensitive::expand_sensitive_model(args.into(), input).into()
}

//! Proc macros for comma.
//!
//! This crate provides the [`Commable`] derive, which gives the comma column
//! engine name-based access to a struct's fields. It is re-exported by the
//! `comma` crate behind its default `macros` feature; depend on `comma`
//! rather than on this crate directly.
//!
//! # Examples
//!
//! For working examples, see `comma/tests/derive.rs`.

mod commable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Commable` trait for structs with named fields.
///
/// Every field is readable by a named column under its own name, converted
/// with `comma::ToValue`. Field types therefore need a `ToValue` impl
/// (primitives, `String`, `Option` of those, or your own impl), or must be
/// skipped.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Hide this field from name lookups |
/// | `rename = "..."` | Use a custom accessor name |
/// | `nested` | The field is a record (or `Option` of one) that groups can descend into |
/// | `parent` | The field is the record this struct extends |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Accessor name constants (e.g., `User::FIRST_NAME`)
/// 2. `Commable::field()`, and `Commable::nested()` when any field is nested
/// 3. For a `parent` field: name lookups falling through to the parent,
///    `Commable::ancestor()` and `Commable::lineage()`, so the parent's
///    configurations and computed columns apply to this type
///
/// # Example
///
/// ```ignore
/// use comma::{Column, Commable, Group, Registry, RenderOptions, Style};
///
/// #[derive(Commable)]
/// struct Isbn {
///     number_10: String,
/// }
///
/// #[derive(Commable)]
/// struct Book {
///     #[comma(rename = "title")]
///     name: String,
///
///     #[comma(nested)]
///     isbn: Option<Isbn>,
///
///     #[comma(skip)]
///     internal_id: u64,
/// }
///
/// let mut registry = Registry::new();
/// registry.define::<Book>(Style::Default, |c| {
///     c.column(Book::TITLE);
///     c.group(Group::at(Book::ISBN), |g: &mut comma::Columns<'_, Isbn>| {
///         g.column(Column::named(Isbn::NUMBER_10).label("ISBN-10"));
///     });
/// })?;
/// ```
///
/// # Parent Records
///
/// ```ignore
/// #[derive(Commable)]
/// struct Person {
///     name: String,
/// }
///
/// #[derive(Commable)]
/// struct Employee {
///     #[comma(parent)]
///     person: Person,
///     badge: u32,
/// }
///
/// // Employee renders with Person's configuration until it declares its own,
/// // and `employee.field("name")` reads `person.name`.
/// ```
#[proc_macro_derive(Commable, attributes(comma))]
pub fn commable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    commable::commable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

//! Comma - Declarative column extraction and CSV export for Rust structs.
//!
//! Comma lets a type declare, once, which columns it exports and how each
//! column's header and value are derived. Collections of that type are then
//! rendered as CSV with a single call. It supports:
//!
//! - Named accessors, static values and computed blocks per column
//! - Several named styles per type, with a default
//! - Groups that flatten a nested record's columns into the row
//! - Lookups that fall back to the configuration of a parent record
//! - Loose, string-friendly render options passed through to the writer
//!
//! # Quick Start
//!
//! ```rust
//! use comma::{Column, Commable, Registry, RenderOptions, Value};
//!
//! struct User {
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! impl Commable for User {
//!     fn field(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "first_name" => Some(Value::from(&self.first_name)),
//!             "last_name" => Some(Value::from(&self.last_name)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry
//!     .define::<User>("default", |c| {
//!         c.column("first_name");
//!         c.column("last_name");
//!     })
//!     .unwrap();
//! registry
//!     .define::<User>("shortened", |c| {
//!         c.column(Column::named("first_name").label("First"));
//!     })
//!     .unwrap();
//!
//! let users = vec![
//!     User { first_name: "Fred".into(), last_name: "Flintstone".into() },
//!     User { first_name: "Wilma".into(), last_name: "Flintstone".into() },
//! ];
//!
//! let csv = registry.render(&users, "default", &RenderOptions::default()).unwrap();
//! assert_eq!(csv, "First name,Last name\nFred,Flintstone\nWilma,Flintstone\n");
//!
//! let csv = registry.render(&users, "shortened", &RenderOptions::default()).unwrap();
//! assert_eq!(csv, "First\nFred\nWilma\n");
//! ```
//!
//! # Headers
//!
//! | Column | Header |
//! |--------|--------|
//! | `"first_name"` | `First name` |
//! | `Column::named("name").label("Title")` | `Title` |
//! | `Column::named("authority").symbol("issuer")` | `Issuer` |
//! | `Column::fixed(..)`, `Column::computed(..)` | empty |
//!
//! # Render options
//!
//! [`RenderOptions`] reads `write_headers` and passes every other key to the
//! writer untouched. The default [`CsvWriter`] understands `col_sep`,
//! `row_sep`, `quote_char` and `force_quotes`; [`Download`] reads
//! `filename`, `extension` and `mime_type` from the same map.
//!
//! # Derive
//!
//! With the `macros` feature (on by default), `#[derive(Commable)]`
//! generates the accessor lookup for structs with named fields. See
//! [`Commable`](derive@Commable).

mod column;
mod config;
mod download;
mod error;
mod header;
mod registry;
mod render;
mod row;
mod traits;
mod value;
mod writer;

// Re-export public API
pub use column::{Column, Columns, Descriptor, Group, Label, RowContext};
pub use config::{from_config, WriterConfig};
pub use download::Download;
pub use error::{CommaError, Result};
pub use header::{header_for, headers_for, humanize};
pub use registry::{define, global, global_mut, headers, render, row, Configuration, Registry, Style};
pub use render::{RenderOptions, Renderer};
pub use row::row_for;
pub use traits::{view_as, AsAny, Commable, Nested, TypeKey};
pub use value::{Number, ToValue, Value};
pub use writer::{CsvOptions, CsvWriter, TableWriter};

#[cfg(feature = "macros")]
pub use comma_macros::Commable;

//! Table rendering: configuration lookup, header pass, row pass, encoding.
//!
//! A render is a pure pipeline per call. Every row is extracted before any
//! byte is written, so a failing record never produces partial output.

use std::io::Write;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::config::{flag, WriterConfig};
use crate::error::Result;
use crate::header::headers_for;
use crate::registry::{Configuration, Registry, Style};
use crate::row::row_for;
use crate::traits::Commable;
use crate::value::Value;
use crate::writer::{CsvWriter, TableWriter};

fn default_true() -> bool {
    true
}

/// Options for a single render.
///
/// `write_headers` is the only option the renderer reads. Every other key is
/// collected into [`writer`](RenderOptions::writer) and handed unchanged to
/// the table writer.
///
/// ```
/// use comma::RenderOptions;
/// use serde_json::json;
///
/// let options = RenderOptions::from_value(json!({
///     "write_headers": "false",
///     "col_sep": "||",
///     "filename": "users",
/// }))
/// .unwrap();
///
/// assert!(!options.write_headers);
/// assert_eq!(options.writer["col_sep"], "||");
/// assert_eq!(options.writer["filename"], "users");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    /// Emit the header row first. Defaults to `true`.
    #[serde(default = "default_true", deserialize_with = "flag")]
    pub write_headers: bool,
    /// Pass-through options for the table writer.
    #[serde(flatten)]
    pub writer: WriterConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            write_headers: true,
            writer: WriterConfig::new(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        RenderOptions::default()
    }

    /// Reads options from a loose JSON object.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Sets whether the header row is emitted.
    pub fn write_headers(mut self, write_headers: bool) -> Self {
        self.write_headers = write_headers;
        self
    }

    /// Sets a pass-through writer option.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.writer.insert(key.into(), value.into());
        self
    }

    /// Shorthand for the `col_sep` writer option.
    pub fn col_sep(self, sep: impl Into<String>) -> Self {
        self.set("col_sep", sep.into())
    }

    /// Shorthand for the `row_sep` writer option.
    pub fn row_sep(self, sep: impl Into<String>) -> Self {
        self.set("row_sep", sep.into())
    }

    /// Shorthand for the `force_quotes` writer option.
    pub fn force_quotes(self, force: bool) -> Self {
        self.set("force_quotes", force)
    }
}

/// Renders collections of records through a registry and a table writer.
///
/// ```rust
/// use comma::{Commable, Registry, RenderOptions, Renderer, Style, Value};
///
/// struct Tag(String);
///
/// impl Commable for Tag {
///     fn field(&self, name: &str) -> Option<Value> {
///         (name == "name").then(|| Value::from(&self.0))
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.define::<Tag>(Style::Default, |c| { c.column("name"); }).unwrap();
///
/// let tags = [Tag("rust".into()), Tag("csv".into())];
/// let options = RenderOptions::new().write_headers(false);
/// let out = Renderer::new(&registry).render(&tags, Style::Default, &options).unwrap();
/// assert_eq!(out, "rust\ncsv\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a, W = CsvWriter> {
    registry: &'a Registry,
    writer: W,
}

impl<'a> Renderer<'a> {
    /// A renderer writing CSV.
    pub fn new(registry: &'a Registry) -> Self {
        Renderer {
            registry,
            writer: CsvWriter,
        }
    }
}

impl<'a, W: TableWriter> Renderer<'a, W> {
    /// Replaces the table writer.
    pub fn with_writer<V: TableWriter>(self, writer: V) -> Renderer<'a, V> {
        Renderer {
            registry: self.registry,
            writer,
        }
    }

    /// Extracts the header row (if enabled) and one row per item.
    pub fn rows<'i, T, I>(
        &self,
        items: I,
        style: impl Into<Style>,
        options: &RenderOptions,
    ) -> Result<Vec<Vec<Value>>>
    where
        T: Commable,
        I: IntoIterator<Item = &'i T>,
    {
        let configuration = self.registry.lookup::<T>(&style.into())?;
        extract_rows(&configuration, items, options)
    }

    /// Renders `items` into `out`.
    pub fn render_to<'i, T, I>(
        &self,
        items: I,
        style: impl Into<Style>,
        options: &RenderOptions,
        out: &mut dyn Write,
    ) -> Result<()>
    where
        T: Commable,
        I: IntoIterator<Item = &'i T>,
    {
        let style = style.into();
        let configuration = self.registry.lookup::<T>(&style)?;
        let encoded = render_configuration(&configuration, &style, items, options, &self.writer)?;
        out.write_all(encoded.as_bytes())?;
        Ok(())
    }

    /// Renders `items` to a string.
    pub fn render<'i, T, I>(
        &self,
        items: I,
        style: impl Into<Style>,
        options: &RenderOptions,
    ) -> Result<String>
    where
        T: Commable,
        I: IntoIterator<Item = &'i T>,
    {
        let style = style.into();
        let configuration = self.registry.lookup::<T>(&style)?;
        render_configuration(&configuration, &style, items, options, &self.writer)
    }
}

fn extract_rows<'i, T, I>(
    configuration: &Configuration,
    items: I,
    options: &RenderOptions,
) -> Result<Vec<Vec<Value>>>
where
    T: Commable,
    I: IntoIterator<Item = &'i T>,
{
    let mut rows = Vec::new();
    if options.write_headers {
        rows.push(
            headers_for(configuration)
                .into_iter()
                .map(Value::Text)
                .collect(),
        );
    }
    for item in items {
        rows.push(row_for(configuration, item)?);
    }
    Ok(rows)
}

/// Runs the header and row passes for a resolved configuration and encodes
/// the result with `writer`.
pub(crate) fn render_configuration<'i, T, I, W>(
    configuration: &Configuration,
    style: &Style,
    items: I,
    options: &RenderOptions,
    writer: &W,
) -> Result<String>
where
    T: Commable,
    I: IntoIterator<Item = &'i T>,
    W: TableWriter + ?Sized,
{
    let rows = extract_rows(configuration, items, options)?;
    let mut buffer = Vec::new();
    writer.write(&rows, &options.writer, &mut buffer)?;
    tracing::trace!(
        record = std::any::type_name::<T>(),
        %style,
        rows = rows.len(),
        columns = configuration.width(),
        bytes = buffer.len(),
        "rendered table"
    );
    Ok(String::from_utf8(buffer)?)
}

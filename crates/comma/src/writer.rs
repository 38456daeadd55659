//! Tabular writers: encoding rows of values into text.
//!
//! The renderer hands a writer the rows (header row first, when enabled)
//! together with the opaque [`WriterConfig`] it received. It never interprets
//! those options; each writer reads what it understands.
//!
//! [`CsvWriter`] is the default writer. It understands:
//!
//! | Option | Default | Meaning |
//! |--------|---------|---------|
//! | `col_sep` | `,` | Column separator, any string |
//! | `row_sep` | `\n` | Row separator, any string |
//! | `quote_char` | `"` | Quote character |
//! | `force_quotes` | `false` | Quote every field |
//!
//! Unknown keys are ignored.

use std::io::Write;

use serde::Deserialize;

use crate::config::{flag, from_config, text, WriterConfig};
use crate::error::Result;
use crate::value::Value;

/// A collaborator that encodes rows into an output stream.
pub trait TableWriter {
    /// Encodes `rows` into `out`.
    fn write(&self, rows: &[Vec<Value>], options: &WriterConfig, out: &mut dyn Write) -> Result<()>;
}

/// Options understood by [`CsvWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    #[serde(deserialize_with = "text")]
    pub col_sep: String,
    #[serde(deserialize_with = "text")]
    pub row_sep: String,
    pub quote_char: char,
    #[serde(deserialize_with = "flag")]
    pub force_quotes: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            col_sep: ",".to_string(),
            row_sep: "\n".to_string(),
            quote_char: '"',
            force_quotes: false,
        }
    }
}

impl CsvOptions {
    /// Reads CSV options out of a loose option map.
    pub fn from_config(config: &WriterConfig) -> Result<Self> {
        from_config(config)
    }

    /// Byte-level settings for the `csv` crate, when the separators fit it.
    fn byte_settings(&self) -> Option<(u8, csv::Terminator, u8)> {
        let delimiter = single_byte(&self.col_sep)?;
        let terminator = match self.row_sep.as_str() {
            "\r\n" => csv::Terminator::CRLF,
            other => csv::Terminator::Any(single_byte(other)?),
        };
        let quote = u8::try_from(self.quote_char).ok().filter(u8::is_ascii)?;
        Some((delimiter, terminator, quote))
    }
}

fn single_byte(s: &str) -> Option<u8> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Some(*b),
        _ => None,
    }
}

/// Comma-separated values writer.
///
/// Separators of a single ASCII byte are encoded by the `csv` crate.
/// Longer separators (such as `||` or `"ENDOFLINE\n"`) are encoded with the
/// same quoting rules by a string encoder: a field is quoted when quoting is
/// forced or when it contains the column separator, the row separator, the
/// quote character or a line break, and embedded quotes are doubled.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriter;

impl CsvWriter {
    /// Encodes `rows` into a string with the given options.
    pub fn encode(&self, rows: &[Vec<Value>], options: &CsvOptions) -> Result<String> {
        match options.byte_settings() {
            Some(settings) => encode_bytes(rows, options, settings),
            None => Ok(encode_wide(rows, options)),
        }
    }
}

impl TableWriter for CsvWriter {
    fn write(&self, rows: &[Vec<Value>], options: &WriterConfig, out: &mut dyn Write) -> Result<()> {
        let options = CsvOptions::from_config(options)?;
        let encoded = self.encode(rows, &options)?;
        out.write_all(encoded.as_bytes())?;
        Ok(())
    }
}

fn encode_bytes(
    rows: &[Vec<Value>],
    options: &CsvOptions,
    (delimiter, terminator, quote): (u8, csv::Terminator, u8),
) -> Result<String> {
    let quote_style = if options.force_quotes {
        csv::QuoteStyle::Always
    } else {
        csv::QuoteStyle::Necessary
    };
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(terminator)
        .quote(quote)
        .quote_style(quote_style)
        .flexible(true)
        .from_writer(vec![]);

    for row in rows {
        wtr.write_record(row.iter().map(Value::to_string))?;
    }
    let bytes = wtr.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

fn encode_wide(rows: &[Vec<Value>], options: &CsvOptions) -> String {
    let mut out = String::new();
    for row in rows {
        // A lone empty field is quoted so the line is not mistaken for a blank one.
        if row.len() <= 1 && row.iter().all(|cell| cell.to_string().is_empty()) {
            out.push(options.quote_char);
            out.push(options.quote_char);
            out.push_str(&options.row_sep);
            continue;
        }
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push_str(&options.col_sep);
            }
            push_field(&mut out, &cell.to_string(), options);
        }
        out.push_str(&options.row_sep);
    }
    out
}

fn push_field(out: &mut String, field: &str, options: &CsvOptions) {
    let quote = options.quote_char;
    let contains = |sep: &str| !sep.is_empty() && field.contains(sep);
    let needs_quotes = options.force_quotes
        || contains(&options.col_sep)
        || contains(&options.row_sep)
        || field.contains(quote)
        || field.contains(['\r', '\n']);

    if !needs_quotes {
        out.push_str(field);
        return;
    }
    out.push(quote);
    for ch in field.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
}

impl From<CsvOptions> for WriterConfig {
    fn from(options: CsvOptions) -> Self {
        let mut config = WriterConfig::new();
        config.insert("col_sep".to_string(), options.col_sep.into());
        config.insert("row_sep".to_string(), options.row_sep.into());
        config.insert("quote_char".to_string(), options.quote_char.to_string().into());
        config.insert("force_quotes".to_string(), options.force_quotes.into());
        config
    }
}

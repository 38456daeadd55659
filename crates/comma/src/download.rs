//! Download metadata for serving a rendered table as a file.

use serde::Deserialize;

use crate::config::{from_config, text};
use crate::error::Result;
use crate::render::RenderOptions;

/// File name and content type for a rendered table.
///
/// Read from the same loose options as the render, so one option map can
/// carry both the CSV settings and the download settings:
///
/// ```
/// use comma::{Download, RenderOptions};
/// use serde_json::json;
///
/// let options = RenderOptions::from_value(json!({
///     "filename": "my report",
///     "extension": "txt",
/// }))
/// .unwrap();
/// let download = Download::from_options(&options).unwrap();
///
/// assert_eq!(download.file_name(), "my report.txt");
/// assert_eq!(download.content_type(), "text/csv");
/// assert_eq!(
///     download.content_disposition(),
///     "attachment; filename=\"my report.txt\""
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Download {
    #[serde(deserialize_with = "text")]
    pub filename: String,
    #[serde(deserialize_with = "text")]
    pub extension: String,
    #[serde(deserialize_with = "text")]
    pub mime_type: String,
}

impl Default for Download {
    fn default() -> Self {
        Download {
            filename: "data".to_string(),
            extension: "csv".to_string(),
            mime_type: "text/csv".to_string(),
        }
    }
}

impl Download {
    /// Reads download metadata from render options. Unrelated keys are
    /// ignored.
    pub fn from_options(options: &RenderOptions) -> Result<Self> {
        from_config(&options.writer)
    }

    /// `<filename>.<extension>`, or just the filename when the extension is
    /// empty.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.filename.clone()
        } else {
            format!("{}.{}", self.filename, self.extension)
        }
    }

    pub fn content_type(&self) -> &str {
        &self.mime_type
    }

    /// Value for a `Content-Disposition` header.
    pub fn content_disposition(&self) -> String {
        let name = self.file_name();
        let mut quoted = String::with_capacity(name.len() + 2);
        for ch in name.chars() {
            if matches!(ch, '"' | '\\') {
                quoted.push('\\');
            }
            quoted.push(ch);
        }
        format!("attachment; filename=\"{}\"", quoted)
    }
}

//! Note export formats.
//!
//! Formats form a closed set resolved from a string key once, at the request
//! boundary. Unknown keys are rejected with the key in the message.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::store::Note;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Xml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Xml];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
        }
    }

    /// Response `Content-Type` for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Xml => "application/xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExportError::UnknownFormat(s.to_string()))
    }
}

/// Render `notes` in the requested format.
pub fn run_export(notes: &[Note], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => Ok(export_csv(notes)),
        ExportFormat::Json => Ok(serde_json::to_string(notes)?),
        ExportFormat::Xml => Ok(export_xml(notes)),
    }
}

fn export_csv(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| {
            format!(
                "{},{},{}",
                n.id,
                csv_field(&n.title),
                csv_field(&n.body)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn export_xml(notes: &[Note]) -> String {
    let mut out = String::from("<data>");
    for n in notes {
        out.push_str(&format!(
            "<item><id>{}</id><title>{}</title><body>{}</body></item>",
            n.id,
            xml_escape(&n.title),
            xml_escape(&n.body)
        ));
    }
    out.push_str("</data>");
    out
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

//! Document Reader: turns a stored resume file into plain text.
//!
//! Format comes from the file extension: `pdf`, `doc`, `docx`. Anything else is rejected
//! before storage is touched.
//!
//! - PDF: `pdf-extract`, on the blocking pool (the parser is CPU-bound and may panic on
//!   malformed input; a panic surfaces as a read error).
//! - DOCX: `word/document.xml` from the zip container, flattened to text.
//! - DOC: spilled to a temp file and handed to an external converter (`antiword` by default)
//!   that prints the text on stdout.

use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ExtractionError;
use crate::store::ResumeStorage;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").unwrap());
static TAB: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:tab\s*/>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|(lt|gt|quot|apos|amp));").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
}

impl DocumentFormat {
    /// Infers the format from the last extension of `path`, case-insensitively.
    pub fn from_path(path: &str) -> Result<Self, ExtractionError> {
        let ext = file_extension(path);
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "doc" => Ok(Self::Doc),
            "docx" => Ok(Self::Docx),
            _ => Err(ExtractionError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Text after the last dot. A leading dot (hidden file) or no dot yields `""`.
fn file_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(idx) if idx > 0 => &path[idx + 1..],
        _ => "",
    }
}

/// Reads the text content of a stored document.
///
/// Carried in `AppState` as `Arc<dyn DocumentReader>`.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    async fn read_text(
        &self,
        storage_key: &str,
        format: DocumentFormat,
    ) -> Result<String, ExtractionError>;
}

/// Reads documents out of `ResumeStorage` and decodes them in-process.
pub struct StoredDocumentReader {
    storage: Arc<dyn ResumeStorage>,
    doc_converter: String,
}

impl StoredDocumentReader {
    pub fn new(storage: Arc<dyn ResumeStorage>, doc_converter: impl Into<String>) -> Self {
        Self {
            storage,
            doc_converter: doc_converter.into(),
        }
    }
}

#[async_trait]
impl DocumentReader for StoredDocumentReader {
    async fn read_text(
        &self,
        storage_key: &str,
        format: DocumentFormat,
    ) -> Result<String, ExtractionError> {
        let bytes = self
            .storage
            .get(storage_key)
            .await
            .map_err(|e| ExtractionError::DocumentRead(e.to_string()))?;

        match format {
            DocumentFormat::Pdf => pdf_text(bytes).await,
            DocumentFormat::Docx => docx_text(&bytes),
            DocumentFormat::Doc => doc_text(&self.doc_converter, &bytes).await,
        }
    }
}

async fn pdf_text(bytes: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::DocumentRead(format!("PDF reader aborted: {e}")))?
        .map_err(|e| ExtractionError::DocumentRead(format!("Invalid PDF: {e}")))
}

fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::DocumentRead(format!("Invalid DOCX container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::DocumentRead(format!("DOCX has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::DocumentRead(format!("Unreadable DOCX body: {e}")))?;

    Ok(flatten_wordprocessing_xml(&xml))
}

/// Paragraphs and breaks become newlines, tabs become tabs, every other tag is dropped.
fn flatten_wordprocessing_xml(xml: &str) -> String {
    let text = PARAGRAPH_BREAK.replace_all(xml, "\n");
    let text = TAB.replace_all(&text, "\t");
    let text = ANY_TAG.replace_all(&text, "");
    unescape_xml(&text)
}

/// Decodes the five predefined entities and numeric character references in a single pass.
/// References to invalid code points are kept as-is.
fn unescape_xml(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                match &caps[3] {
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => Some('&'),
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

async fn doc_text(converter: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".doc")
        .tempfile()
        .map_err(|e| ExtractionError::DocumentRead(format!("Temp file unavailable: {e}")))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| ExtractionError::DocumentRead(format!("Temp file write failed: {e}")))?;

    let output = tokio::process::Command::new(converter)
        .arg(file.path())
        .output()
        .await
        .map_err(|e| ExtractionError::DocumentRead(format!("Failed to run '{converter}': {e}")))?;

    if !output.status.success() {
        return Err(ExtractionError::DocumentRead(format!(
            "'{converter}' exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

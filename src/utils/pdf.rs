// src/utils/pdf.rs

//! PDF payload checks and text extraction via `pdftotext`.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{AppError, Result};

/// Magic bytes every PDF file starts with.
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Whether `bytes` looks like a PDF document.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Page-wise text extraction from a PDF payload.
#[async_trait]
pub trait PdfText: Send + Sync {
    /// Return the text of each page, reading at most `max_pages` pages
    /// (all pages when `None`).
    async fn pages(&self, pdf: &[u8], max_pages: Option<usize>) -> Result<Vec<String>>;
}

/// Extractor that shells out to poppler's `pdftotext`.
#[derive(Debug, Clone)]
pub struct Pdftotext {
    binary: PathBuf,
}

impl Pdftotext {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for Pdftotext {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

#[async_trait]
impl PdfText for Pdftotext {
    async fn pages(&self, pdf: &[u8], max_pages: Option<usize>) -> Result<Vec<String>> {
        if !is_pdf(pdf) {
            return Err(AppError::format("payload does not start with %PDF"));
        }

        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        file.write_all(pdf)?;
        file.flush()?;

        let mut command = Command::new(&self.binary);
        command.args(["-enc", "UTF-8"]);
        if let Some(max) = max_pages {
            command.args(["-f", "1", "-l", &max.max(1).to_string()]);
        }
        command.arg(file.path()).arg("-");

        let output = match command.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::extraction(format!(
                    "{} not found (install poppler-utils)",
                    self.binary.display()
                )));
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        if !output.status.success() {
            return Err(AppError::extraction(format!(
                "pdftotext failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let mut pages = split_pages(&text);
        if let Some(max) = max_pages {
            pages.truncate(max);
        }
        Ok(pages)
    }
}

/// Split `pdftotext` output into pages on form feeds.
fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split('\u{c}').map(str::to_string).collect();
    // pdftotext terminates the last page with a form feed too
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pdf_magic() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(!is_pdf(b"<html>not found</html>"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn splits_pages_on_form_feed() {
        let pages = split_pages("first\n\u{c}second\n\u{c}");
        assert_eq!(pages, vec!["first\n".to_string(), "second\n".to_string()]);
    }

    #[tokio::test]
    async fn rejects_non_pdf_payload_before_spawning() {
        let err = Pdftotext::new("/nonexistent/pdftotext")
            .pages(b"<html></html>", Some(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }

    #[tokio::test]
    async fn missing_binary_is_an_extraction_error() {
        let err = Pdftotext::new("/nonexistent/pdftotext")
            .pages(b"%PDF-1.4 broken", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}

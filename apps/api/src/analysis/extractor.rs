//! PDF text extraction.
//!
//! Pages are concatenated in document order with no separator. The primary
//! path is `pdf_extract`. If that fails for a document `lopdf` can still
//! open, extraction is retried page by page and a failing page contributes
//! an empty string. Only a document that cannot be opened at all is fatal.
//!
//! Both libraries can panic on malformed input, so every call is wrapped in
//! `catch_unwind`.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not read PDF: {0}")]
    Unreadable(String),
}

/// Extracts the text of every page of `bytes`, joined in page order.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    match extract_with_pdf_extract(bytes) {
        Ok(pages) => {
            debug!("pdf_extract produced {} pages", pages.len());
            Ok(pages.concat())
        }
        Err(reason) => {
            warn!("pdf_extract failed ({reason}); falling back to per-page extraction");
            extract_per_page(bytes)
        }
    }
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<Vec<String>, String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("extraction panicked".to_string()),
    }
}

fn extract_per_page(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = panic::catch_unwind(AssertUnwindSafe(|| Document::load_mem(bytes)))
        .map_err(|_| ExtractionError::Unreadable("malformed document".to_string()))?
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    let mut text = String::new();
    // get_pages is a BTreeMap keyed by page number, so iteration is in page order.
    for page_number in doc.get_pages().into_keys() {
        let page = panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page_number])));
        match page {
            Ok(Ok(page_text)) => text.push_str(&page_text),
            Ok(Err(e)) => warn!("Page {page_number} yielded no text: {e}"),
            Err(_) => warn!("Page {page_number} yielded no text: extraction panicked"),
        }
    }
    Ok(text)
}

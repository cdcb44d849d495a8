//! Resume Loader — PDF bytes to page-numbered text segments via `pdf-extract`.

use bytes::Bytes;

use crate::models::resume::{ResumeDocument, TextSegment};
use crate::screening::ScreeningError;

/// Extracts text off the async executor. Parser panics surface as `Extraction`.
pub async fn load_resume(bytes: Bytes) -> Result<ResumeDocument, ScreeningError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ScreeningError::Extraction(format!("PDF parser aborted: {e}")))?
        .map_err(|e| ScreeningError::Extraction(e.to_string()))?;

    Ok(split_pages(&text))
}

/// Splits extracted text on form feeds, numbering pages from 1.
pub fn split_pages(text: &str) -> ResumeDocument {
    let segments = text
        .split('\u{c}')
        .enumerate()
        .map(|(i, page)| TextSegment {
            page: i as u32 + 1,
            text: page.to_string(),
        })
        .collect();
    ResumeDocument::new(segments)
}

//! Chunker — splits sanitized resume text into overlapping fixed-size windows.
//!
//! Sizes are counted in `char`s. Segments are joined with `\n` into a single
//! stream so short multi-page resumes still yield one chunk.

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeDocument;

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ChunkerConfig {
    /// Returns `None` unless `0 <= overlap < size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Option<Self> {
        (chunk_size > 0 && chunk_overlap < chunk_size).then_some(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// A retrieval unit. `offset` is the char offset into the joined document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub page: u32,
    pub offset: usize,
    pub text: String,
}

/// Splits a document into chunks.
///
/// Window `i` starts at `i * (size - overlap)`; the last window ends at the end
/// of the text. Blank documents produce no chunks.
pub fn chunk_document(doc: &ResumeDocument, config: &ChunkerConfig) -> Vec<Chunk> {
    if doc.is_blank() {
        return Vec::new();
    }

    // (start offset, page) for each segment in the joined stream
    let mut page_starts = Vec::with_capacity(doc.segments.len());
    let mut chars: Vec<char> = Vec::new();
    for (i, segment) in doc.segments.iter().enumerate() {
        if i > 0 {
            chars.push('\n');
        }
        page_starts.push((chars.len(), segment.page));
        chars.extend(segment.text.chars());
    }

    let size = config.chunk_size();
    let step = size - config.chunk_overlap();
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + size).min(chars.len());
        chunks.push(Chunk {
            index: chunks.len(),
            page: page_at(&page_starts, start),
            offset: start,
            text: chars[start..end].iter().collect(),
        });
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

fn page_at(page_starts: &[(usize, u32)], offset: usize) -> u32 {
    page_starts
        .iter()
        .take_while(|(start, _)| *start <= offset)
        .last()
        .map(|(_, page)| *page)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::TextSegment;

    fn doc_from(text: &str) -> ResumeDocument {
        ResumeDocument::new(vec![TextSegment {
            page: 1,
            text: text.to_string(),
        }])
    }

    /// Deterministic pseudo-text of `len` chars with no repeating period of 100.
    fn synthetic_text(len: usize) -> String {
        (0..len)
            .map(|i| (b'a' + ((i * 7 + i / 13) % 26) as u8) as char)
            .collect()
    }

    fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(&chunk.text);
            } else {
                out.extend(chunk.text.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = chunk_document(&doc_from("Rust engineer, 5 years"), &ChunkerConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Rust engineer, 5 years");
        assert_eq!(chunks[0].offset, 0);
    }

    #[test]
    fn test_blank_document_has_no_chunks() {
        assert!(chunk_document(&doc_from("  \n\t "), &ChunkerConfig::default()).is_empty());
        assert!(chunk_document(&ResumeDocument::default(), &ChunkerConfig::default()).is_empty());
    }

    #[test]
    fn test_size_overlap_and_reconstruction_hold_across_lengths() {
        let config = ChunkerConfig::default();
        for len in [1, 499, 500, 501, 900, 901, 1234, 5000] {
            let text = synthetic_text(len);
            let chunks = chunk_document(&doc_from(&text), &config);

            assert!(chunks.len() >= len.div_ceil(500), "len={len}");
            for chunk in &chunks {
                let n = chunk.text.chars().count();
                assert!(n >= 1 && n <= 500, "len={len} chunk={n}");
            }
            for pair in chunks.windows(2) {
                let tail: String = pair[0].text.chars().skip(pair[0].text.chars().count() - 100).collect();
                let head: String = pair[1].text.chars().take(100).collect();
                assert_eq!(tail, head, "len={len}");
            }
            assert_eq!(reconstruct(&chunks, 100), text, "len={len}");
        }
    }

    #[test]
    fn test_exact_boundaries_for_900_chars() {
        let chunks = chunk_document(&doc_from(&synthetic_text(900)), &ChunkerConfig::default());
        let offsets: Vec<usize> = chunks.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0, 400]);
        assert_eq!(chunks[1].text.chars().count(), 500);
    }

    #[test]
    fn test_deterministic() {
        let doc = doc_from(&synthetic_text(2000));
        let config = ChunkerConfig::default();
        assert_eq!(chunk_document(&doc, &config), chunk_document(&doc, &config));
    }

    #[test]
    fn test_multibyte_text_counts_chars() {
        let text = "é".repeat(600);
        let chunks = chunk_document(&doc_from(&text), &ChunkerConfig::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text.chars().count(), 500);
        assert_eq!(chunks[1].text.chars().count(), 200);
    }

    #[test]
    fn test_page_provenance_follows_chunk_start() {
        let doc = ResumeDocument::new(vec![
            TextSegment {
                page: 1,
                text: synthetic_text(450),
            },
            TextSegment {
                page: 2,
                text: synthetic_text(450),
            },
        ]);
        let chunks = chunk_document(&doc, &ChunkerConfig::default());
        // joined length 901: windows start at 0, 400 (page 1), 800 (page 2)
        let pages: Vec<u32> = chunks.iter().map(|c| c.page).collect();
        assert_eq!(pages, vec![1, 1, 2]);
    }

    #[test]
    fn test_custom_config() {
        let config = ChunkerConfig::new(10, 3).unwrap();
        let chunks = chunk_document(&doc_from("abcdefghijklmnopq"), &config);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcdefghij", "hijklmnopq"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(ChunkerConfig::new(100, 100).is_none());
        assert!(ChunkerConfig::new(0, 0).is_none());
        assert!(ChunkerConfig::new(100, 99).is_some());
    }
}

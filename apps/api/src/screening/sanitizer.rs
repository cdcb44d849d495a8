//! Sanitizer — strips identity fields from extracted resume text before it
//! reaches the chunker or any prompt.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::resume::ResumeDocument;

/// Labels whose `label: value` runs are removed.
pub const IDENTITY_LABELS: &[&str] = &["name", "gender", "age", "address", "college"];

fn identity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let labels = IDENTITY_LABELS.join("|");
        // Label through end of line. Line terminators are never consumed,
        // including between a label and its colon.
        Regex::new(&format!(r"(?i)\b(?:{labels})[ \t]*:[^\r\n]*"))
            .expect("identity pattern is a valid regex")
    })
}

/// Removes every `label: value` run for the identity labels, case-insensitively.
/// All other text and every line break is kept as-is.
pub fn sanitize_text(text: &str) -> String {
    identity_pattern().replace_all(text, "").into_owned()
}

/// Sanitizes every segment of a document in place.
pub fn sanitize_document(doc: &mut ResumeDocument) {
    for segment in &mut doc.segments {
        segment.text = sanitize_text(&segment.text);
    }
}

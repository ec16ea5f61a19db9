//! Splits final text into plain-text and file-reference segments.
//!
//! References are matched case-insensitively, longest first, and each
//! file-reference segment carries the reference exactly as the caller spelled
//! it, never the casing found in the text.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use vox_core::types::TextSegment;

/// Compiled matcher over a set of file references.
///
/// Each reference gets its own capture group so a match maps straight back to
/// the originally-cased entry.
pub struct ReferenceMatcher {
    regex: Regex,
    references: Vec<String>,
}

impl ReferenceMatcher {
    /// Build a matcher, or `None` when there is nothing to match.
    pub fn new(file_references: &[String]) -> Option<Self> {
        let mut references: Vec<String> = file_references
            .iter()
            .filter(|r| !r.is_empty())
            .cloned()
            .collect();
        if references.is_empty() {
            return None;
        }

        // Stable sort keeps detection order among equal lengths, so the first
        // detected spelling wins when two entries differ only by case.
        references.sort_by(|a, b| b.len().cmp(&a.len()));

        let pattern = references
            .iter()
            .map(|r| format!("({})", regex::escape(r)))
            .collect::<Vec<_>>()
            .join("|");

        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => Some(Self { regex, references }),
            Err(e) => {
                warn!(
                    references = references.len(),
                    error = %e,
                    "Reference pattern rejected, delivering as plain text"
                );
                None
            }
        }
    }

    /// Segment `text` against this matcher.
    pub fn segment(&self, text: &str) -> Vec<TextSegment> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for caps in self.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let Some(reference) = (1..caps.len())
                .find(|&i| caps.get(i).is_some())
                .and_then(|i| self.references.get(i - 1))
            else {
                continue;
            };

            if whole.start() > cursor {
                segments.push(TextSegment::plain(&text[cursor..whole.start()]));
            }
            segments.push(TextSegment::file_reference(reference.as_str()));
            cursor = whole.end();
        }

        if cursor < text.len() {
            segments.push(TextSegment::plain(&text[cursor..]));
        }

        // Keeps the identity case for an empty input.
        if segments.is_empty() {
            segments.push(TextSegment::plain(text));
        }

        segments
    }
}

/// Split `text` into ordered segments against `file_references`.
///
/// Total: with no references, or none found in the text, the result is a
/// single plain segment equal to `text`.
pub fn segment(text: &str, file_references: &[String]) -> Vec<TextSegment> {
    match ReferenceMatcher::new(file_references) {
        Some(matcher) => matcher.segment(text),
        None => vec![TextSegment::plain(text)],
    }
}

// =============================================================================
// Tests
// =============================================================================

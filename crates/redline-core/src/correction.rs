//! Offset-splicing correction engine.
//!
//! Grammar issues are anchored to one revision's combined text by byte
//! offset and length. Applying a replacement changes the text length, which
//! would invalidate the stored offset of every issue to its right. Applying
//! in strictly descending offset order sidesteps that: each splice only
//! moves bytes at positions greater than the offsets still to be applied,
//! so every remaining stored offset stays valid on the mutated buffer.
//!
//! This module is pure: it never touches storage. Persisting applied flags
//! and writing corrected text back onto a note are the callers' concern.

use uuid::Uuid;

use crate::error::{Error, Result};

/// Join a revision's title and content into the single buffer submitted to
/// the grammar checker. Every issue offset is relative to this buffer, so
/// the join must be byte-for-byte identical wherever it is built.
pub fn combined_text(title: &str, content: &str) -> String {
    format!("{}\n\n{}", title, content)
}

/// One candidate replacement span within a fixed text buffer.
#[derive(Debug, Clone)]
pub struct FixSpan {
    pub id: Uuid,
    /// Byte offset into the combined text.
    pub offset: usize,
    /// Byte length of the span being replaced.
    pub length: usize,
    /// The text to splice in. `None` when the checker suggested nothing;
    /// such spans are skipped, not errors.
    pub replacement: Option<String>,
}

/// Result of splicing a batch of spans into a text buffer.
#[derive(Debug, Clone)]
pub struct SpliceOutcome {
    /// The fully spliced text.
    pub text: String,
    /// Ids of spans that were applied, in application (descending offset) order.
    pub applied: Vec<Uuid>,
    /// Ids of spans skipped because they carried no replacement.
    pub skipped: Vec<Uuid>,
}

/// Apply a batch of replacement spans to `text` in descending offset order.
///
/// Validation happens before any splice, so the operation is all-or-nothing:
/// - a span reaching past the end of the buffer, or whose boundaries fall
///   inside a UTF-8 code point, is `InvalidInput`;
/// - two appliable spans with overlapping byte ranges are `InvalidInput`
///   (applying them in any order would corrupt the text silently).
///
/// Spans without a replacement do not participate in overlap detection;
/// they leave the buffer untouched.
pub fn apply_spans(text: &str, spans: &[FixSpan]) -> Result<SpliceOutcome> {
    let mut ordered: Vec<&FixSpan> = spans.iter().collect();
    // Sort by offset descending; equal offsets keep input order (only
    // zero-length spans may legally share an offset).
    ordered.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut skipped = Vec::new();
    let mut appliable = Vec::new();
    for span in ordered {
        match &span.replacement {
            Some(_) => appliable.push(span),
            None => skipped.push(span.id),
        }
    }

    for span in &appliable {
        let end = span.offset.checked_add(span.length).ok_or_else(|| {
            Error::InvalidInput(format!("span {} offset+length overflows", span.id))
        })?;
        if end > text.len() {
            return Err(Error::InvalidInput(format!(
                "span {} ends at byte {} but text is {} bytes",
                span.id,
                end,
                text.len()
            )));
        }
        if !text.is_char_boundary(span.offset) || !text.is_char_boundary(end) {
            return Err(Error::InvalidInput(format!(
                "span {} does not fall on a character boundary",
                span.id
            )));
        }
    }

    // Overlap check: walking right-to-left, each span must end at or before
    // the start of the span applied previously (to its right).
    for pair in appliable.windows(2) {
        let right = pair[0];
        let left = pair[1];
        if left.offset + left.length > right.offset {
            return Err(Error::InvalidInput(format!(
                "spans {} and {} overlap",
                left.id, right.id
            )));
        }
    }

    let mut out = text.to_string();
    let mut applied = Vec::with_capacity(appliable.len());
    for span in appliable {
        let replacement = span.replacement.as_deref().unwrap_or_default();
        out.replace_range(span.offset..span.offset + span.length, replacement);
        applied.push(span.id);
    }

    Ok(SpliceOutcome {
        text: out,
        applied,
        skipped,
    })
}

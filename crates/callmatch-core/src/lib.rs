//! Core shared types for callmatch.
//!
//! This crate is intentionally small: text ranges, a line index for reporting,
//! diagnostics, and text edits with all-or-nothing application.

mod diagnostic;
mod edit;
mod text;

pub use diagnostic::{Diagnostic, Severity};
pub use edit::{apply_text_edits, normalize_text_edits, EditError, TextEdit};
pub use text::{LineCol, LineIndex, TextRange, TextSize};

/// Build a [`TextRange`] from byte offsets.
///
/// Java sources larger than 4 GiB are not supported; offsets are truncated to `u32`.
#[inline]
pub fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

/// Byte offsets of `range` as `usize`, for slicing source text.
#[inline]
pub fn byte_range(range: TextRange) -> std::ops::Range<usize> {
    u32::from(range.start()) as usize..u32::from(range.end()) as usize
}

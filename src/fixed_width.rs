//! Column-positional field extraction.
//!
//! Offsets count characters, not bytes, so a line decoded from Latin-1 or
//! from lossy UTF-8 slices the same way the source file lays it out.

use serde::{Deserialize, Serialize};

/// Half-open, 0-based character range `[start, end)` of a fixed-width field.
///
/// Deserializes from a two element array so offset tables read naturally in
/// TOML: `id = [27, 31]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRange(pub usize, pub usize);

impl FieldRange {
    pub const fn new(start: usize, end: usize) -> Self {
        FieldRange(start, end)
    }

    pub fn start(&self) -> usize {
        self.0
    }

    pub fn end(&self) -> usize {
        self.1
    }

    /// Raw (untrimmed) text covered by this range.
    ///
    /// Lines shorter than `start` yield `""`; lines ending inside the range
    /// yield whatever is available.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        char_slice(line, self.0, self.1)
    }

    /// Text covered by this range with surrounding whitespace removed.
    pub fn extract<'a>(&self, line: &'a str) -> &'a str {
        self.slice(line).trim()
    }
}

/// Slice `line` by character positions, clamping to the line length.
fn char_slice(line: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }

    if line.is_ascii() {
        let end = end.min(line.len());
        return if start >= end { "" } else { &line[start..end] };
    }

    let mut boundaries = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));

    let Some(byte_start) = boundaries.nth(start) else {
        return "";
    };
    let byte_end = boundaries.nth(end - start - 1).unwrap_or(line.len());
    &line[byte_start..byte_end]
}

/// Number of characters in a line, the unit all offset tables use.
pub fn char_len(line: &str) -> usize {
    if line.is_ascii() {
        line.len()
    } else {
        line.chars().count()
    }
}

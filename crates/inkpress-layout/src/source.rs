//! Splitting source text into logical lines.

use std::ops::Range;

/// Byte ranges of the lines of `source`, without their terminators.
///
/// Lines end at `\n`; a `\r` right before it is part of the terminator. A
/// final terminator does not start another line, so `"a\n"` has one line
/// and `""` has none.
#[must_use]
pub fn line_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (offset, _) in source.match_indices('\n') {
        let end = if source[start..offset].ends_with('\r') {
            offset - 1
        } else {
            offset
        };
        ranges.push(start..end);
        start = offset + 1;
    }
    if start < source.len() {
        ranges.push(start..source.len());
    }
    ranges
}

/// The lines of `source`, as [`line_ranges`] splits them.
#[must_use]
pub fn split_lines(source: &str) -> Vec<&str> {
    line_ranges(source)
        .into_iter()
        .map(|r| &source[r])
        .collect()
}

//! Line wrapping that preserves every byte.
//!
//! [`wrap_ranges`] splits one logical line into contiguous byte ranges. The
//! ranges cover the whole line in order and nothing is trimmed, so a token
//! stream scanned over the unwrapped line can be re-sliced exactly at the
//! wrap points.
//!
//! Packing is greedy over alternating word and whitespace runs. Whitespace
//! at a break stays at the end of the row it follows and does not count
//! against the limit, so continuation rows always start with a visible
//! grapheme. A word wider than the limit is split at grapheme boundaries. A
//! single grapheme wider than the limit is placed alone.
//!
//! The only whitespace-only range is the first one of a line whose leading
//! indentation leaves no room for its first visible grapheme.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::metrics::{display_cells, grapheme_cells};

/// A maximal run of whitespace or non-whitespace graphemes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Run {
    range: Range<usize>,
    cells: usize,
    blank: bool,
}

fn is_blank(grapheme: &str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}

fn split_runs(line: &str) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut in_blank = None;
    for (offset, grapheme) in line.grapheme_indices(true) {
        let blank = is_blank(grapheme);
        let cells = grapheme_cells(grapheme);
        let end = offset + grapheme.len();
        match runs.last_mut() {
            Some(run) if in_blank == Some(blank) => {
                run.range.end = end;
                run.cells += cells;
            }
            _ => runs.push(Run {
                range: offset..end,
                cells,
                blank,
            }),
        }
        in_blank = Some(blank);
    }
    runs
}

/// Split `line` into ranges of at most `max_cells` display cells, not
/// counting whitespace at the end of a range.
///
/// Always returns at least one range; an empty line yields `[0..0]`.
#[must_use]
pub fn wrap_ranges(line: &str, max_cells: usize) -> Vec<Range<usize>> {
    let max_cells = max_cells.max(1);
    if display_cells(line) <= max_cells {
        return vec![0..line.len()];
    }

    let mut out = Vec::new();
    let mut start = 0;
    let mut cells = 0;
    // Whether the current row holds a visible grapheme yet.
    let mut visible = false;

    for run in split_runs(line) {
        if run.blank {
            cells += run.cells;
            if visible && cells > max_cells {
                out.push(start..run.range.end);
                start = run.range.end;
                cells = 0;
                visible = false;
            }
            continue;
        }
        if visible && cells + run.cells > max_cells {
            out.push(start..run.range.start);
            start = run.range.start;
            cells = 0;
            visible = false;
        }
        visible = true;
        if cells + run.cells <= max_cells {
            cells += run.cells;
            continue;
        }
        // Overlong word, or indentation leaves too little room for it.
        let base = run.range.start;
        for (offset, grapheme) in line[run.range.clone()].grapheme_indices(true) {
            let width = grapheme_cells(grapheme);
            if cells > 0 && cells + width > max_cells {
                out.push(start..base + offset);
                start = base + offset;
                cells = 0;
            }
            cells += width;
        }
    }

    if start < line.len() || out.is_empty() {
        out.push(start..line.len());
    }
    out
}

#![forbid(unsafe_code)]

//! Regions, line placement and pagination.

use std::ops::Range;

use inkpress_core::geometry::{Rect, Sides};
use tracing::{debug, debug_span};

use crate::error::LayoutError;
use crate::metadata::CodeMetadata;
use crate::metrics::{FontMetrics, PageSize, display_cells};
use crate::wrap::wrap_ranges;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Page geometry and display switches for one layout run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    pub margins: Sides,
    pub metrics: FontMetrics,
    pub show_line_numbers: bool,
    pub show_metadata: bool,
    /// Space between the gutter's numbers and the code, in pixels.
    pub gutter_padding: u32,
    /// Gutter digits reserved when the last line number is unknown.
    pub default_gutter_digits: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            margins: Sides::all(60),
            metrics: FontMetrics::default(),
            show_line_numbers: true,
            show_metadata: true,
            gutter_padding: 12,
            default_gutter_digits: 5,
        }
    }
}

/// Derived geometry shared by every page of one layout.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    content: Rect,
    header_height: u32,
    gutter_width: u32,
    line_height: u32,
    max_cells: usize,
}

impl LayoutConfig {
    #[must_use]
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: impl Into<Sides>) -> Self {
        self.margins = margins.into();
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: FontMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, show: bool) -> Self {
        self.show_metadata = show;
        self
    }

    /// Check that the geometry can hold at least one character and one
    /// line on every page.
    pub fn validate(
        &self,
        metadata: Option<&CodeMetadata>,
        line_count: usize,
    ) -> Result<(), LayoutError> {
        self.frame(metadata, line_count).map(|_| ())
    }

    fn header_lines(&self, metadata: Option<&CodeMetadata>) -> Vec<String> {
        match metadata {
            Some(meta) if self.show_metadata => meta.populated_fields(),
            _ => Vec::new(),
        }
    }

    fn gutter_digits(&self, metadata: Option<&CodeMetadata>, line_count: usize) -> usize {
        let first = metadata.map_or(1, CodeMetadata::first_line_number);
        let last = first + line_count.saturating_sub(1);
        let expected = metadata
            .map(|m| m.line_end)
            .filter(|end| *end > 0)
            .map_or(self.default_gutter_digits, digits);
        expected.max(digits(last))
    }

    fn frame(
        &self,
        metadata: Option<&CodeMetadata>,
        line_count: usize,
    ) -> Result<Frame, LayoutError> {
        self.metrics.check().map_err(LayoutError::InvalidMetrics)?;

        let content = Rect::from_size(self.page_size.size()).inner(self.margins);
        let line_height = self.metrics.line_height();
        let header_height = (self.header_lines(metadata).len() as u32).saturating_mul(line_height);
        let gutter_width = if self.show_line_numbers {
            let cells = self.gutter_digits(metadata, line_count) + 1;
            self.metrics
                .cells_to_px(cells)
                .saturating_add(self.gutter_padding)
        } else {
            0
        };

        let code_width = content.width.saturating_sub(gutter_width);
        let max_cells = self.metrics.max_cells(code_width);
        if max_cells == 0 {
            return Err(LayoutError::RegionTooNarrow {
                width: code_width,
                char_width: self.metrics.char_width(),
            });
        }
        // The first page is the shortest.
        let first_height = content.height.saturating_sub(header_height);
        if first_height < line_height {
            return Err(LayoutError::RegionTooShort {
                height: first_height,
                line_height,
            });
        }

        Ok(Frame {
            content,
            header_height,
            gutter_width,
            line_height,
            max_cells,
        })
    }
}

fn digits(n: usize) -> usize {
    n.max(1).ilog10() as usize + 1
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Named area of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Header,
    LineNumbers,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRegion {
    pub rect: Rect,
    pub kind: RegionKind,
}

/// One rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    /// Line number as printed in the gutter.
    pub source_line_number: usize,
    /// Zero-based index into the input lines.
    pub line_index: usize,
    /// Byte range of `text` within its source line.
    pub byte_range: Range<usize>,
    pub text: String,
    pub x: u32,
    pub y: u32,
    /// Estimated rendered width.
    pub width: u32,
    pub height: u32,
    pub is_wrapped_continuation: bool,
    /// Source line number this piece continues, for continuations.
    pub continuation_of: Option<usize>,
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// 1-based.
    pub page_number: usize,
    pub page_size: PageSize,
    pub margins: Sides,
    pub metrics: FontMetrics,
    pub regions: Vec<LayoutRegion>,
    pub lines: Vec<LineLayout>,
    /// Present on the first page only, when metadata is shown.
    pub metadata: Option<CodeMetadata>,
}

impl PageLayout {
    #[must_use]
    pub fn region(&self, kind: RegionKind) -> Option<&LayoutRegion> {
        self.regions.iter().find(|r| r.kind == kind)
    }

    /// The code body. Every page has one.
    #[must_use]
    pub fn code_region(&self) -> Rect {
        self.region(RegionKind::Code)
            .map(|r| r.rect)
            .unwrap_or_default()
    }

    /// Header lines to print on this page.
    #[must_use]
    pub fn header_lines(&self) -> Vec<String> {
        self.metadata
            .as_ref()
            .map(CodeMetadata::populated_fields)
            .unwrap_or_default()
    }
}

/// Aggregate numbers for debugging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutSummary {
    pub page_count: usize,
    /// Distinct source lines placed.
    pub line_count: usize,
    /// All `LineLayout`s, continuations included.
    pub placed_lines: usize,
    pub wrapped_lines: usize,
    pub regions: Vec<(usize, RegionKind, Rect)>,
}

impl LayoutSummary {
    #[must_use]
    pub fn from_pages(pages: &[PageLayout]) -> Self {
        let mut summary = Self {
            page_count: pages.len(),
            ..Self::default()
        };
        for page in pages {
            for region in &page.regions {
                summary
                    .regions
                    .push((page.page_number, region.kind, region.rect));
            }
            for line in &page.lines {
                summary.placed_lines += 1;
                if line.is_wrapped_continuation {
                    summary.wrapped_lines += 1;
                } else {
                    summary.line_count += 1;
                }
            }
        }
        summary
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

struct LayoutState<'a> {
    config: &'a LayoutConfig,
    frame: Frame,
    metadata: Option<&'a CodeMetadata>,
    page_number: usize,
    code: Rect,
    cursor_y: u32,
    page: PageLayout,
    emitted: Vec<PageLayout>,
}

impl<'a> LayoutState<'a> {
    fn new(config: &'a LayoutConfig, frame: Frame, metadata: Option<&'a CodeMetadata>) -> Self {
        let mut state = Self {
            config,
            frame,
            metadata,
            page_number: 0,
            code: Rect::default(),
            cursor_y: 0,
            page: PageLayout {
                page_number: 0,
                page_size: config.page_size,
                margins: config.margins,
                metrics: config.metrics,
                regions: Vec::new(),
                lines: Vec::new(),
                metadata: None,
            },
            emitted: Vec::new(),
        };
        state.open_page();
        state
    }

    fn open_page(&mut self) {
        self.page_number += 1;
        let first = self.page_number == 1;
        let mut regions = Vec::with_capacity(3);

        let mut body = self.frame.content;
        if first && self.frame.header_height > 0 {
            let (header, rest) = body.split_top(self.frame.header_height);
            regions.push(LayoutRegion {
                rect: header,
                kind: RegionKind::Header,
            });
            body = rest;
        }
        if self.frame.gutter_width > 0 {
            let (gutter, rest) = body.split_left(self.frame.gutter_width);
            regions.push(LayoutRegion {
                rect: gutter,
                kind: RegionKind::LineNumbers,
            });
            body = rest;
        }
        regions.push(LayoutRegion {
            rect: body,
            kind: RegionKind::Code,
        });

        self.code = body;
        self.cursor_y = body.y;
        self.page = PageLayout {
            page_number: self.page_number,
            page_size: self.config.page_size,
            margins: self.config.margins,
            metrics: self.config.metrics,
            regions,
            lines: Vec::new(),
            metadata: if first && self.frame.header_height > 0 {
                self.metadata.cloned()
            } else {
                None
            },
        };
    }

    fn start_next_page(&mut self) {
        let next = self.page_number + 1;
        let closed = std::mem::replace(
            &mut self.page,
            PageLayout {
                page_number: next,
                page_size: self.config.page_size,
                margins: self.config.margins,
                metrics: self.config.metrics,
                regions: Vec::new(),
                lines: Vec::new(),
                metadata: None,
            },
        );
        debug!(
            page = closed.page_number,
            lines = closed.lines.len(),
            "page closed"
        );
        self.emitted.push(closed);
        self.open_page();
    }

    fn remaining_height(&self) -> u32 {
        self.code.bottom().saturating_sub(self.cursor_y)
    }

    fn place(&mut self, mut line: LineLayout) {
        if self.remaining_height() < self.frame.line_height {
            self.start_next_page();
        }
        line.x = self.code.x;
        line.y = self.cursor_y;
        line.height = self.frame.line_height;
        self.cursor_y += self.frame.line_height;
        self.page.lines.push(line);
    }

    fn into_pages(mut self) -> Vec<PageLayout> {
        debug!(
            page = self.page.page_number,
            lines = self.page.lines.len(),
            "page closed"
        );
        self.emitted.push(self.page);
        self.emitted
    }
}

/// Lay out `lines` onto pages.
///
/// Lines must not contain line breaks. Line numbers start at
/// `metadata.line_start` when it is positive, else at 1. An empty input
/// produces one empty page.
pub fn layout<S: AsRef<str>>(
    lines: &[S],
    metadata: Option<&CodeMetadata>,
    config: &LayoutConfig,
) -> Result<Vec<PageLayout>, LayoutError> {
    let _span = debug_span!(
        "inkpress.layout",
        lines = lines.len(),
        page_size = %config.page_size
    )
    .entered();

    let frame = config.frame(metadata, lines.len())?;
    let first_number = metadata.map_or(1, CodeMetadata::first_line_number);
    let mut state = LayoutState::new(config, frame, metadata);

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let number = first_number + index;
        for (piece, range) in wrap_ranges(line, frame.max_cells).into_iter().enumerate() {
            let text = &line[range.clone()];
            state.place(LineLayout {
                source_line_number: number,
                line_index: index,
                byte_range: range,
                text: text.to_string(),
                x: 0,
                y: 0,
                width: config.metrics.cells_to_px(display_cells(text.trim_end())),
                height: 0,
                is_wrapped_continuation: piece > 0,
                continuation_of: (piece > 0).then_some(number),
            });
        }
    }

    Ok(state.into_pages())
}

/// A reusable layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutCalculator {
    config: LayoutConfig,
}

impl LayoutCalculator {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn validate(
        &self,
        metadata: Option<&CodeMetadata>,
        line_count: usize,
    ) -> Result<(), LayoutError> {
        self.config.validate(metadata, line_count)
    }

    pub fn layout<S: AsRef<str>>(
        &self,
        lines: &[S],
        metadata: Option<&CodeMetadata>,
    ) -> Result<Vec<PageLayout>, LayoutError> {
        layout(lines, metadata, &self.config)
    }

    /// Lay out and summarize.
    pub fn summarize<S: AsRef<str>>(
        &self,
        lines: &[S],
        metadata: Option<&CodeMetadata>,
    ) -> Result<LayoutSummary, LayoutError> {
        Ok(LayoutSummary::from_pages(&self.layout(lines, metadata)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    /// 10px characters, 20px lines, no margins or gutter.
    fn simple(width: u32, height: u32) -> LayoutConfig {
        LayoutConfig {
            page_size: PageSize::Custom { width, height },
            margins: Sides::all(0),
            metrics: FontMetrics::new(20, 1.0, 0.5),
            show_line_numbers: false,
            show_metadata: false,
            gutter_padding: 0,
            default_gutter_digits: 5,
        }
    }

    // -- wrapping -----------------------------------------------------------

    #[test]
    fn long_line_wraps_into_three() {
        let line = "x".repeat(200);
        let pages = layout(&[line.as_str()], None, &simple(800, 1000)).unwrap();
        assert_eq!(pages.len(), 1);
        let lines = &pages[0].lines;
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.source_line_number == 1));
        assert!(!lines[0].is_wrapped_continuation);
        assert!(lines[1].is_wrapped_continuation);
        assert_eq!(lines[2].continuation_of, Some(1));
        assert_eq!(lines[0].width, 800);
        assert_eq!(lines[2].byte_range, 160..200);
    }

    #[test]
    fn words_wrap_without_blank_rows() {
        let line = format!("{} {} {}", "a".repeat(80), "b".repeat(80), "c".repeat(38));
        let pages = layout(&[line.as_str()], None, &simple(800, 1000)).unwrap();
        let lines = &pages[0].lines;
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| !l.text.trim().is_empty()));
        assert!(lines[1].text.starts_with('b'));
        // The space hanging off each row is not part of its width.
        assert_eq!(lines[0].width, 800);
        assert_eq!(lines[2].width, 380);
    }

    #[test]
    fn short_lines_are_not_wrapped() {
        let pages = layout(&["a", "bb", "ccc"], None, &simple(800, 1000)).unwrap();
        let lines = &pages[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].y, 20);
        assert_eq!(lines[2].width, 30);
        assert!(lines.iter().all(|l| l.continuation_of.is_none()));
    }

    // -- pagination ---------------------------------------------------------

    #[test]
    fn paginates_when_page_full() {
        let lines: Vec<String> = (0..12).map(|i| format!("line {i}")).collect();
        let pages = layout(&lines, None, &simple(400, 100)).unwrap();
        // 5 lines per page.
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines.len(), 5);
        assert_eq!(pages[2].lines.len(), 2);
        assert_eq!(pages[1].lines[0].source_line_number, 6);
        assert_eq!(pages[1].lines[0].y, 0);
        assert_eq!(
            pages.iter().map(|p| p.page_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn wrapped_line_continues_on_next_page() {
        let line = "y".repeat(100);
        // 10 cells per line, 3 lines per page.
        let pages = layout(&[line.as_str()], None, &simple(100, 60)).unwrap();
        assert_eq!(pages.len(), 4);
        assert!(!pages[0].lines[0].is_wrapped_continuation);
        assert!(pages[1].lines[0].is_wrapped_continuation);
        assert_eq!(pages[3].lines.len(), 1);
    }

    #[test]
    fn empty_input_yields_one_empty_page() {
        let pages = layout::<&str>(&[], None, &simple(400, 100)).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
        assert_eq!(pages[0].code_region(), Rect::new(0, 0, 400, 100));
    }

    #[test]
    fn empty_lines_still_take_a_row() {
        let pages = layout(&["", "", "x"], None, &simple(400, 100)).unwrap();
        assert_eq!(pages[0].lines.len(), 3);
        assert_eq!(pages[0].lines[0].width, 0);
        assert_eq!(pages[0].lines[2].y, 40);
    }

    // -- regions ------------------------------------------------------------

    #[test]
    fn header_only_on_first_page() {
        let meta = CodeMetadata::new("a.py", "python").with_lines(1, 40);
        let config = simple(400, 100).with_metadata(true);
        let lines: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let pages = layout(&lines, Some(&meta), &config).unwrap();

        let header = pages[0].region(RegionKind::Header).unwrap();
        // File, Language, Lines.
        assert_eq!(header.rect, Rect::new(0, 0, 400, 60));
        assert_eq!(pages[0].code_region().y, 60);
        assert_eq!(pages[0].lines.len(), 2);
        assert_eq!(pages[0].header_lines().len(), 3);

        assert!(pages[1].region(RegionKind::Header).is_none());
        assert!(pages[1].metadata.is_none());
        assert_eq!(pages[1].code_region().y, 0);
        assert_eq!(pages[1].lines.len(), 5);
    }

    #[test]
    fn metadata_hidden_reserves_no_header() {
        let meta = CodeMetadata::new("a.py", "python");
        let pages = layout(&["x"], Some(&meta), &simple(400, 100)).unwrap();
        assert!(pages[0].region(RegionKind::Header).is_none());
        assert!(pages[0].metadata.is_none());
    }

    #[test]
    fn gutter_uses_line_end_digits() {
        let meta = CodeMetadata::new("a.py", "python").with_lines(995, 1003);
        let config = simple(400, 1000).with_line_numbers(true);
        let pages = layout(&["a", "b"], Some(&meta), &config).unwrap();
        let gutter = pages[0].region(RegionKind::LineNumbers).unwrap();
        // 4 digits + 1 cell at 10px.
        assert_eq!(gutter.rect.width, 50);
        assert_eq!(pages[0].code_region().x, 50);
        assert_eq!(pages[0].lines[0].x, 50);
        assert_eq!(pages[0].lines[0].source_line_number, 995);
    }

    #[test]
    fn gutter_default_digits_without_line_end() {
        let config = simple(400, 1000).with_line_numbers(true);
        let pages = layout(&["a"], None, &config).unwrap();
        let gutter = pages[0].region(RegionKind::LineNumbers).unwrap();
        assert_eq!(gutter.rect.width, 60);
    }

    #[test]
    fn gutter_grows_past_default_for_long_inputs() {
        let mut config = simple(2000, 100).with_line_numbers(true);
        config.default_gutter_digits = 2;
        let lines = vec!["x"; 150];
        let pages = layout(&lines, None, &config).unwrap();
        let gutter = pages[0].region(RegionKind::LineNumbers).unwrap();
        assert_eq!(gutter.rect.width, 40);
    }

    #[test]
    fn margins_shrink_content() {
        let config = simple(400, 200).with_margins(Sides::new(10, 20, 30, 40));
        let pages = layout(&["x"], None, &config).unwrap();
        assert_eq!(pages[0].code_region(), Rect::new(40, 10, 340, 160));
    }

    // -- validation ---------------------------------------------------------

    #[test]
    fn too_narrow_is_reported_before_layout() {
        let config = simple(400, 100).with_margins(Sides::symmetric(0, 196));
        let err = layout(&["x"], None, &config).unwrap_err();
        assert!(matches!(err, LayoutError::RegionTooNarrow { width: 8, .. }));
    }

    #[test]
    fn too_short_is_reported() {
        let err = simple(400, 10).validate(None, 1).unwrap_err();
        assert_eq!(
            err,
            LayoutError::RegionTooShort {
                height: 10,
                line_height: 20
            }
        );
    }

    #[test]
    fn header_that_fills_page_is_too_short() {
        let meta = CodeMetadata::new("a", "b").with_author("c");
        let config = simple(400, 60).with_metadata(true);
        assert!(matches!(
            config.validate(Some(&meta), 1),
            Err(LayoutError::RegionTooShort { height: 0, .. })
        ));
    }

    #[test]
    fn invalid_metrics_are_reported() {
        let config = simple(400, 100).with_metrics(FontMetrics::new(0, 1.0, 0.5));
        assert!(matches!(
            config.validate(None, 0),
            Err(LayoutError::InvalidMetrics(_))
        ));
    }

    // -- summary ------------------------------------------------------------

    #[test]
    #[traced_test]
    fn summary_counts() {
        let calc = LayoutCalculator::new(simple(100, 60));
        let long = "z".repeat(25);
        let summary = calc.summarize(&["a", long.as_str(), "b"], None).unwrap();
        assert_eq!(summary.page_count, 2);
        assert_eq!(summary.line_count, 3);
        assert_eq!(summary.placed_lines, 5);
        assert_eq!(summary.wrapped_lines, 2);
        assert_eq!(summary.regions.len(), 2);
        assert!(logs_contain("page closed"));
    }

    #[test]
    fn layout_is_deterministic() {
        let lines: Vec<String> = (0..50).map(|i| "word ".repeat(i % 9)).collect();
        let config = LayoutConfig::default();
        let a = layout(&lines, None, &config).unwrap();
        let b = layout(&lines, None, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn default_config_fits_seventy_columns() {
        let config = LayoutConfig::default();
        let line = "m".repeat(70);
        let pages = layout(&[line.as_str()], None, &config).unwrap();
        assert_eq!(pages[0].lines.len(), 1);
    }
}

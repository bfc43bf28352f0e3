#![forbid(unsafe_code)]

//! Token and layout merging.

use std::fmt;
use std::ops::Range;

use inkpress_core::token::{Token, TokenKind};
use inkpress_layout::{LineLayout, PageLayout, RegionKind, display_cells, line_ranges, wrap_ranges};
use inkpress_style::{ColorProfile, Rgb, Theme};
use tracing::{debug_span, trace};

use crate::escape::{EscapeMode, Escaper};
use crate::primitive::{DrawPrimitive, Outline, PagePrimitives, RunRole, TextRun};

/// Renderer switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Emit an outline for every layout region.
    pub debug_outlines: bool,
    pub color_profile: ColorProfile,
    pub escape: EscapeMode,
}

/// Emits draw primitives from tokens, page layouts and a theme.
pub struct Renderer {
    options: RenderOptions,
    escaper: Box<dyn Escaper>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Renderer {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            escaper: options.escape.escaper(),
            options,
        }
    }

    /// Replace the escaper chosen by [`RenderOptions::escape`].
    #[must_use]
    pub fn with_escaper(mut self, escaper: Box<dyn Escaper>) -> Self {
        self.escaper = escaper;
        self
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render every page.
    ///
    /// `tokens` must cover `source`, and `pages` must have been laid out
    /// from the lines of `source`.
    #[must_use]
    pub fn render(
        &self,
        source: &str,
        tokens: &[Token<'_>],
        pages: &[PageLayout],
        theme: &Theme,
    ) -> Vec<PagePrimitives> {
        let _span = debug_span!("inkpress.render", pages = pages.len(), theme = theme.name()).entered();
        let lines = line_ranges(source);
        pages
            .iter()
            .map(|page| self.render_page(source, tokens, &lines, page, theme))
            .collect()
    }

    fn render_page(
        &self,
        source: &str,
        tokens: &[Token<'_>],
        lines: &[Range<usize>],
        page: &PageLayout,
        theme: &Theme,
    ) -> PagePrimitives {
        let mut primitives = Vec::new();
        self.emit_header(page, theme, &mut primitives);

        let gutter = page.region(RegionKind::LineNumbers).map(|r| r.rect);
        for line in &page.lines {
            if let Some(gutter) = gutter
                && !line.is_wrapped_continuation
            {
                let number = line.source_line_number.to_string();
                let metrics = page.metrics;
                let width = metrics.cells_to_px(number.len()) + metrics.cells_to_px(1);
                let x = gutter.right().saturating_sub(width).max(gutter.x);
                primitives.push(DrawPrimitive::Text(TextRun {
                    value: number,
                    x,
                    y: line.y,
                    color: self.color(theme.line_number()),
                    size: metrics.font_size,
                    role: RunRole::LineNumber,
                }));
            }
            let Some(line_range) = lines.get(line.line_index) else {
                continue;
            };
            self.emit_line(source, tokens, line_range.start, line, page, theme, &mut primitives);
        }

        if self.options.debug_outlines {
            for region in &page.regions {
                primitives.push(DrawPrimitive::Outline(Outline {
                    rect: region.rect,
                    color: self.color(theme.line_number()),
                    region: region.kind,
                }));
            }
        }

        trace!(page = page.page_number, primitives = primitives.len(), "page rendered");
        PagePrimitives {
            page_number: page.page_number,
            primitives,
        }
    }

    fn emit_header(&self, page: &PageLayout, theme: &Theme, out: &mut Vec<DrawPrimitive>) {
        let Some(header) = page.region(RegionKind::Header) else {
            return;
        };
        let metrics = page.metrics;
        let line_height = metrics.line_height();
        let max_cells = metrics.max_cells(header.rect.width);
        for (i, text) in page.header_lines().iter().enumerate() {
            // Header fields are clipped to one row each.
            let visible = wrap_ranges(text, max_cells)
                .into_iter()
                .next()
                .map_or("", |r| text[r].trim_end());
            out.push(DrawPrimitive::Text(TextRun {
                value: self.escaper.escape(visible).into_owned(),
                x: header.rect.x,
                y: header.rect.y + i as u32 * line_height,
                color: self.color(theme.header()),
                size: metrics.font_size,
                role: RunRole::Header,
            }));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_line(
        &self,
        source: &str,
        tokens: &[Token<'_>],
        line_start: usize,
        line: &LineLayout,
        page: &PageLayout,
        theme: &Theme,
        out: &mut Vec<DrawPrimitive>,
    ) {
        let span = line_start + line.byte_range.start..line_start + line.byte_range.end;
        let first = tokens.partition_point(|t| t.end <= span.start);
        let mut cells = 0;

        for token in tokens[first..].iter().take_while(|t| t.start < span.end) {
            let start = token.start.max(span.start);
            let end = token.end.min(span.end);
            if start >= end {
                continue;
            }
            let text = &source[start..end];
            let x = line.x + page.metrics.cells_to_px(cells);
            cells += display_cells(text);
            if token.kind == TokenKind::Whitespace || text.trim().is_empty() {
                continue;
            }
            // Whitespace at the end of a row is not drawn.
            let text = if end == span.end { text.trim_end() } else { text };
            out.push(DrawPrimitive::Text(TextRun {
                value: self.escaper.escape(text).into_owned(),
                x,
                y: line.y,
                color: self.color(theme.color(token.kind)),
                size: page.metrics.font_size,
                role: RunRole::Code(token.kind),
            }));
        }
    }

    fn color(&self, rgb: Rgb) -> Rgb {
        rgb.downgrade(self.options.color_profile)
    }
}

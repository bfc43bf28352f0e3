//! Compiled documents.

use std::sync::Arc;

use inkpress_core::geometry::Rect;
use inkpress_layout::{LayoutSummary, PageLayout, RegionKind};
use inkpress_render::{DrawPrimitive, PagePrimitives, TextRun};
use inkpress_style::Theme;
use inkpress_syntax::ScanDiagnostic;

use crate::writer::ScriptWriter;

/// Aggregate numbers for one compiled document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentSummary {
    pub page_count: usize,
    /// Source lines placed.
    pub line_count: usize,
    /// Continuation rows produced by wrapping.
    pub wrapped_lines: usize,
    pub token_count: usize,
    pub primitive_count: usize,
    /// `(page_number, kind, rect)` for every region of every page.
    pub regions: Vec<(usize, RegionKind, Rect)>,
}

impl DocumentSummary {
    #[must_use]
    pub fn new(pages: &[PageLayout], primitives: &[PagePrimitives], token_count: usize) -> Self {
        let layout = LayoutSummary::from_pages(pages);
        Self {
            page_count: layout.page_count,
            line_count: layout.line_count,
            wrapped_lines: layout.wrapped_lines,
            token_count,
            primitive_count: primitives.iter().map(PagePrimitives::len).sum(),
            regions: layout.regions,
        }
    }
}

/// The output of one compilation: tab-expanded source, page layouts and
/// draw primitives per page.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    /// Source after tab expansion; the text every position refers to.
    pub source: String,
    /// Name of the rule set that scanned the source.
    pub language: String,
    pub theme: Arc<Theme>,
    pub pages: Vec<PageLayout>,
    /// One entry per page, in page order.
    pub primitives: Vec<PagePrimitives>,
    pub summary: DocumentSummary,
    /// Recoverable scanner problems.
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl CompiledDocument {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text runs, page by page.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.primitives.iter().flat_map(PagePrimitives::text_runs)
    }

    /// Replay the document into `writer`.
    pub fn write_to<W: ScriptWriter + ?Sized>(&self, writer: &mut W) -> Result<(), W::Error> {
        writer.begin_document(&self.summary, &self.theme)?;
        for (page, primitives) in self.pages.iter().zip(&self.primitives) {
            writer.begin_page(page)?;
            for primitive in &primitives.primitives {
                match primitive {
                    DrawPrimitive::Text(run) => writer.text_run(run)?,
                    DrawPrimitive::Outline(outline) => writer.outline(outline)?,
                }
            }
            writer.end_page(page)?;
        }
        writer.finish()
    }
}

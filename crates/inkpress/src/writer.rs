//! The boundary to output-script writers.
//!
//! A [`ScriptWriter`] receives a compiled document as a stream of events:
//! one `begin_document`, then per page a `begin_page`, the page's primitives
//! in drawing order and an `end_page`, then `finish`. Text values arrive
//! already escaped by the renderer's [`EscapeMode`](inkpress_render::EscapeMode).

use std::fmt::{self, Write};

use inkpress_layout::PageLayout;
use inkpress_render::{Outline, TextRun};
use inkpress_style::Theme;

use crate::document::DocumentSummary;

/// Consumer of compiled pages.
pub trait ScriptWriter {
    type Error;

    fn begin_document(&mut self, summary: &DocumentSummary, theme: &Theme) -> Result<(), Self::Error>;

    fn begin_page(&mut self, page: &PageLayout) -> Result<(), Self::Error>;

    fn text_run(&mut self, run: &TextRun) -> Result<(), Self::Error>;

    fn outline(&mut self, outline: &Outline) -> Result<(), Self::Error>;

    fn end_page(&mut self, page: &PageLayout) -> Result<(), Self::Error>;

    fn finish(&mut self) -> Result<(), Self::Error>;
}

/// Line-oriented dump of every event, for debugging and golden tests.
///
/// ```text
/// document pages=1 lines=1 theme=dark background=#1e1e1e
/// page 1 1404x1872
/// text 72 60 #569cd6 26 "def"
/// end page 1
/// end document
/// ```
#[derive(Debug, Default)]
pub struct DebugScript<W: Write = String> {
    out: W,
}

impl DebugScript<String> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Write> DebugScript<W> {
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ScriptWriter for DebugScript<W> {
    type Error = fmt::Error;

    fn begin_document(&mut self, summary: &DocumentSummary, theme: &Theme) -> fmt::Result {
        writeln!(
            self.out,
            "document pages={} lines={} theme={} background={}",
            summary.page_count,
            summary.line_count,
            theme.name(),
            theme.background().to_hex()
        )
    }

    fn begin_page(&mut self, page: &PageLayout) -> fmt::Result {
        let size = page.page_size.size();
        writeln!(self.out, "page {} {}x{}", page.page_number, size.width, size.height)
    }

    fn text_run(&mut self, run: &TextRun) -> fmt::Result {
        writeln!(
            self.out,
            "text {} {} {} {} \"{}\"",
            run.x,
            run.y,
            run.color.to_hex(),
            run.size,
            run.value
        )
    }

    fn outline(&mut self, outline: &Outline) -> fmt::Result {
        let r = outline.rect;
        writeln!(
            self.out,
            "outline {} {} {} {} {} {:?}",
            r.x,
            r.y,
            r.width,
            r.height,
            outline.color.to_hex(),
            outline.region
        )
    }

    fn end_page(&mut self, page: &PageLayout) -> fmt::Result {
        writeln!(self.out, "end page {}", page.page_number)
    }

    fn finish(&mut self) -> fmt::Result {
        writeln!(self.out, "end document")
    }
}

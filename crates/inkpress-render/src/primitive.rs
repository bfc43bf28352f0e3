//! Draw primitives handed to script writers.

use inkpress_core::geometry::Rect;
use inkpress_core::token::TokenKind;
use inkpress_layout::RegionKind;
use inkpress_style::Rgb;

/// What a text run represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunRole {
    Code(TokenKind),
    LineNumber,
    Header,
}

/// Positioned, colored text. `(x, y)` is the top-left corner of the run's
/// line box, in page pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Escaped for the output format.
    pub value: String,
    pub x: u32,
    pub y: u32,
    pub color: Rgb,
    /// Font size in pixels.
    pub size: u32,
    pub role: RunRole,
}

/// Region outline for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outline {
    pub rect: Rect,
    pub color: Rgb,
    pub region: RegionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawPrimitive {
    Text(TextRun),
    Outline(Outline),
}

impl DrawPrimitive {
    #[must_use]
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Self::Text(run) => Some(run),
            Self::Outline(_) => None,
        }
    }
}

/// Primitives of one page, in drawing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePrimitives {
    pub page_number: usize,
    pub primitives: Vec<DrawPrimitive>,
}

impl PagePrimitives {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.primitives.iter().filter_map(DrawPrimitive::as_text)
    }

    pub fn outlines(&self) -> impl Iterator<Item = &Outline> {
        self.primitives.iter().filter_map(|p| match p {
            DrawPrimitive::Outline(o) => Some(o),
            DrawPrimitive::Text(_) => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

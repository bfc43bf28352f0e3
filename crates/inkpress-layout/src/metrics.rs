//! Page sizes, font metrics and text width estimation.

use std::fmt;

use inkpress_core::geometry::Size;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

// ---------------------------------------------------------------------------
// PageSize
// ---------------------------------------------------------------------------

/// Device canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    /// reMarkable 2: 1404 × 1872.
    #[default]
    RemarkableTwo,
    /// reMarkable Paper Pro: 1620 × 2160.
    PaperPro,
    Custom { width: u32, height: u32 },
}

impl PageSize {
    #[must_use]
    pub const fn size(self) -> Size {
        match self {
            Self::RemarkableTwo => Size::new(1404, 1872),
            Self::PaperPro => Size::new(1620, 2160),
            Self::Custom { width, height } => Size::new(width, height),
        }
    }

    /// Parse `rm2`, `remarkable2`, `paper-pro`, `pro` or `WIDTHxHEIGHT`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "rm2" | "remarkable2" | "remarkable-2" => Some(Self::RemarkableTwo),
            "pro" | "paper-pro" | "paperpro" => Some(Self::PaperPro),
            other => {
                let (w, h) = other.split_once('x')?;
                let width = w.trim().parse().ok()?;
                let height = h.trim().parse().ok()?;
                (width > 0 && height > 0).then_some(Self::Custom { width, height })
            }
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemarkableTwo => f.write_str("rm2"),
            Self::PaperPro => f.write_str("paper-pro"),
            Self::Custom { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

// ---------------------------------------------------------------------------
// FontMetrics
// ---------------------------------------------------------------------------

/// Monospace font metrics used to estimate text extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Font size in pixels.
    pub font_size: u32,
    pub line_height_multiplier: f32,
    /// Average character advance as a fraction of the font size.
    pub char_width_ratio: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            font_size: 26,
            line_height_multiplier: 1.4,
            char_width_ratio: 0.6,
        }
    }
}

impl FontMetrics {
    #[must_use]
    pub const fn new(font_size: u32, line_height_multiplier: f32, char_width_ratio: f32) -> Self {
        Self {
            font_size,
            line_height_multiplier,
            char_width_ratio,
        }
    }

    /// Line pitch in pixels, at least 1.
    #[must_use]
    pub fn line_height(&self) -> u32 {
        let px = (self.font_size as f32 * self.line_height_multiplier).round();
        if px.is_finite() && px >= 1.0 {
            px as u32
        } else {
            1
        }
    }

    /// Average character advance in pixels.
    #[must_use]
    pub fn char_width(&self) -> f32 {
        self.font_size as f32 * self.char_width_ratio
    }

    /// Pixel width of `cells` display cells, rounded up.
    #[must_use]
    pub fn cells_to_px(&self, cells: usize) -> u32 {
        (cells as f64 * f64::from(self.char_width())).ceil() as u32
    }

    /// Largest cell count whose pixel width fits in `width`.
    #[must_use]
    pub fn max_cells(&self, width: u32) -> usize {
        let cw = f64::from(self.char_width());
        if !(cw.is_finite() && cw > 0.0) {
            return 0;
        }
        let mut cells = (f64::from(width) / cw).floor() as usize;
        // Float rounding can overshoot by one.
        while cells > 0 && self.cells_to_px(cells) > width {
            cells -= 1;
        }
        cells
    }

    /// Describe the first invalid field, if any.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.font_size == 0 {
            return Err("font size must be positive".into());
        }
        let mult = self.line_height_multiplier;
        if !mult.is_finite() || mult <= 0.0 {
            return Err(format!("line-height multiplier {mult} must be positive"));
        }
        let ratio = self.char_width_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(format!("char width ratio {ratio} must be positive"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Width
// ---------------------------------------------------------------------------

/// Display cells of one grapheme. Control characters take no space.
#[inline]
#[must_use]
pub fn grapheme_cells(grapheme: &str) -> usize {
    if grapheme.chars().all(char::is_control) {
        0
    } else {
        grapheme.width()
    }
}

/// Display cells of `text`.
#[must_use]
pub fn display_cells(text: &str) -> usize {
    if text.is_ascii() {
        return text.bytes().filter(|b| !b.is_ascii_control()).count();
    }
    text.graphemes(true).map(grapheme_cells).sum()
}

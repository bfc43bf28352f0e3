//! Layout configuration errors.

use std::fmt;

/// The page geometry cannot hold any text.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The code region cannot fit a single character.
    RegionTooNarrow { width: u32, char_width: f32 },
    /// The code region cannot fit a single line.
    RegionTooShort { height: u32, line_height: u32 },
    /// Font metrics are zero, negative or not finite.
    InvalidMetrics(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegionTooNarrow { width, char_width } => write!(
                f,
                "code region is {width}px wide, narrower than one {char_width}px character"
            ),
            Self::RegionTooShort {
                height,
                line_height,
            } => write!(
                f,
                "code region is {height}px tall, shorter than one {line_height}px line"
            ),
            Self::InvalidMetrics(msg) => write!(f, "invalid font metrics: {msg}"),
        }
    }
}

impl std::error::Error for LayoutError {}

//! Theme construction errors.

use std::fmt;

use inkpress_core::token::TokenKind;

/// A theme could not be built or registered.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeError {
    /// No color was given for this classification.
    MissingColor(TokenKind),
    /// A theme with this name is already registered.
    DuplicateTheme(String),
    /// Font size must be at least one pixel.
    InvalidFontSize(u32),
    /// Line-height multiplier must be finite and positive.
    InvalidLineHeight(f32),
    /// Not a `#rrggbb` or `#rgb` color.
    InvalidColor(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColor(kind) => write!(f, "theme has no color for `{kind}`"),
            Self::DuplicateTheme(name) => write!(f, "theme `{name}` is already registered"),
            Self::InvalidFontSize(size) => write!(f, "invalid font size {size}"),
            Self::InvalidLineHeight(mult) => write!(f, "invalid line-height multiplier {mult}"),
            Self::InvalidColor(value) => write!(f, "invalid color `{value}`"),
        }
    }
}

impl std::error::Error for ThemeError {}

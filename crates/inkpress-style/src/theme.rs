//! Themes: a complete classification-to-color table plus font settings.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::color::Rgb;
use crate::error::ThemeError;
use inkpress_core::token::TokenKind;

pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans Mono";
pub const DEFAULT_FONT_SIZE: u32 = 26;
pub const DEFAULT_LINE_HEIGHT: f32 = 1.4;

/// A named, immutable theme.
///
/// The color table is indexed by [`TokenKind::index`] and has one slot per
/// kind, so [`Theme::color`] is total.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    name: String,
    colors: [Rgb; TokenKind::COUNT],
    font_family: String,
    font_size: u32,
    line_height_multiplier: f32,
    background: Rgb,
    foreground: Rgb,
    line_number: Rgb,
    header: Rgb,
}

impl Theme {
    /// A theme from a complete color table, with default fonts.
    ///
    /// Page chrome colors derive from the table: the foreground is the
    /// identifier color, line numbers and the header use the comment color.
    #[must_use]
    pub fn new(name: impl Into<String>, colors: [Rgb; TokenKind::COUNT], background: Rgb) -> Self {
        let foreground = colors[TokenKind::Identifier.index()];
        let muted = colors[TokenKind::Comment.index()];
        Self {
            name: name.into(),
            colors,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height_multiplier: DEFAULT_LINE_HEIGHT,
            background,
            foreground,
            line_number: muted,
            header: muted,
        }
    }

    /// Start a theme from scratch.
    pub fn builder(name: impl Into<String>) -> ThemeBuilder {
        ThemeBuilder::new(name)
    }

    /// Build from a map that must contain every classification.
    pub fn from_map<S: BuildHasher>(
        name: impl Into<String>,
        colors: &HashMap<TokenKind, Rgb, S>,
        background: Rgb,
    ) -> Result<Self, ThemeError> {
        colors
            .iter()
            .fold(ThemeBuilder::new(name), |b, (kind, rgb)| b.color(*kind, *rgb))
            .background(background)
            .build()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color for `kind`.
    #[inline]
    #[must_use]
    pub fn color(&self, kind: TokenKind) -> Rgb {
        self.colors[kind.index()]
    }

    #[must_use]
    pub fn colors(&self) -> &[Rgb; TokenKind::COUNT] {
        &self.colors
    }

    #[must_use]
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font size in pixels.
    #[must_use]
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    #[must_use]
    pub fn line_height_multiplier(&self) -> f32 {
        self.line_height_multiplier
    }

    #[must_use]
    pub fn background(&self) -> Rgb {
        self.background
    }

    #[must_use]
    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    /// Gutter line-number color.
    #[must_use]
    pub fn line_number(&self) -> Rgb {
        self.line_number
    }

    /// Metadata header color.
    #[must_use]
    pub fn header(&self) -> Rgb {
        self.header
    }
}

// ---------------------------------------------------------------------------
// ThemeBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Theme`]. [`ThemeBuilder::build`] fails if any
/// classification is left without a color.
#[derive(Debug, Clone)]
pub struct ThemeBuilder {
    name: String,
    colors: [Option<Rgb>; TokenKind::COUNT],
    font_family: String,
    font_size: u32,
    line_height_multiplier: f32,
    background: Rgb,
    foreground: Option<Rgb>,
    line_number: Option<Rgb>,
    header: Option<Rgb>,
}

impl ThemeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: [None; TokenKind::COUNT],
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height_multiplier: DEFAULT_LINE_HEIGHT,
            background: Rgb::WHITE,
            foreground: None,
            line_number: None,
            header: None,
        }
    }

    /// Start from an existing theme under a new name.
    pub fn from_theme(theme: &Theme, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: theme.colors.map(Some),
            font_family: theme.font_family.clone(),
            font_size: theme.font_size,
            line_height_multiplier: theme.line_height_multiplier,
            background: theme.background,
            foreground: Some(theme.foreground),
            line_number: Some(theme.line_number),
            header: Some(theme.header),
        }
    }

    #[must_use]
    pub fn color(mut self, kind: TokenKind, rgb: Rgb) -> Self {
        self.colors[kind.index()] = Some(rgb);
        self
    }

    /// Set several colors at once.
    #[must_use]
    pub fn colors(self, pairs: &[(TokenKind, Rgb)]) -> Self {
        pairs
            .iter()
            .fold(self, |builder, (kind, rgb)| builder.color(*kind, *rgb))
    }

    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn line_height(mut self, multiplier: f32) -> Self {
        self.line_height_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn background(mut self, rgb: Rgb) -> Self {
        self.background = rgb;
        self
    }

    #[must_use]
    pub fn foreground(mut self, rgb: Rgb) -> Self {
        self.foreground = Some(rgb);
        self
    }

    #[must_use]
    pub fn line_number(mut self, rgb: Rgb) -> Self {
        self.line_number = Some(rgb);
        self
    }

    #[must_use]
    pub fn header(mut self, rgb: Rgb) -> Self {
        self.header = Some(rgb);
        self
    }

    pub fn build(self) -> Result<Theme, ThemeError> {
        let mut colors = [Rgb::BLACK; TokenKind::COUNT];
        for kind in TokenKind::ALL {
            colors[kind.index()] = self.colors[kind.index()].ok_or(ThemeError::MissingColor(kind))?;
        }
        if self.font_size == 0 {
            return Err(ThemeError::InvalidFontSize(self.font_size));
        }
        let mult = self.line_height_multiplier;
        if !mult.is_finite() || mult <= 0.0 {
            return Err(ThemeError::InvalidLineHeight(mult));
        }

        let mut theme = Theme::new(self.name, colors, self.background);
        theme.font_family = self.font_family;
        theme.font_size = self.font_size;
        theme.line_height_multiplier = mult;
        if let Some(fg) = self.foreground {
            theme.foreground = fg;
        }
        if let Some(rgb) = self.line_number {
            theme.line_number = rgb;
        }
        if let Some(rgb) = self.header {
            theme.header = rgb;
        }
        Ok(theme)
    }
}

// ---------------------------------------------------------------------------
// Built-in themes
// ---------------------------------------------------------------------------

/// Built-in themes.
pub mod themes {
    use super::*;

    /// The default theme.
    #[must_use]
    pub fn default() -> Theme {
        dark()
    }

    /// Light text on a dark page.
    #[must_use]
    pub fn dark() -> Theme {
        Theme::new(
            "dark",
            [
                Rgb::new(0xc6, 0x78, 0xdd), // keyword
                Rgb::new(0x56, 0xb6, 0xc2), // builtin
                Rgb::new(0xd1, 0x9a, 0x66), // constant
                Rgb::new(0xe5, 0xc0, 0x7b), // type
                Rgb::new(0xab, 0xb2, 0xbf), // identifier
                Rgb::new(0x98, 0xc3, 0x79), // string
                Rgb::new(0xd1, 0x9a, 0x66), // number
                Rgb::new(0x7f, 0x84, 0x8e), // comment
                Rgb::new(0x56, 0xb6, 0xc2), // operator
                Rgb::new(0xab, 0xb2, 0xbf), // punctuation
                Rgb::new(0x61, 0xaf, 0xef), // annotation
                Rgb::new(0xab, 0xb2, 0xbf), // whitespace
                Rgb::new(0xe0, 0x6c, 0x75), // unrecognized
            ],
            Rgb::new(0x28, 0x2c, 0x34),
        )
    }

    /// Dark text on a white page.
    #[must_use]
    pub fn light() -> Theme {
        Theme::new(
            "light",
            [
                Rgb::new(0xa6, 0x26, 0xa4),
                Rgb::new(0x01, 0x84, 0xbc),
                Rgb::new(0x98, 0x68, 0x01),
                Rgb::new(0xc1, 0x84, 0x01),
                Rgb::new(0x38, 0x3a, 0x42),
                Rgb::new(0x50, 0xa1, 0x4f),
                Rgb::new(0x98, 0x68, 0x01),
                Rgb::new(0xa0, 0xa1, 0xa7),
                Rgb::new(0x01, 0x84, 0xbc),
                Rgb::new(0x38, 0x3a, 0x42),
                Rgb::new(0x40, 0x78, 0xf2),
                Rgb::new(0x38, 0x3a, 0x42),
                Rgb::new(0xe4, 0x56, 0x49),
            ],
            Rgb::WHITE,
        )
    }

    /// High-contrast grays for 16-level e-ink panels. Every color is a
    /// multiple of 17 so a grayscale downgrade leaves it unchanged.
    #[must_use]
    pub fn eink() -> Theme {
        Theme::new(
            "eink",
            [
                Rgb::gray(0x00),
                Rgb::gray(0x33),
                Rgb::gray(0x44),
                Rgb::gray(0x22),
                Rgb::gray(0x00),
                Rgb::gray(0x55),
                Rgb::gray(0x44),
                Rgb::gray(0x88),
                Rgb::gray(0x22),
                Rgb::gray(0x11),
                Rgb::gray(0x55),
                Rgb::gray(0x00),
                Rgb::gray(0x66),
            ],
            Rgb::WHITE,
        )
    }

    /// Every built-in theme, default first.
    #[must_use]
    pub fn all() -> Vec<Theme> {
        vec![dark(), light(), eink()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorProfile;
    use rustc_hash::FxHashMap;

    fn full_builder(name: &str) -> ThemeBuilder {
        TokenKind::ALL
            .iter()
            .fold(Theme::builder(name), |b, kind| {
                b.color(*kind, Rgb::gray(kind.index() as u8 * 10))
            })
    }

    // -- builder ------------------------------------------------------------

    #[test]
    fn builder_requires_every_kind() {
        let err = Theme::builder("partial")
            .color(TokenKind::Keyword, Rgb::BLACK)
            .build()
            .unwrap_err();
        assert_eq!(err, ThemeError::MissingColor(TokenKind::Builtin));
    }

    #[test]
    fn builder_complete_theme() {
        let theme = full_builder("custom")
            .font_size(30)
            .line_height(1.5)
            .font_family("Iosevka")
            .header(Rgb::BLACK)
            .build()
            .unwrap();
        assert_eq!(theme.name(), "custom");
        assert_eq!(theme.color(TokenKind::Number), Rgb::gray(60));
        assert_eq!(theme.font_size(), 30);
        assert_eq!(theme.line_height_multiplier(), 1.5);
        assert_eq!(theme.font_family(), "Iosevka");
        assert_eq!(theme.header(), Rgb::BLACK);
        assert_eq!(theme.foreground(), theme.color(TokenKind::Identifier));
        assert_eq!(theme.line_number(), theme.color(TokenKind::Comment));
    }

    #[test]
    fn builder_rejects_bad_font_settings() {
        assert_eq!(
            full_builder("t").font_size(0).build().unwrap_err(),
            ThemeError::InvalidFontSize(0)
        );
        assert!(matches!(
            full_builder("t").line_height(f32::NAN).build(),
            Err(ThemeError::InvalidLineHeight(_))
        ));
        assert!(matches!(
            full_builder("t").line_height(0.0).build(),
            Err(ThemeError::InvalidLineHeight(_))
        ));
    }

    #[test]
    fn from_theme_copies_everything() {
        let base = themes::light();
        let copy = ThemeBuilder::from_theme(&base, "light2").build().unwrap();
        assert_eq!(copy.name(), "light2");
        assert_eq!(copy.colors(), base.colors());
        assert_eq!(copy.background(), base.background());
    }

    #[test]
    fn from_map_checks_totality() {
        let mut map: FxHashMap<TokenKind, Rgb> = FxHashMap::default();
        for kind in TokenKind::ALL {
            map.insert(kind, Rgb::BLACK);
        }
        assert!(Theme::from_map("full", &map, Rgb::WHITE).is_ok());
        map.remove(&TokenKind::Comment);
        assert_eq!(
            Theme::from_map("gap", &map, Rgb::WHITE).unwrap_err(),
            ThemeError::MissingColor(TokenKind::Comment)
        );
    }

    // -- built-ins ----------------------------------------------------------

    #[test]
    fn builtin_names() {
        let names: Vec<_> = themes::all().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["dark", "light", "eink"]);
        assert_eq!(themes::default().name(), "dark");
    }

    #[test]
    fn eink_survives_grayscale_downgrade() {
        let theme = themes::eink();
        for kind in TokenKind::ALL {
            let c = theme.color(kind);
            assert_eq!(c.downgrade(ColorProfile::EINK), c, "{kind}");
        }
    }

    #[test]
    fn comments_differ_from_code_in_builtins() {
        for theme in themes::all() {
            assert_ne!(
                theme.color(TokenKind::Comment),
                theme.color(TokenKind::Keyword),
                "{}",
                theme.name()
            );
        }
    }
}

//! Compile configuration and environment overrides.

use std::env;
use std::fmt;

use inkpress_core::geometry::Sides;
use inkpress_layout::PageSize;
use inkpress_render::EscapeMode;
use inkpress_style::ColorProfile;

pub const ENV_PAGE_SIZE: &str = "INKPRESS_PAGE_SIZE";
pub const ENV_THEME: &str = "INKPRESS_THEME";
pub const ENV_FONT_SIZE: &str = "INKPRESS_FONT_SIZE";
pub const ENV_LINE_HEIGHT: &str = "INKPRESS_LINE_HEIGHT";
pub const ENV_CHAR_WIDTH: &str = "INKPRESS_CHAR_WIDTH";
pub const ENV_MARGIN: &str = "INKPRESS_MARGIN";
pub const ENV_LINE_NUMBERS: &str = "INKPRESS_LINE_NUMBERS";
pub const ENV_METADATA: &str = "INKPRESS_METADATA";
pub const ENV_DEBUG: &str = "INKPRESS_DEBUG";
pub const ENV_TAB_WIDTH: &str = "INKPRESS_TAB_WIDTH";
pub const ENV_GRAYSCALE: &str = "INKPRESS_GRAYSCALE";
pub const ENV_ESCAPE: &str = "INKPRESS_ESCAPE";

const MAX_TAB_WIDTH: usize = 16;

/// Settings for one [`Compiler`](crate::Compiler).
///
/// Font size and line height default to the active theme's values.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileConfig {
    pub page_size: PageSize,
    /// Theme activated at construction.
    pub theme: String,
    pub font_size: Option<u32>,
    pub line_height: Option<f32>,
    /// Character width as a fraction of the font size.
    pub char_width_ratio: f32,
    pub margins: Sides,
    pub show_line_numbers: bool,
    pub show_metadata: bool,
    /// Draw region outlines.
    pub debug: bool,
    /// Tabs expand to the next multiple of this column.
    pub tab_width: usize,
    pub color_profile: ColorProfile,
    pub escape: EscapeMode,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            theme: "dark".to_string(),
            font_size: None,
            line_height: None,
            char_width_ratio: 0.6,
            margins: Sides::all(60),
            show_line_numbers: true,
            show_metadata: true,
            debug: false,
            tab_width: 4,
            color_profile: ColorProfile::TrueColor,
            escape: EscapeMode::default(),
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct CompileConfigParse {
    pub config: CompileConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl CompileConfig {
    #[must_use]
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    #[must_use]
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_line_height(mut self, multiplier: f32) -> Self {
        self.line_height = Some(multiplier);
        self
    }

    #[must_use]
    pub fn with_char_width_ratio(mut self, ratio: f32) -> Self {
        self.char_width_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: impl Into<Sides>) -> Self {
        self.margins = margins.into();
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

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    #[must_use]
    pub fn with_color_profile(mut self, profile: ColorProfile) -> Self {
        self.color_profile = profile;
        self
    }

    #[must_use]
    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> CompileConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> CompileConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config from a variable lookup. Invalid values keep their
    /// defaults and are reported.
    pub fn from_env_with<F>(mut get: F) -> CompileConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = CompileConfig::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_PAGE_SIZE) {
            match PageSize::parse(&value) {
                Some(parsed) => config.page_size = parsed,
                None => errors.push(ConfigError::new(
                    "page_size",
                    value,
                    "expected rm2|paper-pro|WxH",
                )),
            }
        }

        if let Some(value) = get(ENV_THEME) {
            config.theme = value.trim().to_string();
        }

        if let Some(value) = get(ENV_FONT_SIZE) {
            match parse_u32(&value) {
                Some(parsed) => config.font_size = Some(parsed),
                None => errors.push(ConfigError::new(
                    "font_size",
                    value,
                    "expected positive integer",
                )),
            }
        }

        if let Some(value) = get(ENV_LINE_HEIGHT) {
            match parse_f32(&value) {
                Some(parsed) => config.line_height = Some(parsed),
                None => errors.push(ConfigError::new("line_height", value, "expected number")),
            }
        }

        if let Some(value) = get(ENV_CHAR_WIDTH) {
            match parse_f32(&value) {
                Some(parsed) => config.char_width_ratio = parsed,
                None => errors.push(ConfigError::new("char_width_ratio", value, "expected number")),
            }
        }

        if let Some(value) = get(ENV_MARGIN) {
            match parse_sides(&value) {
                Some(parsed) => config.margins = parsed,
                None => errors.push(ConfigError::new(
                    "margins",
                    value,
                    "expected N or top,right,bottom,left",
                )),
            }
        }

        for (key, field, slot) in [
            (ENV_LINE_NUMBERS, "show_line_numbers", &mut config.show_line_numbers),
            (ENV_METADATA, "show_metadata", &mut config.show_metadata),
            (ENV_DEBUG, "debug", &mut config.debug),
        ] {
            if let Some(value) = get(key) {
                match parse_bool(&value) {
                    Some(parsed) => *slot = parsed,
                    None => errors.push(ConfigError::new(
                        field,
                        value,
                        "expected bool (1/0/true/false)",
                    )),
                }
            }
        }

        if let Some(value) = get(ENV_TAB_WIDTH) {
            match parse_usize(&value) {
                Some(parsed) => config.tab_width = parsed,
                None => errors.push(ConfigError::new(
                    "tab_width",
                    value,
                    "expected positive integer",
                )),
            }
        }

        if let Some(value) = get(ENV_GRAYSCALE) {
            match value.trim().parse::<u8>() {
                Ok(levels) => config.color_profile = ColorProfile::from_levels(levels),
                Err(_) => errors.push(ConfigError::new(
                    "color_profile",
                    value,
                    "expected gray levels 0-255 (0 = full color)",
                )),
            }
        }

        if let Some(value) = get(ENV_ESCAPE) {
            match EscapeMode::parse(&value) {
                Some(parsed) => config.escape = parsed,
                None => errors.push(ConfigError::new(
                    "escape",
                    value,
                    "expected none|markup|quoted",
                )),
            }
        }

        if let Err(mut validation) = config.validate() {
            errors.append(&mut validation);
        }

        CompileConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.theme.trim().is_empty() {
            errors.push(ConfigError::new("theme", "", "must not be empty"));
        }
        if self.font_size == Some(0) {
            errors.push(ConfigError::new("font_size", "0", "must be >= 1"));
        }
        if let Some(multiplier) = self.line_height
            && !(multiplier.is_finite() && multiplier > 0.0)
        {
            errors.push(ConfigError::new(
                "line_height",
                multiplier.to_string(),
                "must be a positive number",
            ));
        }
        if !(self.char_width_ratio.is_finite() && self.char_width_ratio > 0.0) {
            errors.push(ConfigError::new(
                "char_width_ratio",
                self.char_width_ratio.to_string(),
                "must be a positive number",
            ));
        }
        if self.tab_width == 0 || self.tab_width > MAX_TAB_WIDTH {
            errors.push(ConfigError::new(
                "tab_width",
                self.tab_width.to_string(),
                format!("must be in 1..={MAX_TAB_WIDTH}"),
            ));
        }
        let (width, height) = {
            let size = self.page_size.size();
            (size.width, size.height)
        };
        if width == 0 || height == 0 {
            errors.push(ConfigError::new(
                "page_size",
                self.page_size.to_string(),
                "must have a non-zero width and height",
            ));
        }
        if self.margins.horizontal_sum() >= width || self.margins.vertical_sum() >= height {
            errors.push(ConfigError::new(
                "margins",
                format!("{:?}", self.margins),
                "margins leave no content area",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Short human-readable summary for logs.
    #[must_use]
    pub fn summary_short(&self) -> String {
        let numbers = if self.show_line_numbers { "numbers" } else { "no-numbers" };
        format!("{} · {} · {numbers} · tab {}", self.page_size, self.theme, self.tab_width)
    }
}

#[inline]
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

#[inline]
fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

#[inline]
fn parse_f32(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_sides(value: &str) -> Option<Sides> {
    let parts: Vec<u32> = value
        .split(',')
        .map(|p| p.trim().parse::<u32>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [all] => Some(Sides::all(*all)),
        [top, right, bottom, left] => Some(Sides::new(*top, *right, *bottom, *left)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> CompileConfigParse {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CompileConfig::from_env_with(|key| map.get(key).cloned())
    }

    // -- defaults -----------------------------------------------------------

    #[test]
    fn defaults_are_valid() {
        let config = CompileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, PageSize::RemarkableTwo);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.tab_width, 4);
    }

    #[test]
    fn empty_env_gives_defaults() {
        let parsed = parse(&[]);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.config, CompileConfig::default());
    }

    // -- env parsing --------------------------------------------------------

    #[test]
    fn env_overrides_apply() {
        let parsed = parse(&[
            (ENV_PAGE_SIZE, "paper-pro"),
            (ENV_THEME, " eink "),
            (ENV_FONT_SIZE, "30"),
            (ENV_LINE_HEIGHT, "1.2"),
            (ENV_MARGIN, "10,20,30,40"),
            (ENV_LINE_NUMBERS, "off"),
            (ENV_METADATA, "no"),
            (ENV_DEBUG, "1"),
            (ENV_TAB_WIDTH, "8"),
            (ENV_GRAYSCALE, "16"),
            (ENV_ESCAPE, "quoted"),
        ]);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let c = parsed.config;
        assert_eq!(c.page_size, PageSize::PaperPro);
        assert_eq!(c.theme, "eink");
        assert_eq!(c.font_size, Some(30));
        assert_eq!(c.line_height, Some(1.2));
        assert_eq!(c.margins, Sides::new(10, 20, 30, 40));
        assert!(!c.show_line_numbers);
        assert!(!c.show_metadata);
        assert!(c.debug);
        assert_eq!(c.tab_width, 8);
        assert_eq!(c.color_profile, ColorProfile::EINK);
        assert_eq!(c.escape, EscapeMode::Quoted);
    }

    #[test]
    fn single_margin_applies_to_all_sides() {
        let parsed = parse(&[(ENV_MARGIN, "25")]);
        assert_eq!(parsed.config.margins, Sides::all(25));
    }

    #[test]
    fn custom_page_size() {
        let parsed = parse(&[(ENV_PAGE_SIZE, "800x600")]);
        assert_eq!(
            parsed.config.page_size,
            PageSize::Custom {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn invalid_values_are_reported_and_ignored() {
        let parsed = parse(&[
            (ENV_PAGE_SIZE, "a4"),
            (ENV_FONT_SIZE, "big"),
            (ENV_DEBUG, "maybe"),
            (ENV_MARGIN, "1,2"),
            (ENV_GRAYSCALE, "-3"),
        ]);
        let fields: Vec<_> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["page_size", "font_size", "margins", "debug", "color_profile"]
        );
        assert_eq!(parsed.config.page_size, PageSize::RemarkableTwo);
        assert!(!parsed.config.debug);
    }

    // -- validation ---------------------------------------------------------

    #[test]
    fn validate_collects_every_violation() {
        let config = CompileConfig::default()
            .with_theme(" ")
            .with_font_size(0)
            .with_line_height(-1.0)
            .with_tab_width(0);
        let errors = config.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["theme", "font_size", "line_height", "tab_width"]);
    }

    #[test]
    fn margins_larger_than_page_are_rejected() {
        let config = CompileConfig::default()
            .with_page_size(PageSize::Custom {
                width: 100,
                height: 100,
            })
            .with_margins(50);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "margins");
    }

    #[test]
    fn validation_errors_flow_into_env_diagnostics() {
        let parsed = parse(&[(ENV_TAB_WIDTH, "99")]);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].field, "tab_width");
    }

    #[test]
    fn error_display() {
        let err = ConfigError::new("tab_width", "0", "must be in 1..=16");
        assert_eq!(err.to_string(), "tab_width=0 (must be in 1..=16)");
    }

    #[test]
    fn summary_mentions_page_and_theme() {
        let summary = CompileConfig::default().summary_short();
        assert!(summary.contains("rm2"));
        assert!(summary.contains("dark"));
    }
}

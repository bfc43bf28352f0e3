//! Escaping of structurally significant characters for script writers.

use std::borrow::Cow;

/// Escapes text for a particular output format.
pub trait Escaper: Send + Sync {
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEscape;

impl Escaper for NoEscape {
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// XML/HTML entity escaping of `& < > " '`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupEscaper;

impl Escaper for MarkupEscaper {
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(['&', '<', '>', '"', '\'']) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len() + 16);
        for ch in text.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(ch),
            }
        }
        Cow::Owned(out)
    }
}

/// Backslash escaping for double-quoted string literals in script formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotedEscaper;

impl Escaper for QuotedEscaper {
    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(['\\', '"']) && !text.chars().any(char::is_control) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len() + 8);
        for ch in text.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\r' => out.push_str("\\r"),
                '\n' => out.push_str("\\n"),
                c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
                c => out.push(c),
            }
        }
        Cow::Owned(out)
    }
}

/// Escaping selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EscapeMode {
    None,
    #[default]
    Markup,
    Quoted,
}

impl EscapeMode {
    #[must_use]
    pub fn escaper(self) -> Box<dyn Escaper> {
        match self {
            Self::None => Box::new(NoEscape),
            Self::Markup => Box::new(MarkupEscaper),
            Self::Quoted => Box::new(QuotedEscaper),
        }
    }

    /// Parse `none`, `markup` or `quoted`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "raw" => Some(Self::None),
            "markup" | "xml" | "html" => Some(Self::Markup),
            "quoted" | "string" => Some(Self::Quoted),
            _ => None,
        }
    }
}

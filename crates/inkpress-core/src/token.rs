#![forbid(unsafe_code)]

//! Token model.
//!
//! A [`Token`] borrows its text from the scanned source. A scan produces
//! tokens in strictly increasing `start` order with no gaps between them, so
//! concatenating every token's text reproduces the source byte-for-byte.
//! [`validate_tokens`] checks exactly that.

use std::fmt;
use std::ops::Range;

// ---------------------------------------------------------------------------
// Token kinds
// ---------------------------------------------------------------------------

/// Lexical classification of a token.
///
/// The set is closed so that every theme can be checked for a complete
/// classification-to-color table at construction time.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// Reserved words (`def`, `function`, `if`, ...).
    Keyword,
    /// Names provided by the language runtime (`print`, `console`, ...).
    Builtin,
    /// Literal constants (`True`, `null`, `undefined`, ...).
    Constant,
    /// Type names and capitalized identifiers where a rule set marks them.
    Type,
    Identifier,
    String,
    Number,
    Comment,
    Operator,
    Punctuation,
    /// Decorators and attributes (`@cache`, `#[derive]`).
    Annotation,
    Whitespace,
    /// A character no rule matched.
    Unrecognized,
}

impl TokenKind {
    /// Number of classifications.
    pub const COUNT: usize = 13;

    /// Every classification, in declaration order.
    pub const ALL: [TokenKind; Self::COUNT] = [
        Self::Keyword,
        Self::Builtin,
        Self::Constant,
        Self::Type,
        Self::Identifier,
        Self::String,
        Self::Number,
        Self::Comment,
        Self::Operator,
        Self::Punctuation,
        Self::Annotation,
        Self::Whitespace,
        Self::Unrecognized,
    ];

    /// Dense index in `0..COUNT`, usable for table lookups.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Builtin => "builtin",
            Self::Constant => "constant",
            Self::Type => "type",
            Self::Identifier => "identifier",
            Self::String => "string",
            Self::Number => "number",
            Self::Comment => "comment",
            Self::Operator => "operator",
            Self::Punctuation => "punctuation",
            Self::Annotation => "annotation",
            Self::Whitespace => "whitespace",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Parse a name produced by [`TokenKind::name`] (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    #[must_use]
    pub const fn is_whitespace(self) -> bool {
        matches!(self, Self::Whitespace)
    }

    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::Comment)
    }

    /// Whether this kind is a literal value.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::String | Self::Number | Self::Constant)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A classified slice of source text.
///
/// `start`/`end` are byte offsets into the source; `line` and `column` are
/// 1-based and locate `start`. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl<'src> Token<'src> {
    /// Create a token. Panics in debug builds if the span does not match the
    /// text length.
    #[must_use]
    pub fn new(kind: TokenKind, text: &'src str, start: usize, line: usize, column: usize) -> Self {
        let end = start + text.len();
        debug_assert!(start <= end, "token span must be ordered");
        Self {
            kind,
            text,
            start,
            end,
            line,
            column,
        }
    }

    /// Byte range in the source.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether the token overlaps the byte range `range`.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        self.start < range.end && self.end > range.start
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that `tokens` cover `source` exactly: in order, without gaps or
/// overlaps, with every token's text equal to its span in the source.
#[must_use]
pub fn validate_tokens(source: &str, tokens: &[Token<'_>]) -> bool {
    let mut expected_start = 0;
    for token in tokens {
        if token.start != expected_start || token.end < token.start {
            return false;
        }
        if source.get(token.range()) != Some(token.text) {
            return false;
        }
        expected_start = token.end;
    }
    expected_start == source.len()
}

/// Concatenate token texts.
#[must_use]
pub fn detokenize(tokens: &[Token<'_>]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(Token::len).sum());
    for token in tokens {
        out.push_str(token.text);
    }
    out
}

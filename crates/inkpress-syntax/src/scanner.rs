#![forbid(unsafe_code)]

//! Priority-driven, stateful scanner.
//!
//! The scanner walks the source once, left to right. At every offset it
//! either continues an open multi-line run or tries the rule set's rules in
//! priority order; the first rule whose anchored match is non-empty wins,
//! even when a later rule would match a longer span. A character no rule
//! matches becomes a one-character [`TokenKind::Unrecognized`] token, so every
//! step consumes at least one byte and a scan always terminates.
//!
//! Multi-line runs produce up to three tokens of the rule's classification:
//! the opening delimiter, the content between delimiters (omitted when
//! empty), and the closing delimiter. An unterminated run extends to the end
//! of the source and is reported as a [`ScanDiagnostic`].

use std::fmt;

use tracing::{debug_span, trace, warn};

use crate::rule::{RuleSet, ScannerRule};
use inkpress_core::token::{Token, TokenKind, validate_tokens};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// How an open multi-line run is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultilineEnd {
    /// Index into [`RuleSet::rules`] of the rule that opened the run.
    pub rule: usize,
    /// Opening delimiter text, used as the closing delimiter when the rule
    /// has no end pattern.
    pub literal: Option<String>,
}

/// Cursor and multi-line state for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerState {
    /// Byte offset of the next unscanned character.
    pub position: usize,
    /// 1-based line of `position`.
    pub line: usize,
    /// 1-based column of `position`, in characters.
    pub column: usize,
    /// Classification of the open multi-line run, if any.
    pub in_multiline: Option<TokenKind>,
    pub multiline_end: Option<MultilineEnd>,
}

impl Default for ScannerState {
    fn default() -> Self {
        Self {
            position: 0,
            line: 1,
            column: 1,
            in_multiline: None,
            multiline_end: None,
        }
    }
}

impl ScannerState {
    /// Move past `text`, updating line and column.
    fn advance(&mut self, text: &str) {
        self.position += text.len();
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn close_multiline(&mut self) {
        self.in_multiline = None;
        self.multiline_end = None;
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A recoverable problem found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDiagnostic {
    /// A multi-line run had no closing delimiter and extends to the end of
    /// the source. Location is that of the opening delimiter.
    UnterminatedMultiline {
        kind: TokenKind,
        line: usize,
        column: usize,
        offset: usize,
    },
    /// No rule matched `ch`.
    Unrecognized {
        ch: char,
        line: usize,
        column: usize,
        offset: usize,
    },
}

impl ScanDiagnostic {
    /// 1-based line of the problem.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedMultiline { line, .. } | Self::Unrecognized { line, .. } => *line,
        }
    }
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedMultiline {
                kind, line, column, ..
            } => write!(f, "{line}:{column}: unterminated multi-line {kind}"),
            Self::Unrecognized {
                ch, line, column, ..
            } => write!(f, "{line}:{column}: unrecognized character {ch:?}"),
        }
    }
}

/// Result of scanning one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutput<'src> {
    pub tokens: Vec<Token<'src>>,
    pub diagnostics: Vec<ScanDiagnostic>,
    /// State after the last token. `in_multiline` is still set when the
    /// source ended inside a multi-line run.
    pub final_state: ScannerState,
}

impl ScanOutput<'_> {
    /// Whether the source ended inside a multi-line run.
    #[must_use]
    pub fn is_unterminated(&self) -> bool {
        self.final_state.in_multiline.is_some()
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct OpenRun {
    line: usize,
    column: usize,
    offset: usize,
}

/// A single-use scanner over one rule set.
#[derive(Debug)]
pub struct Scanner<'r> {
    rules: &'r RuleSet,
    state: ScannerState,
    open: Option<OpenRun>,
}

impl<'r> Scanner<'r> {
    #[must_use]
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            state: ScannerState::default(),
            open: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Scan `source` to the end.
    pub fn scan<'src>(mut self, source: &'src str) -> ScanOutput<'src> {
        let _span = debug_span!(
            "inkpress.scan",
            language = self.rules.name(),
            bytes = source.len()
        )
        .entered();

        let mut tokens = Vec::with_capacity(source.len() / 4 + 1);
        let mut diagnostics = Vec::new();

        while self.state.position < source.len() {
            let rest = &source[self.state.position..];

            if let Some(kind) = self.state.in_multiline {
                match self.find_close(rest) {
                    Some((close_start, close_end)) => {
                        if close_start > 0 {
                            self.emit(&mut tokens, source, kind, close_start);
                        }
                        self.emit(&mut tokens, source, kind, close_end - close_start);
                        trace!(kind = %kind, line = self.state.line, "multi-line run closed");
                        self.state.close_multiline();
                        self.open = None;
                    }
                    None => self.emit(&mut tokens, source, kind, rest.len()),
                }
                continue;
            }

            if let Some((index, rule, len)) = self.first_match(rest) {
                let kind = rule.classification();
                if rule.is_multiline() {
                    let literal = rule.end_regex().is_none().then(|| rest[..len].to_string());
                    self.open = Some(OpenRun {
                        line: self.state.line,
                        column: self.state.column,
                        offset: self.state.position,
                    });
                    trace!(kind = %kind, line = self.state.line, "multi-line run opened");
                    self.emit(&mut tokens, source, kind, len);
                    self.state.in_multiline = Some(kind);
                    self.state.multiline_end = Some(MultilineEnd {
                        rule: index,
                        literal,
                    });
                } else {
                    self.emit(&mut tokens, source, kind, len);
                }
                continue;
            }

            // Plain line breaks no rule claimed still belong to the stream.
            if rest.starts_with("\r\n") {
                self.emit(&mut tokens, source, TokenKind::Whitespace, 2);
            } else if rest.starts_with('\n') {
                self.emit(&mut tokens, source, TokenKind::Whitespace, 1);
            } else if let Some(ch) = rest.chars().next() {
                diagnostics.push(ScanDiagnostic::Unrecognized {
                    ch,
                    line: self.state.line,
                    column: self.state.column,
                    offset: self.state.position,
                });
                self.emit(&mut tokens, source, TokenKind::Unrecognized, ch.len_utf8());
            }
        }

        if let (Some(kind), Some(open)) = (self.state.in_multiline, self.open) {
            warn!(
                kind = %kind,
                line = open.line,
                column = open.column,
                "unterminated multi-line token runs to end of source"
            );
            diagnostics.push(ScanDiagnostic::UnterminatedMultiline {
                kind,
                line: open.line,
                column: open.column,
                offset: open.offset,
            });
        }

        debug_assert!(validate_tokens(source, &tokens));
        ScanOutput {
            tokens,
            diagnostics,
            final_state: self.state,
        }
    }

    fn first_match(&self, rest: &str) -> Option<(usize, &'r ScannerRule, usize)> {
        self.rules
            .rules()
            .iter()
            .enumerate()
            .find_map(|(index, rule)| rule.match_len(rest).map(|len| (index, rule, len)))
    }

    /// Locate the closing delimiter of the open run in `rest`. Returns the
    /// delimiter's byte range relative to `rest`.
    fn find_close(&self, rest: &str) -> Option<(usize, usize)> {
        let end = self.state.multiline_end.as_ref()?;
        let rule = self.rules.rules().get(end.rule)?;
        let escape = rule.escape();

        let mut from = 0;
        while from < rest.len() {
            let (start, stop) = match (&end.literal, rule.end_regex()) {
                (Some(literal), _) => {
                    let start = from + rest[from..].find(literal.as_str())?;
                    (start, start + literal.len())
                }
                (None, Some(regex)) => {
                    let m = regex.find_at(rest, from)?;
                    (m.start(), m.end())
                }
                (None, None) => return None,
            };
            let escaped = escape.is_some_and(|esc| is_escaped(&rest[..start], esc));
            if stop > start && !escaped {
                return Some((start, stop));
            }
            // Retry one character further on.
            from = start + rest[start..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }

    fn emit<'src>(
        &mut self,
        tokens: &mut Vec<Token<'src>>,
        source: &'src str,
        kind: TokenKind,
        len: usize,
    ) {
        let start = self.state.position;
        let text = &source[start..start + len];
        tokens.push(Token::new(
            kind,
            text,
            start,
            self.state.line,
            self.state.column,
        ));
        self.state.advance(text);
    }
}

/// Whether `prefix` ends in an odd number of `escape` characters.
fn is_escaped(prefix: &str, escape: char) -> bool {
    prefix.chars().rev().take_while(|&c| c == escape).count() % 2 == 1
}

/// Scan `source` with `rules`, discarding diagnostics.
pub fn scan<'src>(source: &'src str, rules: &RuleSet) -> Vec<Token<'src>> {
    Scanner::new(rules).scan(source).tokens
}

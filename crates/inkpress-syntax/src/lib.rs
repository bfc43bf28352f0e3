#![forbid(unsafe_code)]

//! Syntax scanning for inkpress.
//!
//! A language is pure data: a [`RuleSet`] of regex rules sorted by priority.
//! The [`Scanner`] walks the source once, trying rules in priority order at
//! the current offset. The first rule that matches wins, even when a lower
//! priority rule would match a longer span. Characters no rule matches
//! become one-character [`TokenKind::Unrecognized`] tokens, so a scan always
//! terminates and always covers the whole source.
//!
//! # Example
//! ```
//! use inkpress_syntax::{LanguageRegistry, TokenKind};
//!
//! let registry = LanguageRegistry::with_builtins().unwrap();
//! let output = registry.scan("x = 42  # done", "python").unwrap();
//! let kinds: Vec<_> = output.tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(kinds.last(), Some(&TokenKind::Comment));
//! ```

pub mod error;
pub mod languages;
pub mod registry;
pub mod rule;
pub mod scanner;

pub use error::{RuleError, ScanError};
pub use inkpress_core::token::{Token, TokenKind, detokenize, validate_tokens};
pub use registry::LanguageRegistry;
pub use rule::{RuleSet, RuleSetBuilder, ScannerRule};
pub use scanner::{MultilineEnd, ScanDiagnostic, ScanOutput, Scanner, ScannerState, scan};

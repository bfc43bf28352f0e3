//! Error types for rule-set construction and scanning.

use std::fmt;

/// A rule set could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A rule's pattern failed to compile.
    InvalidPattern {
        language: String,
        pattern: String,
        message: String,
    },
    /// A multi-line rule's end pattern failed to compile.
    InvalidEndPattern {
        language: String,
        pattern: String,
        message: String,
    },
    /// A pattern matches the empty string and could never advance the scanner.
    EmptyMatch { language: String, pattern: String },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern {
                language,
                pattern,
                message,
            } => write!(f, "{language}: invalid pattern `{pattern}`: {message}"),
            Self::InvalidEndPattern {
                language,
                pattern,
                message,
            } => write!(f, "{language}: invalid end pattern `{pattern}`: {message}"),
            Self::EmptyMatch { language, pattern } => {
                write!(f, "{language}: pattern `{pattern}` matches the empty string")
            }
        }
    }
}

impl std::error::Error for RuleError {}

/// A scan request could not be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// No rule set is registered under the requested name, alias or extension.
    UnknownLanguage(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLanguage(name) => write!(f, "unknown language `{name}`"),
        }
    }
}

impl std::error::Error for ScanError {}

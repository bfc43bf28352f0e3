use std::fmt;

use inkpress_layout::LayoutError;
use inkpress_style::ThemeError;
use inkpress_syntax::{RuleError, ScanError};

use crate::config::ConfigError;

/// Top-level error type for inkpress.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A language rule set failed to build.
    Rules(RuleError),
    /// The requested language is not registered.
    Scan(ScanError),
    Theme(ThemeError),
    /// Page geometry cannot hold the document.
    Layout(LayoutError),
    /// Every configuration violation found.
    Config(Vec<ConfigError>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules(err) => write!(f, "{err}"),
            Self::Scan(err) => write!(f, "{err}"),
            Self::Theme(err) => write!(f, "{err}"),
            Self::Layout(err) => write!(f, "{err}"),
            Self::Config(errors) => {
                f.write_str("invalid configuration: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rules(err) => Some(err),
            Self::Scan(err) => Some(err),
            Self::Theme(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Config(errors) => errors.first().map(|e| e as _),
        }
    }
}

impl From<RuleError> for Error {
    fn from(err: RuleError) -> Self {
        Self::Rules(err)
    }
}

impl From<ScanError> for Error {
    fn from(err: ScanError) -> Self {
        Self::Scan(err)
    }
}

impl From<ThemeError> for Error {
    fn from(err: ThemeError) -> Self {
        Self::Theme(err)
    }
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

/// Standard result type for inkpress APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn wraps_and_displays_sources() {
        let err: Error = ScanError::UnknownLanguage("cobol".into()).into();
        assert_eq!(err.to_string(), "unknown language `cobol`");
        assert!(err.source().is_some());
    }

    #[test]
    fn config_errors_are_joined() {
        let err = Error::Config(vec![
            ConfigError {
                field: "tab_width",
                value: "0".into(),
                message: "must be in 1..=16".into(),
            },
            ConfigError {
                field: "theme",
                value: String::new(),
                message: "must not be empty".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "invalid configuration: tab_width=0 (must be in 1..=16); theme= (must not be empty)"
        );
    }
}

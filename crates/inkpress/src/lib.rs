#![forbid(unsafe_code)]

//! inkpress public facade crate.
//!
//! Compiles source code into syntax-colored, paginated draw primitives
//! sized for e-ink pages. The pipeline is a fixed sequence of pure stages:
//! tabs are expanded, the lines are laid out onto pages, the source is
//! scanned into tokens, and the renderer merges tokens and layout into
//! positioned text runs. A [`ScriptWriter`] turns the result into an
//! output format.
//!
//! # Example
//! ```
//! use inkpress::{CompileConfig, Compiler, DebugScript};
//!
//! let compiler = Compiler::new(CompileConfig::default()).unwrap();
//! let doc = compiler.compile("def f():\n    return 42\n", "python", None).unwrap();
//! assert_eq!(doc.page_count(), 1);
//!
//! let mut script = DebugScript::new();
//! doc.write_to(&mut script).unwrap();
//! assert!(script.into_inner().contains("\"return\""));
//! ```

pub mod compiler;
pub mod config;
pub mod document;
pub mod error;
pub mod writer;

pub use compiler::{CompileJob, Compiler, compile_many, expand_tabs};
pub use config::{CompileConfig, CompileConfigParse, ConfigError};
pub use document::{CompiledDocument, DocumentSummary};
pub use error::{Error, Result};
pub use writer::{DebugScript, ScriptWriter};

// --- Re-exports -------------------------------------------------------------

pub use inkpress_core::{Rect, Sides, Size, Token, TokenKind};
pub use inkpress_layout::{CodeMetadata, FontMetrics, PageLayout, PageSize, RegionKind};
pub use inkpress_render::{DrawPrimitive, EscapeMode, Outline, PagePrimitives, RunRole, TextRun};
pub use inkpress_style::{ColorProfile, Rgb, Theme, ThemeBuilder};
pub use inkpress_syntax::{RuleSet, RuleSetBuilder, ScanDiagnostic};

pub use inkpress_core as core;
pub use inkpress_layout as layout;
pub use inkpress_render as render;
pub use inkpress_style as style;
pub use inkpress_syntax as syntax;

pub mod prelude {
    pub use crate::{
        CodeMetadata, CompileConfig, CompiledDocument, Compiler, Error, PageSize, Result,
        ScriptWriter, TokenKind,
    };
}

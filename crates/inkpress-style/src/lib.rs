#![forbid(unsafe_code)]

//! Colors and themes for inkpress.
//!
//! A [`Theme`] maps every [`TokenKind`] to a color. The table is a fixed-size
//! array indexed by kind, so a constructed theme can never miss a lookup.
//! The [`ThemeRegistry`] holds named themes and one active theme; switching
//! the active theme never requires re-scanning.

pub mod color;
pub mod error;
pub mod registry;
pub mod theme;

pub use color::{ColorProfile, Rgb};
pub use error::ThemeError;
pub use inkpress_core::token::TokenKind;
pub use registry::ThemeRegistry;
pub use theme::{Theme, ThemeBuilder, themes};

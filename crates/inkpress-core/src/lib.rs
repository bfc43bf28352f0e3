#![forbid(unsafe_code)]

//! Core: the token vocabulary and pixel geometry shared by every stage of
//! the code-to-page pipeline.

pub mod geometry;
pub mod token;

pub use geometry::{Rect, Sides, Size};
pub use token::{Token, TokenKind, detokenize, validate_tokens};

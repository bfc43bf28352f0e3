#![forbid(unsafe_code)]

//! Page layout for inkpress.
//!
//! [`layout`] turns source lines into pages. Each page is split into
//! regions (an optional metadata header on the first page, an optional
//! line-number gutter, and the code body), and every source line is placed
//! into the code body, wrapped into several [`LineLayout`]s when it is
//! wider than the body. Text width is estimated from display cells times
//! the average character width, so no font rasterizer is needed.
//!
//! All geometry problems are reported by [`LayoutConfig::validate`] before
//! any line is placed.

pub mod error;
pub mod layout;
pub mod metadata;
pub mod metrics;
pub mod source;
pub mod wrap;

pub use error::LayoutError;
pub use layout::{
    LayoutCalculator, LayoutConfig, LayoutRegion, LayoutSummary, LineLayout, PageLayout,
    RegionKind, layout,
};
pub use metadata::CodeMetadata;
pub use metrics::{FontMetrics, PageSize, display_cells, grapheme_cells};
pub use source::{line_ranges, split_lines};
pub use wrap::wrap_ranges;

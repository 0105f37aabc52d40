//! Search term registry and highlight colors for hl.
//!
//! This crate holds the pure data side of the highlighter:
//! - **Terms**: one [`SearchTerm`] per search row, with its literal text,
//!   case-sensitivity flag, color, match count, and navigation cursor
//! - **Registry**: an ordered [`Registry`] of terms with lifetime-unique ids
//! - **Colors**: hex parsing, luminance-based contrast selection, and the
//!   derived [`AnnotationStyle`] applied to matched text
//!
//! No scanning or tree knowledge lives here; the engine consumes this crate.

#![warn(missing_docs)]

mod color;
mod error;
mod registry;
mod term;

pub use color::{AnnotationStyle, CONTRAST_THRESHOLD, Color, PALETTE, Rgba, palette_color};
pub use error::ColorError;
pub use registry::Registry;
pub use term::{SearchTerm, TermId, TermSnapshot};

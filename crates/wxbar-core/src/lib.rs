//! Core types, 24-hour history buffer and bar-chart renderer for wxbar
//!
//! This crate holds everything that has invariants: bucket indexing,
//! future-zeroing, same-day forecast filtering and the value-to-pixel
//! mapping. Fetching data and driving a display live in other crates.

pub mod history;
pub mod labels;
pub mod pipeline;
pub mod render;
pub mod types;

pub use history::*;
pub use labels::*;
pub use pipeline::*;
pub use render::{render, palette, PixelBuffer, Rgb};
pub use types::*;

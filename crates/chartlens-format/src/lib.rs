//! chartlens-format
//!
//! Renders a structured chart analysis returned by the model into the
//! sectioned plain-text report shown to users, with the raw JSON appended.

pub mod analysis;
pub mod markdown;
pub mod number;

pub use analysis::ChartAnalysis;
pub use markdown::{format_analysis_markdown, FormatOptions, Headings};

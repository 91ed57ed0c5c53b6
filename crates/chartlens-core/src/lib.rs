//! chartlens-core
//!
//! Domain types, traits and configuration shared by the retrieval index,
//! the chat session layer and the command-line tools.

pub mod config;
pub mod error;
pub mod loader;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::{Document, DocumentKind, DocumentMetadata, ScoredDocument};

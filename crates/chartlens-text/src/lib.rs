//! chartlens-text
//!
//! In-memory TF-IDF index over prior analyses and chat turns. Documents are
//! re-weighted against the whole corpus on every insertion and queried by
//! cosine similarity.

pub mod tokenizer;
pub mod index;
pub mod search;

pub use index::LexicalIndex;
pub use search::{cosine_similarity, MIN_SIMILARITY};
pub use tokenizer::tokenize;

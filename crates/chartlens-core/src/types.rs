//! Domain types used by the retrieval index and the chat session layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type DocumentId = String;
pub type Meta = HashMap<String, String>;

/// Which part of the application produced a document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Analysis,
    Chat,
}

/// Caller-owned metadata carried alongside a document.
///
/// The index passes this through untouched; only the session layer and
/// the CLI read it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(flatten)]
    pub extra: Meta,
}

impl DocumentMetadata {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            analysis_id: None,
            chat_id: None,
            domain: None,
            extra: Meta::new(),
        }
    }
}

/// A unit of indexed text.
///
/// - `id`: opaque identifier; uniqueness is the caller's concern
/// - `content`: the raw text that gets tokenized
/// - `metadata`: free-form, never interpreted by the index
/// - `vector`: TF-IDF weights over the index vocabulary. Owned by the
///   index and overwritten on every insertion; whatever a caller puts
///   here is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub content: String,
    pub metadata: DocumentMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vector: Vec<f64>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self { id: id.into(), content: content.into(), metadata, vector: Vec::new() }
    }

    /// Document for a completed chart analysis; `analysis_id` mirrors `id`.
    pub fn analysis(id: impl Into<String>, content: impl Into<String>) -> Self {
        let id = id.into();
        let mut metadata = DocumentMetadata::new(DocumentKind::Analysis);
        metadata.analysis_id = Some(id.clone());
        Self::new(id, content, metadata)
    }

    /// Document for a completed chat exchange; `chat_id` mirrors `id`.
    pub fn chat(id: impl Into<String>, content: impl Into<String>) -> Self {
        let id = id.into();
        let mut metadata = DocumentMetadata::new(DocumentKind::Chat);
        metadata.chat_id = Some(id.clone());
        Self::new(id, content, metadata)
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.metadata.domain = Some(domain.into());
        self
    }
}

/// A search result with the cosine similarity that ranked it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// Vision-language models the assistant can route requests to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AiModel {
    #[default]
    Scout,
    Maverick,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Standard,
    Premium,
}

impl AiModel {
    pub const ALL: [AiModel; 2] = [AiModel::Scout, AiModel::Maverick];

    pub fn id(self) -> &'static str {
        match self {
            AiModel::Scout => "scout",
            AiModel::Maverick => "maverick",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AiModel::Scout => "Scout",
            AiModel::Maverick => "Maverick",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AiModel::Scout => "Llama 3.2 11B Vision - Fast and efficient chart analysis",
            AiModel::Maverick => "Llama 3.2 90B Vision - Advanced reasoning and detailed insights",
        }
    }

    pub fn tier(self) -> ModelTier {
        match self {
            AiModel::Scout => ModelTier::Standard,
            AiModel::Maverick => ModelTier::Premium,
        }
    }

    /// Looks a model up by its id, falling back to the default model.
    pub fn from_id(id: &str) -> Self {
        Self::ALL.into_iter().find(|m| m.id() == id).unwrap_or_default()
    }
}

impl fmt::Display for AiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One answered question from the fixed analysis battery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// What the session hands to a model client for one chat turn.
///
/// `context` is the retrieved prior text joined with blank lines, or empty
/// when retrieval is off or found nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub model: AiModel,
    pub context: String,
}

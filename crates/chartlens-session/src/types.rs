use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chartlens_core::types::{AiModel, AnalysisResult};

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, image_url: Option<String>) -> Self {
        Self { id: new_id(), role: Role::User, content: content.into(), timestamp: Utc::now(), image_url }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { id: new_id(), role: Role::Assistant, content: content.into(), timestamp: Utc::now(), image_url: None }
    }
}

/// A chart the user has uploaded but not necessarily analyzed yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedImage {
    pub id: String,
    pub url: String,
}

/// Answers to the analysis battery for one chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    pub id: String,
    pub image_url: String,
    pub results: Vec<AnalysisResult>,
    pub timestamp: DateTime<Utc>,
    pub model: AiModel,
}

impl Analysis {
    /// One `question: answer` line per result; this is what gets indexed.
    pub fn to_document_content(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("{}: {}", r.question, r.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

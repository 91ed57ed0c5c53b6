use crate::types::{AiModel, AnalysisResult, ChatRequest, Document};

/// In-process similarity index over documents.
///
/// Implementations are synchronous and hold no internal locks; callers in
/// a concurrent host serialize access themselves.
pub trait DocumentIndex {
    fn add_document(&mut self, document: Document);
    fn search_similar(&self, query: &str, top_k: usize) -> Vec<Document>;
    fn clear(&mut self);
    fn all_documents(&self) -> Vec<Document>;
}

pub type TokenStream<'a> = Box<dyn Iterator<Item = anyhow::Result<String>> + 'a>;

/// The hosted vision-language model, reached through whatever transport
/// the host application provides.
pub trait ModelClient {
    fn analyze_chart(&self, image_url: &str, model: AiModel) -> anyhow::Result<Vec<AnalysisResult>>;

    fn complete(&self, request: &ChatRequest) -> anyhow::Result<String>;

    /// Streams the reply token by token. Clients without native streaming
    /// yield the completed reply as a single token.
    fn stream(&self, request: &ChatRequest) -> anyhow::Result<TokenStream<'_>> {
        let reply = self.complete(request)?;
        Ok(Box::new(std::iter::once(Ok(reply))))
    }
}

use chrono::Utc;
use tracing::{debug, info};

use chartlens_core::config::RetrievalConfig;
use chartlens_core::traits::{DocumentIndex, ModelClient};
use chartlens_core::types::{AiModel, ChatRequest, Document};
use chartlens_text::LexicalIndex;

use crate::error::{Result, SessionError};
use crate::stream::StreamingReply;
use crate::types::{new_id, Analysis, ChatMessage, UploadedImage};

/// One user's working state: uploaded chart, analyses, chat, and the
/// retrieval index those feed.
///
/// The session owns its index; nothing is shared between sessions.
pub struct ChartSession<I = LexicalIndex>
where
    I: DocumentIndex,
{
    index: I,
    retrieval: RetrievalConfig,
    selected_model: AiModel,
    uploaded_image: Option<UploadedImage>,
    current_analysis: Option<Analysis>,
    analysis_history: Vec<Analysis>,
    chat_history: Vec<ChatMessage>,
}

impl ChartSession<LexicalIndex> {
    pub fn new(retrieval: RetrievalConfig) -> Self {
        Self::with_index(LexicalIndex::new(), retrieval)
    }
}

impl<I> ChartSession<I>
where
    I: DocumentIndex,
{
    pub fn with_index(index: I, retrieval: RetrievalConfig) -> Self {
        Self {
            index,
            retrieval,
            selected_model: AiModel::default(),
            uploaded_image: None,
            current_analysis: None,
            analysis_history: Vec::new(),
            chat_history: Vec::new(),
        }
    }

    pub fn index(&self) -> &I { &self.index }
    pub fn selected_model(&self) -> AiModel { self.selected_model }
    pub fn select_model(&mut self, model: AiModel) { self.selected_model = model; }
    pub fn uploaded_image(&self) -> Option<&UploadedImage> { self.uploaded_image.as_ref() }
    pub fn current_analysis(&self) -> Option<&Analysis> { self.current_analysis.as_ref() }

    /// Whether [`ChartSession::chat`] pulls in prior documents. Starts from
    /// `retrieval.use_rag`.
    pub fn use_rag(&self) -> bool { self.retrieval.use_rag }
    pub fn set_use_rag(&mut self, enabled: bool) { self.retrieval.use_rag = enabled; }

    /// Newest first.
    pub fn analysis_history(&self) -> &[Analysis] { &self.analysis_history }

    /// Oldest first.
    pub fn chat_history(&self) -> &[ChatMessage] { &self.chat_history }

    pub fn upload_image(&mut self, url: impl Into<String>) -> &UploadedImage {
        self.uploaded_image.insert(UploadedImage { id: new_id(), url: url.into() })
    }

    /// Runs the analysis battery on the uploaded chart and indexes the answers.
    /// A failed model call leaves the session untouched.
    pub fn analyze_chart<C>(&mut self, client: &C) -> Result<&Analysis>
    where
        C: ModelClient + ?Sized,
    {
        let image = self.uploaded_image.as_ref().ok_or(SessionError::NoImage)?;
        let results = client.analyze_chart(&image.url, self.selected_model)?;
        let analysis = Analysis {
            id: new_id(),
            image_url: image.url.clone(),
            results,
            timestamp: Utc::now(),
            model: self.selected_model,
        };

        self.index.add_document(Document::analysis(analysis.id.clone(), analysis.to_document_content()));
        info!(id = %analysis.id, model = %analysis.model, answers = analysis.results.len(), "chart analyzed");

        self.analysis_history.insert(0, analysis.clone());
        Ok(&*self.current_analysis.insert(analysis))
    }

    /// Prior documents similar to `message`, joined with blank lines.
    /// Empty when `use_rag` is off or nothing is similar enough.
    pub fn retrieve_context(&self, message: &str, use_rag: bool) -> String {
        if !use_rag {
            return String::new();
        }
        let similar = self.index.search_similar(message, self.retrieval.top_k);
        debug!(found = similar.len(), top_k = self.retrieval.top_k, "retrieved context");
        similar.iter().map(|d| d.content.as_str()).collect::<Vec<_>>().join("\n\n")
    }

    /// Sends one chat turn. Blank messages are ignored. The user message is
    /// kept even when the model call fails; only a completed exchange gets
    /// indexed.
    pub fn send_message<C>(&mut self, client: &C, message: &str, use_rag: bool) -> Result<Option<ChatMessage>>
    where
        C: ModelClient + ?Sized,
    {
        let Some(request) = self.begin_turn(message, use_rag) else {
            return Ok(None);
        };
        let reply = client.complete(&request)?;
        Ok(Some(self.finish_turn(message, reply)))
    }

    /// [`ChartSession::send_message`] with the session's own RAG toggle.
    pub fn chat<C>(&mut self, client: &C, message: &str) -> Result<Option<ChatMessage>>
    where
        C: ModelClient + ?Sized,
    {
        let use_rag = self.retrieval.use_rag;
        self.send_message(client, message, use_rag)
    }

    /// Streaming variant of [`ChartSession::send_message`]; `on_token` sees
    /// each token as it arrives. A token error abandons the turn.
    pub fn send_streaming_message<C, F>(
        &mut self,
        client: &C,
        message: &str,
        use_rag: bool,
        mut on_token: F,
    ) -> Result<Option<ChatMessage>>
    where
        C: ModelClient + ?Sized,
        F: FnMut(&str),
    {
        let Some(request) = self.begin_turn(message, use_rag) else {
            return Ok(None);
        };
        let mut reply = StreamingReply::new();
        for token in client.stream(&request)? {
            let token = token?;
            on_token(&token);
            reply.push(&token);
        }
        debug!(tokens = reply.token_count(), "stream finished");
        Ok(Some(self.finish_turn(message, reply.finish())))
    }

    /// Forgets the conversation; indexed chat turns stay searchable.
    pub fn clear_chat_history(&mut self) {
        self.chat_history.clear();
    }

    /// Forgets every analysis and empties the index.
    pub fn clear_analysis_history(&mut self) {
        self.analysis_history.clear();
        self.current_analysis = None;
        self.index.clear();
        info!("analysis history cleared");
    }

    fn begin_turn(&mut self, message: &str, use_rag: bool) -> Option<ChatRequest> {
        if message.trim().is_empty() {
            return None;
        }
        let image_url = self.uploaded_image.as_ref().map(|i| i.url.clone());
        self.chat_history.push(ChatMessage::user(message, image_url));
        Some(ChatRequest {
            message: message.to_string(),
            model: self.selected_model,
            context: self.retrieve_context(message, use_rag),
        })
    }

    fn finish_turn(&mut self, message: &str, reply: String) -> ChatMessage {
        let assistant = ChatMessage::assistant(reply);
        let content = format!("User: {}\nAssistant: {}", message, assistant.content);
        self.index.add_document(Document::chat(assistant.id.clone(), content));
        self.chat_history.push(assistant.clone());
        assistant
    }
}

//! Knowledge assistant conversation.

use molstudio_core::knowledge::{ChatMessage, ChatReply, StructureDescription};
use molstudio_core::{RequestGateway, Result, StudioError};
use std::sync::Arc;

const FAILURE_REPLY: &str = "Sorry, I encountered an error retrieving that information.";

/// A chat transcript with a sticky backend session id.
pub struct KnowledgeChat {
    gateway: Arc<dyn RequestGateway>,
    session_id: Option<String>,
    messages: Vec<ChatMessage>,
}

impl KnowledgeChat {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            gateway,
            session_id: None,
            messages: Vec::new(),
        }
    }

    /// Continues an earlier conversation.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sends a question and appends both sides to the transcript.
    ///
    /// On failure an apology is appended in place of the answer and the
    /// error is returned.
    pub async fn send(&mut self, query: &str) -> Result<ChatReply> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StudioError::validation("question must not be empty"));
        }
        self.messages.push(ChatMessage::user(query));

        match self.gateway.chat(query, self.session_id.as_deref()).await {
            Ok(reply) => {
                if self.session_id.is_none() && !reply.session_id.is_empty() {
                    tracing::debug!("[KnowledgeChat] Adopted session {}", reply.session_id);
                    self.session_id = Some(reply.session_id.clone());
                }
                self.messages
                    .push(ChatMessage::assistant(reply.answer.clone(), reply.sources.clone()));
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!("[KnowledgeChat] Chat failed: {}", e);
                self.messages.push(ChatMessage::assistant(FAILURE_REPLY, Vec::new()));
                Err(e)
            }
        }
    }

    /// Describes a structure in natural language.
    pub async fn describe(
        &self,
        smiles: &str,
        additional_info: Option<&str>,
    ) -> Result<StructureDescription> {
        let smiles = smiles.trim();
        if smiles.is_empty() {
            return Err(StudioError::validation("SMILES must not be empty"));
        }
        let additional_info = additional_info.map(str::trim).filter(|s| !s.is_empty());
        self.gateway.describe_structure(smiles, additional_info).await
    }
}

//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    AdvisorError, ChatReply, ConversationSnapshot, Message, MortgageAdvisorApi,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Client that calls the domain service directly, without HTTP
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MortgageAdvisorApi for NativeClient {
    async fn start_conversation(&self) -> Result<String, AdvisorError> {
        self.service.start_new_conversation(None).await
    }

    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply, AdvisorError> {
        self.service.process_message(message, conversation_id).await
    }

    async fn conversation_history(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Message>, AdvisorError> {
        self.service.conversation_history(conversation_id).await
    }

    async fn continue_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationSnapshot>, AdvisorError> {
        self.service.continue_conversation(conversation_id).await
    }
}

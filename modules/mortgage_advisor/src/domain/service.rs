//! Domain service - conversation orchestration

use super::interview::Interview;
use super::llm::CompletionModel;
use super::prompts;
use super::repository::{ConversationRepository, MessageRepository, UserInputRepository};
use crate::contract::{
    AdvisorError, ChatReply, Conversation, ConversationSnapshot, ConversationStatus,
    InterviewStep, Message, MessageRole,
};
use std::sync::Arc;
use std::time::Instant;

/// Domain service for mortgage interviews
pub struct Service {
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
    inputs: Arc<dyn UserInputRepository>,
    /// `None` when no API key is configured; chatting is refused then
    model: Option<Arc<dyn CompletionModel>>,
    max_message_length: usize,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
        inputs: Arc<dyn UserInputRepository>,
        model: Option<Arc<dyn CompletionModel>>,
        max_message_length: usize,
    ) -> Self {
        Self {
            conversations,
            messages,
            inputs,
            model,
            max_message_length,
        }
    }

    // ===== Conversation Operations =====

    /// Create a fresh conversation at the greeting step
    pub async fn start_new_conversation(
        &self,
        user_id: Option<String>,
    ) -> Result<String, AdvisorError> {
        let conversation = self
            .conversations
            .create(&Conversation::new(user_id))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create conversation");
                AdvisorError::Internal
            })?;

        tracing::info!(conversation_id = %conversation.id, "New conversation started");
        Ok(conversation.id)
    }

    /// Feed one borrower message to the interview
    pub async fn process_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply, AdvisorError> {
        let model = self.model.as_deref().ok_or(AdvisorError::ModelNotConfigured)?;

        let length = message.chars().count();
        if length > self.max_message_length {
            return Err(AdvisorError::Validation {
                message: format!(
                    "message is {} characters long, the limit is {}",
                    length, self.max_message_length
                ),
            });
        }

        let conversation = self.resolve_conversation(conversation_id).await?;
        let started = Instant::now();

        match self.run_turn(model, &conversation, message).await {
            Ok(reply) => {
                tracing::info!(
                    conversation_id = %conversation.id,
                    complete = reply.conversation_complete,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Message processed"
                );
                Ok(reply)
            }
            Err(e) => {
                tracing::error!(
                    conversation_id = %conversation.id,
                    error = %e,
                    "Message processing failed"
                );
                // Best effort, the apology is returned either way
                if let Err(e) = self
                    .messages
                    .add(&conversation.id, MessageRole::Assistant, prompts::PROCESSING_ERROR)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to store error reply");
                }
                Ok(ChatReply {
                    response: prompts::PROCESSING_ERROR.to_string(),
                    conversation_id: conversation.id,
                    conversation_complete: false,
                    assessment_result: None,
                })
            }
        }
    }

    async fn resolve_conversation(
        &self,
        conversation_id: Option<&str>,
    ) -> Result<Conversation, AdvisorError> {
        let id = match conversation_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => self.start_new_conversation(None).await?,
        };

        self.conversations
            .find(&id)
            .await
            .map_err(|e| {
                tracing::error!(conversation_id = %id, error = %e, "Failed to load conversation");
                AdvisorError::Internal
            })?
            .ok_or_else(|| AdvisorError::conversation_not_found(id))
    }

    async fn run_turn(
        &self,
        model: &dyn CompletionModel,
        conversation: &Conversation,
        message: &str,
    ) -> anyhow::Result<ChatReply> {
        let id = conversation.id.as_str();

        self.messages.add(id, MessageRole::User, message).await?;

        let inputs = self.inputs.find(id).await?.unwrap_or_default();
        let step = InterviewStep::resume(conversation, &inputs);
        tracing::debug!(conversation_id = %id, step = step.number(), "Advancing interview");

        let turn = Interview::new(model).advance(step, message, &inputs).await;

        if let Some(captured) = turn.captured {
            self.inputs.record(id, captured).await?;
            tracing::info!(conversation_id = %id, field = captured.field().column(), "Input recorded");
        }

        self.messages
            .add(id, MessageRole::Assistant, &turn.reply)
            .await?;

        let complete = turn.is_complete();
        if conversation.status != ConversationStatus::InProgress {
            // Completed and abandoned are terminal; the stored status stays
            tracing::debug!(
                conversation_id = %id,
                status = conversation.status.as_str(),
                "Conversation already closed"
            );
        } else if complete {
            self.conversations.complete(id).await?;
        } else {
            self.conversations.update_step(id, turn.next).await?;
        }

        Ok(ChatReply {
            response: turn.reply,
            conversation_id: conversation.id.clone(),
            conversation_complete: complete,
            assessment_result: turn.assessment,
        })
    }

    /// Transcript of a conversation, oldest first; empty for unknown IDs
    pub async fn conversation_history(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Message>, AdvisorError> {
        self.messages.list(conversation_id).await.map_err(|e| {
            tracing::error!(conversation_id, error = %e, "Failed to list messages");
            AdvisorError::Internal
        })
    }

    /// Resume information, only for conversations still in progress
    pub async fn continue_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationSnapshot>, AdvisorError> {
        let Some(conversation) = self
            .conversations
            .find(conversation_id)
            .await
            .map_err(|e| {
                tracing::error!(conversation_id, error = %e, "Failed to load conversation");
                AdvisorError::Internal
            })?
        else {
            return Ok(None);
        };

        if conversation.status != ConversationStatus::InProgress {
            return Ok(None);
        }

        let inputs = self
            .inputs
            .find(conversation_id)
            .await
            .map_err(|e| {
                tracing::error!(conversation_id, error = %e, "Failed to load user inputs");
                AdvisorError::Internal
            })?
            .unwrap_or_default();
        let mut messages = self.conversation_history(conversation_id).await?;

        Ok(Some(ConversationSnapshot {
            conversation_id: conversation.id.clone(),
            current_step: InterviewStep::resume(&conversation, &inputs),
            message_count: messages.len(),
            last_message: messages.pop(),
        }))
    }

    // ===== Maintenance =====

    /// Mark conversations idle for longer than `older_than` as abandoned
    pub async fn abandon_stale_conversations(
        &self,
        older_than: chrono::Duration,
    ) -> Result<u64, AdvisorError> {
        let Some(cutoff) = chrono::Utc::now().checked_sub_signed(older_than) else {
            return Ok(0);
        };
        let abandoned = self
            .conversations
            .abandon_stale(cutoff)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to abandon stale conversations");
                AdvisorError::Internal
            })?;

        if abandoned > 0 {
            tracing::info!(abandoned, %cutoff, "Stale conversations abandoned");
        }
        Ok(abandoned)
    }
}

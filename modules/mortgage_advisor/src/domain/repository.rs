//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{CapturedInput, Conversation, InterviewStep, Message, MessageRole, UserInputs};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository for conversation sessions
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Persist a new conversation
    async fn create(&self, conversation: &Conversation) -> Result<Conversation>;

    /// Find a conversation by ID
    async fn find(&self, id: &str) -> Result<Option<Conversation>>;

    /// Store the step that handles the next message; false if the conversation does not exist
    async fn update_step(&self, id: &str, step: InterviewStep) -> Result<bool>;

    /// Mark a conversation as completed; false if it does not exist
    async fn complete(&self, id: &str) -> Result<bool>;

    /// Mark in-progress conversations idle since before `cutoff` as abandoned
    async fn abandon_stale(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

/// Repository for conversation transcripts
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message to a conversation
    async fn add(&self, conversation_id: &str, role: MessageRole, content: &str)
        -> Result<Message>;

    /// All messages of a conversation, oldest first
    async fn list(&self, conversation_id: &str) -> Result<Vec<Message>>;
}

/// Repository for collected borrower inputs
#[async_trait]
pub trait UserInputRepository: Send + Sync {
    /// Inputs collected so far, if any were recorded
    async fn find(&self, conversation_id: &str) -> Result<Option<UserInputs>>;

    /// Record one captured value, creating the row on first use
    async fn record(&self, conversation_id: &str, input: CapturedInput) -> Result<UserInputs>;
}

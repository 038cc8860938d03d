//! Client trait for talking to the mortgage advisor
//!
//! Implemented in-process by `api::native::NativeClient` and over HTTP by the
//! chat application, so callers are agnostic of where the service runs.

use super::{
    error::AdvisorError,
    model::{ChatReply, ConversationSnapshot, Message},
};
use async_trait::async_trait;

/// Mortgage advisor API
#[async_trait]
pub trait MortgageAdvisorApi: Send + Sync {
    /// Start a fresh interview and return its conversation ID
    async fn start_conversation(&self) -> Result<String, AdvisorError>;

    /// Send one borrower message; a new conversation is created when no ID is given
    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply, AdvisorError>;

    /// Full transcript in chronological order
    async fn conversation_history(&self, conversation_id: &str)
        -> Result<Vec<Message>, AdvisorError>;

    /// Resume information for an in-progress conversation
    async fn continue_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationSnapshot>, AdvisorError>;
}

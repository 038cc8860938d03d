//! Domain layer - business logic and services

pub mod assessment;
pub mod extraction;
pub mod interview;
pub mod llm;
pub mod prompts;
pub mod repository;
pub mod service;

pub use interview::{Interview, Turn};
pub use llm::CompletionModel;
pub use repository::{ConversationRepository, MessageRepository, UserInputRepository};
pub use service::Service;

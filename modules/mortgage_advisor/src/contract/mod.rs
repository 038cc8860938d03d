//! Contract layer - public API for in-process and remote callers
//!
//! This layer contains transport-agnostic models and the client trait.
//! NO serde derives on models - wire formats live in `api::rest::dto`.

pub mod client;
pub mod error;
pub mod model;

pub use client::MortgageAdvisorApi;
pub use error::AdvisorError;
pub use model::{
    Assessment, AssessmentOutcome, AssessmentResult, CalculatedMetrics, CapturedInput, ChatReply,
    Conversation, ConversationSnapshot, ConversationStatus, CreditScoreCategory, InputField,
    InterviewStep, Message, MessageRole, UserInputs,
};

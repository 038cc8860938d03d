//! Mortgage Advisor Module
//!
//! Conversational preliminary mortgage eligibility assessment. A borrower is
//! interviewed step by step (income, debt, credit, property, down payment),
//! free-text answers are interpreted by a language model, and the collected
//! figures are run through fixed DTI/LTV eligibility rules.

// Public exports
pub mod contract;
pub use contract::{
    client::MortgageAdvisorApi, error::AdvisorError, AssessmentOutcome, AssessmentResult,
    ChatReply, ConversationSnapshot, CreditScoreCategory, UserInputs,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::MortgageAdvisorModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

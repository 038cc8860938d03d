//! Contract error types for the mortgage advisor
//!
//! These errors are transport-agnostic and shared by the native and remote clients.

/// Mortgage advisor errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// Conversation not found
    NotFound {
        /// Resource type (conversation)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Request failed validation
    Validation {
        /// Validation error message
        message: String,
    },
    /// Assessment requested before all inputs were collected
    MissingInput {
        /// Missing field names
        fields: Vec<String>,
    },
    /// No language model credentials configured
    ModelNotConfigured,
    /// Remote advisor could not be reached
    Unavailable {
        /// Transport error details
        reason: String,
    },
    /// Internal error
    Internal,
}

impl AdvisorError {
    pub fn conversation_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "conversation".to_string(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::MissingInput { fields } => {
                write!(f, "Missing required inputs: {}", fields.join(", "))
            }
            Self::ModelNotConfigured => {
                write!(
                    f,
                    "OpenAI API key is not configured. Please set OPENAI_API_KEY environment variable."
                )
            }
            Self::Unavailable { reason } => {
                write!(f, "Mortgage advisor unavailable: {}", reason)
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for AdvisorError {}

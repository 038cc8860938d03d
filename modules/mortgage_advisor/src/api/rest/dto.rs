//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Chat DTOs =====

/// Chat request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Borrower message
    #[schema(example = "I make about 85k a year")]
    pub message: String,

    /// Conversation to continue; a new one is started when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    /// Deprecated, accepted and ignored; history is kept server-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub conversation_history: Option<Vec<serde_json::Value>>,
}

/// Chat response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,

    pub conversation_id: String,

    /// True once the interview has finished
    pub conversation_complete: bool,

    /// Present on the message that completes the assessment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_result: Option<AssessmentResultDto>,
}

// ===== Assessment DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInputsDto {
    pub annual_income: Option<f64>,
    pub monthly_debt: Option<f64>,
    /// `Excellent`, `Good`, `Fair` or `Poor`
    #[schema(example = "Good")]
    pub credit_score_category: Option<String>,
    pub property_value: Option<f64>,
    pub down_payment: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculatedMetricsDto {
    #[schema(example = 0.225)]
    pub dti_ratio: f64,
    #[schema(example = 0.7875)]
    pub ltv_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssessmentDto {
    /// `Approved`, `Pre-qualified with Conditions` or `Needs Manual Review`
    #[schema(example = "Approved")]
    pub outcome: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResultDto {
    pub user_inputs: UserInputsDto,
    pub calculated_metrics: CalculatedMetricsDto,
    pub assessment: AssessmentDto,
}

// ===== Conversation DTOs =====

/// Reset response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetResponse {
    #[schema(example = "New conversation started successfully")]
    pub message: String,
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    /// `user` or `assistant`
    pub role: String,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Transcript response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageListResponse {
    pub items: Vec<MessageDto>,
    pub total: usize,
}

/// Resume information for an in-progress conversation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationSnapshotDto {
    pub conversation_id: String,
    /// Interview step (1-8) that handles the next message
    #[schema(example = 3)]
    pub current_step: i32,
    pub message_count: usize,
    pub last_message: Option<MessageDto>,
}

// ===== Service DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EndpointsDto {
    pub chat: String,
    pub health: String,
    pub reset: String,
    pub openapi: String,
}

/// Service banner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: EndpointsDto,
}

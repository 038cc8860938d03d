//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::AdvisorError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add instance URI
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: AdvisorError) -> Problem {
    match error {
        AdvisorError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{} Not Found", resource))
                .with_detail(format!("{} with id '{}' was not found", resource, id))
        }

        AdvisorError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        AdvisorError::MissingInput { fields } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Missing Input")
                .with_detail(format!("Missing required inputs: {}", fields.join(", ")))
        }

        e @ AdvisorError::ModelNotConfigured => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Model Not Configured")
                .with_detail(e.to_string())
        }

        AdvisorError::Unavailable { reason } => {
            Problem::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
                .with_detail(reason)
        }

        AdvisorError::Internal => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
        }
    }
}

/// Problem Details for a rejected rate-limited request
pub fn rate_limited(retry_after_secs: u64) -> Problem {
    Problem::new(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").with_detail(format!(
        "Rate limit exceeded. Please try again in {} seconds.",
        retry_after_secs
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (AdvisorError::conversation_not_found("abc"), 404),
            (
                AdvisorError::Validation {
                    message: "too long".into(),
                },
                400,
            ),
            (
                AdvisorError::MissingInput {
                    fields: vec!["annual_income".into()],
                },
                422,
            ),
            (AdvisorError::ModelNotConfigured, 500),
            (
                AdvisorError::Unavailable {
                    reason: "down".into(),
                },
                503,
            ),
            (AdvisorError::Internal, 500),
        ];

        for (error, status) in cases {
            assert_eq!(map_domain_error(error).status, status);
        }
    }

    #[test]
    fn missing_api_key_detail_names_the_variable() {
        let problem = map_domain_error(AdvisorError::ModelNotConfigured);
        assert!(problem.detail.unwrap().contains("OPENAI_API_KEY"));
    }
}

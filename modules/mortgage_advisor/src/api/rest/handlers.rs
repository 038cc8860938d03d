//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::AdvisorError;
use crate::domain::Service;
use axum::{extract::Path, Json};
use std::sync::Arc;

/// Application identity shown on the root endpoint
#[derive(Debug, Clone)]
pub struct ApiInfo {
    pub app_name: String,
    pub app_version: String,
}

// ===== Service Handlers =====

pub async fn root(info: Arc<ApiInfo>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} API v{}", info.app_name, info.app_version),
        endpoints: EndpointsDto {
            chat: "/chat".to_string(),
            health: "/health".to_string(),
            reset: "/conversation/reset".to_string(),
            openapi: "/openapi.json".to_string(),
        },
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ===== Conversation Handlers =====

/// Process one borrower message
pub async fn chat(
    service: Arc<Service>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, Problem> {
    if req.conversation_history.is_some() {
        tracing::debug!("Ignoring client-supplied conversation history");
    }

    let reply = service
        .process_message(&req.message, req.conversation_id.as_deref())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(reply.into()))
}

/// Start a fresh conversation
pub async fn reset_conversation(service: Arc<Service>) -> Result<Json<ResetResponse>, Problem> {
    let conversation_id = service
        .start_new_conversation(None)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(ResetResponse {
        message: "New conversation started successfully".to_string(),
        conversation_id,
    }))
}

/// Resume information for an in-progress conversation
pub async fn get_conversation(
    service: Arc<Service>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationSnapshotDto>, Problem> {
    let instance = format!("/conversations/{}", conversation_id);
    let snapshot = service
        .continue_conversation(&conversation_id)
        .await
        .map_err(|e| map_domain_error(e).with_instance(instance.clone()))?
        .ok_or_else(|| {
            map_domain_error(AdvisorError::conversation_not_found(&conversation_id))
                .with_instance(instance)
        })?;

    Ok(Json(snapshot.into()))
}

/// Conversation transcript
pub async fn list_messages(
    service: Arc<Service>,
    Path(conversation_id): Path<String>,
) -> Result<Json<MessageListResponse>, Problem> {
    let messages = service
        .conversation_history(&conversation_id)
        .await
        .map_err(map_domain_error)?;

    let items: Vec<MessageDto> = messages.into_iter().map(Into::into).collect();
    let total = items.len();

    Ok(Json(MessageListResponse { items, total }))
}

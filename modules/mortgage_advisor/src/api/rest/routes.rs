//! Route registration and OpenAPI documentation

use super::{
    dto::*,
    error::Problem,
    handlers::{self, ApiInfo},
    rate_limit::{rate_limit_middleware, RateLimiter},
};
use crate::domain::Service;
use axum::{
    extract::Path,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "AI Mortgage Advisor API"),
    paths(
        root_handler,
        health_handler,
        chat_handler,
        reset_conversation_handler,
        get_conversation_handler,
        list_messages_handler,
    ),
    components(schemas(
        ChatRequest,
        ChatResponse,
        AssessmentResultDto,
        UserInputsDto,
        CalculatedMetricsDto,
        AssessmentDto,
        ResetResponse,
        MessageDto,
        MessageListResponse,
        ConversationSnapshotDto,
        HealthResponse,
        RootResponse,
        EndpointsDto,
        Problem,
    )),
    tags((name = "mortgage-advisor", description = "Conversational mortgage pre-assessment"))
)]
pub struct ApiDoc;

/// Register all REST routes; `/chat` goes through `limiter` when given
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    info: ApiInfo,
    limiter: Option<Arc<RateLimiter>>,
) -> Router {
    let mut chat = Router::new().route("/chat", post(chat_handler));
    if let Some(limiter) = limiter {
        chat = chat.route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));
    }

    router
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/conversation/reset", post(reset_conversation_handler))
        .route("/conversations/{id}", get(get_conversation_handler))
        .route("/conversations/{id}/messages", get(list_messages_handler))
        .route("/openapi.json", get(openapi_handler))
        .merge(chat)
        .layer(Extension(service))
        .layer(Extension(Arc::new(info)))
}

// ===== Handler wrappers that extract state from Extension =====

#[utoipa::path(
    get,
    path = "/",
    tag = "mortgage-advisor",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
async fn root_handler(Extension(info): Extension<Arc<ApiInfo>>) -> Json<RootResponse> {
    handlers::root(info).await
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "mortgage-advisor",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
async fn health_handler() -> Json<HealthResponse> {
    handlers::health().await
}

#[utoipa::path(
    post,
    path = "/chat",
    tag = "mortgage-advisor",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Message too long", body = Problem),
        (status = 404, description = "Unknown conversation", body = Problem),
        (status = 429, description = "Rate limit exceeded", body = Problem),
        (status = 500, description = "Model not configured", body = Problem)
    )
)]
async fn chat_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<ChatRequest>,
) -> Result<Json<ChatResponse>, Problem> {
    handlers::chat(service, json).await
}

#[utoipa::path(
    post,
    path = "/conversation/reset",
    tag = "mortgage-advisor",
    responses((status = 200, description = "New conversation", body = ResetResponse))
)]
async fn reset_conversation_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<ResetResponse>, Problem> {
    handlers::reset_conversation(service).await
}

#[utoipa::path(
    get,
    path = "/conversations/{id}",
    tag = "mortgage-advisor",
    params(("id" = String, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Conversation in progress", body = ConversationSnapshotDto),
        (status = 404, description = "Unknown or finished conversation", body = Problem)
    )
)]
async fn get_conversation_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<ConversationSnapshotDto>, Problem> {
    handlers::get_conversation(service, path).await
}

#[utoipa::path(
    get,
    path = "/conversations/{id}/messages",
    tag = "mortgage-advisor",
    params(("id" = String, Path, description = "Conversation ID")),
    responses((status = 200, description = "Transcript, oldest first", body = MessageListResponse))
)]
async fn list_messages_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<MessageListResponse>, Problem> {
    handlers::list_messages(service, path).await
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

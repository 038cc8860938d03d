//! HTTP implementation of `MortgageAdvisorApi`

use async_trait::async_trait;
use mortgage_advisor::api::rest::dto::{
    ChatRequest, ChatResponse, ConversationSnapshotDto, MessageListResponse, ResetResponse,
};
use mortgage_advisor::api::rest::error::Problem;
use mortgage_advisor::contract::{ChatReply, ConversationSnapshot, Message};
use mortgage_advisor::{AdvisorError, MortgageAdvisorApi};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a mortgage advisor API reachable over HTTP
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /health` answered with a success status
    pub async fn is_healthy(&self) -> bool {
        match self
            .client
            .get(self.url("/health"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                false
            }
        }
    }

    /// Poll `/health` until it succeeds or `attempts` probes have failed
    pub async fn wait_for_api(&self, attempts: u32, interval: Duration) -> bool {
        for attempt in 1..=attempts {
            if self.is_healthy().await {
                return true;
            }
            tracing::info!(attempt, attempts, base_url = %self.base_url, "API not ready yet");
            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }
        false
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: Response,
        conversation_id: Option<&str>,
    ) -> Result<T, AdvisorError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                tracing::warn!(error = %e, "Malformed response body");
                AdvisorError::Internal
            });
        }

        let problem = response.json::<Problem>().await.ok();
        Err(map_error_response(status, problem, conversation_id))
    }
}

fn unavailable(error: reqwest::Error) -> AdvisorError {
    AdvisorError::Unavailable {
        reason: error.to_string(),
    }
}

fn invalid_payload(reason: String) -> AdvisorError {
    tracing::warn!(%reason, "Response did not match the contract");
    AdvisorError::Internal
}

/// Map a non-success API response to a contract error
pub fn map_error_response(
    status: StatusCode,
    problem: Option<Problem>,
    conversation_id: Option<&str>,
) -> AdvisorError {
    let detail = problem
        .and_then(|p| p.detail)
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::NOT_FOUND => {
            AdvisorError::conversation_not_found(conversation_id.unwrap_or_default())
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AdvisorError::Validation { message: detail }
        }
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
            AdvisorError::Unavailable { reason: detail }
        }
        StatusCode::INTERNAL_SERVER_ERROR if detail.contains("OPENAI_API_KEY") => {
            AdvisorError::ModelNotConfigured
        }
        _ => {
            tracing::warn!(%status, %detail, "Unexpected API error");
            AdvisorError::Internal
        }
    }
}

#[async_trait]
impl MortgageAdvisorApi for RemoteClient {
    async fn start_conversation(&self) -> Result<String, AdvisorError> {
        let response = self
            .client
            .post(self.url("/conversation/reset"))
            .send()
            .await
            .map_err(unavailable)?;
        let reset: ResetResponse = self.decode(response, None).await?;
        Ok(reset.conversation_id)
    }

    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply, AdvisorError> {
        let request = ChatRequest {
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
            conversation_history: None,
        };
        let response = self
            .client
            .post(self.url("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(unavailable)?;
        let reply: ChatResponse = self.decode(response, conversation_id).await?;
        reply.try_into().map_err(invalid_payload)
    }

    async fn conversation_history(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Message>, AdvisorError> {
        let response = self
            .client
            .get(self.url(&format!("/conversations/{}/messages", conversation_id)))
            .send()
            .await
            .map_err(unavailable)?;
        let list: MessageListResponse = self.decode(response, Some(conversation_id)).await?;
        list.items
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid_payload)
    }

    async fn continue_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationSnapshot>, AdvisorError> {
        let response = self
            .client
            .get(self.url(&format!("/conversations/{}", conversation_id)))
            .send()
            .await
            .map_err(unavailable)?;
        match self
            .decode::<ConversationSnapshotDto>(response, Some(conversation_id))
            .await
        {
            Ok(snapshot) => snapshot.try_into().map(Some).map_err(invalid_payload),
            Err(AdvisorError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

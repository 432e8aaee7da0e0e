//! Client side of the answers API.

use std::future::Future;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::errors::{AppError, ErrorResponse};
use crate::models::ApiAnswers;

/// Successful response envelope as received by the client.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

/// Remote operations on the answers resource.
pub trait AnswersApi: Send + Sync {
    /// Fetch the current answers.
    fn fetch(&self) -> impl Future<Output = Result<ApiAnswers, AppError>> + Send;

    /// Replace the stored answers with `payload`.
    fn update(
        &self,
        payload: &ApiAnswers,
    ) -> impl Future<Output = Result<ApiAnswers, AppError>> + Send;

    /// Reset the stored answers to their defaults.
    fn reset(&self) -> impl Future<Output = Result<ApiAnswers, AppError>> + Send;
}

/// [`AnswersApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnswersApi {
    client: Client,
    base_url: String,
}

impl HttpAnswersApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            let envelope: Envelope<T> = serde_json::from_slice(&body)?;
            tracing::debug!(revision_id = envelope.revision_id, "Answers response received");
            return Ok(envelope.data);
        }

        match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(error) => Err(error.into_app_error(status.as_u16())),
            Err(_) => Err(AppError::Api {
                status: status.as_u16(),
                code: status
                    .canonical_reason()
                    .unwrap_or("UNKNOWN")
                    .to_uppercase()
                    .replace(' ', "_"),
                message: String::from_utf8_lossy(&body).into_owned(),
            }),
        }
    }
}

impl AnswersApi for HttpAnswersApi {
    async fn fetch(&self) -> Result<ApiAnswers, AppError> {
        self.send(self.client.get(self.url("/api/answers"))).await
    }

    async fn update(&self, payload: &ApiAnswers) -> Result<ApiAnswers, AppError> {
        self.send(self.client.put(self.url("/api/answers")).json(payload))
            .await
    }

    async fn reset(&self) -> Result<ApiAnswers, AppError> {
        self.send(self.client.delete(self.url("/api/answers"))).await
    }
}

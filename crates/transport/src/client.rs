use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use serde::de::DeserializeOwned;
use snafu::{ResultExt, ensure};

use super::error::{
    BackendSnafu, BuildClientSnafu, DecodeReplySnafu, InvalidBaseUrlSnafu, TransportResult,
    UnreachableSnafu,
};
use super::types::{ChatReply, ChatRequest, HealthStatus, LeadAck, LeadSubmission};

pub const DEFAULT_CHAT_PATH: &str = "/api/chat";
pub const DEFAULT_LEAD_PATH: &str = "/api/lead";
pub const DEFAULT_HEALTH_PATH: &str = "/health";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Backend operations the widget depends on.
///
/// Implementations must not retry; each call is one attempt.
pub trait ChatBackend: Send + Sync {
    fn send_chat_message<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, TransportResult<ChatReply>>;
    fn submit_lead<'a>(
        &'a self,
        payload: &'a LeadSubmission,
    ) -> BoxFuture<'a, TransportResult<LeadAck>>;
    fn check_health(&self) -> BoxFuture<'_, TransportResult<HealthStatus>>;
}

/// Base address plus per-endpoint path suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub chat_path: String,
    pub lead_path: String,
    pub health_path: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            lead_path: DEFAULT_LEAD_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
        }
    }

    pub fn with_paths(
        mut self,
        chat_path: impl Into<String>,
        lead_path: impl Into<String>,
        health_path: impl Into<String>,
    ) -> Self {
        self.chat_path = chat_path.into();
        self.lead_path = lead_path.into();
        self.health_path = health_path.into();
        self
    }

    pub fn chat_url(&self) -> String {
        self.join(&self.chat_path)
    }

    pub fn lead_url(&self) -> String {
        self.join(&self.lead_path)
    }

    pub fn health_url(&self) -> String {
        self.join(&self.health_path)
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn validate(&self) -> TransportResult<()> {
        let base_url = self.base_url.as_str();
        ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            InvalidBaseUrlSnafu {
                stage: "validate-endpoints",
                base_url: base_url.to_string(),
            }
        );
        Ok(())
    }
}

/// JSON-over-HTTP backend client.
pub struct HttpTransport {
    client: Client,
    endpoints: Endpoints,
}

impl HttpTransport {
    pub fn new(endpoints: Endpoints) -> TransportResult<Self> {
        endpoints.validate()?;

        // No request timeout: a slow reply still completes and is applied.
        let client = Client::builder().build().context(BuildClientSnafu {
            stage: "build-http-client",
        })?;

        Ok(Self { client, endpoints })
    }

    async fn post_chat(&self, text: &str) -> TransportResult<ChatReply> {
        let endpoint = self.endpoints.chat_url();
        let response = self
            .client
            .post(&endpoint)
            .json(&ChatRequest { message: text })
            .send()
            .await
            .context(UnreachableSnafu {
                stage: "send-chat-request",
                endpoint: endpoint.clone(),
            })?;

        Self::decode_success(response, endpoint, "chat-http-status", "decode-chat-reply").await
    }

    async fn post_lead(&self, payload: &LeadSubmission) -> TransportResult<LeadAck> {
        let endpoint = self.endpoints.lead_url();
        let response = self
            .client
            .post(&endpoint)
            .json(payload)
            .send()
            .await
            .context(UnreachableSnafu {
                stage: "send-lead-request",
                endpoint: endpoint.clone(),
            })?;

        let status = response.status();
        ensure!(
            status.is_success(),
            BackendSnafu {
                stage: "lead-http-status",
                endpoint,
                status: status.as_u16(),
            }
        );

        // The ack shape is backend-defined, so an unreadable body still counts as accepted.
        let body = response.text().await.unwrap_or_default();
        let ack = serde_json::from_str::<LeadAck>(&body).unwrap_or_else(|error| {
            tracing::debug!(error = %error, "lead ack body is not structured json");
            LeadAck::default()
        });
        Ok(ack)
    }

    async fn get_health(&self) -> TransportResult<HealthStatus> {
        let endpoint = self.endpoints.health_url();
        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .context(UnreachableSnafu {
                stage: "send-health-request",
                endpoint: endpoint.clone(),
            })?;

        Self::decode_success(response, endpoint, "health-http-status", "decode-health-status")
            .await
    }

    async fn decode_success<T: DeserializeOwned>(
        response: reqwest::Response,
        endpoint: String,
        status_stage: &'static str,
        decode_stage: &'static str,
    ) -> TransportResult<T> {
        let status = response.status();
        ensure!(
            status.is_success(),
            BackendSnafu {
                stage: status_stage,
                endpoint,
                status: status.as_u16(),
            }
        );

        response.json::<T>().await.context(DecodeReplySnafu {
            stage: decode_stage,
            endpoint,
        })
    }
}

impl ChatBackend for HttpTransport {
    fn send_chat_message<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, TransportResult<ChatReply>> {
        Box::pin(self.post_chat(text))
    }

    fn submit_lead<'a>(
        &'a self,
        payload: &'a LeadSubmission,
    ) -> BoxFuture<'a, TransportResult<LeadAck>> {
        Box::pin(self.post_lead(payload))
    }

    fn check_health(&self) -> BoxFuture<'_, TransportResult<HealthStatus>> {
        Box::pin(self.get_health())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    #[test]
    fn endpoints_join_base_and_paths() {
        let endpoints = Endpoints::new(" https://widget.example.com/ ");

        assert_eq!(endpoints.chat_url(), "https://widget.example.com/api/chat");
        assert_eq!(endpoints.lead_url(), "https://widget.example.com/api/lead");
        assert_eq!(endpoints.health_url(), "https://widget.example.com/health");
    }

    #[test]
    fn custom_paths_are_used_verbatim() {
        let endpoints =
            Endpoints::new("http://127.0.0.1:8000").with_paths("/v2/chat", "/v2/lead", "/ping");

        assert_eq!(endpoints.chat_url(), "http://127.0.0.1:8000/v2/chat");
        assert_eq!(endpoints.health_url(), "http://127.0.0.1:8000/ping");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let result = HttpTransport::new(Endpoints::new("ftp://widget.example.com"));

        let Err(error) = result else {
            panic!("ftp base url must be rejected");
        };
        assert!(matches!(error, TransportError::InvalidBaseUrl { .. }));
        assert_eq!(error.stage(), "validate-endpoints");
        assert_eq!(
            error.to_string(),
            "base url 'ftp://widget.example.com' is not an http(s) address on `validate-endpoints`"
        );
    }
}

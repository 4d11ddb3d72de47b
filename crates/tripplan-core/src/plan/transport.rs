//! Transports from the generation client to the generation endpoint.
//!
//! [`HttpTransport`] posts to a running server; [`LocalTransport`] runs the
//! endpoint in-process. Both hand back the raw status and body text so the
//! client applies one set of response checks regardless of the route taken.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::criteria::GenerationRequest;
use super::endpoint::handle_generate;
use super::service::PlanGenerator;

/// Path of the generation endpoint relative to the server root.
pub const GENERATE_PATH: &str = "/api/generatePlan";

/// Raw endpoint reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a reply.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Carries a generation request to the endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &GenerationRequest) -> Result<TransportResponse, TransportError>;
}

// Compile-time assertion: Transport must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Transport) {}
};

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &GenerationRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request).await
    }
}

/// Posts JSON to `{base_url}/api/generatePlan`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    http: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/')),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<TransportResponse, TransportError> {
        debug!(endpoint = %self.endpoint, "send: posting generation request");
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "send: response received");
        Ok(TransportResponse { status, body })
    }
}

/// Runs the endpoint in-process against a [`PlanGenerator`].
#[derive(Debug, Clone)]
pub struct LocalTransport {
    generator: Arc<PlanGenerator>,
}

impl LocalTransport {
    pub fn new(generator: Arc<PlanGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<TransportResponse, TransportError> {
        let response = handle_generate(&self.generator, request.clone()).await;
        let body = serde_json::to_string(&response.body)
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(TransportResponse {
            status: response.status,
            body,
        })
    }
}

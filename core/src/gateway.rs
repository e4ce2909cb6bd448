//! Request gateway: endpoint + method + body in, HTTP exchange out.
//!
//! # Design
//! `ApiGateway` holds the runtime config, a transport and a credential
//! store, and carries no mutable state between calls. Each operation is a
//! `build_*` step that produces an `HttpRequest` and a dispatch step that
//! hands it to the transport. The builders are public so the request shape
//! can be checked without any I/O.
//!
//! URLs are `api_base + endpoint` by plain concatenation. The endpoint is
//! expected to start with `/` and is not validated; a malformed endpoint
//! yields a malformed URL and whatever error the transport reports.
//!
//! Every status code resolves to `Ok(HttpResponse)`. Callers decide what a
//! non-2xx response means via `HttpResponse::error_for_status`, or use the
//! `*_json` helpers which do it for them.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::RuntimeConfig;
use crate::credential::CredentialStore;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Thin transport for the backend API with bearer-token injection.
#[derive(Clone)]
pub struct ApiGateway {
    config: Arc<RuntimeConfig>,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("api_base", &self.config.api_base())
            .finish_non_exhaustive()
    }
}

impl ApiGateway {
    pub fn new(
        config: Arc<RuntimeConfig>,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            config,
            transport,
            credentials,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Full URL for `endpoint`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.api_base(), endpoint)
    }

    pub fn build_get(&self, endpoint: &str) -> HttpRequest {
        self.build_request(HttpMethod::Get, endpoint, None)
    }

    pub fn build_post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.build_json(HttpMethod::Post, endpoint, body)
    }

    pub fn build_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.build_request(method, endpoint, Some(body)))
    }

    /// Assemble a request, attaching the bearer credential when one is stored.
    ///
    /// A JSON `body` also sets `content-type: application/json`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = self.credentials.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            url: self.url(endpoint),
            headers,
            body,
        }
    }

    /// Hand a built request to the transport.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::trace!(
            method = request.method.as_str(),
            url = %request.url,
            authenticated = request.header("authorization").is_some(),
            "dispatching request"
        );
        let response = self.transport.send(request).await?;
        tracing::trace!(status = response.status, "response received");
        Ok(response)
    }

    pub async fn get(&self, endpoint: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.build_get(endpoint)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpResponse, ApiError> {
        self.send(self.build_post(endpoint, body)?).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpResponse, ApiError> {
        self.send(self.build_json(HttpMethod::Put, endpoint, body)?)
            .await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpResponse, ApiError> {
        self.send(self.build_json(HttpMethod::Patch, endpoint, body)?)
            .await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.build_request(HttpMethod::Delete, endpoint, None))
            .await
    }

    /// GET, require 2xx, decode the body.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.get(endpoint).await?.error_for_status()?.json()
    }

    /// POST, require 2xx, decode the body.
    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post(endpoint, body).await?.error_for_status()?.json()
    }
}

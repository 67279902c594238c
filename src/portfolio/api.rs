//! Typed client for the portfolio REST API.
//!
//! Every call returns an [`ApiResult`]; transport failures are mapped to
//! [`ApiError::Network`] with a per-operation message and never escape raw.
//! A 401 on any call clears the stored credential and is reported on the
//! [`AuthEvent`] channel, which [`super::session::SessionManager`] observes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;

use super::models::{
    AuthResponse, LoginRequest, Project, ProjectOrder, ProjectPayload, ReorderRequest, TokenData,
};
use super::session::{AuthEvent, SessionStore};
use crate::errors::{ApiError, GENERIC_SERVER_ERROR};

/// Default API host when nothing is configured.
pub const DEFAULT_API_URL: &str = "https://api.medeirosdev.space";

/// Success half of the `{success, data?, message?, error?}` envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: Option<String>,
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Credential checks used by the auth guard.
/// Real implementation: `ApiClient`. Test double: `MockVerifier`.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    fn has_credential(&self) -> bool;
    async fn verify_token(&self) -> bool;
    fn clear_credential(&self);
    fn mark_authenticated(&self);
}

/// Project operations the list controller depends on.
/// Real implementation: `ApiClient`. Test double: `MockProjectApi`.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn get_projects(&self) -> ApiResult<Vec<Project>>;
    async fn get_project(&self, id: &str) -> ApiResult<Project>;
    async fn create_project(&self, payload: &ProjectPayload) -> ApiResult<Project>;
    async fn update_project(&self, id: &str, payload: &ProjectPayload) -> ApiResult<Project>;
    async fn delete_project(&self, id: &str) -> ApiResult<()>;
    /// Send the desired absolute order. The reordered list is not returned.
    async fn update_project_order(&self, orders: &[ProjectOrder]) -> ApiResult<()>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<AuthEvent>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, store)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_http(http, base_url, store))
    }

    fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let (events, _rx) = broadcast::channel(16);
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            events,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Receive auth changes emitted from response handling.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn emit(&self, event: AuthEvent) {
        let _ = self.events.send(event); // Ignore error if no receivers
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(header::CONTENT_TYPE, "application/json");
        match self.store.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn evict(&self) {
        if let Err(e) = self.store.clear_credential() {
            tracing::error!(error = %e, "Failed to clear credential after 401");
        }
        self.emit(AuthEvent::Unauthorized);
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        network_message: &str,
    ) -> ApiResult<T> {
        match request.send().await {
            Ok(response) => self.handle_response(response).await,
            Err(e) => {
                tracing::warn!(error = %e, "{}", network_message);
                Err(ApiError::Network(network_message.to_string()))
            }
        }
    }

    /// Normalize a response into the uniform result shape.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let status = response.status();
        let url = response.url().path().to_string();
        tracing::debug!(path = %url, status = status.as_u16(), "API response");

        if status == StatusCode::UNAUTHORIZED {
            self.evict();
        }

        let body = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %url, error = %e, "Failed to read response body");
                return Err(ApiError::InvalidResponse);
            }
        };
        let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&body).map_err(|e| {
                tracing::warn!(path = %url, error = %e, "Response body is not JSON");
                ApiError::InvalidResponse
            })?
        };

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        if !status.is_success() {
            let message = message.unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());
            return Err(if status == StatusCode::UNAUTHORIZED {
                ApiError::Unauthorized { message }
            } else {
                ApiError::Server {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let data = match value {
            Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        let data = serde_json::from_value(data).map_err(|e| {
            tracing::warn!(path = %url, error = %e, "Response data has unexpected shape");
            ApiError::InvalidResponse
        })?;
        Ok(ApiResponse { data, message })
    }

    async fn send_unit(&self, request: RequestBuilder, network_message: &str) -> ApiResult<()> {
        let response: ApiResponse<Value> = self.send(request, network_message).await?;
        Ok(ApiResponse {
            data: (),
            message: response.message,
        })
    }

    /// Exchange the admin password for a session credential.
    ///
    /// A 401 here means a wrong password, not an expired session, so it does
    /// not go through eviction and leaves storage untouched.
    pub async fn login(&self, password: &str) -> AuthResponse {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&LoginRequest {
                password: password.to_string(),
            });

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Login request failed");
                return AuthResponse::failed("Network error. Try again later.");
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("Login rejected");
            return AuthResponse::failed("Invalid password");
        }

        match self.handle_response::<TokenData>(response).await {
            Ok(ApiResponse {
                data: TokenData { token: Some(token) },
                ..
            }) if !token.is_empty() => {
                if let Err(e) = self.store.save_credential(&token) {
                    tracing::error!(error = %e, "Failed to store credential");
                    return AuthResponse::failed("Failed to store credential");
                }
                tracing::info!("Logged in");
                self.emit(AuthEvent::LoggedIn);
                AuthResponse {
                    success: true,
                    message: "Login successful".to_string(),
                    token: Some(token),
                }
            }
            Ok(_) => AuthResponse::failed("Login failed"),
            Err(e) => AuthResponse::failed(e.description()),
        }
    }

    /// Forget the credential locally.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear_credential() {
            tracing::error!(error = %e, "Failed to clear credential on logout");
        }
        self.emit(AuthEvent::LoggedOut);
    }
}

#[async_trait]
impl TokenVerifier for ApiClient {
    fn has_credential(&self) -> bool {
        self.store.token().is_some()
    }

    async fn verify_token(&self) -> bool {
        let request = self.authorized(self.http.post(self.url("/api/auth/verify")));
        self.send::<Value>(request, "Failed to verify token")
            .await
            .is_ok()
    }

    fn clear_credential(&self) {
        if let Err(e) = self.store.clear_credential() {
            tracing::error!(error = %e, "Failed to clear credential");
        }
    }

    fn mark_authenticated(&self) {
        if let Err(e) = self.store.mark_authenticated() {
            tracing::warn!(error = %e, "Failed to persist authenticated flag");
        }
    }
}

#[async_trait]
impl ProjectApi for ApiClient {
    async fn get_projects(&self) -> ApiResult<Vec<Project>> {
        let request = self.authorized(self.http.get(self.url("/api/projects")));
        self.send(request, "Failed to fetch projects").await
    }

    async fn get_project(&self, id: &str) -> ApiResult<Project> {
        let request = self.authorized(self.http.get(self.url(&format!("/api/projects/{}", id))));
        self.send(request, "Failed to fetch project").await
    }

    async fn create_project(&self, payload: &ProjectPayload) -> ApiResult<Project> {
        let request = self
            .authorized(self.http.post(self.url("/api/projects")))
            .json(payload);
        self.send(request, "Failed to create project").await
    }

    async fn update_project(&self, id: &str, payload: &ProjectPayload) -> ApiResult<Project> {
        tracing::debug!(id, title = %payload.title, "Updating project");
        let request = self
            .authorized(self.http.put(self.url(&format!("/api/projects/{}", id))))
            .json(payload);
        self.send(request, "Failed to update project").await
    }

    async fn delete_project(&self, id: &str) -> ApiResult<()> {
        let request =
            self.authorized(self.http.delete(self.url(&format!("/api/projects/{}", id))));
        self.send_unit(request, "Failed to delete project").await
    }

    async fn update_project_order(&self, orders: &[ProjectOrder]) -> ApiResult<()> {
        let body = ReorderRequest {
            projects: orders.to_vec(),
        };
        let request = self
            .authorized(self.http.put(self.url("/api/projects/reorder")))
            .json(&body);
        self.send_unit(request, "Failed to update project order")
            .await
    }
}

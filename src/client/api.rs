use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    errors::ErrorResponse,
    models::dto::{LoginRequest, LoginResponse, MeResponse, SignupRequest, SignupResponse, UserSummary},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Validation,
    Conflict,
    Unauthorized,
    NotFound,
    Server,
    Network,
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Maps an error response from the auth API. The body `code` wins over
    /// the status since validation and conflict errors share a 400.
    pub fn from_response(status: StatusCode, body: Option<ErrorResponse>) -> Self {
        let kind = match body.as_ref().map(|b| b.code.as_str()) {
            Some("VALIDATION_ERROR") => ApiErrorKind::Validation,
            Some("CONFLICT") => ApiErrorKind::Conflict,
            Some("UNAUTHORIZED") => ApiErrorKind::Unauthorized,
            Some("NOT_FOUND") => ApiErrorKind::NotFound,
            _ => match status {
                StatusCode::BAD_REQUEST => ApiErrorKind::Validation,
                StatusCode::UNAUTHORIZED => ApiErrorKind::Unauthorized,
                StatusCode::NOT_FOUND => ApiErrorKind::NotFound,
                _ => ApiErrorKind::Server,
            },
        };

        let message = body
            .map(|b| b.message)
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        Self::new(kind, message)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::new(ApiErrorKind::Timeout, "Request timed out.")
        } else if err.is_decode() {
            ApiError::new(ApiErrorKind::Server, format!("Unexpected response: {}", err))
        } else {
            ApiError::new(ApiErrorKind::Network, format!("Network error: {}", err))
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Client side of the auth endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> ApiResult<SignupResponse>;
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;
    /// Resolves a token to its user. Gives up with `Cancelled` as soon as
    /// `cancel` fires.
    async fn who_am_i(&self, token: &str, cancel: &CancellationToken) -> ApiResult<UserSummary>;
}

pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.json::<ErrorResponse>().await.ok();
        Err(ApiError::from_response(status, body))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn signup(&self, request: &SignupRequest) -> ApiResult<SignupResponse> {
        let response = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(request)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(request)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn who_am_i(&self, token: &str, cancel: &CancellationToken) -> ApiResult<UserSummary> {
        let request = async {
            let response = self
                .client
                .get(self.url("/api/auth/me"))
                .bearer_auth(token)
                .send()
                .await?;
            Self::read::<MeResponse>(response).await
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::new(ApiErrorKind::Cancelled, "Request cancelled.")),
            result = request => result.map(|me| me.user),
        }
    }
}

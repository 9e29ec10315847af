use std::sync::Arc;

use reqwest::header::{ACCEPT, ORIGIN, REFERER};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::ezygo::dto::{LoginRequest, LoginResponse};
use crate::ezygo::refresh::RefreshGuard;
use crate::session::SessionStore;

pub const ACCEPT_VALUE: &str = "application/json, text/plain, */*";

/// A request to an authenticated endpoint, kept so it can be replayed.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            body: Some(body),
        }
    }
}

/// Sends bearer-authenticated requests and re-logs in once on a 401.
pub struct AuthExecutor {
    client: Client,
    config: Config,
    session: SessionStore,
    guard: Arc<RefreshGuard>,
}

impl AuthExecutor {
    pub fn new(
        config: Config,
        session: SessionStore,
        guard: Arc<RefreshGuard>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            config,
            session,
            guard,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn guard(&self) -> &RefreshGuard {
        &self.guard
    }

    /// Logs in against the bare endpoint and stores the session on success.
    pub async fn login(&self, username: &str, password: &str) -> LoginResponse {
        let response = match self.send_login(username, password).await {
            Ok(response) => response,
            Err(e) => {
                warn!("login request failed: {}", e);
                let message = match e {
                    AppError::Network(_) => e.to_string(),
                    other => format!("Network error: {}", other),
                };
                return LoginResponse::failure(message);
            }
        };

        let Some(token) = response.token() else {
            debug!("login rejected: {}", response.error_message());
            return response;
        };

        if let Err(e) = self.session.save(token, username, password) {
            warn!("login succeeded but the session could not be stored: {}", e);
            return LoginResponse::failure(format!("Could not store session: {}", e));
        }
        response
    }

    async fn send_login(&self, username: &str, password: &str) -> Result<LoginResponse, AppError> {
        let response = self
            .client
            .post(self.config.endpoint("login"))
            .header(ACCEPT, ACCEPT_VALUE)
            .header(ORIGIN, &self.config.origin)
            .header(REFERER, self.config.referer())
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("login responded with {}", status);
        Ok(serde_json::from_str(&body)?)
    }

    /// Re-logs in with the stored credentials. Returns false when another
    /// refresh is already running, no credentials are stored, or the login
    /// did not yield a token.
    pub async fn refresh(&self) -> bool {
        let Some(_permit) = self.guard.try_begin() else {
            debug!("token refresh already in progress");
            return false;
        };

        let Some(credentials) = self.session.credentials() else {
            debug!("no stored credentials to refresh with");
            return false;
        };

        let response = self
            .login(&credentials.username, &credentials.password)
            .await;
        if response.is_success() {
            info!("access token refreshed");
            true
        } else {
            warn!("token refresh failed: {}", response.error_message());
            false
        }
    }

    pub async fn execute(&self, request: &ApiRequest) -> Result<Value, AppError> {
        let token = self.session.token().ok_or(AppError::Unauthenticated)?;
        let mut response = self.send(request, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            info!("token expired, attempting to refresh");
            if self.refresh().await {
                let token = self.session.token().ok_or(AppError::Unauthenticated)?;
                response = self.send(request, &token).await?;
            }
        }

        let status = response.status();
        if !status.is_success() {
            warn!("{} {} failed with {}", request.method, request.url, status);
            return Err(AppError::RequestFailed(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, request: &ApiRequest, token: &str) -> Result<Response, AppError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .bearer_auth(token)
            .header(ACCEPT, ACCEPT_VALUE);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }
}

//! HTTP client for the form service.
//!
//! Two endpoints, one attempt each:
//! - `POST {base}/create-user` with `{rollNumber, name}`
//! - `GET  {base}/get-form?rollNumber=...` returning `{form: FormSchema}`
//!
//! Response interpretation is kept in free functions so it can be checked
//! without a server.
use async_trait::async_trait;
use form_engine::{FormResponse, FormSchema, SessionIdentity};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://dynamic-form-generator-9rl7.onrender.com";

/// Shown when a rejected login carries no message of its own.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please check your credentials.";

/// The remote collaborator a form session is bootstrapped from.
#[async_trait]
pub trait FormService: Send + Sync {
    async fn create_user(&self, identity: &SessionIdentity) -> Result<(), ApiError>;

    async fn fetch_form(&self, roll_number: &str) -> Result<FormSchema, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpFormService {
    client: Client,
    base_url: String,
}

impl HttpFormService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn create_user_url(&self) -> String {
        format!("{}/create-user", self.base_url)
    }

    pub fn get_form_url(&self) -> String {
        format!("{}/get-form", self.base_url)
    }
}

#[async_trait]
impl FormService for HttpFormService {
    async fn create_user(&self, identity: &SessionIdentity) -> Result<(), ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(self.create_user_url())
            .headers(headers)
            .json(identity)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "create-user answered");
        interpret_create_user(status, &body)
    }

    async fn fetch_form(&self, roll_number: &str) -> Result<FormSchema, ApiError> {
        let response = self
            .client
            .get(self.get_form_url())
            .query(&[("rollNumber", roll_number)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "get-form answered");
        interpret_form(status, &body)
    }
}

/// Success is any 2xx carrying a JSON body. A rejection surfaces the body's
/// `message` or [`LOGIN_FALLBACK_MESSAGE`].
pub fn interpret_create_user(status: StatusCode, body: &str) -> Result<(), ApiError> {
    let parsed = serde_json::from_str::<Value>(body);
    if status.is_success() {
        return parsed.map(|_| ()).map_err(ApiError::from);
    }
    let message = parsed
        .ok()
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(LOGIN_FALLBACK_MESSAGE)
        .to_string();
    Err(ApiError::Rejected(message))
}

/// Any non-2xx is a plain status failure; a 2xx must decode as a [`FormResponse`].
pub fn interpret_form(status: StatusCode, body: &str) -> Result<FormSchema, ApiError> {
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    let response: FormResponse = serde_json::from_str(body)?;
    Ok(response.form)
}

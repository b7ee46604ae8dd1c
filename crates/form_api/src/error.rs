use form_engine::SessionError;
use thiserror::Error;

/// Failures of a single call to the form service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status; carries the message
    /// to show the user.
    #[error("{0}")]
    Rejected(String),

    #[error("Response failed with status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Request failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Why a form session could not be started.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Identity creation failed; the message is shown on the login view.
    #[error("{0}")]
    Authentication(String),

    /// Schema could not be fetched or used; the user has to log in again.
    #[error("Failed to fetch form data. Please try again.")]
    SchemaFetch,
}

impl BootstrapError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, BootstrapError::Authentication(_))
    }
}

impl From<SessionError> for BootstrapError {
    fn from(_: SessionError) -> Self {
        BootstrapError::SchemaFetch
    }
}

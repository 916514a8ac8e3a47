//! Conversion of unsuccessful HTTP responses into [`FeedbackError`]s.
//!
//! The server reports failures as a status code plus a body (usually
//! FastAPI's `{"detail": "..."}`). The body text is kept verbatim so the
//! caller can log exactly what the server said.

use std::fmt;

use reqwest::{Response, StatusCode};

use crate::error::{FeedbackError, Result};

/// A non-2xx response from the feedback API
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    /// Raw response body text
    pub body: String,
    /// Request path, for not-found messages
    pub path: String,
}

impl ApiError {
    pub fn new(status: StatusCode, body: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            path: path.into(),
        }
    }

    /// Consume a response and build the error from its status and body
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let path = response.url().path().to_string();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => format!("<unreadable body: {e}>"),
        };
        Self::new(status, body, path)
    }

    pub fn to_feedback_error(&self) -> FeedbackError {
        if self.status == StatusCode::NOT_FOUND {
            return FeedbackError::NotFound(self.path.clone());
        }
        FeedbackError::Api {
            status: self.status.as_u16(),
            body: self.body.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.path, self.body)
    }
}

impl From<ApiError> for FeedbackError {
    fn from(error: ApiError) -> Self {
        error.to_feedback_error()
    }
}

/// Pass successful responses through; turn anything else into an error
pub async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let error = ApiError::from_response(response).await;
    tracing::debug!("feedback API returned {error}");
    Err(error.into())
}

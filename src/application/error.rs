use std::error::Error as StdError;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::application::browser::BrowserError;
use crate::application::repos::RepoError;
use crate::application::webhook::WebhookError;
use crate::domain::error::DomainError;
use crate::infra::error::InfraError;

/// Diagnostic payload attached to failed responses and consumed by the
/// response-logging middleware. Carries the full source chain; none of it
/// reaches the client body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Application error taxonomy. Every pipeline failure maps onto exactly one
/// variant so callers can tell a bad request from a missing binding, a
/// failed remote render, a rejected build hook, or a storage fault.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("remote render of `{url}` failed")]
    RenderFetch {
        url: String,
        #[source]
        cause: BrowserError,
    },
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error(transparent)]
    Store(#[from] RepoError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn render_fetch(url: impl Into<String>, cause: BrowserError) -> Self {
        Self::RenderFetch {
            url: url.into(),
            cause,
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(DomainError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Domain(DomainError::Validation { .. }) => StatusCode::BAD_REQUEST,
            AppError::RenderFetch { .. } | AppError::Webhook(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(RepoError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Infra(_) | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `error` string placed in the response body. Client-fault variants
    /// surface their own message; server-side faults stay generic.
    fn public_message(&self) -> String {
        match self {
            AppError::Domain(err) => err.to_string(),
            AppError::RenderFetch { url, .. } => {
                format!("Failed to render remote template at {url}")
            }
            AppError::Webhook(err) => err.to_string(),
            AppError::Store(RepoError::NotFound { entity }) => format!("{entity} not found"),
            AppError::Store(_) => "Service temporarily unavailable".to_string(),
            AppError::Infra(_) | AppError::Unexpected(_) => "Unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.public_message() }));
        let report = ErrorReport::from_error("application::error::AppError", status, &self);
        let mut response = (status, body).into_response();
        report.attach(&mut response);
        response
    }
}

//! Error types for the downstream services.
//!
//! Every façade operation fails with an [`ApiError`] tagged by the service it
//! talked to. Failures from lower layers are folded in through
//! [`IntoApiError`]; an `ApiError` passes through untouched so an error is
//! never wrapped twice.

use std::fmt;

use thiserror::Error;

use crate::validation::{FieldIssue, ValidationError};

/// Downstream service an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Shopee,
    Promolinks,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shopee => write!(f, "shopee"),
            Self::Promolinks => write!(f, "promolinks"),
        }
    }
}

/// Broad category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Parameters were rejected before any request was sent.
    Validation,
    /// The service answered with a non-2xx status.
    Upstream,
    /// Network failure, unreadable body, or anything else.
    Unexpected,
}

/// Operation error codes attached to wrapped failures.
pub mod codes {
    pub const SHOPEE_GENERATE_LINK: &str = "SHOPEE_GENERATE_LINK_ERROR";
    pub const SHOPEE_GET_PRODUCT_OFFERS: &str = "SHOPEE_GET_PRODUCT_OFFERS_ERROR";
    pub const SHOPEE_GET_OFFERS: &str = "SHOPEE_GET_OFFERS_ERROR";
    pub const PROMOLINKS_LINK_GENERATION_FIND_ALL: &str =
        "PROMOLINKS_LINK_GENERATION_FIND_ALL_ERROR";
    pub const PROMOLINKS_PROMO_LINK_FIND_ALL: &str = "PROMOLINKS_PROMO_LINK_FIND_ALL_ERROR";
}

/// Typed failure of a façade operation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub service: Service,
    pub kind: ApiErrorKind,
    pub message: String,
    pub code: Option<String>,
    pub status_code: Option<u16>,
    /// Field issues, populated for [`ApiErrorKind::Validation`].
    pub issues: Vec<FieldIssue>,
}

impl ApiError {
    pub fn new(service: Service, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            service,
            kind,
            message: message.into(),
            code: None,
            status_code: None,
            issues: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ApiErrorKind::Validation
    }
}

/// Failure of the base API client.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("API request failed: {status} {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Decode(String),

    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl TransportError {
    /// Message the upstream service put in its error body, if any.
    fn upstream_message(body: &str) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        json.get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}

/// Conversion of a lower-layer failure into a service error.
pub trait IntoApiError {
    fn into_api_error(self, service: Service, code: &'static str) -> ApiError;
}

impl IntoApiError for ApiError {
    fn into_api_error(self, _service: Service, _code: &'static str) -> ApiError {
        self
    }
}

impl IntoApiError for ValidationError {
    fn into_api_error(self, service: Service, code: &'static str) -> ApiError {
        let mut err = ApiError::new(service, ApiErrorKind::Validation, self.to_string())
            .with_code(code);
        err.issues = self.issues;
        err
    }
}

impl IntoApiError for TransportError {
    fn into_api_error(self, service: Service, code: &'static str) -> ApiError {
        match self {
            TransportError::Status { status, ref body } => {
                let message = Self::upstream_message(body).unwrap_or_else(|| self.to_string());
                ApiError::new(service, ApiErrorKind::Upstream, message)
                    .with_code(code)
                    .with_status(status)
            }
            other => {
                ApiError::new(service, ApiErrorKind::Unexpected, other.to_string()).with_code(code)
            }
        }
    }
}

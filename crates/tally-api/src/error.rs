//! # API Error Types
//!
//! Error type for every call that crosses the REST boundary.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       API Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │     Server      │  │     Local               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Status         │  │  NotAuthenticated       │ │
//! │  │  (unreachable)  │  │  (non-2xx)      │  │  InvalidConfig          │ │
//! │  │                 │  │  Decode         │  │  Core (draft rules)     │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Network vs Status only changes the wording shown to the user.         │
//! │  Control flow treats every failure the same: surface once, no retry.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wording shown for unreachable-server failures.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Wording shown for failures that are neither network nor HTTP status.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The server could not be reached (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// Non-2xx response. `message` is extracted from the body when possible.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// A call that needs a bearer token was made without one.
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Draft rule or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Text for the single user-visible notification of this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidConfig(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Core(CoreError::Validation(err))
    }
}

//! # Session
//!
//! Holds the bearer token for one logged-in user.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Session Lifecycle                              │
//! │                                                                         │
//! │   Session::new() ──► empty                                             │
//! │        │                                                                │
//! │        │  ApiClient::login()  /  Session::set(AuthToken)                │
//! │        ▼                                                                │
//! │   authenticated ──► every request gets "Authorization: Bearer <jwt>"  │
//! │        │                                                                │
//! │        │  needs_refresh() once within 5 minutes of `exp`               │
//! │        │                                                                │
//! │        │  ApiClient::logout()  /  Session::clear()                      │
//! │        ▼                                                                │
//! │   empty                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is handed to the client at construction. Nothing reads the
//! token from ambient storage. Clones share the same token.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Margin before token expiration at which a refresh is due (5 minutes).
const REFRESH_MARGIN_SECS: i64 = 300;

// =============================================================================
// Auth Token
// =============================================================================

/// A bearer token plus its expiry, when the token carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<f64>,
}

impl AuthToken {
    /// Wraps a raw token, reading `exp` from it when it is a JWT.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        let expires_at = decode_expiry(&token);
        AuthToken { token, expires_at }
    }

    pub fn with_expiry(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        AuthToken {
            token: token.into(),
            expires_at,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Tokens without an expiry never expire locally.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|exp| now + Duration::seconds(REFRESH_MARGIN_SECS) >= exp)
    }
}

/// Reads the `exp` claim without checking the signature. The server is
/// the one that verifies tokens; this is only for local expiry hints.
fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match jsonwebtoken::decode::<ExpiryClaim>(token, &DecodingKey::from_secret(b""), &validation) {
        Ok(data) => data
            .claims
            .exp
            .and_then(|exp| DateTime::from_timestamp(exp as i64, 0)),
        Err(e) => {
            debug!(error = %e, "Token is not a readable JWT, expiry unknown");
            None
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Shared, explicit holder of the current token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<AuthToken>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that starts out holding `token`.
    pub fn with_token(token: AuthToken) -> Self {
        Session {
            token: Arc::new(RwLock::new(Some(token))),
        }
    }

    pub async fn set(&self, token: AuthToken) {
        info!(expires_at = ?token.expires_at(), "Session token set");
        *self.token.write().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
        info!("Session cleared");
    }

    pub async fn current(&self) -> Option<AuthToken> {
        self.token.read().await.clone()
    }

    /// `Authorization` header value, if a token is held.
    pub async fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| format!("Bearer {}", t.as_str()))
    }

    /// Holds a token that has not expired.
    pub async fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_expired_at(Utc::now()))
    }

    /// True when the token is missing or close to expiry.
    pub async fn needs_refresh(&self) -> bool {
        self.token
            .read()
            .await
            .as_ref()
            .map_or(true, |t| t.needs_refresh_at(Utc::now()))
    }
}

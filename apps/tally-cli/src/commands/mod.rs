//! # CLI Commands
//!
//! ```text
//! commands/
//! ├── mod.rs         ◄─── Context (config + client) shared by all commands
//! ├── auth.rs        ◄─── login
//! ├── items.rs       ◄─── item catalog CRUD
//! ├── categories.rs  ◄─── item category CRUD
//! └── invoices.rs    ◄─── list, show, create, edit, delete
//! ```
//!
//! Every command gets a [`Context`] built once in `main`. Failed API calls
//! have already been printed by the notifier when the error reaches here.

pub mod auth;
pub mod categories;
pub mod invoices;
pub mod items;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::Utc;
use tally_api::{ApiClient, ApiError, AuthToken, ClientConfig, Session};
use tracing::{debug, warn};

use crate::ui::TerminalNotifier;

/// Configuration and client for one CLI invocation.
pub struct Context {
    pub config: ClientConfig,
    pub client: ApiClient,
}

impl Context {
    pub async fn connect(config_path: Option<PathBuf>, token: Option<&str>) -> Result<Self> {
        let config = ClientConfig::load(config_path).context("Failed to load configuration")?;
        debug!(base_url = %config.api_root(), "Configuration loaded");

        let session = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => {
                let token = AuthToken::new(token);
                if token.is_expired_at(Utc::now()) {
                    warn!(expired_at = ?token.expires_at(), "Token has expired; run `tally login`");
                }
                Session::with_token(token)
            }
            None => Session::new(),
        };

        let client = ApiClient::new(&config, session, Arc::new(TerminalNotifier))?;
        Ok(Context { config, client })
    }

    /// Fails early when no usable token was supplied.
    pub async fn require_login(&self) -> Result<()> {
        if self.client.session().is_authenticated().await {
            Ok(())
        } else {
            Err(ApiError::NotAuthenticated)
                .context("Pass --token or set TALLY_TOKEN (see `tally login`)")
        }
    }
}

/// True when the notifier already showed this failure to the user.
pub fn already_reported(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>().is_some_and(|e| {
        matches!(
            e,
            ApiError::Network(_) | ApiError::Status { .. } | ApiError::Decode(_)
        )
    })
}

//! # tally-api: Persistence Boundary for Tally
//!
//! Talks to the invoicing REST API and drives the invoice draft through
//! load, edit and save.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tally-api Layout                                 │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 DraftEditor<B: InvoiceBackend>                   │  │
//! │  │                                                                  │  │
//! │  │  Empty → Loading → Ready → Saving → Saved | LoadError | SaveError│  │
//! │  │  Owns one InvoiceDraft (tally-core) and the item Catalog         │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ InvoiceBackend (async trait)            │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      ApiClient (reqwest)                         │  │
//! │  │                                                                  │  │
//! │  │  Items • Categories • Invoices • Login                           │  │
//! │  │  Bearer token from Session • one Notifier::error per failure    │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ HTTPS + JSON                            │
//! │                               ▼                                         │
//! │                        Invoicing REST API                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`client`] - HTTP client for every endpoint
//! - [`backend`] - The subset of calls the editor depends on
//! - [`editor`] - Async draft editor state machine
//! - [`session`] - Bearer token holder
//! - [`config`] - Client configuration (TOML + environment)
//! - [`notify`] - Failure notification sink
//! - [`error`] - API error type
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tally_api::{ApiClient, ClientConfig, DraftEditor, Session, TracingNotifier};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load(None)?;
//! let client = ApiClient::new(&config, Session::new(), Arc::new(TracingNotifier))?;
//! client.login("owner@example.com", "secret").await?;
//!
//! let mut editor = DraftEditor::new(client.clone());
//! editor.open_new(chrono::Local::now().date_naive()).await?;
//! editor.set_customer_name("Acme Ltd")?;
//! editor.select_item(0, 1)?;
//! editor.save().await?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod notify;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::InvoiceBackend;
pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use editor::{DraftEditor, EditorState, SaveOutcome};
pub use error::{ApiError, ApiResult};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use session::{AuthToken, Session};

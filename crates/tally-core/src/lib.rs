//! # tally-core: Pure Business Logic for Tally
//!
//! Everything about an invoice that can be decided without talking to the
//! server lives here, as plain functions and data with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tally-cli (clap)                             │   │
//! │  │    login ──► items ──► invoices list/show/create/edit          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-api                                    │   │
//! │  │    ApiClient (reqwest), Session, DraftEditor                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │ validation│  │   │
//! │  │   │  Invoice  │  │   Money   │  │  Draft    │  │  parse_*  │  │   │
//! │  │   │   Item    │  │   calc    │  │  LineItem │  │  LineEdit │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (Item, Invoice, InvoicePayload, ...)
//! - [`money`] - Integer-cent amounts for line amounts and totals
//! - [`calc`] - Line amounts and invoice totals
//! - [`draft`] - The editable invoice draft and save payload shaping
//! - [`numbering`] - Invoice number preview and display form
//! - [`listing`] - Dashboard search, date ranges, pagination
//! - [`catalog`] - Item lookup and item body validation
//! - [`validation`] - Typed parsing of user-entered text
//! - [`account`] - Sign-up field rules and form encoding
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::calc::line_amount;
//!
//! // 3 × $10.00 at 10% off
//! let amount = line_amount(Decimal::from(3), Decimal::TEN, Some(Decimal::TEN));
//! assert_eq!(amount.cents(), 2700);
//!
//! // 10% tax on the subtotal
//! assert_eq!(amount.percentage(Decimal::TEN).cents(), 270);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod calc;
pub mod catalog;
pub mod draft;
pub mod error;
pub mod listing;
pub mod money;
pub mod numbering;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calc::InvoiceTotals;
pub use catalog::Catalog;
pub use draft::{InvoiceDraft, InvoiceNumber, LineId, LineItem, SavePlan};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::{LineEdit, LineField};

// =============================================================================
// Crate-Level Constants
// =============================================================================

use rust_decimal::Decimal;

/// Tax percentage for new drafts, and for persisted invoices that carry none.
pub const DEFAULT_TAX_PERCENTAGE: Decimal = Decimal::TEN;

/// Display prefix of invoice numbers (`INV-0007`).
pub const INVOICE_NUMBER_PREFIX: &str = "INV-";

/// Zero-padded width of the numeric part.
pub const INVOICE_NUMBER_WIDTH: usize = 4;

/// Preview number used when the preview request fails.
pub const FALLBACK_INVOICE_NUMBER: u64 = 1;

/// Shown in place of the number until the preview arrives.
pub const PENDING_INVOICE_NUMBER_TEXT: &str = "Auto-generated";

//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Draft and domain rule failures                 │
//! │  └── ValidationError  - User-typed input that does not parse           │
//! │                                                                         │
//! │  tally-api errors (separate crate)                                     │
//! │  └── ApiError         - Network, HTTP status, decode failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → CLI (anyhow)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Draft and domain rule failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A row index past the end of the draft's lines.
    #[error("Row {row} does not exist (draft has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    /// Item id is not in the loaded catalog.
    ///
    /// ## When This Occurs
    /// - The item was deleted after the catalog was loaded
    /// - A CLI `--line` names an id that was never in the catalog
    #[error("Item not found in catalog: {0}")]
    UnknownItem(i64),

    /// Editor is not in a state that accepts the requested operation.
    ///
    /// ## When This Occurs
    /// - Editing before `open_new`/`open_existing` finished
    /// - Editing after a successful save discarded the draft
    #[error("Draft is {state}, cannot {operation}")]
    DraftNotEditable { state: String, operation: String },

    /// Save attempted without a customer name.
    #[error("Customer name is required")]
    CustomerRequired,

    /// Typed input was rejected.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Produced when user-typed text is turned into typed values. Nothing is
/// silently coerced to zero.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Percentages outside 0-100.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Zero or negative quantity.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Negative rate.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Not a number, not a date, or an unknown name.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

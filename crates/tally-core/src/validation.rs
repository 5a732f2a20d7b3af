//! # Validation Module
//!
//! Turns user-typed text into typed values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Input Pipeline                                     │
//! │                                                                         │
//! │  "2.5"  ──► parse_quantity ──► Ok(Decimal 2.5)                         │
//! │  "-1"   ──► parse_quantity ──► Err(MustBePositive)                     │
//! │  "abc"  ──► parse_rate     ──► Err(InvalidFormat)                      │
//! │  "120"  ──► parse_percentage ► Err(OutOfRange 0..100)                  │
//! │                                                                         │
//! │  Nothing is coerced to zero. The caller decides what to show.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{LineEdit, LineField};
//!
//! let edit = LineEdit::parse(LineField::Quantity, "3").unwrap();
//! assert!(matches!(edit, LineEdit::Quantity(_)));
//! assert!(LineEdit::parse(LineField::Rate, "ten").is_err());
//! ```

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::wire;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Parsers
// =============================================================================

fn parse_decimal(field: &str, input: &str) -> ValidationResult<Decimal> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a number", input),
        })
}

/// Parses a line quantity.
///
/// ## Rules
/// - Must be a number (fractions allowed: `2.5` hours)
/// - Must be positive (> 0)
pub fn parse_quantity(input: &str) -> ValidationResult<Decimal> {
    let qty = parse_decimal("quantity", input)?;

    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(qty)
}

/// Parses a unit rate in major units (`10.99`).
///
/// ## Rules
/// - Must be a number
/// - Must be non-negative; zero is allowed (free items)
/// - Precision is kept as typed; amounts are rounded, rates are not
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::validation::parse_rate;
///
/// assert_eq!(parse_rate("10.995").unwrap(), Decimal::new(10995, 3));
/// assert!(parse_rate("-1").is_err());
/// ```
pub fn parse_rate(input: &str) -> ValidationResult<Decimal> {
    let rate = parse_decimal("rate", input)?;

    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(ValidationError::Negative {
            field: "rate".to_string(),
        });
    }

    Ok(rate)
}

/// Parses a percentage within 0-100 (discount, tax).
pub fn parse_percentage(field: &str, input: &str) -> ValidationResult<Decimal> {
    let pct = parse_decimal(field, input)?;
    validate_percentage(field, pct)?;
    Ok(pct)
}

/// Like [`parse_percentage`], but blank input means "not set".
pub fn parse_optional_percentage(field: &str, input: &str) -> ValidationResult<Option<Decimal>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_percentage(field, input).map(Some)
}

/// Checks a percentage is within 0-100 inclusive.
pub fn validate_percentage(field: &str, pct: Decimal) -> ValidationResult<()> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Parses an invoice date typed as `YYYY-MM-DD`.
pub fn parse_date(field: &str, input: &str) -> ValidationResult<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    wire::parse_date(input).map_err(|reason| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason,
    })
}

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank value and returns it trimmed.
pub fn require_text(field: &str, input: &str) -> ValidationResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

// =============================================================================
// Line Edits
// =============================================================================

/// An editable scalar field of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    Description,
    Quantity,
    Rate,
    DiscountPct,
}

impl LineField {
    /// Whether changing this field changes the line amount.
    pub fn affects_amount(&self) -> bool {
        !matches!(self, LineField::Description)
    }
}

impl FromStr for LineField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "description" | "desc" => Ok(LineField::Description),
            "quantity" | "qty" => Ok(LineField::Quantity),
            "rate" => Ok(LineField::Rate),
            "discount" | "discountpct" | "discount_pct" => Ok(LineField::DiscountPct),
            other => Err(ValidationError::InvalidFormat {
                field: "field".to_string(),
                reason: format!("unknown line field '{}'", other),
            }),
        }
    }
}

/// A typed single-field edit, already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEdit {
    Description(String),
    Quantity(Decimal),
    Rate(Decimal),
    /// `None` clears the discount.
    DiscountPct(Option<Decimal>),
}

impl LineEdit {
    /// Builds an edit from user text for the given field.
    pub fn parse(field: LineField, input: &str) -> ValidationResult<LineEdit> {
        match field {
            LineField::Description => Ok(LineEdit::Description(input.to_string())),
            LineField::Quantity => parse_quantity(input).map(LineEdit::Quantity),
            LineField::Rate => parse_rate(input).map(LineEdit::Rate),
            LineField::DiscountPct => {
                parse_optional_percentage("discountPct", input).map(LineEdit::DiscountPct)
            }
        }
    }

    pub fn field(&self) -> LineField {
        match self {
            LineEdit::Description(_) => LineField::Description,
            LineEdit::Quantity(_) => LineField::Quantity,
            LineEdit::Rate(_) => LineField::Rate,
            LineEdit::DiscountPct(_) => LineField::DiscountPct,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

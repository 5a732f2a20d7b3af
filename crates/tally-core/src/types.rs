//! # Domain Types
//!
//! Wire-level types shared with the invoicing REST API.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │     Invoice     │   │ InvoicePayload  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  itemID         │   │  invoiceID      │   │  invoiceID?     │       │
//! │  │  itemName       │   │  invoiceNo      │   │  invoiceNo?     │       │
//! │  │  salesRate      │   │  lines[]        │   │  lines[rowNo]   │       │
//! │  │  discountPct?   │   │  invoiceAmount  │   │  taxPercentage  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InvoiceSummary  │   │  ItemCategory   │   │  LoginResponse  │       │
//! │  │  (list rows)    │   │                 │   │  token, company │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! - `Item`, `Invoice`, `InvoiceSummary` are owned by the server; this
//!   process only reads them.
//! - `InvoicePayload` and `ItemPayload` are what we send to request a
//!   create or replace.
//!
//! Field names follow the API exactly (`itemID`, `invoiceNo`, `discountPct`),
//! which is why several fields carry explicit `rename`s.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Server-assigned item identifier.
pub type ItemId = i64;

/// Server-assigned invoice identifier.
pub type InvoiceId = i64;

// =============================================================================
// Item Catalog
// =============================================================================

/// A sellable item from the catalog.
///
/// Lines snapshot `itemName` and `salesRate` when the item is selected, so
/// later catalog edits do not rewrite historical invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    #[serde(rename = "itemID")]
    pub item_id: ItemId,

    pub item_name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Default unit rate copied into a line on selection. Kept at full
    /// precision; only line amounts are rounded.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub sales_rate: Decimal,

    /// Default discount percentage (0-100).
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[ts(type = "number | null")]
    pub discount_pct: Option<Decimal>,

    #[serde(default)]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub created_by_user_name: Option<String>,

    #[serde(default)]
    pub created_on: Option<String>,
}

/// Create/update body for an item. `itemID` present means update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemPayload {
    #[serde(rename = "itemID", default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,

    pub item_name: String,

    pub description: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub sales_rate: Decimal,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[ts(type = "number | null")]
    pub discount_pct: Option<Decimal>,
}

/// An item category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemCategory {
    #[serde(rename = "categoryID")]
    pub category_id: i64,

    pub category_name: String,

    #[serde(default)]
    pub created_on: Option<String>,
}

// =============================================================================
// Invoice (persisted)
// =============================================================================

/// A persisted line as returned by `GET /Invoice/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLine {
    #[serde(default)]
    pub row_no: u32,

    #[serde(rename = "itemID", default)]
    pub item_id: ItemId,

    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub description: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub quantity: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub rate: Decimal,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[ts(type = "number | null")]
    pub discount_pct: Option<Decimal>,

    /// Server-computed amount, informational only. Totals are always
    /// recomputed from quantity, rate and discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub amount: Option<Money>,
}

/// A persisted invoice with lines, audit fields and company metadata.
///
/// Superset of the draft: the server owns `invoiceID`, `invoiceNo`, totals
/// and audit fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    #[serde(rename = "primaryKeyID", default)]
    pub primary_key_id: i64,

    #[serde(rename = "invoiceID")]
    pub invoice_id: InvoiceId,

    /// Arrives as a number or a string depending on the endpoint.
    #[serde(default, deserialize_with = "wire::string_or_number")]
    #[ts(type = "string | null")]
    pub invoice_no: Option<String>,

    #[serde(with = "wire::date")]
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,

    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub customer_name: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[ts(type = "number | null")]
    pub tax_percentage: Option<Decimal>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub total_items: u32,

    #[serde(default, deserialize_with = "wire::null_as_empty_vec")]
    pub lines: Vec<InvoiceLine>,

    #[serde(default)]
    #[ts(type = "number | null")]
    pub sub_total: Option<Money>,

    #[serde(default)]
    #[ts(type = "number | null")]
    pub tax_amount: Option<Money>,

    #[serde(default)]
    #[ts(type = "number")]
    pub invoice_amount: Money,

    #[serde(default)]
    pub created_by_user_name: Option<String>,

    #[serde(default)]
    pub created_on: Option<String>,

    #[serde(default)]
    pub updated_by_user_name: Option<String>,

    #[serde(default)]
    pub updated_on: Option<String>,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub company_logo_url: Option<String>,

    #[serde(default)]
    pub currency_symbol: Option<String>,
}

/// One row of `GET /Invoice/GetList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceSummary {
    #[serde(rename = "invoiceID")]
    pub invoice_id: InvoiceId,

    #[serde(default, deserialize_with = "wire::string_or_number")]
    #[ts(type = "string | null")]
    pub invoice_no: Option<String>,

    #[serde(with = "wire::date")]
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,

    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub customer_name: String,

    #[serde(default)]
    pub total_items: u32,

    #[serde(default)]
    #[ts(type = "number")]
    pub sub_total: Money,

    #[serde(default, with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub tax_percentage: Decimal,

    #[serde(default)]
    #[ts(type = "number")]
    pub tax_amount: Money,

    #[serde(default)]
    #[ts(type = "number")]
    pub invoice_amount: Money,

    #[serde(default)]
    pub created_on: Option<String>,

    #[serde(default)]
    pub updated_on: Option<String>,
}

// =============================================================================
// Invoice (outbound)
// =============================================================================

/// A line in the save payload. `rowNo` is assigned at save time from row
/// position, starting at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PayloadLine {
    pub row_no: u32,

    #[serde(rename = "itemID")]
    pub item_id: ItemId,

    pub description: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub quantity: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub rate: Decimal,

    /// `null` when the line has no discount.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[ts(type = "number | null")]
    pub discount_pct: Option<Decimal>,
}

/// Body of `POST /Invoice` (create) and `PUT /Invoice` (update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoicePayload {
    /// Present and positive only when replacing an existing invoice.
    #[serde(rename = "invoiceID", default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<InvoiceId>,

    /// Bare numeric string (`"0007"`), display prefix removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,

    #[serde(with = "wire::date")]
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,

    pub customer_name: String,

    pub address: Option<String>,

    pub city: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub tax_percentage: Decimal,

    pub notes: Option<String>,

    pub lines: Vec<PayloadLine>,
}

impl InvoicePayload {
    /// Update (`PUT`) when the payload carries a positive identifier,
    /// create (`POST`) otherwise.
    pub fn is_update(&self) -> bool {
        matches!(self.invoice_id, Some(id) if id > 0)
    }
}

// =============================================================================
// Authentication
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fields of `POST /auth/signup`, sent as a multipart form.
///
/// See [`crate::account`] for the rules and the form encoding.
#[derive(Clone, Default, PartialEq)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub industry: Option<String>,
    pub currency_symbol: String,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"***")
            .field("company_name", &self.company_name)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("zip_code", &self.zip_code)
            .field("industry", &self.industry)
            .field("currency_symbol", &self.currency_symbol)
            .finish()
    }
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,

    #[serde(rename = "userID", default)]
    pub user_id: i64,

    #[serde(rename = "companyID", default)]
    pub company_id: i64,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub company_name: String,

    #[serde(default)]
    pub currency_symbol: String,
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Lenient field codecs for values the API is inconsistent about.
pub mod wire {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    /// Dates go out as `YYYY-MM-DD`; dates coming in may carry a time
    /// component (`2024-03-01T00:00:00`), which is dropped.
    pub mod date {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &NaiveDate,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<NaiveDate, D::Error> {
            let raw = String::deserialize(deserializer)?;
            parse_date(&raw).map_err(de::Error::custom)
        }
    }

    /// Parses `YYYY-MM-DD`, ignoring anything after the date part.
    pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
        let trimmed = raw.trim();
        let date_part = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{}': {}", raw, e))
    }

    pub fn string_or_number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(de::Error::custom(format!(
                "expected string or number, got {}",
                other
            ))),
        }
    }

    pub fn null_as_empty<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

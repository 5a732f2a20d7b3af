//! # Account Sign-up
//!
//! Field rules for a new account and the multipart form the signup
//! endpoint expects.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  firstName, lastName, password,                                         │
//! │  companyName, address, city, currencySymbol  ──► required (trimmed)     │
//! │  email    ──► required, then name@domain.tld                           │
//! │  zipCode  ──► exactly 6 ASCII digits                                    │
//! │  industry ──► optional                                                  │
//! │                                                                         │
//! │  Checked in form order; the first failure is returned.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use validator::ValidateEmail;

use crate::error::ValidationError;
use crate::types::SignupRequest;
use crate::validation::{require_text, ValidationResult};

/// Digits in a postal code.
pub const ZIP_CODE_LENGTH: usize = 6;

impl SignupRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        require_text("firstName", &self.first_name)?;
        require_text("lastName", &self.last_name)?;
        validate_email(&self.email)?;
        require_text("password", &self.password)?;
        require_text("companyName", &self.company_name)?;
        require_text("address", &self.address)?;
        require_text("city", &self.city)?;
        validate_zip_code(&self.zip_code)?;
        require_text("currencySymbol", &self.currency_symbol)?;
        Ok(())
    }

    /// Form part names and values, in the order the server lists them.
    ///
    /// Text fields are trimmed; the password is sent as typed. A missing
    /// industry is sent as an empty part.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("FirstName", self.first_name.trim().to_string()),
            ("LastName", self.last_name.trim().to_string()),
            ("Email", self.email.trim().to_string()),
            ("Password", self.password.clone()),
            ("CompanyName", self.company_name.trim().to_string()),
            ("Address", self.address.trim().to_string()),
            ("City", self.city.trim().to_string()),
            ("ZipCode", self.zip_code.trim().to_string()),
            (
                "Industry",
                self.industry.as_deref().map(str::trim).unwrap_or_default().to_string(),
            ),
            ("CurrencySymbol", self.currency_symbol.trim().to_string()),
        ]
    }
}

/// Requires `name@domain.tld`.
///
/// `validator` accepts dotless hosts such as `user@localhost`; the server
/// does not, so the domain must also contain a dot.
pub fn validate_email(input: &str) -> ValidationResult<String> {
    let email = require_text("email", input)?;

    let has_dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));

    if !email.validate_email() || !has_dotted_domain {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: format!("'{}' is not a valid email address", email),
        });
    }
    Ok(email)
}

pub fn validate_zip_code(input: &str) -> ValidationResult<String> {
    let zip = require_text("zipCode", input)?;

    if zip.len() != ZIP_CODE_LENGTH || !zip.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "zipCode".to_string(),
            reason: format!("must be {} digits", ZIP_CODE_LENGTH),
        });
    }
    Ok(zip)
}

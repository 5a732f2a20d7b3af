//! Login and sign-up commands.

use anyhow::Result;
use clap::Args;
use tally_core::types::SignupRequest;

use super::Context;
use crate::ui;

/// Logs in and prints the token for use with `--token` / `TALLY_TOKEN`.
pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let response = ctx.client.login(email, password).await?;

    let name = match response.last_name.as_deref() {
        Some(last) if !last.is_empty() => format!("{} {}", response.first_name, last),
        _ => response.first_name.clone(),
    };
    ui::success(&format!("Logged in as {}", name.trim()));
    ui::key_value("Company", &response.company_name);

    let expiry = ctx
        .client
        .session()
        .current()
        .await
        .and_then(|t| t.expires_at())
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());
    ui::key_value("Expires", &expiry);

    println!();
    println!("export TALLY_TOKEN={}", response.token);
    Ok(())
}

/// Options for `signup`.
#[derive(Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "TALLY_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Company name
    #[arg(long)]
    pub company: String,

    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub city: String,

    /// Six-digit postal code
    #[arg(long)]
    pub zip: String,

    #[arg(long)]
    pub industry: Option<String>,

    /// Currency symbol shown on invoices
    #[arg(long, default_value = "$")]
    pub currency: String,
}

impl From<SignupArgs> for SignupRequest {
    fn from(args: SignupArgs) -> Self {
        SignupRequest {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            password: args.password,
            company_name: args.company,
            address: args.address,
            city: args.city,
            zip_code: args.zip,
            industry: args.industry,
            currency_symbol: args.currency,
        }
    }
}

/// Creates the account. The user logs in afterwards with `tally login`.
pub async fn signup(ctx: &Context, args: SignupArgs) -> Result<()> {
    let request = SignupRequest::from(args);

    if let Err(err) = ctx.client.signup(&request).await {
        if err.user_message().contains("already exists") {
            ui::warning("An account with this email already exists; use `tally login`");
        }
        return Err(err.into());
    }

    ui::success(&format!("Account created for {}", request.email.trim()));
    ui::key_value("Company", request.company_name.trim());
    ui::info(&format!(
        "Run `tally login --email {}` to continue",
        request.email.trim()
    ));
    Ok(())
}

//! # Tally CLI
//!
//! Command-line front end for the invoicing API.
//!
//! ## Usage
//! ```text
//! tally signup --first-name Olga --last-name Owner --email owner@example.com \
//!     --company "Acme Ltd" --address "1 Main St" --city Springfield --zip 560001
//! tally login --email owner@example.com --password ...
//! export TALLY_TOKEN=...
//!
//! tally items list --search widget
//! tally invoices list --range month --search acme --page 2
//! tally invoices create --customer "Acme Ltd" --line Widget:3::10 --line 7:1
//! tally invoices edit 42 --remove-row 2 --tax 18
//! tally invoices show 42
//! ```

mod commands;
mod render;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::auth::SignupArgs;
use crate::commands::invoices::{DraftArgs, ListArgs};
use crate::commands::items::ItemFields;
use crate::commands::Context;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Create and manage invoices from the command line", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: platform config dir/tally.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bearer token from `tally login`
    #[arg(long, global = true, env = "TALLY_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print a token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "TALLY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and company
    Signup(SignupArgs),

    /// Manage the item catalog
    Items {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Manage item categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// List, show, create and edit invoices
    Invoices {
        #[command(subcommand)]
        action: InvoiceAction,
    },
}

#[derive(Subcommand)]
enum ItemAction {
    List {
        #[arg(long)]
        search: Option<String>,
    },

    Show {
        id: i64,
    },

    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        rate: String,

        #[arg(long)]
        description: Option<String>,

        /// Default discount percentage
        #[arg(long)]
        discount: Option<String>,
    },

    /// Change some fields of an item; the rest are kept
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        rate: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        discount: Option<String>,
    },

    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    List,

    Add {
        name: String,
    },

    Rename {
        id: i64,

        name: String,
    },

    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum InvoiceAction {
    List(ListArgs),

    /// Print an invoice
    Show {
        id: i64,
    },

    /// Preview the next invoice number
    NextNumber,

    Create(DraftArgs),

    Edit {
        id: i64,

        /// Row to remove (1-based, as loaded); repeatable
        #[arg(long = "remove-row", value_name = "ROW")]
        remove_rows: Vec<usize>,

        #[command(flatten)]
        draft: DraftArgs,
    },

    Delete {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !commands::already_reported(&err) {
                ui::error(&format!("{:#}", err));
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::connect(cli.config, cli.token.as_deref()).await?;
    debug!(base_url = %ctx.client.base_url(), "Client ready");

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, &password).await
        }
        Commands::Signup(args) => commands::auth::signup(&ctx, args).await,

        Commands::Items { action } => {
            ctx.require_login().await?;
            match action {
                ItemAction::List { search } => commands::items::list(&ctx, search.as_deref()).await,
                ItemAction::Show { id } => commands::items::show(&ctx, id).await,
                ItemAction::Add {
                    name,
                    rate,
                    description,
                    discount,
                } => {
                    let fields = ItemFields {
                        name: Some(&name),
                        description: description.as_deref(),
                        rate: Some(&rate),
                        discount: discount.as_deref(),
                    };
                    commands::items::add(&ctx, fields).await
                }
                ItemAction::Update {
                    id,
                    name,
                    rate,
                    description,
                    discount,
                } => {
                    let fields = ItemFields {
                        name: name.as_deref(),
                        description: description.as_deref(),
                        rate: rate.as_deref(),
                        discount: discount.as_deref(),
                    };
                    commands::items::update(&ctx, id, fields).await
                }
                ItemAction::Delete { id } => commands::items::delete(&ctx, id).await,
            }
        }

        Commands::Categories { action } => {
            ctx.require_login().await?;
            match action {
                CategoryAction::List => commands::categories::list(&ctx).await,
                CategoryAction::Add { name } => commands::categories::add(&ctx, &name).await,
                CategoryAction::Rename { id, name } => {
                    commands::categories::rename(&ctx, id, &name).await
                }
                CategoryAction::Delete { id } => commands::categories::delete(&ctx, id).await,
            }
        }

        Commands::Invoices { action } => {
            ctx.require_login().await?;
            match action {
                InvoiceAction::List(args) => commands::invoices::list(&ctx, &args).await,
                InvoiceAction::Show { id } => commands::invoices::show(&ctx, id).await,
                InvoiceAction::NextNumber => commands::invoices::next_number(&ctx).await,
                InvoiceAction::Create(args) => commands::invoices::create(&ctx, &args).await,
                InvoiceAction::Edit {
                    id,
                    remove_rows,
                    draft,
                } => commands::invoices::edit(&ctx, id, &remove_rows, &draft).await,
                InvoiceAction::Delete { id } => commands::invoices::delete(&ctx, id).await,
            }
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_api=trace` - Trace the HTTP client only
/// - Default: `info,tally=debug,reqwest=warn`, or `debug` with `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "debug"
    } else {
        "info,tally=debug,reqwest=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

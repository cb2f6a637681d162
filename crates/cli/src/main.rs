//! Storekeeper CLI - the store-owner shell.
//!
//! # Usage
//!
//! ```bash
//! # Sign in with the two-step handshake
//! storekeeper login
//!
//! # Catalog management
//! storekeeper products list
//! storekeeper products add
//! storekeeper products delete <id>
//!
//! # Orders
//! storekeeper orders list
//! storekeeper orders confirm <id>
//! storekeeper orders call <id>
//!
//! # Store profile
//! storekeeper store show
//! storekeeper store set-location 24.8607 67.0011
//! ```
//!
//! The shell is a thin presentation layer: every operation lives in
//! `storekeeper-merchant` and returns a typed outcome; this binary turns
//! those into prompts and messages.

#![cfg_attr(not(test), forbid(unsafe_code))]
// The shell's entire job is writing to stdout
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use storekeeper_merchant::orders::OrderAction as Transition;

mod commands;
mod platform;

#[derive(Parser)]
#[command(name = "storekeeper")]
#[command(author, version, about = "Store-owner client for the products backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with the two-step username/password handshake
    Login,
    /// Sign out and clear the persisted session
    Logout,
    /// Show the signed-in store
    Whoami,
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// View and update incoming orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Show or edit the store profile
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Check and request device permissions
    Permissions,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List the store's products
    List,
    /// Create a product interactively
    Add,
    /// Edit an existing product interactively
    Update {
        /// Product id
        id: String,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders with resolved line items and totals
    List,
    /// Accept a pending order
    Confirm {
        /// Order id
        id: String,
    },
    /// Start preparing a confirmed order
    Process {
        /// Order id
        id: String,
    },
    /// Complete a processing order
    Deliver {
        /// Order id
        id: String,
    },
    /// Reject an order
    Cancel {
        /// Order id
        id: String,
    },
    /// Call the customer behind an order
    Call {
        /// Order id
        id: String,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Print the store profile
    Show,
    /// Edit profile fields interactively
    Edit,
    /// Save the store's coordinates
    SetLocation {
        /// Latitude in degrees
        lat: String,
        /// Longitude in degrees
        lng: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env()?;

    // The gate runs once at startup; on hosts without an enforced
    // permission model it passes immediately.
    if !commands::permissions::ensure_entry(&ctx).await {
        return Err("required device permissions are missing".into());
    }

    match cli.command {
        Commands::Login => commands::auth::login(&ctx).await?,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&ctx).await?,
            ProductAction::Add => commands::products::add(&ctx).await?,
            ProductAction::Update { id } => commands::products::update(&ctx, &id).await?,
            ProductAction::Delete { id } => commands::products::delete(&ctx, &id).await?,
        },
        Commands::Orders { action } => match action {
            OrderAction::List => commands::orders::list(&ctx).await?,
            OrderAction::Confirm { id } => {
                commands::orders::transition(&ctx, &id, Transition::Confirm).await?;
            }
            OrderAction::Process { id } => {
                commands::orders::transition(&ctx, &id, Transition::MarkProcessing).await?;
            }
            OrderAction::Deliver { id } => {
                commands::orders::transition(&ctx, &id, Transition::MarkDelivered).await?;
            }
            OrderAction::Cancel { id } => {
                commands::orders::transition(&ctx, &id, Transition::Cancel).await?;
            }
            OrderAction::Call { id } => commands::orders::call(&ctx, &id).await?,
        },
        Commands::Store { action } => match action {
            StoreAction::Show => commands::store::show(&ctx).await?,
            StoreAction::Edit => commands::store::edit(&ctx).await?,
            StoreAction::SetLocation { lat, lng } => {
                commands::store::set_location(&ctx, &lat, &lng).await?;
            }
        },
        Commands::Permissions => commands::permissions::report(&ctx).await,
    }
    Ok(())
}

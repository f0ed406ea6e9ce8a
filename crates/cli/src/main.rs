//! Marketstall CLI - migrations, staff accounts and the role table.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! ms-cli migrate
//!
//! # Create a staff account (a password is generated when -p is omitted)
//! ms-cli staff create -e jo@example.com -n "Jo Doe" -r designer
//!
//! # Print the role table the back office would use
//! ms-cli roles show --file roles.yaml
//! ```
//!
//! All database commands read `DATABASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ms-cli")]
#[command(author, version, about = "Marketstall CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage staff accounts
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Inspect the role table
    Roles {
        #[command(subcommand)]
        action: RolesAction,
    },
}

#[derive(Subcommand)]
enum StaffAction {
    /// Create a staff account
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Staff role (`administrator`, `stock_manager`, `sales_manager`,
        /// `purchase_manager`, `designer`)
        #[arg(short, long)]
        role: String,

        /// Password; generated and printed when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum RolesAction {
    /// Print the effective role table as YAML
    Show {
        /// Role table file; the built-in table is shown when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Staff { action } => match action {
            StaffAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::staff::create(&email, &name, &role, password).await?;
            }
        },
        Commands::Roles { action } => match action {
            RolesAction::Show { file } => commands::roles::show(file.as_deref())?,
        },
    }
    Ok(())
}

//! RKSC ledger CLI
//!
//! Command-line front end for the ledger API:
//! - Enrolling members
//! - Recording payments
//! - Viewing accounts and the due roster
//! - Saving the printable due list

mod client;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::LedgerClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rksc")]
#[command(about = "RKSC club membership ledger")]
struct Cli {
    /// Base URL of the ledger API
    #[arg(
        long,
        global = true,
        env = "RKSC_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a new member
    AddMember { name: String },

    /// Record a payment made this month
    Pay { member_id: String, amount: u64 },

    /// Show members with outstanding dues
    Dues {
        /// Reference month such as MAR25 (default: this month)
        #[arg(long)]
        month: Option<String>,

        /// Also save the printable due list in the working directory
        #[arg(long)]
        save: bool,
    },

    /// Show a member's account
    Account {
        member_id: String,

        /// Reference month such as MAR25 (default: this month)
        #[arg(long)]
        month: Option<String>,
    },

    /// List all members
    Members,
}

async fn run(cli: Cli) -> Result<()> {
    let client = LedgerClient::new(&cli.api_url)?;

    match cli.command {
        Commands::AddMember { name } => {
            let added = client.add_member(&name).await?;
            tracing::debug!(member_id = %added.member_id, name = %added.name, "Member added");
            println!("{}", added.message);
        }
        Commands::Pay { member_id, amount } => {
            let receipt = client.record_payment(&member_id, amount).await?;
            print!("{}", output::payment(&receipt));
        }
        Commands::Dues { month, save } => {
            let roster = client.dues(month.as_deref()).await?;
            print!("{}", output::dues(&roster));

            if save {
                let report = client.due_report(month.as_deref()).await?;
                tokio::fs::write(&report.file_name, &report.body)
                    .await
                    .with_context(|| format!("Failed to write {}", report.file_name))?;
                println!("Saved {}", report.file_name);
            }
        }
        Commands::Account { member_id, month } => {
            let account = client.account(&member_id, month.as_deref()).await?;
            print!("{}", output::account(&account));
        }
        Commands::Members => {
            let members = client.list_members().await?;
            print!("{}", output::members(&members));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(api_url = %cli.api_url, "Using ledger API");

    run(cli).await
}

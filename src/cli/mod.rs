use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::LedgerService;
use crate::config::AppConfig;
use crate::domain::{format_cents, format_date};
use crate::http::{AppState, create_router};

/// Ledgerbook - double-entry bookkeeping service
#[derive(Parser)]
#[command(name = "ledgerbook")]
#[command(about = "A small double-entry bookkeeping service backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Database file path (overrides configuration)
    #[arg(short, long)]
    pub database: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Run the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List accounts with balances and last activity
    Accounts,

    /// Show account and transaction totals
    Summary,
}

impl Cli {
    /// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
    pub fn init_tracing(&self) {
        let default_filter = if self.verbose {
            "ledgerbook=debug,tower_http=debug"
        } else {
            "ledgerbook=info,tower_http=info"
        };

        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    pub async fn run(self) -> Result<()> {
        let mut config = AppConfig::load().context("Failed to load configuration")?;
        if let Some(database) = self.database {
            config.database.path = database;
        }

        match self.command {
            Commands::Init => {
                LedgerService::init(&config.database.path).await?;
                println!("Database initialized: {}", config.database.path);
            }

            Commands::Serve { host, port } => {
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                serve(config).await?;
            }

            Commands::Accounts => {
                let service = LedgerService::connect(&config.database.path).await?;
                run_accounts_command(&service).await?;
            }

            Commands::Summary => {
                let service = LedgerService::connect(&config.database.path).await?;
                run_summary_command(&service).await?;
            }
        }

        Ok(())
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let service = LedgerService::init(&config.database.path).await?;
    info!(database = %config.database.path, "Database ready");

    let staging_dir = config.report.staging_dir();
    let app = create_router(AppState::new(service, staging_dir));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
}

async fn run_accounts_command(service: &LedgerService) -> Result<()> {
    let accounts = service.list_accounts().await?;

    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }

    println!("{:<6} {:<24} {:>14} {:<12}", "ID", "NAME", "BALANCE", "LAST ACTIVITY");
    println!("{}", "-".repeat(59));
    for overview in accounts {
        println!(
            "{:<6} {:<24} {:>14} {:<12}",
            overview.account.id,
            overview.account.name,
            format_cents(overview.account.balance_cents),
            overview
                .last_activity
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    Ok(())
}

async fn run_summary_command(service: &LedgerService) -> Result<()> {
    let stats = service.summary().await?;

    println!("{:<20} {:>14}", "Accounts", stats.account_count);
    println!("{:<20} {:>14}", "Transactions", stats.transaction_count);
    println!("{:<20} {:>14}", "Total balance", format_cents(stats.total_balance));

    Ok(())
}

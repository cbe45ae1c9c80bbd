//! ReceiptFlow Command Line Interface
//!
//! Usage:
//!   receiptflow serve     - Start the API server
//!   receiptflow migrate   - Apply database migrations
//!   receiptflow status    - Query a running server's health

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use receipt_api::{run_server, AppConfig};
use receipt_db::PgReceiptRepository;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,receipt_api=debug";

#[derive(Parser)]
#[command(name = "receiptflow")]
#[command(about = "Receipt upload, review and export service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, env = "RECEIPTFLOW_BIND_ADDR")]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long, env = "RECEIPTFLOW_PORT")]
        port: Option<u16>,
    },

    /// Apply pending database migrations
    Migrate {
        /// Database URL
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },

    /// Show the health of a running server
    Status {
        /// API server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        api_url: String,
    },
}

#[tokio::main]
async fn main() {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run_command(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = AppConfig::from_env().context("invalid configuration")?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            tracing::info!("Starting ReceiptFlow API on {}", config.bind_addr());
            run_server(config).await.map_err(|e| anyhow!(e))?;
            Ok(())
        }

        Commands::Migrate { database_url } => {
            let repository = PgReceiptRepository::connect(&database_url, 1)
                .await
                .context("failed to connect to the database")?;

            println!("Applying pending migrations...");
            repository.migrate().await.context("migration failed")?;
            println!("Database is up to date.");
            Ok(())
        }

        Commands::Status { api_url } => {
            let url = format!("{}/health", api_url.trim_end_matches('/'));
            let response = reqwest::get(&url)
                .await
                .with_context(|| format!("could not reach {}", url))?
                .json::<serde_json::Value>()
                .await?;

            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

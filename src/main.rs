//! Gallery Server: media-sharing backend.
//!
//! Main entry point that loads configuration, wires all crates together,
//! and starts the server.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_database::DatabasePool;

/// Gallery media-sharing server.
#[derive(Debug, Parser)]
#[command(name = "gallery-server", version, about)]
struct Cli {
    /// Configuration environment; loads `config/{env}.toml` over the defaults.
    #[arg(long, env = "GALLERY_ENV", default_value = "development")]
    env: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Load and validate configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run(config).await,
        Command::Migrate => migrate(&config).await,
        Command::CheckConfig => {
            tracing::info!(env = %cli.env, "Configuration is valid");
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment, then validate it.
fn load_configuration(env: &str) -> Result<AppConfig, AppError> {
    let config = AppConfig::load(env)?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn migrate(config: &AppConfig) -> Result<(), AppError> {
    let db_pool = DatabasePool::connect(&config.database).await?;
    db_pool.migrate().await?;
    tracing::info!("Database migrations complete");
    db_pool.close().await;
    Ok(())
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Gallery v{}", env!("CARGO_PKG_VERSION"));

    let db_pool = DatabasePool::connect(&config.database).await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations...");
        db_pool.migrate().await?;
        tracing::info!("Database migrations complete");
    }

    tracing::info!(provider = ?config.storage.provider, "Initializing object store...");
    let object_store = gallery_storage::build_object_store(&config.storage).await?;

    gallery_api::run_server(config, db_pool, object_store).await
}

//! CLI application for the capitals quiz service.

use capitals_db::{seed, CapitalStore, DbPool, SeedReport};
use capitals_game::Quiz;
use capitals_telemetry::{init_logging, Metrics};
use clap::{Parser, Subcommand};
use tracing::{error, info};

mod api;

#[derive(Parser)]
#[command(name = "capitals")]
#[command(about = "Country capitals trivia quiz web service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the quiz web server
    Serve {
        /// SQLite database path
        #[arg(long, default_value = "capitals.db")]
        database_path: String,

        /// JSON seed file with country/capital/coordinate entries
        #[arg(long, default_value = "data/capitals.json")]
        seed_path: String,

        /// Address to bind the HTTP server to
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind_address: String,

        /// Log level
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Create and populate the database from the seed file
    Seed {
        /// SQLite database path
        #[arg(long, default_value = "capitals.db")]
        database_path: String,

        /// JSON seed file with country/capital/coordinate entries
        #[arg(long, default_value = "data/capitals.json")]
        seed_path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            database_path,
            seed_path,
            bind_address,
            log_level,
        } => {
            init_logging(log_level.as_deref())?;
            run_server(&database_path, &seed_path, &bind_address).await?;
        }
        Commands::Seed {
            database_path,
            seed_path,
        } => {
            init_logging(None)?;
            run_seed(&database_path, &seed_path).await?;
        }
    }

    Ok(())
}

async fn run_server(db_path: &str, seed_path: &str, bind_address: &str) -> anyhow::Result<()> {
    info!("Starting capitals quiz service");

    let db = DbPool::new(db_path).await?;
    let store = CapitalStore::new(db);

    // Best-effort initialization: a missing or malformed seed leaves the
    // service running against an empty store instead of aborting startup.
    // The schema is still created so queries answer "game over" rather
    // than erroring.
    match seed::load_seed_file(seed_path) {
        Ok(records) => match store.initialize(&records).await {
            Ok(SeedReport::Seeded(n)) => info!("Seeded store with {} countries", n),
            Ok(SeedReport::AlreadySeeded(n)) => info!("Store already holds {} countries", n),
            Err(e) => error!("Failed to initialize store: {}", e),
        },
        Err(e) => {
            error!("Failed to load seed file {}: {}", seed_path, e);
            if let Err(e) = store.ensure_schema().await {
                error!("Failed to create store schema: {}", e);
            }
        }
    }

    let metrics = Metrics::new()?;
    let quiz = Quiz::new(store);

    let app = api::router(quiz, metrics);
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Quiz server listening on http://{}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_seed(db_path: &str, seed_path: &str) -> anyhow::Result<()> {
    let records = seed::load_seed_file(seed_path)?;
    let db = DbPool::new(db_path).await?;
    let store = CapitalStore::new(db);

    match store.initialize(&records).await? {
        SeedReport::Seeded(n) => info!("Seeded {} countries into {}", n, db_path),
        SeedReport::AlreadySeeded(n) => {
            info!("{} already holds {} countries, nothing to do", db_path, n);
        }
    }

    Ok(())
}

//! VMD Ingest - copy collections API data into PostgreSQL

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use vmd_common::logging::{init_logging, LogConfig, LogLevel};

use vmd_ingest::collections::{CollectionsClient, CollectionsPipeline, CollectionsStore};
use vmd_ingest::config::{
    self, ApiConfig, DatabaseConfig, IngestConfig, DEFAULT_API_BASE_URL, DEFAULT_DUMP_DIR,
    DEFAULT_FETCH_CONCURRENCY, DEFAULT_OBJECT_COUNT, DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(name = "vmd-ingest")]
#[command(author, version, about = "Copy data into the datastore from the museum collections API")]
struct Cli {
    /// Postgres username
    #[arg(short = 'u', long, default_value = "postgres")]
    postgres_user: String,

    /// Postgres password
    #[arg(short = 'p', long, default_value = "password")]
    postgres_password: String,

    /// Postgres database name
    #[arg(short = 'd', long, default_value = "postgres")]
    postgres_database: String,

    /// Postgres host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    postgres_host: String,

    /// Base URL of the collections API
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    /// Categories to collect objects for from the collections online API
    #[arg(long, num_args = 1..)]
    categories: Option<Vec<String>>,

    /// Number of objects to collect
    #[arg(short = 'c', long, default_value_t = DEFAULT_OBJECT_COUNT)]
    count: u32,

    /// HTTP timeout per request in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Cap on concurrent person fetches while resolving a page
    #[arg(long, default_value_t = DEFAULT_FETCH_CONCURRENCY)]
    fetch_concurrency: usize,

    /// Directory for rejected-record dumps
    #[arg(long, default_value = DEFAULT_DUMP_DIR)]
    dump_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> IngestConfig {
        IngestConfig {
            api: ApiConfig {
                base_url: self.base_url,
                timeout_secs: self.timeout_secs,
                fetch_concurrency: self.fetch_concurrency,
                dump_dir: self.dump_dir,
            },
            database: DatabaseConfig {
                user: self.postgres_user,
                password: self.postgres_password,
                database: self.postgres_database,
                host: self.postgres_host,
                max_connections: config::DEFAULT_DATABASE_MAX_CONNECTIONS,
            },
            categories: self.categories.unwrap_or_else(config::default_categories),
            object_count: self.count,
            page_size: config::DEFAULT_PAGE_SIZE,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Environment variables take precedence over the CLI defaults.
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    log_config.log_file_prefix = "vmd-ingest".to_string();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    if log_config.filter_directives.is_none() {
        log_config.filter_directives = Some("sqlx=warn".to_string());
    }

    init_logging(&log_config)?;

    let config = cli.into_config();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url())
        .await?;

    info!("successfully connected to postgres db");

    let client = CollectionsClient::new(&config.api)?;
    let store = CollectionsStore::new(pool);
    let pipeline = CollectionsPipeline::new(client, store, &config);

    let stats = pipeline.run().await?;

    info!(
        categories = stats.categories,
        pages = stats.pages_fetched,
        objects = stats.objects_loaded,
        "ingestion complete"
    );

    Ok(())
}

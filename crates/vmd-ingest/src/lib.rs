//! VMD Ingest Library
//!
//! Copies records from a museum collections online API into a local
//! PostgreSQL database so they can be served by the virtual museum
//! read API.
//!
//! The pipeline runs in three stages:
//!
//! - **Fetch**: paginated object search plus per-person lookups over a
//!   shared HTTP client, with bounded concurrent fan-out for nested
//!   person references.
//! - **Transform**: typed validation of the raw API payloads into the
//!   relational entity graph (objects, people, places, facilities,
//!   categories, images).
//! - **Load**: insert-if-absent writes ordered to satisfy foreign key
//!   dependencies.
//!
//! # Example
//!
//! ```no_run
//! use vmd_ingest::collections::{CollectionsClient, CollectionsPipeline, CollectionsStore};
//! use vmd_ingest::config::IngestConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::default();
//!     let pool = sqlx::PgPool::connect(&config.database.url()).await?;
//!
//!     let client = CollectionsClient::new(&config.api)?;
//!     let store = CollectionsStore::new(pool);
//!     let stats = CollectionsPipeline::new(client, store, &config).run().await?;
//!
//!     println!("loaded {} objects", stats.objects_loaded);
//!     Ok(())
//! }
//! ```

pub mod collections;
pub mod config;

// Collections API ingestion module
//
// Handles copying of museum object records from the collections online
// API into the relational store consumed by the virtual museum read API.
//
// Architecture:
// - Client: pooled HTTP access, pagination, concurrent person fan-out
// - Raw: typed upstream payloads validated once at the boundary
// - Transform: raw documents to domain entities
// - Storage: ordered insert-if-absent writes to PostgreSQL
// - Pipeline: per-category paging and load orchestration
// - Dump: diagnostic files for structurally broken records

pub mod client;
pub mod dump;
pub mod models;
pub mod pipeline;
pub mod raw;
pub mod storage;
pub mod transform;

// Re-export main types
pub use client::CollectionsClient;
pub use models::{Facility, MuseumObject, Person, Place};
pub use pipeline::{CollectionsPipeline, RunStats};
pub use storage::CollectionsStore;
pub use transform::ObjectDraft;

/// Date format used by the collections API for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result type for collections operations
pub type Result<T> = std::result::Result<T, CollectionsError>;

/// Error types for collections ingestion
#[derive(Debug, thiserror::Error)]
pub enum CollectionsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing expected data at {path}")]
    Structure { path: String },
}

impl CollectionsError {
    /// Structural parse failure: an expected key or list element was
    /// absent in an otherwise well-formed document.
    pub fn structure(path: impl Into<String>) -> Self {
        CollectionsError::Structure { path: path.into() }
    }

    /// Whether this error is recoverable at single-record granularity.
    pub fn is_structural(&self) -> bool {
        matches!(self, CollectionsError::Structure { .. })
    }
}

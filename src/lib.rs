//! # Quoteflow - event-triggered stock quote CSV normalization
//!
//! Quoteflow reacts to CSV files landing under `Input-data/` in a storage
//! bucket: it fetches the object, normalizes a fixed set of fields per
//! row, appends two derived columns, and writes the result to the
//! matching `Output-data/` key in the same bucket.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ BucketEvent │────▶│   Storage   │────▶│  Transform   │────▶│   Storage   │
//! │  (trigger)  │     │   (fetch)   │     │  (per row)   │     │    (put)    │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quoteflow::{handle_event, BucketEvent, MemoryStorage};
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = MemoryStorage::new();
//!     storage.insert("quotes", "Input-data/daily.csv", "date,volume,open,close,low\n...");
//!
//!     let event = BucketEvent::single("quotes", "Input-data/daily.csv");
//!     let response = handle_event(&event, &storage).await;
//!     println!("{}: {}", response.status, response.message);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Row, Table and the column constants
//! - [`event`] - Bucket notification model
//! - [`storage`] - Object storage collaborators
//! - [`transform`] - Field rules and the row pipeline
//! - [`handler`] - One-invocation control flow
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Trigger events
pub mod event;

// Storage collaborators
pub mod storage;

// Transformation
pub mod transform;

// Invocation handling
pub mod handler;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError, CsvResult, EventError, EventResult, HandlerError, HandlerResult, StorageError,
    StorageResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{columns, Row, Table};

// =============================================================================
// Re-exports - Events
// =============================================================================

pub use event::{BucketEvent, ObjectRef};

// =============================================================================
// Re-exports - Storage
// =============================================================================

pub use storage::{FsStorage, HttpStorage, MemoryStorage, ObjectStorage, StorageBackend};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{transform_csv, transform_csv_at, Transformed, CREATED_AT_FORMAT};

// =============================================================================
// Re-exports - Handler
// =============================================================================

pub use handler::{handle_event, output_key, Outcome, INPUT_PREFIX, OUTPUT_PREFIX};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, EventResponse, TransformResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}

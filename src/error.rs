//! Error types for the quoteflow invocation pipeline.
//!
//! Two tiers of failure exist in this system:
//!
//! - **Invocation-level**: the event is unusable, the object cannot be
//!   fetched or decoded, the CSV header is malformed, or the output write
//!   fails. These abort the invocation and surface as an error response.
//! - **Field-level**: a single cell fails to parse as a date or number.
//!   These never become errors; each field has a defined fallback in
//!   [`crate::transform::fields`].
//!
//! Only the invocation tier is modeled here:
//!
//! - [`CsvError`] - decode and CSV structure errors
//! - [`StorageError`] - object fetch/put errors
//! - [`EventError`] - unusable trigger events
//! - [`HandlerError`] - top-level aggregation
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while decoding or reading the CSV payload.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Empty payload, no header row to read.
    #[error("CSV payload is empty")]
    EmptyFile,

    /// A column the transform depends on is absent from the header.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Structural CSV error (unreadable record, bad quoting).
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    /// The output buffer could not be assembled.
    #[error("failed to assemble output CSV: {0}")]
    Output(String),
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from an [`crate::storage::ObjectStorage`] collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object does not exist.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Filesystem error.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport or status error.
    #[error("storage HTTP error: {0}")]
    Http(String),
}

// =============================================================================
// Event Errors
// =============================================================================

/// Errors extracting an object reference from a trigger event.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event carried no records.
    #[error("event contains no records")]
    NoRecords,
}

// =============================================================================
// Handler Errors (top-level)
// =============================================================================

/// Top-level invocation errors.
///
/// This is the error type of [`crate::handler::handle_event`]'s inner
/// processing step. It wraps all lower-level errors; the handler converts
/// it into a failure [`crate::api::types::EventResponse`].
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Trigger event error.
    #[error("event error: {0}")]
    Event(#[from] EventError),

    /// Object fetch/put error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// CSV decode or structure error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for event extraction.
pub type EventResult<T> = Result<T, EventError>;

/// Result type for invocation handling.
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> HandlerError
        let csv_err = CsvError::EmptyFile;
        let handler_err: HandlerError = csv_err.into();
        assert!(handler_err.to_string().contains("empty"));

        // StorageError -> HandlerError
        let storage_err = StorageError::NotFound {
            bucket: "quotes".into(),
            key: "Input-data/a.csv".into(),
        };
        let handler_err: HandlerError = storage_err.into();
        assert!(handler_err.to_string().contains("Input-data/a.csv"));

        // EventError -> HandlerError
        let event_err = EventError::NoRecords;
        let handler_err: HandlerError = event_err.into();
        assert!(handler_err.to_string().contains("no records"));
    }

    #[test]
    fn test_missing_column_format() {
        let err = CsvError::MissingColumn("volume".into());
        assert_eq!(err.to_string(), "missing required column: volume");
    }

    #[test]
    fn test_encoding_error_from_bytes() {
        let bad = vec![0xff, 0xfe, 0x00];
        let err: CsvError = String::from_utf8(bad).unwrap_err().into();
        assert!(err.to_string().contains("UTF-8"));
    }
}

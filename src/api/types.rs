//! API response types.
//!
//! [`EventResponse`] is the structured result of one invocation, shared by
//! the HTTP endpoint and the CLI. The `status_code` field mirrors the
//! HTTP-style convention of the triggering infrastructure: 200 for both
//! processed and skipped invocations, 500 for failures.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transform::Transformed;

/// Status of a processed invocation.
pub const STATUS_PROCESSED: &str = "processed";
/// Status of a no-op invocation (key outside the input prefix).
pub const STATUS_SKIPPED: &str = "skipped";
/// Status of a failed invocation.
pub const STATUS_ERROR: &str = "error";

/// Result of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Unique id of this invocation.
    pub invocation_id: String,

    /// "processed", "skipped" or "error".
    pub status: String,

    /// 200 for processed/skipped, 500 for error.
    pub status_code: u16,

    /// Human-readable description of what happened.
    pub message: String,

    /// Key the transformed object was written to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,

    /// Number of data rows written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

impl EventResponse {
    /// A successful invocation that wrote `output_key`.
    pub fn processed(output_key: &str, rows: usize) -> Self {
        Self {
            invocation_id: Uuid::new_v4().to_string(),
            status: STATUS_PROCESSED.to_string(),
            status_code: 200,
            message: format!("file processed and uploaded to {}", output_key),
            output_key: Some(output_key.to_string()),
            rows: Some(rows),
        }
    }

    /// A no-op invocation: `key` is outside the input prefix.
    pub fn skipped(key: &str) -> Self {
        Self {
            invocation_id: Uuid::new_v4().to_string(),
            status: STATUS_SKIPPED.to_string(),
            status_code: 200,
            message: format!("key {} is outside the input prefix, nothing to do", key),
            output_key: None,
            rows: None,
        }
    }

    /// A failed invocation.
    pub fn failure(error: &str) -> Self {
        Self {
            invocation_id: Uuid::new_v4().to_string(),
            status: STATUS_ERROR.to_string(),
            status_code: 500,
            message: format!("error: {}", error),
            output_key: None,
            rows: None,
        }
    }

    /// Whether the invocation failed.
    pub fn is_error(&self) -> bool {
        self.status == STATUS_ERROR
    }
}

/// Response of the direct transform endpoint (no storage involved).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    /// The transformed CSV, header included.
    pub csv: String,

    /// Number of data rows.
    pub row_count: usize,

    /// Output column order.
    pub columns: Vec<String>,
}

impl From<Transformed> for TransformResponse {
    fn from(t: Transformed) -> Self {
        Self {
            csv: t.csv,
            row_count: t.row_count,
            columns: t.columns,
        }
    }
}

/// Create an error body for HTTP error responses.
pub fn error_response(error: &str) -> Value {
    json!({
        "invocationId": Uuid::new_v4().to_string(),
        "status": STATUS_ERROR,
        "statusCode": 500,
        "message": format!("error: {}", error),
    })
}

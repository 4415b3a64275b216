//! Invocation handler: event in, response out.
//!
//! One invocation handles exactly one object:
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ BucketEvent │────▶│    fetch    │────▶│ RowTransform │────▶│     put     │
//! │ Records[0]  │     │ Input-data/ │     │  (in memory) │     │ Output-data/│
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! Keys outside the `Input-data/` prefix are an explicit no-op: the
//! response reports `skipped` and nothing is written. All invocation-level
//! failures surface as a single error response; the transformed buffer is
//! assembled fully in memory, so a failure never leaves a partial output
//! object behind.

use crate::api::logs::{log_error, log_info, log_success};
use crate::api::types::EventResponse;
use crate::error::{CsvError, HandlerResult};
use crate::event::BucketEvent;
use crate::storage::ObjectStorage;
use crate::transform::pipeline;

/// Prefix an object key must carry to be processed.
pub const INPUT_PREFIX: &str = "Input-data/";

/// Prefix of the derived output key.
pub const OUTPUT_PREFIX: &str = "Output-data/";

/// Derive the output key: first `Input-data/` occurrence becomes
/// `Output-data/`, rest of the key untouched.
pub fn output_key(input_key: &str) -> String {
    input_key.replacen(INPUT_PREFIX, OUTPUT_PREFIX, 1)
}

/// What one invocation did.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Key did not match the input prefix; nothing written.
    Skipped { key: String },
    /// Object transformed and written to `output_key`.
    Processed { output_key: String, rows: usize },
}

/// Run one invocation and map the result to a response.
///
/// Never returns an error: invocation-level failures are logged and folded
/// into the failure response, per-field failures never bubble up at all.
pub async fn handle_event<S: ObjectStorage>(event: &BucketEvent, storage: &S) -> EventResponse {
    match process(event, storage).await {
        Ok(Outcome::Skipped { key }) => {
            log_info(format!("ignoring {} (outside {})", key, INPUT_PREFIX));
            EventResponse::skipped(&key)
        }
        Ok(Outcome::Processed { output_key, rows }) => {
            log_success(format!("wrote {} ({} rows)", output_key, rows));
            EventResponse::processed(&output_key, rows)
        }
        Err(e) => {
            log_error(format!("invocation failed: {}", e));
            EventResponse::failure(&e.to_string())
        }
    }
}

/// The fallible body of an invocation.
async fn process<S: ObjectStorage>(event: &BucketEvent, storage: &S) -> HandlerResult<Outcome> {
    let object = event.first_object()?;

    if !object.key.starts_with(INPUT_PREFIX) {
        return Ok(Outcome::Skipped { key: object.key });
    }

    log_info(format!("processing {}", object));
    let bytes = storage.fetch(&object.bucket, &object.key).await?;
    let text = String::from_utf8(bytes).map_err(CsvError::Encoding)?;

    let transformed = pipeline::transform_csv(&text)?;
    let output_key = output_key(&object.key);

    storage
        .put(&object.bucket, &output_key, transformed.csv.into_bytes())
        .await?;

    Ok(Outcome::Processed {
        output_key,
        rows: transformed.row_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const INPUT: &str = "\
date,volume,open,close,low
03/15/2024,50000,100,110,95
";

    #[test]
    fn test_output_key_derivation() {
        assert_eq!(output_key("Input-data/x.csv"), "Output-data/x.csv");
        assert_eq!(
            output_key("Input-data/2024/daily.csv"),
            "Output-data/2024/daily.csv"
        );
        // only the first occurrence is replaced
        assert_eq!(
            output_key("Input-data/Input-data/x.csv"),
            "Output-data/Input-data/x.csv"
        );
    }

    #[tokio::test]
    async fn test_end_to_end_processed() {
        let storage = MemoryStorage::new();
        storage.insert("quotes", "Input-data/x.csv", INPUT);

        let event = BucketEvent::single("quotes", "Input-data/x.csv");
        let response = handle_event(&event, &storage).await;

        assert_eq!(response.status, "processed");
        assert_eq!(response.status_code, 200);
        assert_eq!(response.output_key.as_deref(), Some("Output-data/x.csv"));
        assert!(response.message.contains("Output-data/x.csv"));
        assert_eq!(response.rows, Some(1));

        let body = storage.get("quotes", "Output-data/x.csv").unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("date,volume,open,close,low,close_pct_change,created_at"));
        assert!(text.contains("2024-03-15,N/A,100,110,95,10.0,"));
    }

    #[tokio::test]
    async fn test_non_matching_key_skipped() {
        let storage = MemoryStorage::new();
        storage.insert("quotes", "Other-data/x.csv", INPUT);

        let event = BucketEvent::single("quotes", "Other-data/x.csv");
        let response = handle_event(&event, &storage).await;

        assert_eq!(response.status, "skipped");
        assert_eq!(response.status_code, 200);
        // nothing was written
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_object_fails() {
        let storage = MemoryStorage::new();
        let event = BucketEvent::single("quotes", "Input-data/absent.csv");
        let response = handle_event(&event, &storage).await;

        assert_eq!(response.status, "error");
        assert_eq!(response.status_code, 500);
        assert!(response.message.contains("not found"));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_body_fails_without_output() {
        let storage = MemoryStorage::new();
        storage.insert("quotes", "Input-data/x.csv", vec![0xff, 0xfe, 0x01]);

        let event = BucketEvent::single("quotes", "Input-data/x.csv");
        let response = handle_event(&event, &storage).await;

        assert_eq!(response.status, "error");
        assert!(response.message.contains("UTF-8"));
        assert!(storage.get("quotes", "Output-data/x.csv").is_none());
    }

    #[tokio::test]
    async fn test_malformed_header_fails_without_output() {
        let storage = MemoryStorage::new();
        storage.insert("quotes", "Input-data/x.csv", "a,b\n1,2\n");

        let event = BucketEvent::single("quotes", "Input-data/x.csv");
        let response = handle_event(&event, &storage).await;

        assert_eq!(response.status, "error");
        assert!(response.message.contains("missing required column"));
        assert!(storage.get("quotes", "Output-data/x.csv").is_none());
    }

    #[tokio::test]
    async fn test_empty_event_fails() {
        let storage = MemoryStorage::new();
        let event = BucketEvent { records: vec![] };
        let response = handle_event(&event, &storage).await;

        assert_eq!(response.status, "error");
        assert!(response.message.contains("no records"));
    }
}

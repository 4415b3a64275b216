//! Trigger event model.
//!
//! Deserializes the bucket notification JSON delivered when an object is
//! created. Only the minimal shape is modeled; any extra fields in the
//! payload are ignored:
//!
//! ```json
//! { "Records": [ { "s3": { "bucket": { "name": "quotes" },
//!                          "object": { "key": "Input-data/daily.csv" } } } ] }
//! ```
//!
//! Only `Records[0]` is consulted; multi-record events are not iterated.

use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

// =============================================================================
// Wire Types
// =============================================================================

/// An object-created notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketEvent {
    /// Notification records; only the first is consulted.
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

/// One record inside a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// The storage entity that fired the notification.
    pub s3: StorageEntity,
}

/// Bucket and object of one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEntity {
    pub bucket: BucketName,
    pub object: ObjectKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketName {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectKey {
    pub key: String,
}

// =============================================================================
// Object Reference
// =============================================================================

/// A `(bucket, key)` pair extracted from an event.
///
/// Exists only for the duration of one invocation; nothing is retained
/// across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

impl BucketEvent {
    /// Build an event for a single object. Used by the CLI and tests.
    pub fn single(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![EventRecord {
                s3: StorageEntity {
                    bucket: BucketName {
                        name: bucket.into(),
                    },
                    object: ObjectKey { key: key.into() },
                },
            }],
        }
    }

    /// A canonical example event, for docs and the `sample-event` command.
    pub fn sample() -> Self {
        Self::single("quotes", "Input-data/daily-quotes.csv")
    }

    /// Parse an event from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The bucket/key of `Records[0]`.
    pub fn first_object(&self) -> EventResult<ObjectRef> {
        let record = self.records.first().ok_or(EventError::NoRecords)?;
        Ok(ObjectRef {
            bucket: record.s3.bucket.name.clone(),
            key: record.s3.object.key.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_event() {
        let json = r#"{
            "Records": [
                { "s3": { "bucket": { "name": "quotes" },
                          "object": { "key": "Input-data/x.csv" } } }
            ]
        }"#;

        let event = BucketEvent::from_json(json).unwrap();
        let object = event.first_object().unwrap();
        assert_eq!(object.bucket, "quotes");
        assert_eq!(object.key, "Input-data/x.csv");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let json = r#"{
            "Records": [
                { "eventName": "ObjectCreated:Put",
                  "s3": { "bucket": { "name": "b", "arn": "arn:aws:s3:::b" },
                          "object": { "key": "k", "size": 1024 } } }
            ]
        }"#;

        let event = BucketEvent::from_json(json).unwrap();
        assert_eq!(event.first_object().unwrap().key, "k");
    }

    #[test]
    fn test_only_first_record_consulted() {
        let json = r#"{
            "Records": [
                { "s3": { "bucket": { "name": "b1" }, "object": { "key": "k1" } } },
                { "s3": { "bucket": { "name": "b2" }, "object": { "key": "k2" } } }
            ]
        }"#;

        let event = BucketEvent::from_json(json).unwrap();
        let object = event.first_object().unwrap();
        assert_eq!(object.bucket, "b1");
        assert_eq!(object.key, "k1");
    }

    #[test]
    fn test_empty_event_is_error() {
        let event = BucketEvent::from_json(r#"{ "Records": [] }"#).unwrap();
        assert!(event.first_object().is_err());

        let event = BucketEvent::from_json("{}").unwrap();
        assert!(event.first_object().is_err());
    }

    #[test]
    fn test_sample_round_trip() {
        let sample = BucketEvent::sample();
        let json = serde_json::to_string(&sample).unwrap();
        let parsed = BucketEvent::from_json(&json).unwrap();
        assert_eq!(
            parsed.first_object().unwrap(),
            sample.first_object().unwrap()
        );
    }

    #[test]
    fn test_object_ref_display() {
        let object = ObjectRef {
            bucket: "quotes".into(),
            key: "Input-data/a.csv".into(),
        };
        assert_eq!(object.to_string(), "quotes/Input-data/a.csv");
    }
}

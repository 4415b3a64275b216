//! Object storage collaborators.
//!
//! The handler never talks to a concrete store; it goes through
//! [`ObjectStorage`], a two-method fetch/put interface. Three
//! implementations are provided:
//!
//! - [`MemoryStorage`] - in-memory map, the test fake
//! - [`FsStorage`] - directory-backed buckets for local runs
//! - [`HttpStorage`] - S3-compatible HTTP endpoint via reqwest
//!
//! [`StorageBackend`] wraps the three so the server and CLI can pick one
//! from configuration and share a single invocation path.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{StorageError, StorageResult};

/// FsStorage root used when no configuration is present.
const DEFAULT_DATA_DIR: &str = ".quoteflow/buckets";

/// Environment variable selecting an HTTP storage endpoint.
pub const ENV_STORAGE_URL: &str = "QUOTEFLOW_STORAGE_URL";

/// Environment variable selecting a filesystem storage root.
pub const ENV_DATA_DIR: &str = "QUOTEFLOW_DATA_DIR";

// =============================================================================
// Interface
// =============================================================================

/// Fetch/put access to a bucket of objects.
///
/// Both calls are one-shot; no retry or backoff happens at this layer.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Read the full body of `bucket`/`key`.
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Write `body` to `bucket`/`key`, replacing any existing object.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> StorageResult<()>;
}

// =============================================================================
// In-Memory Storage
// =============================================================================

/// In-memory object store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-async peek at an object, for assertions in tests.
    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Non-async insert, for seeding tests.
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body.into());
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.get(bucket, key).ok_or_else(|| StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> StorageResult<()> {
        self.insert(bucket, key, body);
        Ok(())
    }
}

// =============================================================================
// Filesystem Storage
// =============================================================================

/// Directory-backed storage: a bucket is a subdirectory of the root, an
/// object key is a relative path inside it.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

#[async_trait]
impl ObjectStorage for FsStorage {
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.object_path(bucket, key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> StorageResult<()> {
        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;
        Ok(())
    }
}

// =============================================================================
// HTTP Storage
// =============================================================================

/// Storage backed by an S3-compatible HTTP endpoint.
///
/// Objects map to `{base}/{bucket}/{key}`; `fetch` issues GET and `put`
/// issues PUT. Auth, if any, is expected to live in the endpoint URL or a
/// fronting proxy.
#[derive(Debug, Clone)]
pub struct HttpStorage {
    base: String,
    client: reqwest::Client,
}

impl HttpStorage {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: reqwest::Client::new(),
        }
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base.trim_end_matches('/'), bucket, key)
    }
}

#[async_trait]
impl ObjectStorage for HttpStorage {
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let url = self.object_url(bucket, key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(StorageError::Http(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> StorageResult<()> {
        let url = self.object_url(bucket, key);
        let response = self
            .client
            .put(&url)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Http(format!(
                "PUT {} returned {}",
                url,
                response.status()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Backend Selection
// =============================================================================

/// A concrete storage choice, selectable at runtime.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    Fs(FsStorage),
    Http(HttpStorage),
}

impl StorageBackend {
    /// Pick a backend from the environment:
    /// `QUOTEFLOW_STORAGE_URL` wins, then `QUOTEFLOW_DATA_DIR`, then the
    /// default data directory.
    pub fn from_env() -> Self {
        if let Ok(url) = std::env::var(ENV_STORAGE_URL) {
            if !url.trim().is_empty() {
                return Self::Http(HttpStorage::new(url.trim()));
            }
        }
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                return Self::Fs(FsStorage::new(dir.trim()));
            }
        }
        Self::Fs(FsStorage::new(DEFAULT_DATA_DIR))
    }

    /// Human-readable description for startup logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "in-memory".to_string(),
            Self::Fs(fs) => format!("filesystem ({})", fs.root().display()),
            Self::Http(_) => "http endpoint".to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for StorageBackend {
    async fn fetch(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        match self {
            Self::Memory(s) => s.fetch(bucket, key).await,
            Self::Fs(s) => s.fetch(bucket, key).await,
            Self::Http(s) => s.fetch(bucket, key).await,
        }
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> StorageResult<()> {
        match self {
            Self::Memory(s) => s.put(bucket, key, body).await,
            Self::Fs(s) => s.put(bucket, key, body).await,
            Self::Http(s) => s.put(bucket, key, body).await,
        }
    }
}

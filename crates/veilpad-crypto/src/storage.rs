//! Storage backends for document text.
//!
//! The encryption core only ever hands storage UTF-8 text: a pretty-printed
//! JSON envelope, a plain JSON document, or a base64 binary container.
//! Backends treat that text as opaque.
//!
//! ## Example
//!
//! ```rust,no_run
//! use veilpad_crypto::storage::{FilesystemBackend, StorageBackend};
//!
//! # async fn run() -> veilpad_crypto::CryptoResult<()> {
//! let backend = FilesystemBackend::new("/var/lib/veilpad");
//! backend.write("notes/today.txt", "hello").await?;
//! let text = backend.read("notes/today.txt").await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CryptoError, CryptoResult};

/// Environment variable naming the filesystem storage root.
pub const STORAGE_DIR_ENV: &str = "VEILPAD_STORAGE_DIR";

/// Storage backend trait for different storage implementations.
///
/// Locations are backend-defined keys (relative paths, remote IDs, ...).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write text to the location, replacing any existing value.
    async fn write(&self, location: &str, data: &str) -> CryptoResult<()>;

    /// Read text from the location. Missing locations are [`CryptoError::NotFound`].
    async fn read(&self, location: &str) -> CryptoResult<String>;

    /// Check if a location holds data.
    async fn exists(&self, location: &str) -> CryptoResult<bool>;

    /// Delete the location. Deleting a missing location is not an error.
    async fn delete(&self, location: &str) -> CryptoResult<()>;

    /// List every stored location, sorted.
    async fn list(&self) -> CryptoResult<Vec<String>>;
}

/// Filesystem backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Root directory; every location resolves beneath it.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl StorageConfig {
    /// Load from `VEILPAD_STORAGE_DIR`, defaulting to the current directory.
    pub fn from_env() -> Self {
        match std::env::var(STORAGE_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self {
                root: PathBuf::from(dir),
            },
            _ => Self::default(),
        }
    }
}

/// Filesystem storage backend rooted at a directory.
#[derive(Debug, Clone)]
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend with the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a backend from configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.root.clone())
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a location beneath the root, rejecting escapes.
    fn full_path(&self, location: &str) -> CryptoResult<PathBuf> {
        let relative = Path::new(location);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if location.is_empty() || escapes {
            return Err(CryptoError::InvalidFormat(format!(
                "storage location must be a relative path: {:?}",
                location
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn write(&self, location: &str, data: &str) -> CryptoResult<()> {
        let full_path = self.full_path(location)?;
        debug!(location, full_path = %full_path.display(), size = data.len(), "storage: write");

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full_path, data).await?;
        Ok(())
    }

    async fn read(&self, location: &str) -> CryptoResult<String> {
        let full_path = self.full_path(location)?;
        match fs::read_to_string(&full_path).await {
            Ok(text) => {
                debug!(location, size = text.len(), "storage: read");
                Ok(text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CryptoError::NotFound(location.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, location: &str) -> CryptoResult<bool> {
        let full_path = self.full_path(location)?;
        Ok(fs::try_exists(&full_path).await?)
    }

    async fn delete(&self, location: &str) -> CryptoResult<()> {
        let full_path = self.full_path(location)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Walks the root recursively. Hidden entries (leading `.`) are skipped
    /// and a missing root lists as empty. Locations use `/` separators.
    async fn list(&self) -> CryptoResult<Vec<String>> {
        let mut locations = Vec::new();
        let mut pending = vec![(self.root.clone(), String::new())];

        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    continue;
                }
                let location = format!("{prefix}{name}");
                if entry.file_type().await?.is_dir() {
                    pending.push((entry.path(), format!("{location}/")));
                } else {
                    locations.push(location);
                }
            }
        }

        locations.sort();
        debug!(root = %self.root.display(), count = locations.len(), "storage: list");
        Ok(locations)
    }
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored locations.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn write(&self, location: &str, data: &str) -> CryptoResult<()> {
        self.entries
            .write()
            .await
            .insert(location.to_string(), data.to_string());
        Ok(())
    }

    async fn read(&self, location: &str) -> CryptoResult<String> {
        self.entries
            .read()
            .await
            .get(location)
            .cloned()
            .ok_or_else(|| CryptoError::NotFound(location.to_string()))
    }

    async fn exists(&self, location: &str) -> CryptoResult<bool> {
        Ok(self.entries.read().await.contains_key(location))
    }

    async fn delete(&self, location: &str) -> CryptoResult<()> {
        self.entries.write().await.remove(location);
        Ok(())
    }

    async fn list(&self) -> CryptoResult<Vec<String>> {
        let mut locations: Vec<String> = self.entries.read().await.keys().cloned().collect();
        locations.sort();
        Ok(locations)
    }
}

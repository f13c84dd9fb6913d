//! # Project Store
//!
//! Whole-record get/put of [`Project`] values against a key-value backend.
//! Keys are namespaced as `project:<projectId>`; values are the record's
//! JSON encoding.
//!
//! There is no concurrency token. Handlers read, modify, and write back;
//! two overlapping writers to one project can lose an update.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sqlx::PgPool;
use thiserror::Error;
use trendline_core::{Project, ProjectId};

/// Namespace prefix for project keys.
pub const KEY_PREFIX: &str = "project:";

/// Storage key for a project.
pub fn project_key(id: &ProjectId) -> String {
    format!("{KEY_PREFIX}{id}")
}

// -- In-Memory Backend --------------------------------------------------------

/// Thread-safe, cloneable in-memory key-value map.
///
/// The lock is `parking_lot` (never held across `.await`), so it cannot be
/// poisoned by a panicking writer. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKv {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the value under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    /// Store a value, returning the previous one if the key existed.
    pub fn put(&self, key: impl Into<String>, value: String) -> Option<String> {
        self.data.write().insert(key.into(), value)
    }

    /// Store a value only if the key is unused. Returns `true` when written.
    pub fn insert_if_absent(&self, key: impl Into<String>, value: String) -> bool {
        use std::collections::hash_map::Entry;
        match self.data.write().entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -- Backend Selection --------------------------------------------------------

/// The key-value engine behind the store.
#[derive(Debug, Clone)]
pub enum KvBackend {
    /// Process-local map; contents are lost on restart.
    Memory(MemoryKv),
    /// `kv_entries` table in PostgreSQL.
    Postgres(PgPool),
}

impl KvBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Memory(kv) => Ok(kv.get(key)),
            Self::Postgres(pool) => Ok(crate::db::kv::get(pool, key).await?),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        match self {
            Self::Memory(kv) => {
                kv.put(key, value);
                Ok(())
            }
            Self::Postgres(pool) => Ok(crate::db::kv::put(pool, key, &value).await?),
        }
    }

    async fn insert_if_absent(&self, key: &str, value: String) -> Result<bool, StoreError> {
        match self {
            Self::Memory(kv) => Ok(kv.insert_if_absent(key, value)),
            Self::Postgres(pool) => Ok(crate::db::kv::insert_if_absent(pool, key, &value).await?),
        }
    }

    /// Confirm the backend is reachable. Always succeeds for the in-memory map.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(pool) => Ok(crate::db::kv::ping(pool).await?),
        }
    }

    /// Short name for logs and readiness output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

// -- Errors -------------------------------------------------------------------

/// Failures reaching or decoding the key-value backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database rejected or could not serve the request.
    #[error("key-value backend error: {0}")]
    Backend(#[from] sqlx::Error),

    /// A stored value is not a valid project record.
    #[error("stored value under {key} is not a valid project: {source}")]
    Corrupt {
        /// Storage key of the bad value.
        key: String,
        /// Decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// A project could not be encoded for storage.
    #[error("failed to encode project {project_id}: {source}")]
    Encode {
        /// Project being written.
        project_id: String,
        /// Encode failure.
        #[source]
        source: serde_json::Error,
    },
}

// -- Project Store ------------------------------------------------------------

/// Typed project access over a [`KvBackend`].
#[derive(Debug, Clone)]
pub struct ProjectStore {
    backend: KvBackend,
}

impl ProjectStore {
    /// Store over an explicit backend.
    pub fn new(backend: KvBackend) -> Self {
        Self { backend }
    }

    /// Store over a fresh in-memory map.
    pub fn in_memory() -> Self {
        Self::new(KvBackend::Memory(MemoryKv::new()))
    }

    /// Store over the `kv_entries` table.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(KvBackend::Postgres(pool))
    }

    /// The underlying backend.
    pub fn backend(&self) -> &KvBackend {
        &self.backend
    }

    /// Fetch a project. `Ok(None)` means no record exists under that ID.
    pub async fn get(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        let key = project_key(id);
        let Some(raw) = self.backend.get(&key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source })
    }

    /// Write a project, replacing any record under the same ID.
    pub async fn put(&self, project: &Project) -> Result<(), StoreError> {
        let (key, value) = encode(project)?;
        self.backend.put(&key, value).await?;
        tracing::debug!(key = %key, backend = self.backend.kind(), "project stored");
        Ok(())
    }

    /// Write a project only if its ID is unused. Returns `false` on collision.
    pub async fn insert_if_absent(&self, project: &Project) -> Result<bool, StoreError> {
        let (key, value) = encode(project)?;
        let inserted = self.backend.insert_if_absent(&key, value).await?;
        tracing::debug!(key = %key, inserted, "project create-only write");
        Ok(inserted)
    }
}

fn encode(project: &Project) -> Result<(String, String), StoreError> {
    let value = serde_json::to_string(project).map_err(|source| StoreError::Encode {
        project_id: project.project_id.to_string(),
        source,
    })?;
    Ok((project_key(&project.project_id), value))
}

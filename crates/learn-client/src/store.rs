//! `ProgressStore` implementations.

use learn_module::{ProgressStore, StoreError, StudentProgress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::api::{ClientError, LmsClient};

/// Store backed by the LMS REST API.
///
/// Owns its runtime: `load` blocks on the fetch, `save` spawns a detached
/// push whose failure is logged and dropped. Meant for synchronous
/// embedders; do not drive it from inside another tokio runtime.
pub struct HttpProgressStore {
    client: Arc<LmsClient>,
    runtime: Runtime,
}

impl HttpProgressStore {
    pub fn new(client: LmsClient) -> Result<Self, ClientError> {
        Ok(Self {
            client: Arc::new(client),
            runtime: Runtime::new()?,
        })
    }
}

impl ProgressStore for HttpProgressStore {
    fn load(
        &self,
        module_id: &str,
        student_id: &str,
    ) -> Result<Option<StudentProgress>, StoreError> {
        self.runtime
            .block_on(self.client.fetch_progress(module_id, student_id))
            .map_err(|err| {
                let malformed =
                    matches!(&err, ClientError::Http(http) if http.is_decode());
                if malformed {
                    StoreError::Malformed(err.to_string())
                } else {
                    StoreError::Transport(err.to_string())
                }
            })
    }

    fn save(&self, progress: &StudentProgress) {
        let client = Arc::clone(&self.client);
        let snapshot = progress.clone();
        self.runtime.spawn(async move {
            match client.push_progress(&snapshot).await {
                Ok(()) => debug!(module = %snapshot.module_id, "pushed progress snapshot"),
                Err(err) => {
                    warn!(module = %snapshot.module_id, %err, "dropping failed progress push")
                }
            }
        });
    }
}

/// In-memory store for tests and sessions without a backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), StudentProgress>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peek at a stored snapshot.
    pub fn get(&self, module_id: &str, student_id: &str) -> Option<StudentProgress> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(module_id.to_string(), student_id.to_string()))
            .cloned()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressStore for MemoryStore {
    fn load(
        &self,
        module_id: &str,
        student_id: &str,
    ) -> Result<Option<StudentProgress>, StoreError> {
        Ok(self.get(module_id, student_id))
    }

    fn save(&self, progress: &StudentProgress) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                (progress.module_id.clone(), progress.student_id.clone()),
                progress.clone(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load("m1", "s1").unwrap(), None);

        let mut progress = StudentProgress::new("m1", "s1");
        progress.time_spent = 42;
        store.save(&progress);

        let loaded = store.load("m1", "s1").unwrap().unwrap();
        assert_eq!(loaded.time_spent, 42);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        let mut progress = StudentProgress::new("m1", "s1");
        store.save(&progress);
        progress.time_spent = 7;
        store.save(&progress);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("m1", "s1").unwrap().time_spent, 7);
    }

    #[test]
    fn test_memory_store_keys_by_pair() {
        let store = MemoryStore::new();
        store.save(&StudentProgress::new("m1", "s1"));
        store.save(&StudentProgress::new("m1", "s2"));
        store.save(&StudentProgress::new("m2", "s1"));
        assert_eq!(store.len(), 3);
        assert!(store.get("m2", "s2").is_none());
    }
}

//! Persistence boundary for progress snapshots.

use crate::models::StudentProgress;
use thiserror::Error;

/// Errors surfaced when loading a snapshot from a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

/// External home for progress snapshots.
///
/// [`ProgressStore::save`] is fire-and-forget: the engine pushes a snapshot
/// after every mutating transition and moves on. Implementations deal with
/// (or drop) failures themselves; the engine never awaits, retries or
/// reconciles.
pub trait ProgressStore {
    /// Fetch the snapshot for a student/module pair, if one exists.
    fn load(&self, module_id: &str, student_id: &str)
        -> Result<Option<StudentProgress>, StoreError>;

    /// Push a snapshot.
    fn save(&self, progress: &StudentProgress);
}

impl<T: ProgressStore + ?Sized> ProgressStore for std::sync::Arc<T> {
    fn load(
        &self,
        module_id: &str,
        student_id: &str,
    ) -> Result<Option<StudentProgress>, StoreError> {
        (**self).load(module_id, student_id)
    }

    fn save(&self, progress: &StudentProgress) {
        (**self).save(progress)
    }
}

impl<T: ProgressStore + ?Sized> ProgressStore for Box<T> {
    fn load(
        &self,
        module_id: &str,
        student_id: &str,
    ) -> Result<Option<StudentProgress>, StoreError> {
        (**self).load(module_id, student_id)
    }

    fn save(&self, progress: &StudentProgress) {
        (**self).save(progress)
    }
}

/// Store that keeps nothing, for sessions that live only in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl ProgressStore for NullStore {
    fn load(
        &self,
        _module_id: &str,
        _student_id: &str,
    ) -> Result<Option<StudentProgress>, StoreError> {
        Ok(None)
    }

    fn save(&self, _progress: &StudentProgress) {}
}

use std::sync::Arc;

use crate::form::{StoredSubmission, SubmissionId};

use super::kv::{get_or_default, set_value, KvStore, StorageError};

const SUBMISSIONS_KEY: &str = "form-submissions";

/// Append-only record of every completed submission, exposed for later
/// export. Normal flow never mutates or deletes entries.
pub struct SubmissionStore {
    kv: Arc<dyn KvStore>,
}

impl SubmissionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn append(&self, submission: &StoredSubmission) -> Result<(), StorageError> {
        let mut all: Vec<StoredSubmission> = get_or_default(self.kv.as_ref(), SUBMISSIONS_KEY)?;
        all.push(submission.clone());
        set_value(self.kv.as_ref(), SUBMISSIONS_KEY, &all)
    }

    pub fn all(&self) -> Result<Vec<StoredSubmission>, StorageError> {
        get_or_default(self.kv.as_ref(), SUBMISSIONS_KEY)
    }

    pub fn find(&self, id: &SubmissionId) -> Result<Option<StoredSubmission>, StorageError> {
        Ok(self.all()?.into_iter().find(|s| &s.id == id))
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Test/debug escape hatch; nothing in the submission flow calls this.
    pub fn clear(&self) -> Result<(), StorageError> {
        set_value(self.kv.as_ref(), SUBMISSIONS_KEY, &Vec::<StoredSubmission>::new())
    }
}

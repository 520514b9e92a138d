//! In-memory job registry.
//!
//! Jobs live for the lifetime of the process and are never evicted. The
//! registry is cloned into `AppState`; all clones share one map.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use uuid::Uuid;

use crate::models::job::Job;

#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new job under a fresh v4 id and returns the id.
    pub fn create(&self, title: impl Into<String>, description: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        let job = Job {
            id,
            title: title.into(),
            description: description.into(),
        };

        // Entries are insert-only, so a poisoned map is still consistent.
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        jobs.insert(id, job);
        debug!(job_id = %id, total = jobs.len(), "Job stored");

        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Job> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Looks up a job by the id string a client sent back. Anything that is not
    /// a well-formed UUID is simply unknown.
    pub fn get_by_token(&self, token: &str) -> Option<Job> {
        let id = Uuid::parse_str(token.trim()).ok()?;
        self.get(&id)
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

//! Job registry
//!
//! Single source of truth for every [`JobRecord`]. All access goes through
//! one lock and records are cloned out before the guard is released, so
//! readers never observe a record while it is being replaced.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{JobId, JobRecord, JobStatus};

// ============================================================================
// Job Registry
// ============================================================================

/// Thread-safe store of all submitted jobs
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job
    pub async fn add(&self, record: JobRecord) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;

        if jobs.contains_key(&record.id) {
            return Err(RegistryError::DuplicateJob(record.id));
        }

        jobs.insert(record.id, record);
        Ok(())
    }

    /// Get a snapshot of one job
    pub async fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Get a snapshot of all jobs, in no particular order
    pub async fn list(&self) -> Vec<JobRecord> {
        self.jobs.read().await.values().cloned().collect()
    }

    /// Replace a running job with its terminal record
    pub async fn update(&self, record: JobRecord) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;

        let current = jobs
            .get_mut(&record.id)
            .ok_or(RegistryError::JobNotFound(record.id))?;

        if current.status.is_terminal() {
            return Err(RegistryError::AlreadyTerminal {
                id: record.id,
                status: current.status,
            });
        }

        *current = record;
        Ok(())
    }

    /// Number of registered jobs
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether no job has been registered yet
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Get registry statistics
    pub async fn stats(&self) -> RegistryStats {
        let jobs = self.jobs.read().await;

        let mut stats = RegistryStats {
            total: jobs.len(),
            ..RegistryStats::default()
        };

        for record in jobs.values() {
            match record.status {
                JobStatus::Running => stats.running += 1,
                JobStatus::Finished => stats.finished += 1,
                JobStatus::Failed => stats.failed += 1,
            }
        }

        stats
    }
}

/// Registry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total: usize,
    pub running: usize,
    pub finished: usize,
    pub failed: usize,
}

// ============================================================================
// Errors
// ============================================================================

/// Registry errors
///
/// None of these occur in normal operation; they indicate a caller bug.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A job with this id is already registered
    #[error("Job already registered: {0}")]
    DuplicateJob(JobId),

    /// No job with this id exists
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    /// The stored job has already reached a terminal state
    #[error("Job {id} is already {status}")]
    AlreadyTerminal { id: JobId, status: JobStatus },
}

// ============================================================================
// Tests
// ============================================================================

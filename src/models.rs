//! Core data structures for crawl jobs
//!
//! A [`JobRecord`] is created `Running` when a crawl is submitted and is
//! replaced exactly once by a terminal record (`Finished` or `Failed`).
//! Transitions consume the running record and return the replacement, so a
//! record held by a reader is never changed underneath it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Job Identifier
// ============================================================================

/// Opaque, process-unique job identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// Job Status
// ============================================================================

/// Lifecycle state of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Crawl submitted and not yet completed
    Running,

    /// Crawl completed and produced results
    Finished,

    /// Crawl returned an error or exceeded its deadline
    Failed,
}

impl JobStatus {
    /// Terminal states never transition again
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }

    /// Lowercase label, matching the JSON representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Job Record
// ============================================================================

/// One submitted crawl, tracked from submission to terminal outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,

    pub start_time: DateTime<Utc>,

    /// Set exactly once, when the job reaches a terminal state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    pub status: JobStatus,

    /// Seed URL handed to the crawler
    pub start_url: String,

    /// Failure description, only when `status` is `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Discovered URLs, only when `status` is `Finished`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<String>>,
}

impl JobRecord {
    /// Create a running record with a fresh id and the current time
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            id: JobId::new(),
            start_time: Utc::now(),
            end_time: None,
            status: JobStatus::Running,
            start_url: start_url.into(),
            error: None,
            results: None,
        }
    }

    /// Transition to `Finished` with the crawl results
    #[must_use]
    pub fn finish(self, results: Vec<String>) -> Self {
        let end_time = self.terminal_time();
        Self {
            end_time: Some(end_time),
            status: JobStatus::Finished,
            error: None,
            results: Some(results),
            ..self
        }
    }

    /// Transition to `Failed` with a failure description
    #[must_use]
    pub fn fail(self, error: impl Into<String>) -> Self {
        let end_time = self.terminal_time();
        Self {
            end_time: Some(end_time),
            status: JobStatus::Failed,
            error: Some(error.into()),
            results: None,
            ..self
        }
    }

    /// Check the record's field-presence invariants
    pub fn is_consistent(&self) -> bool {
        match self.status {
            JobStatus::Running => {
                self.end_time.is_none() && self.error.is_none() && self.results.is_none()
            }
            JobStatus::Finished => {
                self.results.is_some() && self.error.is_none() && self.ended_after_start()
            }
            JobStatus::Failed => {
                self.error.is_some() && self.results.is_none() && self.ended_after_start()
            }
        }
    }

    /// Wall-clock duration, for terminal records
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    fn ended_after_start(&self) -> bool {
        self.end_time.is_some_and(|end| end >= self.start_time)
    }

    // Clocks can step backwards; never record an end before the start.
    fn terminal_time(&self) -> DateTime<Utc> {
        Utc::now().max(self.start_time)
    }
}

// ============================================================================
// API Payloads
// ============================================================================

/// Body of `POST /jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub start_url: String,
}

/// Response to `POST /jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: JobId,
}

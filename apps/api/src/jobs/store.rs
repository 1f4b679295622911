//! In-memory job registry. The mutex is held only for short status updates;
//! the fill itself runs outside it.
//!
//! Finished jobs (completed or failed) are kept for the retention period and
//! then dropped together with their document. Queued and running jobs never
//! expire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::SectionSpec;
use crate::fill::{LogEntry, ProgressSink, SectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

/// The section currently being processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentSection {
    /// One-based position in the catalog.
    pub section: usize,
    pub anchor_label: String,
    pub state: SectionState,
}

#[derive(Debug, Clone)]
struct FillJob {
    status: JobStatus,
    progress: f64,
    current_section: Option<CurrentSection>,
    log: Vec<LogEntry>,
    error: Option<String>,
    document: Option<Bytes>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Monotonic time the job reached a terminal status.
    finished_at: Option<Instant>,
}

impl FillJob {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            status: JobStatus::Queued,
            progress: 0.0,
            current_section: None,
            log: Vec::new(),
            error: None,
            document: None,
            created_at: now,
            updated_at: now,
            finished_at: None,
        }
    }

    fn expired(&self, now: Instant, retention: Duration) -> bool {
        self.finished_at
            .is_some_and(|at| now.saturating_duration_since(at) >= retention)
    }
}

/// What `GET /api/v1/reports/:id` returns.
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: f64,
    pub current_section: Option<CurrentSection>,
    pub log: Vec<LogEntry>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of asking for a job's document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLookup {
    Ready(Bytes),
    NotReady(JobStatus),
    Unknown,
}

#[derive(Clone)]
pub struct JobStore {
    jobs: Arc<Mutex<HashMap<Uuid, FillJob>>>,
    retention: Duration,
}

impl JobStore {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::with_retention(Duration::from_secs(60 * 60))
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            retention,
        }
    }

    /// Poisoning is ignored: every update leaves the map consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, FillJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut FillJob)) {
        if let Some(job) = self.lock().get_mut(&id) {
            f(job);
            job.updated_at = Utc::now();
        }
    }

    /// Registers a queued job and returns its id. Expired jobs are dropped first.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut jobs = self.lock();
        Self::retain_live(&mut jobs, self.retention);
        jobs.insert(id, FillJob::new());
        id
    }

    /// Drops finished jobs older than the retention period. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        Self::retain_live(&mut self.lock(), self.retention)
    }

    fn retain_live(jobs: &mut HashMap<Uuid, FillJob>, retention: Duration) -> usize {
        let now = Instant::now();
        let before = jobs.len();
        jobs.retain(|_, job| !job.expired(now, retention));
        let purged = before - jobs.len();
        if purged > 0 {
            debug!(purged, remaining = jobs.len(), "expired jobs dropped");
        }
        purged
    }

    pub fn snapshot(&self, id: Uuid) -> Option<JobSnapshot> {
        self.lock().get(&id).map(|job| JobSnapshot {
            job_id: id,
            status: job.status,
            progress: job.progress,
            current_section: job.current_section.clone(),
            log: job.log.clone(),
            error: job.error.clone(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        })
    }

    pub fn document(&self, id: Uuid) -> DocumentLookup {
        match self.lock().get(&id) {
            None => DocumentLookup::Unknown,
            Some(job) => match (&job.document, job.status) {
                (Some(bytes), JobStatus::Completed) => DocumentLookup::Ready(bytes.clone()),
                (_, status) => DocumentLookup::NotReady(status),
            },
        }
    }

    pub fn mark_running(&self, id: Uuid) {
        self.update(id, |job| job.status = JobStatus::Running);
    }

    pub fn set_current_section(&self, id: Uuid, current: CurrentSection) {
        self.update(id, |job| job.current_section = Some(current));
    }

    /// Appends a finished section. Progress never moves backwards.
    pub fn push_entry(&self, id: Uuid, entry: LogEntry, progress: f64) {
        self.update(id, |job| {
            job.log.push(entry);
            job.progress = job.progress.max(progress.clamp(0.0, 1.0));
        });
    }

    /// Marks the job completed. `log` is the run's final report and replaces
    /// whatever the progress callbacks accumulated.
    pub fn complete(&self, id: Uuid, document: Bytes, log: Vec<LogEntry>) {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.progress = 1.0;
            job.current_section = None;
            job.log = log;
            job.document = Some(document);
            job.finished_at = Some(Instant::now());
        });
    }

    pub fn fail(&self, id: Uuid, error: String) {
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.current_section = None;
            job.error = Some(error);
            job.finished_at = Some(Instant::now());
        });
    }
}

/// Forwards orchestrator progress into the store for one job.
pub struct JobProgressSink {
    store: JobStore,
    id: Uuid,
}

impl JobProgressSink {
    pub fn new(store: JobStore, id: Uuid) -> Self {
        Self { store, id }
    }
}

impl ProgressSink for JobProgressSink {
    fn state_changed(&mut self, section: usize, spec: &SectionSpec, state: SectionState) {
        self.store.set_current_section(
            self.id,
            CurrentSection {
                section: section + 1,
                anchor_label: spec.anchor_label.clone(),
                state,
            },
        );
    }

    fn section_finished(&mut self, entry: &LogEntry, progress: f64) {
        self.store.push_entry(self.id, entry.clone(), progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::log::SectionOutcome;

    fn entry(index: usize) -> LogEntry {
        LogEntry::new(
            index,
            &SectionSpec::new("Focus: Improvement", "x"),
            &SectionOutcome::AnchorNotFound,
            false,
        )
    }

    #[test]
    fn test_new_job_is_queued() {
        let store = JobStore::new();
        let id = store.create();
        let snap = store.snapshot(id).unwrap();
        assert_eq!(snap.status, JobStatus::Queued);
        assert_eq!(snap.progress, 0.0);
        assert!(snap.log.is_empty());
        assert_eq!(store.document(id), DocumentLookup::NotReady(JobStatus::Queued));
    }

    #[test]
    fn test_unknown_job() {
        let store = JobStore::new();
        assert!(store.snapshot(Uuid::new_v4()).is_none());
        assert_eq!(store.document(Uuid::new_v4()), DocumentLookup::Unknown);
    }

    #[test]
    fn test_progress_sink_updates_job() {
        let store = JobStore::new();
        let id = store.create();
        store.mark_running(id);

        let mut sink = JobProgressSink::new(store.clone(), id);
        let spec = SectionSpec::new("Focus: Improvement", "x");
        sink.state_changed(0, &spec, SectionState::Generating);

        let snap = store.snapshot(id).unwrap();
        assert_eq!(snap.status, JobStatus::Running);
        assert_eq!(
            snap.current_section,
            Some(CurrentSection {
                section: 1,
                anchor_label: "Focus: Improvement".into(),
                state: SectionState::Generating,
            })
        );

        sink.section_finished(&entry(0), 0.5);
        sink.section_finished(&entry(1), 0.25);
        let snap = store.snapshot(id).unwrap();
        assert_eq!(snap.log.len(), 2);
        assert_eq!(snap.progress, 0.5);
    }

    #[test]
    fn test_complete_and_fail() {
        let store = JobStore::new();
        let done = store.create();
        store.push_entry(done, entry(0), 0.5);
        store.complete(done, Bytes::from_static(b"PK"), vec![entry(0), entry(1)]);
        assert_eq!(
            store.document(done),
            DocumentLookup::Ready(Bytes::from_static(b"PK"))
        );
        let snap = store.snapshot(done).unwrap();
        assert_eq!(snap.progress, 1.0);
        let indexes: Vec<_> = snap.log.iter().map(|e| e.section).collect();
        assert_eq!(indexes, vec![1, 2]);

        let failed = store.create();
        store.fail(failed, "Template could not be opened".into());
        let snap = store.snapshot(failed).unwrap();
        assert_eq!(snap.status, JobStatus::Failed);
        assert_eq!(snap.error.as_deref(), Some("Template could not be opened"));
        assert_eq!(store.document(failed), DocumentLookup::NotReady(JobStatus::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_jobs_expire_after_retention() {
        let store = JobStore::with_retention(Duration::from_secs(60));
        let done = store.create();
        store.complete(done, Bytes::from_static(b"PK"), Vec::new());
        let running = store.create();
        store.mark_running(running);

        tokio::time::advance(Duration::from_secs(30)).await;
        let failed = store.create();
        store.fail(failed, "Template could not be opened".into());
        assert!(store.snapshot(done).is_some());

        tokio::time::advance(Duration::from_secs(31)).await;
        store.create();
        assert!(store.snapshot(done).is_none());
        assert_eq!(store.document(done), DocumentLookup::Unknown);
        assert!(store.snapshot(failed).is_some());
        assert_eq!(store.snapshot(running).unwrap().status, JobStatus::Running);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.purge_expired(), 1);
        assert!(store.snapshot(failed).is_none());
        assert!(store.snapshot(running).is_some());
    }

    #[test]
    fn test_snapshot_serializes_status() {
        let store = JobStore::new();
        let id = store.create();
        let json = serde_json::to_value(store.snapshot(id).unwrap()).unwrap();
        assert_eq!(json["status"], "queued");
        assert!(json["current_section"].is_null());
        assert_eq!(json["job_id"], id.to_string());
    }
}

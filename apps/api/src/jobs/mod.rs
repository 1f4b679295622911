//! Background fill jobs: one spawned task per uploaded report.

pub mod handlers;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};
use uuid::Uuid;

use crate::catalog::SectionCatalog;
use crate::fill::{fill_template, OpenedTemplate};
use crate::generation::ContentGenerator;

pub use store::{DocumentLookup, JobProgressSink, JobSnapshot, JobStatus, JobStore};

/// How often the background sweep drops expired jobs.
pub const RETENTION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Everything a job needs, validated before it is queued.
pub struct FillRequest {
    pub template: OpenedTemplate,
    pub transcript: String,
    pub catalog: Arc<SectionCatalog>,
}

/// Queues a job and runs it on the tokio runtime. Returns the job id at once.
pub fn spawn_fill_job(
    store: &JobStore,
    generator: Arc<dyn ContentGenerator>,
    request: FillRequest,
) -> Uuid {
    let id = store.create();
    let store = store.clone();

    tokio::spawn(async move {
        store.mark_running(id);
        info!(%id, sections = request.catalog.len(), "fill job started");

        let mut sink = JobProgressSink::new(store.clone(), id);
        let result = fill_template(
            request.template,
            &request.transcript,
            &request.catalog,
            generator.as_ref(),
            &mut sink,
        )
        .await;

        match result {
            Ok(filled) => {
                info!(%id, bytes = filled.document.len(), "fill job completed");
                store.complete(id, filled.document.into(), filled.report.entries);
            }
            Err(e) => {
                error!(%id, "fill job failed: {e}");
                store.fail(id, e.to_string());
            }
        }
    });

    id
}

/// Purges expired jobs every `period` until the returned handle is aborted.
pub fn spawn_retention_task(store: JobStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            store.purge_expired();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SectionSpec;
    use crate::docx::testing::template_docx;
    use crate::fill::log::OutcomeKind;
    use crate::generation::GenerationError;
    use async_trait::async_trait;

    struct QuietGenerator;

    #[async_trait]
    impl ContentGenerator for QuietGenerator {
        async fn generate(&self, _context: &str, instruction: &str) -> Result<String, GenerationError> {
            Ok(format!("about {instruction}"))
        }
    }

    async fn wait_for_status(store: &JobStore, id: Uuid, status: JobStatus) -> JobSnapshot {
        for _ in 0..200 {
            let snap = store.snapshot(id).unwrap();
            if snap.status == status {
                return snap;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {id} never reached {status:?}");
    }

    #[tokio::test]
    async fn test_completed_job_log_matches_report() {
        let store = JobStore::new();
        let template = OpenedTemplate::open(template_docx(&[&[&["Focus: Improvement"], &[""]]]))
            .await
            .unwrap();
        let catalog = SectionCatalog::new(vec![
            SectionSpec::new("Focus: Improvement", "growth"),
            SectionSpec::new("Risk Register", "risks"),
        ])
        .unwrap();

        let id = spawn_fill_job(
            &store,
            Arc::new(QuietGenerator),
            FillRequest {
                template,
                transcript: "Owner: we sell boots".into(),
                catalog: Arc::new(catalog),
            },
        );

        let snap = wait_for_status(&store, id, JobStatus::Completed).await;
        let kinds: Vec<_> = snap.log.iter().map(|e| e.outcome).collect();
        assert_eq!(kinds, vec![OutcomeKind::Written, OutcomeKind::AnchorNotFound]);
        assert_eq!(snap.progress, 1.0);
        assert!(matches!(store.document(id), DocumentLookup::Ready(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retention_task_purges_idle_store() {
        let store = JobStore::with_retention(Duration::from_secs(60));
        let id = store.create();
        store.fail(id, "Template could not be opened".into());

        let handle = spawn_retention_task(store.clone(), Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(45)).await;
        assert!(store.snapshot(id).is_some());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(store.snapshot(id).is_none());
        handle.abort();
    }
}

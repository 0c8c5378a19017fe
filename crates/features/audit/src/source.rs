use crate::error::AuditError;
use crate::snapshot::AuditSnapshot;
use chrono::Utc;
use std::future::Future;
use vaudit_inspection::{InspectionSession, SessionOverview};
use vaudit_storage::PersistedStore;

/// State the finalizer reads from and tears down.
pub trait AuditSource: Send + Sync {
    fn snapshot(&self) -> impl Future<Output = Result<AuditSnapshot, AuditError>> + Send;

    /// Drops every trace of the session. Called only after an accepted submission.
    fn teardown(&self) -> impl Future<Output = Result<(), AuditError>> + Send;
}

impl<S: PersistedStore> AuditSource for InspectionSession<S> {
    async fn snapshot(&self) -> Result<AuditSnapshot, AuditError> {
        let SessionOverview { record, counters, verdicts } = self.overview().await?;

        Ok(AuditSnapshot {
            session_id: record.session_id,
            vehicle: record.vehicle,
            inspector: record.inspector,
            started_at: record.started_at,
            completed_at: Utc::now(),
            counters,
            components: verdicts,
        })
    }

    async fn teardown(&self) -> Result<(), AuditError> {
        Ok(self.clear().await?)
    }
}

use crate::backend::AuditBackend;
use crate::error::AuditError;
use crate::snapshot::{AuditSnapshot, FinalizeAck};
use crate::source::AuditSource;
use tracing::{info, warn};
use vaudit_kernel::domain::config::RetryConfig;
use vaudit_kernel::retry::RetryPolicy;

/// What an accepted finalize produced.
#[derive(Debug, Clone)]
pub struct FinalizeReport {
    pub snapshot: AuditSnapshot,
    pub ack: FinalizeAck,
}

/// Submits the end-of-session snapshot and tears the session down once it is accepted.
#[derive(Debug, Clone)]
pub struct Finalizer<B> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: AuditBackend> Finalizer<B> {
    pub const fn new(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn from_config(backend: B, config: &RetryConfig) -> Self {
        Self::new(backend, RetryPolicy::from(config))
    }

    /// # Errors
    /// - [`AuditError::Inspection`] when the session cannot be read;
    /// - [`AuditError::Transport`] when the backend stays unreachable;
    /// - [`AuditError::Rejected`] when the backend refuses the report.
    ///
    /// In every error case the session is left as it was, so finalize can be retried.
    pub async fn finalize<S: AuditSource>(&self, source: &S) -> Result<FinalizeReport, AuditError> {
        let snapshot = source.snapshot().await?;
        let submission = snapshot.submission();
        info!(
            session_id = %snapshot.session_id,
            vin = %snapshot.vehicle.full_vin,
            ok = submission.total_ok,
            notok = submission.total_notok,
            pending = submission.total_pending,
            verdict = %submission.final_verdict,
            "Submitting audit"
        );

        let ack = self
            .policy
            .run_if("finalize_audit", || self.backend.submit(&submission), AuditError::is_transient)
            .await
            .map_err(|e| {
                let message = e.to_string();
                match e.into_inner() {
                    Some(inner) if !inner.is_transient() => inner,
                    _ => AuditError::Transport { message: message.into(), context: Some("finalize".into()) },
                }
            })?;

        if !ack.is_success() {
            warn!(status = %ack.status, "Audit submission rejected, session kept");
            return Err(AuditError::Rejected {
                message: format!("backend answered status {:?}", ack.status).into(),
                context: None,
            });
        }

        source.teardown().await?;
        info!(session_id = %snapshot.session_id, "Audit accepted, session torn down");
        Ok(FinalizeReport { snapshot, ack })
    }
}

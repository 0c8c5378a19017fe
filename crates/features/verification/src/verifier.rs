use crate::error::VerificationError;
use crate::model::{PartVerificationRequest, SecondaryCheck, VerificationOutcome, VerificationResponse};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info, warn};
use vaudit_kernel::domain::Verdict;
use vaudit_kernel::domain::config::RetryConfig;
use vaudit_kernel::retry::RetryPolicy;

/// Remote matching service.
pub trait VerificationBackend: Send + Sync {
    fn submit(
        &self,
        request: &PartVerificationRequest,
    ) -> impl Future<Output = Result<VerificationResponse, VerificationError>> + Send;

    /// Second stage of a text check: the recognized texts decide the verdict.
    fn finalize_text(
        &self,
        check: &SecondaryCheck,
        texts: &[String],
    ) -> impl Future<Output = Result<Verdict, VerificationError>> + Send;
}

/// On-device text recognition used by the secondary check.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, check: &SecondaryCheck) -> impl Future<Output = Result<Vec<String>, VerificationError>> + Send;
}

/// Drives a part through verification and always lands on `ok` or `notok`.
///
/// Calls in flight are not cancelled when the caller stops waiting; dropping the future
/// simply abandons the result.
#[derive(Debug, Clone)]
pub struct Verifier<B, R> {
    backend: B,
    recognizer: R,
    policy: RetryPolicy,
}

impl<B: VerificationBackend, R: TextRecognizer> Verifier<B, R> {
    pub const fn new(backend: B, recognizer: R, policy: RetryPolicy) -> Self {
        Self { backend, recognizer, policy }
    }

    pub fn from_config(backend: B, recognizer: R, config: &RetryConfig) -> Self {
        Self::new(backend, recognizer, RetryPolicy::from(config))
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn verify(&self, request: &PartVerificationRequest) -> VerificationOutcome {
        let attempts = AtomicU32::new(0);
        let submitted = self
            .policy
            .run_if(
                "verify_part",
                || {
                    attempts.fetch_add(1, Ordering::Relaxed);
                    self.backend.submit(request)
                },
                VerificationError::is_transient,
            )
            .await;

        let outcome = match submitted {
            Ok(VerificationResponse::Verdict { verdict }) => {
                settle(verdict, false, attempts.load(Ordering::Relaxed))
            },
            Ok(VerificationResponse::PendingSecondaryCheck(check)) => self.secondary(&check).await,
            Err(e) => VerificationOutcome::failed(false, e.attempts, e.to_string()),
        };

        match &outcome.failure {
            Some(failure) => warn!(
                domain = %request.domain,
                component = %request.component,
                part = request.part_index,
                failure = %failure,
                "Verification failed, resolving as notok"
            ),
            None => info!(
                domain = %request.domain,
                component = %request.component,
                part = request.part_index,
                verdict = %outcome.verdict,
                secondary = outcome.secondary,
                "Part verified"
            ),
        }
        outcome
    }

    async fn secondary(&self, check: &SecondaryCheck) -> VerificationOutcome {
        debug!(component = %check.component, "Secondary text check requested");
        let texts = match self.recognizer.recognize(check).await {
            Ok(texts) => normalize(texts),
            Err(e) => return VerificationOutcome::failed(true, 0, e.to_string()),
        };
        debug!(component = %check.component, blocks = texts.len(), "Text recognized");

        let attempts = AtomicU32::new(0);
        let finalized = self
            .policy
            .run_if(
                "finalize_text",
                || {
                    attempts.fetch_add(1, Ordering::Relaxed);
                    self.backend.finalize_text(check, &texts)
                },
                VerificationError::is_transient,
            )
            .await;
        match finalized {
            Ok(verdict) => settle(verdict, true, attempts.load(Ordering::Relaxed)),
            Err(e) => VerificationOutcome::failed(true, e.attempts, e.to_string()),
        }
    }
}

/// A backend verdict that is still pending is treated as a failure.
fn settle(verdict: Verdict, secondary: bool, attempts: u32) -> VerificationOutcome {
    if verdict.is_resolved() {
        VerificationOutcome::decided(verdict, secondary, attempts)
    } else {
        VerificationOutcome::failed(secondary, attempts, "backend returned no verdict".to_owned())
    }
}

fn normalize(texts: Vec<String>) -> Vec<String> {
    texts
        .into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect()
}

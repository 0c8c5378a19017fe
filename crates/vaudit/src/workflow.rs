//! Capture-to-verdict flow for one part: verify the photo, then feed the outcome to the session.

use serde::Serialize;
use tracing::debug;
use vaudit_domain::{ComponentId, Domain};
use vaudit_inspection::{InspectionError, InspectionSession, RetryPrompt, Transition};
use vaudit_storage::PersistedStore;
use vaudit_verification::{PartVerificationRequest, TextRecognizer, VerificationBackend, VerificationOutcome, Verifier};

/// What the capture screen does next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PartResult {
    /// Verified `ok` and recorded.
    Recorded { transition: Transition, outcome: VerificationOutcome },
    /// Verified `notok` (or unverifiable); the worker retakes or asks for a bypass.
    Failed { prompt: RetryPrompt, outcome: VerificationOutcome },
}

/// Verifies the photo at `image` for `part` and records the result.
///
/// # Errors
/// Inspection errors only; verification problems resolve to [`PartResult::Failed`].
pub async fn verify_part<S, B, R>(
    session: &InspectionSession<S>,
    verifier: &Verifier<B, R>,
    domain: Domain,
    component: &ComponentId,
    part: usize,
    image: impl Into<String>,
) -> Result<PartResult, InspectionError>
where
    S: PersistedStore,
    B: VerificationBackend,
    R: TextRecognizer,
{
    let record = session.session().await?;
    let part_ref = session.registry(domain).await?.part(domain, component, part)?;
    let request = PartVerificationRequest {
        case_spec: record.vehicle.case_spec,
        full_vin: record.vehicle.full_vin,
        domain,
        component: component.clone(),
        part_index: part,
        part_label: part_ref.label,
        image: image.into(),
    };

    let outcome = verifier.verify(&request).await;
    debug!(%domain, component = %component, part, verdict = %outcome.verdict, "Routing verification outcome");
    if outcome.is_ok() {
        let transition = session.record_ok(domain, component, part).await?;
        Ok(PartResult::Recorded { transition, outcome })
    } else {
        let prompt = session.register_failure(domain, component, part).await?;
        Ok(PartResult::Failed { prompt, outcome })
    }
}

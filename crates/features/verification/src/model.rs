use serde::{Deserialize, Serialize};
use vaudit_kernel::domain::{ComponentId, Domain, Verdict};

/// One captured photo submitted for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartVerificationRequest {
    pub case_spec: String,
    pub full_vin: String,
    pub domain: Domain,
    pub component: ComponentId,
    pub part_index: usize,
    pub part_label: String,
    /// Location of the captured image (path or URL, transport specific).
    pub image: String,
}

/// Second stage requested by the backend: read text from `image` locally and send it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryCheck {
    pub component: ComponentId,
    pub case_spec: String,
    #[serde(rename = "ocr_image")]
    pub image: String,
}

/// First-stage backend answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum VerificationResponse {
    #[serde(rename = "success")]
    Verdict { verdict: Verdict },
    #[serde(rename = "ocr_pending")]
    PendingSecondaryCheck(SecondaryCheck),
}

/// Final result of verifying one part. Always `ok` or `notok`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    pub verdict: Verdict,
    /// Whether the two-stage text check was used.
    pub secondary: bool,
    /// Backend attempts spent on the call that decided the outcome.
    pub attempts: u32,
    /// Why the part resolved to `notok` without a backend verdict.
    pub failure: Option<String>,
}

impl VerificationOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.verdict, Verdict::Ok)
    }

    pub(crate) const fn decided(verdict: Verdict, secondary: bool, attempts: u32) -> Self {
        Self { verdict, secondary, attempts, failure: None }
    }

    pub(crate) const fn failed(secondary: bool, attempts: u32, failure: String) -> Self {
        Self { verdict: Verdict::NotOk, secondary, attempts, failure: Some(failure) }
    }
}

use crate::error::{AuditError, AuditErrorExt};
use crate::snapshot::{FinalizeAck, FinalizeSubmission};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Receiver of the final report.
pub trait AuditBackend: Send + Sync {
    fn submit(&self, submission: &FinalizeSubmission) -> impl Future<Output = Result<FinalizeAck, AuditError>> + Send;
}

/// Writes `FinalSummary.txt` and `snapshot.json` for a vehicle.
///
/// Files are staged in `<root>/<full VIN> (Ongoing)/`, which is renamed to
/// `<root>/<full VIN> (Done)/` once both are on disk. A `Done` folder only ever holds a
/// complete report; finalizing the same vehicle again replaces it.
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    root: PathBuf,
}

pub const SUMMARY_FILE: &str = "FinalSummary.txt";
pub const SNAPSHOT_FILE: &str = "snapshot.json";
const ONGOING_SUFFIX: &str = " (Ongoing)";
const DONE_SUFFIX: &str = " (Done)";

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where the finished report of `submission` lives.
    #[must_use]
    pub fn report_dir(&self, submission: &FinalizeSubmission) -> PathBuf {
        self.root.join(format!("{}{DONE_SUFFIX}", folder_name(submission)))
    }

    fn staging_dir(&self, submission: &FinalizeSubmission) -> PathBuf {
        self.root.join(format!("{}{ONGOING_SUFFIX}", folder_name(submission)))
    }
}

impl AuditBackend for DirectoryBackend {
    async fn submit(&self, submission: &FinalizeSubmission) -> Result<FinalizeAck, AuditError> {
        let staging = self.staging_dir(submission);
        let dir = self.report_dir(submission);
        fs::create_dir_all(&staging).await.context("Creating report directory")?;

        let json = serde_json::to_vec_pretty(submission)?;
        write(&staging.join(SNAPSHOT_FILE), &json).await?;
        write(&staging.join(SUMMARY_FILE), submission.summary.as_bytes()).await?;

        if fs::try_exists(&dir).await.unwrap_or(false) {
            warn!(dir = %dir.display(), "Replacing an earlier report");
            fs::remove_dir_all(&dir).await.context(format!("Removing {}", dir.display()))?;
        }
        fs::rename(&staging, &dir).await.context(format!("Publishing {}", dir.display()))?;

        info!(dir = %dir.display(), verdict = %submission.final_verdict, "Audit report written");
        Ok(FinalizeAck::success(submission.final_verdict))
    }
}

/// Sanitized VIN, or the session id when the VIN is blank.
fn folder_name(submission: &FinalizeSubmission) -> String {
    let name: String = submission
        .vehicle
        .full_vin
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() { submission.session_id.clone() } else { name }
}

async fn write(path: &Path, bytes: &[u8]) -> Result<(), AuditError> {
    fs::write(path, bytes).await.context(format!("Writing {}", path.display()))
}

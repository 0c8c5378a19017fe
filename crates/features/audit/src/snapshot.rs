use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use vaudit_kernel::domain::{ComponentId, Domain, DomainCounters, Inspector, Verdict, VehicleIdentity};

pub type ComponentVerdicts = BTreeMap<Domain, BTreeMap<ComponentId, Verdict>>;

/// Verdict over the whole vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalVerdict {
    /// At least one component was never resolved.
    Incomplete,
    NotOk,
    Ok,
}

impl FinalVerdict {
    #[must_use]
    pub const fn from_totals(totals: &DomainCounters) -> Self {
        if totals.pending > 0 {
            Self::Incomplete
        } else if totals.notok > 0 {
            Self::NotOk
        } else {
            Self::Ok
        }
    }
}

impl fmt::Display for FinalVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Incomplete => "INCOMPLETE",
            Self::NotOk => "NOT OK",
            Self::Ok => "OK",
        })
    }
}

/// Immutable end-of-session view submitted to the audit backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSnapshot {
    pub session_id: String,
    pub vehicle: VehicleIdentity,
    pub inspector: Inspector,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub counters: BTreeMap<Domain, DomainCounters>,
    /// Overall verdict of every catalogued component.
    pub components: ComponentVerdicts,
}

impl AuditSnapshot {
    /// Counters summed over all domains.
    #[must_use]
    pub fn totals(&self) -> DomainCounters {
        self.counters.values().copied().sum()
    }

    #[must_use]
    pub fn verdict(&self) -> FinalVerdict {
        FinalVerdict::from_totals(&self.totals())
    }

    /// Human-readable report.
    #[must_use]
    pub fn summary(&self) -> String {
        let totals = self.totals();
        let local = self.completed_at.with_timezone(&chrono::Local);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "Final Audit Summary");
        let _ = writeln!(out, "===================");
        let _ = writeln!(out, "Audit Completed: {}", local.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out, "Day: {}", local.format("%A"));
        let _ = writeln!(out);
        let _ = writeln!(out, "Session: {}", self.session_id);
        let _ = writeln!(out, "Full VIN: {}", self.vehicle.full_vin);
        let _ = writeln!(out, "Model: {} {}", self.vehicle.model, self.vehicle.variant);
        let _ = writeln!(out, "Inspector: {} ({})", self.inspector.name, self.inspector.pno);
        let _ = writeln!(out, "Total OK: {}", totals.ok);
        let _ = writeln!(out, "Total NOT OK: {}", totals.notok);
        let _ = writeln!(out, "Total Pending: {}", totals.pending);
        let _ = writeln!(out, "Final Verdict: {}", self.verdict());
        let _ = writeln!(out);
        let _ = writeln!(out, "Detailed Component Status:");
        let _ = write!(out, "=========================");

        for (domain, components) in &self.components {
            let _ = write!(out, "\n\n[{}]", domain.as_ref().to_uppercase());
            for (id, verdict) in components {
                let _ = write!(out, "\n  - {id}: {}", verdict.to_string().to_uppercase());
            }
        }
        out.push('\n');
        out
    }

    #[must_use]
    pub fn submission(&self) -> FinalizeSubmission {
        let totals = self.totals();
        FinalizeSubmission {
            session_id: self.session_id.clone(),
            vehicle: self.vehicle.clone(),
            inspector: self.inspector.clone(),
            total_ok: totals.ok,
            total_notok: totals.notok,
            total_pending: totals.pending,
            final_verdict: self.verdict(),
            counters: self.counters.clone(),
            component_statuses: self.components.clone(),
            completed_at: self.completed_at,
            summary: self.summary(),
        }
    }
}

/// Payload of the finalize call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeSubmission {
    pub session_id: String,
    pub vehicle: VehicleIdentity,
    pub inspector: Inspector,
    pub total_ok: u32,
    pub total_notok: u32,
    pub total_pending: u32,
    pub final_verdict: FinalVerdict,
    pub counters: BTreeMap<Domain, DomainCounters>,
    pub component_statuses: ComponentVerdicts,
    pub completed_at: DateTime<Utc>,
    pub summary: String,
}

/// Backend acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeAck {
    pub status: String,
    #[serde(default)]
    pub verdict: Option<String>,
}

impl FinalizeAck {
    #[must_use]
    pub fn success(verdict: FinalVerdict) -> Self {
        Self { status: "success".to_owned(), verdict: Some(verdict.to_string()) }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

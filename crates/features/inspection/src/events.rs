//! Notifications published on the [`EventBus`](vaudit_events::EventBus) after a commit.
//!
//! Everything except [`InspectionProgress`] travels over broadcast channels.
//! [`InspectionProgress`] is a watch value holding the latest counters.

use crate::tally::ResultTally;
use serde::Serialize;
use std::collections::BTreeMap;
use vaudit_kernel::domain::{ComponentId, Domain, DomainCounters, Verdict};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassClosed {
    pub domain: Domain,
    pub component: ComponentId,
    pub overall: Verdict,
    pub tally: ResultTally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentReopened {
    pub domain: Domain,
    pub component: ComponentId,
    /// Overall verdict before the reopen.
    pub previous: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BypassApplied {
    pub domain: Domain,
    pub component: ComponentId,
    pub part: usize,
}

/// Stored counters disagreed with the component statuses and were rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterDriftDetected {
    pub domain: Domain,
    pub stored: DomainCounters,
    pub recomputed: DomainCounters,
}

/// Latest counters of every domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InspectionProgress {
    pub counters: BTreeMap<Domain, DomainCounters>,
}

impl InspectionProgress {
    /// Counters summed over all domains.
    #[must_use]
    pub fn overall(&self) -> DomainCounters {
        self.counters.values().copied().sum()
    }

    /// No component left pending in a non-empty session.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let overall = self.overall();
        overall.total() > 0 && overall.pending == 0
    }
}

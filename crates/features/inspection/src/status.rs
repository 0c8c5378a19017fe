//! Per-component state machine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaudit_kernel::domain::Verdict;

/// Persisted status of one component.
///
/// `overall` only changes at pass close, on a bypass lock and on reopen. It is never derived
/// from `parts` on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentStatus {
    pub parts: BTreeMap<usize, Verdict>,
    pub overall: Verdict,
    /// Whether the latest pass has been counted in the domain counters.
    pub closed: bool,
}

impl ComponentStatus {
    /// Every part and the overall verdict pending.
    #[must_use]
    pub fn seeded(part_count: usize) -> Self {
        Self {
            parts: (0..part_count).map(|index| (index, Verdict::Pending)).collect(),
            overall: Verdict::Pending,
            closed: false,
        }
    }

    #[must_use]
    pub fn part(&self, index: usize) -> Verdict {
        self.parts.get(&index).copied().unwrap_or_default()
    }

    /// Sets one part verdict. `overall` is untouched.
    pub fn record_part(&mut self, index: usize, verdict: Verdict) {
        self.parts.insert(index, verdict);
    }

    /// The bucket this component currently occupies in its domain counters.
    #[must_use]
    pub const fn counted_as(&self) -> Verdict {
        if self.closed { self.overall } else { Verdict::Pending }
    }

    /// Closes the pass on its last part and returns the resulting overall verdict.
    ///
    /// A `notok` close always wins. An `ok` close upgrades only a pending overall, so an earlier
    /// bypass in the same pass keeps the component `notok`.
    pub fn close_pass(&mut self, last: Verdict) -> Verdict {
        self.overall = match (last, self.overall) {
            (Verdict::NotOk, _) => Verdict::NotOk,
            (_, Verdict::Pending) => Verdict::Ok,
            (_, current) => current,
        };
        self.closed = true;
        self.overall
    }

    /// Locks the overall verdict to `notok` before the pass is over.
    pub fn lock_notok(&mut self) {
        self.overall = Verdict::NotOk;
    }

    /// Returns the overall flag to pending and reports the bucket the component was counted in.
    /// Part verdicts are left as they were.
    pub fn reopen(&mut self) -> Verdict {
        let counted = self.counted_as();
        self.overall = Verdict::Pending;
        self.closed = false;
        counted
    }
}

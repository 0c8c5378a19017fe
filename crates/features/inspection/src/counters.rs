//! Domain-level totals over components.
//!
//! Counters are stored incrementally but are always derivable from the component statuses:
//! a component occupies the bucket of its overall verdict once its pass is closed, and the
//! pending bucket otherwise. [`recompute`] is that derivation.

use crate::status::ComponentStatus;
use vaudit_kernel::domain::{DomainCounters, Verdict};

/// Moves one component out of `pending` into the bucket it closed as.
pub fn on_pass_closed(counters: &mut DomainCounters, closed_as: Verdict) {
    counters.pending = counters.pending.saturating_sub(1);
    *counters.bucket_mut(closed_as) += 1;
}

/// Moves one component from the bucket it was counted in back to `pending`, floored at zero.
pub fn on_reopened(counters: &mut DomainCounters, counted_as: Verdict) {
    if counted_as == Verdict::Pending {
        return;
    }
    let bucket = counters.bucket_mut(counted_as);
    *bucket = bucket.saturating_sub(1);
    counters.pending += 1;
}

/// Derives counters from the statuses of every component in a domain.
pub fn recompute<'a>(statuses: impl IntoIterator<Item = &'a ComponentStatus>) -> DomainCounters {
    let mut counters = DomainCounters::default();
    for status in statuses {
        *counters.bucket_mut(status.counted_as()) += 1;
    }
    counters
}

/// Whether `counters` still add up to the number of components.
#[must_use]
pub const fn is_closed_over(counters: &DomainCounters, total: u32) -> bool {
    counters.total() == total
}

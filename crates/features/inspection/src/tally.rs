use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaudit_kernel::domain::{ComponentId, Domain, Verdict};

/// Part outcomes of the most recent completed pass over a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultTally {
    pub ok: u32,
    pub notok: u32,
}

/// The component a pass is currently walking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePass {
    pub domain: Domain,
    pub component: ComponentId,
}

/// Transient counters of the pass in progress.
///
/// Keeps the latest verdict per part index, so recording the same part twice replaces the
/// earlier outcome instead of counting it again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTally {
    pub active: Option<ActivePass>,
    pub parts: BTreeMap<usize, Verdict>,
}

impl SessionTally {
    /// Starts counting a new pass over `component`.
    #[must_use]
    pub fn begin(domain: Domain, component: ComponentId) -> Self {
        Self { active: Some(ActivePass { domain, component }), parts: BTreeMap::new() }
    }

    #[must_use]
    pub fn is_tracking(&self, domain: Domain, component: &ComponentId) -> bool {
        self.active.as_ref().is_some_and(|a| a.domain == domain && &a.component == component)
    }

    /// Records a part outcome, switching to `component` first if another pass was being tracked.
    pub fn record(&mut self, domain: Domain, component: &ComponentId, index: usize, verdict: Verdict) {
        if !self.is_tracking(domain, component) {
            *self = Self::begin(domain, component.clone());
        }
        self.parts.insert(index, verdict);
    }

    #[must_use]
    pub fn ok_count(&self) -> u32 {
        self.count(Verdict::Ok)
    }

    #[must_use]
    pub fn not_ok_count(&self) -> u32 {
        self.count(Verdict::NotOk)
    }

    #[must_use]
    pub fn to_result(&self) -> ResultTally {
        ResultTally { ok: self.ok_count(), notok: self.not_ok_count() }
    }

    fn count(&self, verdict: Verdict) -> u32 {
        let n = self.parts.values().filter(|v| **v == verdict).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }
}

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// One of the three fixed inspection partitions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Domain {
    Interior,
    Exterior,
    Loose,
}

impl Domain {
    pub const ALL: [Self; 3] = [Self::Interior, Self::Exterior, Self::Loose];
}

/// Verification state of a part or of a whole component.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verdict {
    #[default]
    Pending,
    Ok,
    #[serde(rename = "notok", alias = "not_ok")]
    #[strum(to_string = "notok", serialize = "not_ok")]
    NotOk,
}

impl Verdict {
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Component-level totals of one domain.
///
/// Between transitions `pending + ok + notok` equals the number of components in the domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainCounters {
    pub pending: u32,
    pub ok: u32,
    pub notok: u32,
}

impl DomainCounters {
    /// Fresh counters for a domain with `total` components, all pending.
    #[must_use]
    pub const fn seeded(total: u32) -> Self {
        Self { pending: total, ok: 0, notok: 0 }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.pending + self.ok + self.notok
    }

    /// Bucket value for `verdict`.
    #[must_use]
    pub const fn get(&self, verdict: Verdict) -> u32 {
        match verdict {
            Verdict::Pending => self.pending,
            Verdict::Ok => self.ok,
            Verdict::NotOk => self.notok,
        }
    }

    pub const fn bucket_mut(&mut self, verdict: Verdict) -> &mut u32 {
        match verdict {
            Verdict::Pending => &mut self.pending,
            Verdict::Ok => &mut self.ok,
            Verdict::NotOk => &mut self.notok,
        }
    }
}

impl std::ops::Add for DomainCounters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            pending: self.pending + rhs.pending,
            ok: self.ok + rhs.ok,
            notok: self.notok + rhs.notok,
        }
    }
}

impl std::iter::Sum for DomainCounters {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, c| acc + c)
    }
}

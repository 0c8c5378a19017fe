use crate::inspection::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a component, unique within its domain (e.g. `Tyre`, `Brake_Caliper`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static description of one catalogued component as delivered by the case configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    /// Display name.
    pub name: String,
    /// Thumbnail shown on the hub card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Ordered part labels; inspection walks them front to back.
    pub parts: Vec<String>,
    /// One reference image per part, same order as `parts`.
    #[serde(default)]
    pub reference_images: Vec<String>,
}

impl ComponentSpec {
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

/// Backend-supplied catalog for one case specification: per domain, component id → spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseConfiguration {
    pub interior: BTreeMap<ComponentId, ComponentSpec>,
    pub exterior: BTreeMap<ComponentId, ComponentSpec>,
    pub loose: BTreeMap<ComponentId, ComponentSpec>,
}

impl CaseConfiguration {
    #[must_use]
    pub const fn domain(&self, domain: Domain) -> &BTreeMap<ComponentId, ComponentSpec> {
        match domain {
            Domain::Interior => &self.interior,
            Domain::Exterior => &self.exterior,
            Domain::Loose => &self.loose,
        }
    }

    pub const fn domain_mut(&mut self, domain: Domain) -> &mut BTreeMap<ComponentId, ComponentSpec> {
        match domain {
            Domain::Interior => &mut self.interior,
            Domain::Exterior => &mut self.exterior,
            Domain::Loose => &mut self.loose,
        }
    }

    /// Number of components across all domains.
    #[must_use]
    pub fn component_count(&self) -> usize {
        Domain::ALL.iter().map(|d| self.domain(*d).len()).sum()
    }
}

//! Per-domain component catalog, seeded once from the case configuration.

use crate::error::InspectionError;
use crate::repository::RecordKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaudit_kernel::domain::{CaseConfiguration, ComponentId, ComponentSpec, Domain};

/// One part of a component as presented to the capture screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartRef {
    pub index: usize,
    pub label: String,
    pub reference_image: Option<String>,
    /// Whether this is the final part of the pass.
    pub last: bool,
}

/// Read-only catalog of one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRegistry {
    components: BTreeMap<ComponentId, ComponentSpec>,
}

impl ComponentRegistry {
    /// Validates and wraps the catalog of one domain.
    ///
    /// # Errors
    /// [`InspectionError::InvalidCatalog`] when an id is not store-safe, a component has no
    /// parts, or its reference images do not line up with its parts.
    pub fn new(
        domain: Domain,
        components: BTreeMap<ComponentId, ComponentSpec>,
    ) -> Result<Self, InspectionError> {
        for (id, spec) in &components {
            validate(domain, id, spec)?;
        }
        Ok(Self { components })
    }

    /// Builds all three registries of a case configuration.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn from_case(case: &CaseConfiguration) -> Result<BTreeMap<Domain, Self>, InspectionError> {
        Domain::ALL
            .iter()
            .map(|&domain| Ok((domain, Self::new(domain, case.domain(domain).clone())?)))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ComponentId) -> Option<&ComponentSpec> {
        self.components.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.components.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &ComponentSpec)> {
        self.components.iter()
    }

    /// Resolves `index` of component `id`.
    ///
    /// # Errors
    /// [`InspectionError::UnknownComponent`] or [`InspectionError::PartOutOfRange`].
    pub fn part(&self, domain: Domain, id: &ComponentId, index: usize) -> Result<PartRef, InspectionError> {
        let spec = self.spec(domain, id)?;
        let label = spec.parts.get(index).ok_or_else(|| InspectionError::PartOutOfRange {
            message: format!("{domain}/{id} has {} part(s), got index {index}", spec.parts.len()).into(),
            context: None,
        })?;
        Ok(PartRef {
            index,
            label: label.clone(),
            reference_image: spec.reference_images.get(index).cloned(),
            last: index + 1 == spec.parts.len(),
        })
    }

    /// # Errors
    /// [`InspectionError::UnknownComponent`] when `id` is not catalogued in `domain`.
    pub fn spec(&self, domain: Domain, id: &ComponentId) -> Result<&ComponentSpec, InspectionError> {
        self.components.get(id).ok_or_else(|| InspectionError::UnknownComponent {
            message: format!("{domain}/{id}").into(),
            context: None,
        })
    }
}

fn validate(domain: Domain, id: &ComponentId, spec: &ComponentSpec) -> Result<(), InspectionError> {
    let invalid = |reason: String| InspectionError::InvalidCatalog {
        message: format!("{domain}/{id}: {reason}").into(),
        context: None,
    };

    if id.as_str().is_empty() {
        return Err(invalid("id cannot be empty".to_owned()));
    }
    // Status keys carry the longest prefix of all per-component records.
    if RecordKey::Status(domain, id.clone()).store_key().is_err() {
        return Err(invalid(format!("id is too long to be stored ({} bytes)", id.as_str().len())));
    }
    if spec.parts.is_empty() {
        return Err(invalid("component has no parts".to_owned()));
    }
    if !spec.reference_images.is_empty() && spec.reference_images.len() != spec.parts.len() {
        return Err(invalid(format!(
            "{} reference image(s) for {} part(s)",
            spec.reference_images.len(),
            spec.parts.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(parts: &[&str], images: &[&str]) -> ComponentSpec {
        ComponentSpec {
            name: "Tyre".into(),
            image: None,
            parts: parts.iter().map(|p| (*p).to_owned()).collect(),
            reference_images: images.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    fn registry(id: &str, spec: ComponentSpec) -> Result<ComponentRegistry, InspectionError> {
        ComponentRegistry::new(Domain::Exterior, BTreeMap::from([(ComponentId::from(id), spec)]))
    }

    #[test]
    fn resolves_parts_in_order() {
        let reg = registry("Tyre", spec(&["LF", "RR"], &["lf.jpg", "rr.jpg"])).unwrap();
        let id = ComponentId::from("Tyre");

        let first = reg.part(Domain::Exterior, &id, 0).unwrap();
        assert_eq!(first.label, "LF");
        assert!(!first.last);

        let last = reg.part(Domain::Exterior, &id, 1).unwrap();
        assert_eq!(last.reference_image.as_deref(), Some("rr.jpg"));
        assert!(last.last);

        assert!(matches!(
            reg.part(Domain::Exterior, &id, 2),
            Err(InspectionError::PartOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_broken_catalog_entries() {
        assert!(registry("Tyre", spec(&[], &[])).is_err());
        assert!(registry("Tyre", spec(&["LF", "RR"], &["lf.jpg"])).is_err());
        assert!(registry("", spec(&["LF"], &[])).is_err());
        assert!(registry(&"W".repeat(200), spec(&["LF"], &[])).is_err());
    }

    #[test]
    fn ids_are_free_text() {
        for id in ["Rear Bumper", "Owner.Manual", "Brake_Caliper", "Rückspiegel", "../etc"] {
            assert!(registry(id, spec(&["Single View"], &[])).is_ok(), "{id}");
        }
    }

    #[test]
    fn missing_reference_images_are_allowed() {
        let reg = registry("Jack", spec(&["Single View"], &[])).unwrap();
        let part = reg.part(Domain::Exterior, &ComponentId::from("Jack"), 0).unwrap();
        assert!(part.reference_image.is_none());
    }
}

#![allow(dead_code, unreachable_pub)]

use vaudit_inspection::InspectionSession;
use vaudit_kernel::domain::config::InspectionConfig;
use vaudit_kernel::domain::{CaseConfiguration, ComponentId, ComponentSpec, Inspector, VehicleIdentity};
use vaudit_storage::MemoryStore;

pub fn spec(name: &str, parts: &[&str]) -> ComponentSpec {
    ComponentSpec {
        name: name.to_owned(),
        image: None,
        parts: parts.iter().map(|p| (*p).to_owned()).collect(),
        reference_images: parts.iter().map(|p| format!("{name}_{p}.jpg")).collect(),
    }
}

/// Interior: Seat(1). Exterior: Tyre(4), Mirror(2). Loose: Jack(1), Triangle(1).
pub fn case() -> CaseConfiguration {
    let mut case = CaseConfiguration::default();
    case.interior.insert(ComponentId::from("Seat"), spec("Seat", &["Front"]));
    case.exterior.insert(ComponentId::from("Tyre"), spec("Tyre", &["LF", "RF", "LR", "RR"]));
    case.exterior.insert(ComponentId::from("Mirror"), spec("Mirror", &["Left", "Right"]));
    case.loose.insert(ComponentId::from("Jack"), spec("Jack", &["Single View"]));
    case.loose.insert(ComponentId::from("Triangle"), spec("Triangle", &["Single View"]));
    case
}

pub fn vehicle() -> VehicleIdentity {
    VehicleIdentity {
        full_vin: "MA1TA2FUXH2A12345".into(),
        short_vin: "A12345".into(),
        case_spec: "XUV7-AT".into(),
        model: "XUV700".into(),
        variant: "AX7".into(),
        engine_number: "MHAWK-778812".into(),
    }
}

pub fn inspector() -> Inspector {
    Inspector { name: "R. Iyer".into(), pno: "40112".into(), department: "PDI".into() }
}

pub fn id(raw: &str) -> ComponentId {
    ComponentId::from(raw)
}

pub async fn started(config: InspectionConfig) -> InspectionSession<MemoryStore> {
    let session = InspectionSession::new(MemoryStore::new(), config);
    session.initialize(vehicle(), inspector(), &case()).await.unwrap();
    session
}

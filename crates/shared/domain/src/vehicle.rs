use serde::{Deserialize, Serialize};

/// Identity of the vehicle under inspection, captured once when the VIN is verified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleIdentity {
    pub full_vin: String,
    /// Short VIN as printed on the chassis plate.
    pub short_vin: String,
    /// Case specification code selecting the component catalog.
    pub case_spec: String,
    pub model: String,
    pub variant: String,
    pub engine_number: String,
}

/// The worker performing the inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inspector {
    pub name: String,
    /// Personnel number.
    pub pno: String,
    pub department: String,
}

use serde_json::json;
use std::path::PathBuf;
use vaudit_domain::config::{BackoffKind, InspectionConfig, RetryConfig};
use vaudit_domain::{CaseConfiguration, ComponentId, Domain};

#[test]
fn config_defaults_match_field_behaviour() {
    let cfg = InspectionConfig::default();
    assert_eq!(cfg.bypass.pin, "0000");
    assert!(cfg.bypass.max_attempts.is_none());
    assert!(!cfg.reopen.allow_ok);

    assert_eq!(cfg.verification.max_attempts, 4);
    assert_eq!(cfg.verification.delay_ms, 1_000);
    assert_eq!(cfg.verification.timeout_ms, 10_000);
    assert_eq!(cfg.verification.backoff, BackoffKind::Fixed);

    assert_eq!(cfg.finalize.max_attempts, 1);
    assert_eq!(cfg.finalize.timeout_ms, 20_000);
    assert_eq!(cfg.storage.data_dir, PathBuf::from(".vaudit"));
}

#[test]
fn partial_config_keeps_defaults() {
    let raw = json!({
        "bypass": { "pin": "4711", "max_attempts": 3 },
        "verification": { "backoff": "exponential", "max_delay_ms": 8000 },
        "logging": { "level": "debug", "directory": "/var/log/vaudit" }
    });

    let cfg: InspectionConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.bypass.pin, "4711");
    assert_eq!(cfg.bypass.max_attempts, Some(3));
    assert_eq!(cfg.verification.backoff, BackoffKind::Exponential);
    assert_eq!(cfg.verification.max_attempts, 4);
    assert_eq!(cfg.finalize.max_attempts, 1);
    assert_eq!(cfg.logging.directory, Some(PathBuf::from("/var/log/vaudit")));
}

#[test]
fn config_clones_share_until_mutated() {
    let base = InspectionConfig::default();
    let mut tuned = base.clone();
    tuned.reopen.allow_ok = true;
    tuned.finalize = RetryConfig::single_attempt(5_000);

    assert!(!base.reopen.allow_ok);
    assert!(tuned.reopen.allow_ok);
    assert_eq!(base.finalize.timeout_ms, 20_000);
}

#[test]
fn case_configuration_reads_backend_shape() {
    let raw = json!({
        "interior": {
            "Tyre": {
                "name": "Tyre",
                "parts": ["Left Front", "Right Rear", "Left Rear", "Right Front"],
                "referenceImages": ["tyre_lf.jpg", "tyre_rr.jpg", "tyre_lr.jpg", "tyre_rf.jpg"]
            }
        },
        "loose": {
            "Jack": { "name": "Jack", "parts": ["Single View"], "referenceImages": ["jack.jpg"] }
        }
    });

    let case: CaseConfiguration = serde_json::from_value(raw).expect("case deserialize");
    assert_eq!(case.component_count(), 2);
    assert!(case.domain(Domain::Exterior).is_empty());

    let tyre = &case.domain(Domain::Interior)[&ComponentId::from("Tyre")];
    assert_eq!(tyre.part_count(), 4);
    assert_eq!(tyre.reference_images[1], "tyre_rr.jpg");
    assert!(tyre.image.is_none());
}

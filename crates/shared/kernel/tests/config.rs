use std::fs;
use tempfile::tempdir;
use vaudit_kernel::config::{ConfigError, load_config};
use vaudit_kernel::domain::config::InspectionConfig;

#[test]
fn file_values_override_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("vaudit.toml");
    fs::write(
        &path,
        r#"
        [bypass]
        pin = "2468"

        [verification]
        max_attempts = 2
        backoff = "exponential"

        [storage]
        compression = true
        "#,
    )?;

    let cfg: InspectionConfig = load_config(Some(&path))?;
    assert_eq!(cfg.bypass.pin, "2468");
    assert_eq!(cfg.verification.max_attempts, 2);
    assert_eq!(cfg.verification.timeout_ms, 10_000);
    assert_eq!(cfg.finalize.max_attempts, 1);
    assert!(cfg.storage.compression);
    Ok(())
}

#[test]
fn json_files_are_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("vaudit.json");
    fs::write(&path, r#"{ "reopen": { "allow_ok": true }, "logging": { "json": true } }"#)?;

    let cfg: InspectionConfig = load_config(Some(&path))?;
    assert!(cfg.reopen.allow_ok);
    assert!(cfg.logging.json);
    assert_eq!(cfg.bypass.pin, "0000");
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let result = load_config::<InspectionConfig>(Some(dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Config { .. })));
}

#[test]
fn malformed_values_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("vaudit.toml");
    fs::write(&path, "[verification]\nbackoff = \"sometimes\"\n")?;

    let result = load_config::<InspectionConfig>(Some(&path));
    assert!(matches!(result, Err(ConfigError::Config { .. })));
    Ok(())
}

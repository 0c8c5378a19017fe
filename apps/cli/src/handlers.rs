//! Command handlers. Each one returns the JSON document printed on stdout.

use crate::args::{Command, ComponentArgs, PartArgs};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::info;
use vaudit::domain::config::InspectionConfig;
use vaudit::domain::{CaseConfiguration, Domain, Inspector, VehicleIdentity};
use vaudit::features::audit::{DirectoryBackend, Finalizer};
use vaudit::features::inspection::InspectionSession;
use vaudit::storage::{Compression, FileStore};

/// Opens the file-backed session under `storage.data_dir`.
///
/// # Errors
/// When the data directory cannot be created or its journal cannot be replayed.
pub async fn open_session(config: InspectionConfig) -> Result<InspectionSession<FileStore>> {
    let compression = if config.storage.compression { Compression::Lz4 } else { Compression::None };
    let root = config.storage.data_dir.clone();
    let store = FileStore::builder()
        .compression(compression)
        .root(&root)
        .connect()
        .await
        .with_context(|| format!("Opening session store at {}", root.display()))?;
    Ok(InspectionSession::new(store, config))
}

/// Runs one command against the session.
///
/// # Errors
/// Rejected transitions, unreadable input files and storage failures.
pub async fn execute(command: Command, session: &InspectionSession<FileStore>) -> Result<Value> {
    match command {
        Command::Init { identity, case, inspector, force } => {
            init(session, &identity, &case, inspector.as_deref(), force).await
        },
        Command::Begin(ComponentArgs { domain, component }) => {
            let first = session.begin_pass(domain, &component).await?;
            Ok(json!({ "domain": domain, "component": component, "part": first }))
        },
        Command::RecordOk(PartArgs { target, part }) => {
            let transition = session.record_ok(target.domain, &target.component, part).await?;
            Ok(serde_json::to_value(transition)?)
        },
        Command::Fail(PartArgs { target, part }) => {
            let prompt = session.register_failure(target.domain, &target.component, part).await?;
            Ok(json!({ "prompt": prompt }))
        },
        Command::Bypass { part: PartArgs { target, part }, pin } => {
            let transition = session.bypass(target.domain, &target.component, part, &pin).await?;
            Ok(serde_json::to_value(transition)?)
        },
        Command::Reopen(ComponentArgs { domain, component }) => {
            let previous = session.reopen(domain, &component).await?;
            Ok(json!({ "domain": domain, "component": component, "previous": previous }))
        },
        Command::Status { domain } => status(session, domain).await,
        Command::Check => {
            let drift = session.check_consistency().await?;
            Ok(json!({ "consistent": drift.is_empty(), "repaired": drift }))
        },
        Command::Finalize { out } => finalize(session, &out).await,
        Command::Clear => {
            session.clear().await?;
            Ok(json!({ "cleared": true }))
        },
    }
}

async fn init(
    session: &InspectionSession<FileStore>,
    identity: &Path,
    case: &Path,
    inspector: Option<&Path>,
    force: bool,
) -> Result<Value> {
    let vehicle: VehicleIdentity = read_json(identity).await?;
    let case: CaseConfiguration = read_json(case).await?;
    let inspector: Inspector = match inspector {
        Some(path) => read_json(path).await?,
        None => Inspector::default(),
    };

    let record = if force {
        session.replace(vehicle, inspector, &case).await?
    } else {
        session.initialize(vehicle, inspector, &case).await?
    };
    Ok(serde_json::to_value(record)?)
}

async fn status(session: &InspectionSession<FileStore>, only: Option<Domain>) -> Result<Value> {
    let record = session.session().await?;
    let progress = session.progress().await?;

    let mut components = Map::new();
    for domain in only.map_or_else(|| Domain::ALL.to_vec(), |d| vec![d]) {
        components.insert(domain.to_string(), serde_json::to_value(session.statuses(domain).await?)?);
    }

    Ok(json!({
        "session_id": record.session_id,
        "full_vin": record.vehicle.full_vin,
        "complete": progress.is_complete(),
        "overall": progress.overall(),
        "counters": progress.counters,
        "retry": session.retry_state().await?,
        "components": components,
    }))
}

async fn finalize(session: &InspectionSession<FileStore>, out: &Path) -> Result<Value> {
    let backend = DirectoryBackend::new(out);
    let report = Finalizer::from_config(backend.clone(), &session.config().finalize)
        .finalize(session)
        .await
        .context("Final audit was not accepted, session kept")?;

    let dir = backend.report_dir(&report.snapshot.submission());
    info!(report = %dir.display(), verdict = %report.snapshot.verdict(), "Audit report written");
    Ok(json!({
        "verdict": report.snapshot.verdict(),
        "totals": report.snapshot.totals(),
        "report_dir": dir,
    }))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path).await.with_context(|| format!("Reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Parsing {}", path.display()))
}

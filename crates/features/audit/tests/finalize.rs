use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use vaudit_audit::{
    AuditBackend, AuditError, AuditSource, DirectoryBackend, FinalVerdict, FinalizeAck, FinalizeSubmission, Finalizer,
    SNAPSHOT_FILE, SUMMARY_FILE,
};
use vaudit_inspection::{InspectionError, InspectionSession};
use vaudit_kernel::domain::config::InspectionConfig;
use vaudit_kernel::domain::{
    CaseConfiguration, ComponentId, ComponentSpec, Domain, DomainCounters, Inspector, Verdict, VehicleIdentity,
};
use vaudit_kernel::retry::RetryPolicy;
use vaudit_storage::MemoryStore;

#[derive(Clone, Default)]
struct RecordingBackend {
    answers: Arc<Mutex<VecDeque<Result<FinalizeAck, AuditError>>>>,
    received: Arc<Mutex<Vec<FinalizeSubmission>>>,
}

impl AuditBackend for RecordingBackend {
    async fn submit(&self, submission: &FinalizeSubmission) -> Result<FinalizeAck, AuditError> {
        self.received.lock().push(submission.clone());
        let answer = self.answers.lock().pop_front();
        answer.unwrap_or_else(|| Ok(FinalizeAck::success(submission.final_verdict)))
    }
}

fn one_part(name: &str) -> ComponentSpec {
    ComponentSpec { name: name.into(), image: None, parts: vec!["Single View".into()], reference_images: vec![] }
}

fn case() -> CaseConfiguration {
    let mut case = CaseConfiguration::default();
    case.interior.insert(ComponentId::from("Seat"), one_part("Seat"));
    case.exterior.insert(ComponentId::from("Bumper"), one_part("Bumper"));
    case.exterior.insert(ComponentId::from("Mirror"), one_part("Mirror"));
    case.loose.insert(ComponentId::from("Jack"), one_part("Jack"));
    case
}

/// Interior and loose resolved, exterior untouched.
async fn partially_inspected() -> InspectionSession<MemoryStore> {
    let session = InspectionSession::new(MemoryStore::new(), InspectionConfig::default());
    let vehicle = VehicleIdentity { full_vin: "MA1TA2FUXH2A12345".into(), ..VehicleIdentity::default() };
    let inspector = Inspector { name: "R. Iyer".into(), pno: "40112".into(), department: "PDI".into() };
    session.initialize(vehicle, inspector, &case()).await.unwrap();

    let seat = ComponentId::from("Seat");
    session.begin_pass(Domain::Interior, &seat).await.unwrap();
    session.record_ok(Domain::Interior, &seat, 0).await.unwrap();

    let jack = ComponentId::from("Jack");
    session.begin_pass(Domain::Loose, &jack).await.unwrap();
    session.register_failure(Domain::Loose, &jack, 0).await.unwrap();
    session.register_failure(Domain::Loose, &jack, 0).await.unwrap();
    session.bypass(Domain::Loose, &jack, 0, "0000").await.unwrap();
    session
}

fn single_attempt() -> RetryPolicy {
    RetryPolicy::once(Duration::from_secs(20))
}

#[tokio::test]
async fn pending_domain_is_reported_not_omitted() {
    let session = partially_inspected().await;
    let backend = RecordingBackend::default();

    let report = Finalizer::new(backend.clone(), single_attempt()).finalize(&session).await.unwrap();

    let sent = backend.received.lock().pop().unwrap();
    assert_eq!((sent.total_ok, sent.total_notok, sent.total_pending), (1, 1, 2));
    assert_eq!(sent.final_verdict, FinalVerdict::Incomplete);
    assert_eq!(sent.counters[&Domain::Exterior], DomainCounters::seeded(2));
    assert_eq!(sent.counters[&Domain::Loose], DomainCounters { pending: 0, ok: 0, notok: 1 });

    let exterior = &sent.component_statuses[&Domain::Exterior];
    assert_eq!(exterior.len(), 2);
    assert!(exterior.values().all(|v| *v == Verdict::Pending));
    assert_eq!(sent.component_statuses[&Domain::Loose][&ComponentId::from("Jack")], Verdict::NotOk);
    assert!(sent.summary.contains("[EXTERIOR]\n  - Bumper: PENDING\n  - Mirror: PENDING"));

    assert_eq!(report.snapshot.inspector.pno, "40112");
    assert!(report.ack.is_success());
    assert!(matches!(session.session().await, Err(InspectionError::NotInitialized { .. })), "torn down");
}

#[tokio::test(start_paused = true)]
async fn transport_failure_keeps_the_session() {
    let session = partially_inspected().await;
    let backend = RecordingBackend::default();
    let unreachable = || AuditError::Transport { message: "connection reset".into(), context: None };
    backend.answers.lock().extend([Err(unreachable()), Err(unreachable())]);

    let finalizer = Finalizer::new(backend.clone(), RetryPolicy::fixed(2, Duration::from_secs(1), Duration::from_secs(5)));
    let err = finalizer.finalize(&session).await.unwrap_err();
    assert!(matches!(err, AuditError::Transport { .. }));
    assert_eq!(backend.received.lock().len(), 2);
    assert_eq!(session.counters(Domain::Interior).await.unwrap().ok, 1, "state kept");

    finalizer.finalize(&session).await.unwrap();
    assert!(session.session().await.is_err());
}

#[tokio::test]
async fn rejected_ack_keeps_the_session() {
    let session = partially_inspected().await;
    let backend = RecordingBackend::default();
    backend.answers.lock().push_back(Ok(FinalizeAck { status: "error".into(), verdict: None }));

    let err = Finalizer::new(backend, single_attempt()).finalize(&session).await.unwrap_err();
    assert!(matches!(err, AuditError::Rejected { .. }));
    assert!(session.session().await.is_ok());
}

#[tokio::test]
async fn uninitialized_session_cannot_be_finalized() {
    let session = InspectionSession::new(MemoryStore::new(), InspectionConfig::default());
    let backend = RecordingBackend::default();

    let err = Finalizer::new(backend.clone(), single_attempt()).finalize(&session).await.unwrap_err();
    assert!(matches!(err, AuditError::Inspection { .. }));
    assert!(backend.received.lock().is_empty());
}

#[tokio::test]
async fn directory_backend_writes_the_report() {
    let tmp = tempfile::tempdir().unwrap();
    let session = partially_inspected().await;
    let snapshot = session.snapshot().await.unwrap();
    let backend = DirectoryBackend::new(tmp.path());

    let report = Finalizer::new(backend.clone(), single_attempt()).finalize(&session).await.unwrap();
    assert_eq!(report.ack.verdict.as_deref(), Some("INCOMPLETE"));

    let dir = backend.report_dir(&snapshot.submission());
    assert!(dir.ends_with("MA1TA2FUXH2A12345 (Done)"));
    assert!(!tmp.path().join("MA1TA2FUXH2A12345 (Ongoing)").exists());
    let summary = std::fs::read_to_string(dir.join(SUMMARY_FILE)).unwrap();
    assert!(summary.contains("Final Verdict: INCOMPLETE"));
    assert!(summary.contains("Inspector: R. Iyer (40112)"));

    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(dir.join(SNAPSHOT_FILE)).unwrap()).unwrap();
    assert_eq!(json["total_pending"], 2);
    assert_eq!(json["component_statuses"]["loose"]["Jack"], "notok");
}

#[tokio::test]
async fn second_report_replaces_the_first() {
    let tmp = tempfile::tempdir().unwrap();
    let stale = tmp.path().join("MA1TA2FUXH2A12345 (Done)");
    std::fs::create_dir_all(&stale).unwrap();
    std::fs::write(stale.join("notes.txt"), "left over").unwrap();

    let session = partially_inspected().await;
    Finalizer::new(DirectoryBackend::new(tmp.path()), single_attempt()).finalize(&session).await.unwrap();

    assert!(stale.join(SUMMARY_FILE).exists());
    assert!(!stale.join("notes.txt").exists());
}

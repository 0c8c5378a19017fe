mod common;

use common::{case, id, inspector, started, vehicle};
use serde_json::json;
use vaudit_events::EventReceiverExt;
use vaudit_inspection::{
    CounterDriftDetected, InspectionError, InspectionSession, PassClosed, ResultTally, RetryPrompt, Transition,
};
use vaudit_kernel::domain::config::InspectionConfig;
use vaudit_kernel::domain::{Domain, DomainCounters, Verdict};
use vaudit_storage::{MemoryStore, PersistedStore};

fn counters(pending: u32, ok: u32, notok: u32) -> DomainCounters {
    DomainCounters { pending, ok, notok }
}

#[tokio::test]
async fn initialize_seeds_every_record() {
    let session = started(InspectionConfig::default()).await;

    let record = session.session().await.unwrap();
    assert_eq!(record.session_id.len(), 12);
    assert_eq!(record.vehicle.case_spec, "XUV7-AT");
    assert_eq!(record.total(Domain::Exterior), 2);

    let all = session.all_counters().await.unwrap();
    assert_eq!(all[&Domain::Interior], DomainCounters::seeded(1));
    assert_eq!(all[&Domain::Exterior], DomainCounters::seeded(2));
    assert_eq!(all[&Domain::Loose], DomainCounters::seeded(2));

    let tyre = session.status(Domain::Exterior, &id("Tyre")).await.unwrap();
    assert_eq!(tyre.parts.len(), 4);
    assert_eq!(tyre.overall, Verdict::Pending);
    assert_eq!(session.tally(Domain::Exterior, &id("Tyre")).await.unwrap(), ResultTally::default());
    assert_eq!(session.retry_state().await.unwrap().count, 0);
}

#[tokio::test]
async fn initialize_twice_is_rejected() {
    let session = started(InspectionConfig::default()).await;
    let err = session.initialize(vehicle(), inspector(), &case()).await.unwrap_err();
    assert!(matches!(err, InspectionError::AlreadyInitialized { .. }));
}

#[tokio::test]
async fn replace_validates_before_dropping_the_open_session() {
    let session = started(InspectionConfig::default()).await;
    let seat = id("Seat");
    session.begin_pass(Domain::Interior, &seat).await.unwrap();
    session.record_ok(Domain::Interior, &seat, 0).await.unwrap();
    let open = session.session().await.unwrap();

    let mut broken = case();
    broken.loose.insert(id("Wheel Spanner"), common::spec("Wheel Spanner", &[]));
    let err = session.replace(vehicle(), inspector(), &broken).await.unwrap_err();
    assert!(matches!(err, InspectionError::InvalidCatalog { .. }));
    assert_eq!(session.session().await.unwrap(), open);
    assert_eq!(session.counters(Domain::Interior).await.unwrap(), counters(0, 1, 0));

    let mut smaller = case();
    smaller.exterior.remove(&id("Tyre"));
    let fresh = session.replace(vehicle(), inspector(), &smaller).await.unwrap();
    assert_ne!(fresh.session_id, open.session_id);
    assert_eq!(session.counters(Domain::Interior).await.unwrap(), DomainCounters::seeded(1));
    assert_eq!(session.counters(Domain::Exterior).await.unwrap(), DomainCounters::seeded(1));
    assert!(matches!(
        session.begin_pass(Domain::Exterior, &id("Tyre")).await,
        Err(InspectionError::UnknownComponent { .. })
    ));
    assert!(session.check_consistency().await.unwrap().is_empty());
}

#[tokio::test]
async fn transitions_require_a_session() {
    let session = InspectionSession::new(MemoryStore::new(), InspectionConfig::default());
    let err = session.begin_pass(Domain::Interior, &id("Seat")).await.unwrap_err();
    assert!(matches!(err, InspectionError::NotInitialized { .. }));
}

#[tokio::test]
async fn single_part_ok_closes_the_pass() {
    let session = started(InspectionConfig::default()).await;
    let seat = id("Seat");

    let part = session.begin_pass(Domain::Interior, &seat).await.unwrap();
    assert_eq!(part.index, 0);
    assert_eq!(part.reference_image.as_deref(), Some("Seat_Front.jpg"));
    assert!(part.last);

    let transition = session.record_ok(Domain::Interior, &seat, 0).await.unwrap();
    assert_eq!(
        transition,
        Transition::PassClosed { overall: Verdict::Ok, tally: ResultTally { ok: 1, notok: 0 } }
    );
    assert_eq!(session.counters(Domain::Interior).await.unwrap(), counters(0, 1, 0));
    assert_eq!(session.tally(Domain::Interior, &seat).await.unwrap(), ResultTally { ok: 1, notok: 0 });
}

#[tokio::test]
async fn retaken_failure_does_not_taint_the_pass() {
    let session = started(InspectionConfig::default()).await;
    let tyre = id("Tyre");
    session.begin_pass(Domain::Exterior, &tyre).await.unwrap();

    let prompt = session.register_failure(Domain::Exterior, &tyre, 0).await.unwrap();
    assert_eq!(prompt, RetryPrompt::Retake);
    assert_eq!(session.retry_state().await.unwrap().count, 1);

    for part in 0..3 {
        let next = session.record_ok(Domain::Exterior, &tyre, part).await.unwrap();
        assert!(matches!(next, Transition::NextPart(ref p) if p.index == part + 1));
        assert_eq!(session.retry_state().await.unwrap().count, 0);
        let status = session.status(Domain::Exterior, &tyre).await.unwrap();
        assert_eq!(status.overall, Verdict::Pending);
    }

    let closed = session.record_ok(Domain::Exterior, &tyre, 3).await.unwrap();
    assert_eq!(
        closed,
        Transition::PassClosed { overall: Verdict::Ok, tally: ResultTally { ok: 4, notok: 0 } }
    );
    assert_eq!(session.counters(Domain::Exterior).await.unwrap(), counters(1, 1, 0));
}

#[tokio::test]
async fn bypassed_part_keeps_the_component_notok() {
    let session = started(InspectionConfig::default()).await;
    let mirror = id("Mirror");
    session.begin_pass(Domain::Exterior, &mirror).await.unwrap();

    assert_eq!(session.register_failure(Domain::Exterior, &mirror, 0).await.unwrap(), RetryPrompt::Retake);
    assert_eq!(
        session.register_failure(Domain::Exterior, &mirror, 0).await.unwrap(),
        RetryPrompt::RetakeOrBypass
    );

    let next = session.bypass(Domain::Exterior, &mirror, 0, "0000").await.unwrap();
    assert!(matches!(next, Transition::NextPart(ref p) if p.index == 1 && p.label == "Right"));

    let status = session.status(Domain::Exterior, &mirror).await.unwrap();
    assert_eq!(status.overall, Verdict::NotOk, "locked immediately");
    assert_eq!(status.part(0), Verdict::NotOk);
    assert_eq!(status.part(1), Verdict::Pending);
    assert_eq!(session.counters(Domain::Exterior).await.unwrap(), counters(2, 0, 0));

    let closed = session.record_ok(Domain::Exterior, &mirror, 1).await.unwrap();
    assert_eq!(
        closed,
        Transition::PassClosed { overall: Verdict::NotOk, tally: ResultTally { ok: 1, notok: 1 } }
    );
    assert_eq!(session.counters(Domain::Exterior).await.unwrap(), counters(1, 0, 1));
}

#[tokio::test]
async fn bypass_on_the_last_part_closes_notok() {
    let session = started(InspectionConfig::default()).await;
    let jack = id("Jack");
    session.begin_pass(Domain::Loose, &jack).await.unwrap();
    session.register_failure(Domain::Loose, &jack, 0).await.unwrap();
    session.register_failure(Domain::Loose, &jack, 0).await.unwrap();

    let closed = session.bypass(Domain::Loose, &jack, 0, "0000").await.unwrap();
    assert_eq!(
        closed,
        Transition::PassClosed { overall: Verdict::NotOk, tally: ResultTally { ok: 0, notok: 1 } }
    );
    assert_eq!(session.counters(Domain::Loose).await.unwrap(), counters(1, 0, 1));
    assert_eq!(session.retry_state().await.unwrap().count, 0);
}

#[tokio::test]
async fn repeated_close_is_ignored() {
    let session = started(InspectionConfig::default()).await;
    let seat = id("Seat");
    session.begin_pass(Domain::Interior, &seat).await.unwrap();
    session.record_ok(Domain::Interior, &seat, 0).await.unwrap();

    let again = session.record_ok(Domain::Interior, &seat, 0).await.unwrap();
    assert_eq!(again, Transition::AlreadyClosed { overall: Verdict::Ok });
    assert_eq!(session.counters(Domain::Interior).await.unwrap(), counters(0, 1, 0));
    assert_eq!(session.tally(Domain::Interior, &seat).await.unwrap(), ResultTally { ok: 1, notok: 0 });
}

#[tokio::test]
async fn same_part_recorded_twice_counts_once() {
    let session = started(InspectionConfig::default()).await;
    let mirror = id("Mirror");
    session.begin_pass(Domain::Exterior, &mirror).await.unwrap();
    session.record_ok(Domain::Exterior, &mirror, 0).await.unwrap();
    session.record_ok(Domain::Exterior, &mirror, 0).await.unwrap();

    let closed = session.record_ok(Domain::Exterior, &mirror, 1).await.unwrap();
    assert_eq!(
        closed,
        Transition::PassClosed { overall: Verdict::Ok, tally: ResultTally { ok: 2, notok: 0 } }
    );
}

#[tokio::test]
async fn concurrent_duplicate_closes_count_once() {
    let session = started(InspectionConfig::default()).await;
    let seat = id("Seat");
    session.begin_pass(Domain::Interior, &seat).await.unwrap();

    let (a, b) = tokio::join!(
        session.record_ok(Domain::Interior, &seat, 0),
        session.record_ok(Domain::Interior, &seat, 0)
    );
    let closes = [a.unwrap(), b.unwrap()]
        .into_iter()
        .filter(|t| matches!(t, Transition::PassClosed { .. }))
        .count();
    assert_eq!(closes, 1);
    assert_eq!(session.counters(Domain::Interior).await.unwrap(), counters(0, 1, 0));
}

#[tokio::test]
async fn reopen_returns_a_failed_component_to_pending() {
    let session = started(InspectionConfig::default()).await;
    let mirror = id("Mirror");
    session.begin_pass(Domain::Exterior, &mirror).await.unwrap();
    session.register_failure(Domain::Exterior, &mirror, 0).await.unwrap();
    session.register_failure(Domain::Exterior, &mirror, 0).await.unwrap();
    session.bypass(Domain::Exterior, &mirror, 0, "0000").await.unwrap();
    session.record_ok(Domain::Exterior, &mirror, 1).await.unwrap();

    let previous = session.reopen(Domain::Exterior, &mirror).await.unwrap();
    assert_eq!(previous, Verdict::NotOk);

    let status = session.status(Domain::Exterior, &mirror).await.unwrap();
    assert_eq!(status.overall, Verdict::Pending);
    assert_eq!(status.part(0), Verdict::NotOk, "part history kept");
    assert_eq!(status.part(1), Verdict::Ok);
    assert_eq!(session.tally(Domain::Exterior, &mirror).await.unwrap(), ResultTally::default());
    assert_eq!(session.counters(Domain::Exterior).await.unwrap(), counters(2, 0, 0));
}

#[tokio::test]
async fn reopen_guards() {
    let session = started(InspectionConfig::default()).await;
    let seat = id("Seat");

    let err = session.reopen(Domain::Interior, &seat).await.unwrap_err();
    assert!(matches!(err, InspectionError::NothingToReopen { .. }));

    session.begin_pass(Domain::Interior, &seat).await.unwrap();
    session.record_ok(Domain::Interior, &seat, 0).await.unwrap();
    let err = session.reopen(Domain::Interior, &seat).await.unwrap_err();
    assert!(matches!(err, InspectionError::ComponentLocked { .. }));
    let err = session.begin_pass(Domain::Interior, &seat).await.unwrap_err();
    assert!(matches!(err, InspectionError::ComponentLocked { .. }));
    assert_eq!(session.counters(Domain::Interior).await.unwrap(), counters(0, 1, 0));

    let err = session.reopen(Domain::Interior, &id("Dashboard")).await.unwrap_err();
    assert!(matches!(err, InspectionError::UnknownComponent { .. }));
}

#[tokio::test]
async fn reopen_ok_when_policy_allows() {
    let mut config = InspectionConfig::default();
    config.reopen.allow_ok = true;
    let session = started(config).await;
    let seat = id("Seat");
    session.begin_pass(Domain::Interior, &seat).await.unwrap();
    session.record_ok(Domain::Interior, &seat, 0).await.unwrap();

    assert_eq!(session.reopen(Domain::Interior, &seat).await.unwrap(), Verdict::Ok);
    assert_eq!(session.counters(Domain::Interior).await.unwrap(), counters(1, 0, 0));
}

#[tokio::test]
async fn begin_pass_reopens_a_bypassed_component() {
    let session = started(InspectionConfig::default()).await;
    let jack = id("Jack");
    session.begin_pass(Domain::Loose, &jack).await.unwrap();
    session.register_failure(Domain::Loose, &jack, 0).await.unwrap();
    session.register_failure(Domain::Loose, &jack, 0).await.unwrap();
    session.bypass(Domain::Loose, &jack, 0, "0000").await.unwrap();

    session.begin_pass(Domain::Loose, &jack).await.unwrap();
    assert_eq!(session.counters(Domain::Loose).await.unwrap(), counters(2, 0, 0));

    let closed = session.record_ok(Domain::Loose, &jack, 0).await.unwrap();
    assert!(matches!(closed, Transition::PassClosed { overall: Verdict::Ok, .. }));
    assert_eq!(session.counters(Domain::Loose).await.unwrap(), counters(1, 1, 0));
}

#[tokio::test]
async fn abandoned_mid_pass_bypass_does_not_drift_counters() {
    let session = started(InspectionConfig::default()).await;
    let mirror = id("Mirror");
    session.begin_pass(Domain::Exterior, &mirror).await.unwrap();
    session.register_failure(Domain::Exterior, &mirror, 0).await.unwrap();
    session.register_failure(Domain::Exterior, &mirror, 0).await.unwrap();
    session.bypass(Domain::Exterior, &mirror, 0, "0000").await.unwrap();

    session.reopen(Domain::Exterior, &mirror).await.unwrap();
    assert_eq!(session.counters(Domain::Exterior).await.unwrap(), counters(2, 0, 0));
    assert!(session.check_consistency().await.unwrap().is_empty());
}

#[tokio::test]
async fn bypass_gating() {
    let session = started(InspectionConfig::default()).await;
    let mirror = id("Mirror");
    session.begin_pass(Domain::Exterior, &mirror).await.unwrap();

    let err = session.bypass(Domain::Exterior, &mirror, 0, "0000").await.unwrap_err();
    assert!(matches!(err, InspectionError::BypassNotOffered { .. }));

    session.register_failure(Domain::Exterior, &mirror, 0).await.unwrap();
    let err = session.bypass(Domain::Exterior, &mirror, 0, "0000").await.unwrap_err();
    assert!(matches!(err, InspectionError::BypassNotOffered { .. }), "only after the second failure");

    session.register_failure(Domain::Exterior, &mirror, 0).await.unwrap();
    let err = session.bypass(Domain::Exterior, &mirror, 1, "0000").await.unwrap_err();
    assert!(matches!(err, InspectionError::BypassNotOffered { .. }), "offer is scoped to the part");

    let before = session.retry_state().await.unwrap();
    for _ in 0..5 {
        let err = session.bypass(Domain::Exterior, &mirror, 0, "1234").await.unwrap_err();
        assert!(matches!(err, InspectionError::BypassDenied { .. }));
    }
    assert_eq!(session.retry_state().await.unwrap(), before, "wrong PIN writes nothing");
    assert_eq!(session.status(Domain::Exterior, &mirror).await.unwrap().overall, Verdict::Pending);

    assert!(session.bypass(Domain::Exterior, &mirror, 0, "0000").await.is_ok());
}

#[tokio::test]
async fn bypass_lockout_when_configured() {
    let mut config = InspectionConfig::default();
    config.bypass.max_attempts = Some(2);
    config.bypass.pin = "7391".into();
    let session = started(config).await;
    let jack = id("Jack");
    session.begin_pass(Domain::Loose, &jack).await.unwrap();
    session.register_failure(Domain::Loose, &jack, 0).await.unwrap();
    session.register_failure(Domain::Loose, &jack, 0).await.unwrap();

    for _ in 0..2 {
        let err = session.bypass(Domain::Loose, &jack, 0, "0000").await.unwrap_err();
        assert!(matches!(err, InspectionError::BypassDenied { .. }));
    }
    let err = session.bypass(Domain::Loose, &jack, 0, "7391").await.unwrap_err();
    assert!(matches!(err, InspectionError::BypassLocked { .. }));
    assert!(err.is_rejection());
    assert_eq!(session.counters(Domain::Loose).await.unwrap(), counters(2, 0, 0));
}

#[tokio::test]
async fn failures_on_a_closed_pass_are_rejected() {
    let session = started(InspectionConfig::default()).await;
    let seat = id("Seat");
    session.begin_pass(Domain::Interior, &seat).await.unwrap();
    session.record_ok(Domain::Interior, &seat, 0).await.unwrap();

    let err = session.register_failure(Domain::Interior, &seat, 0).await.unwrap_err();
    assert!(matches!(err, InspectionError::PassAlreadyClosed { .. }));
    let err = session.record_ok(Domain::Interior, &seat, 1).await.unwrap_err();
    assert!(matches!(err, InspectionError::PartOutOfRange { .. }));
}

#[tokio::test]
async fn drift_is_detected_and_repaired() {
    let session = started(InspectionConfig::default()).await;
    let mut drift_rx = session.events().subscribe::<CounterDriftDetected>().unwrap();

    let key = vaudit_inspection::RecordKey::Counters(Domain::Loose).store_key().unwrap();
    session.repository().store().put(key, json!({ "pending": 0, "ok": 5, "notok": 0 })).await.unwrap();

    let drift = session.check_consistency().await.unwrap();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].domain, Domain::Loose);
    assert_eq!(drift[0].recomputed, DomainCounters::seeded(2));
    assert_eq!(session.counters(Domain::Loose).await.unwrap(), DomainCounters::seeded(2));

    let event = drift_rx.next_event().await.unwrap();
    assert_eq!(event.stored, counters(0, 5, 0));
    assert!(session.check_consistency().await.unwrap().is_empty());
}

#[tokio::test]
async fn progress_and_pass_events_follow_commits() {
    let session = started(InspectionConfig::default()).await;
    let mut closed_rx = session.events().subscribe::<PassClosed>().unwrap();
    let mut progress = session.watch_progress().await.unwrap();
    assert_eq!(progress.borrow().overall(), DomainCounters::seeded(5));

    let seat = id("Seat");
    session.begin_pass(Domain::Interior, &seat).await.unwrap();
    session.record_ok(Domain::Interior, &seat, 0).await.unwrap();

    let latest = progress.next_event().await.unwrap();
    assert_eq!(latest.counters[&Domain::Interior], counters(0, 1, 0));
    assert!(!latest.is_complete());

    let event = closed_rx.next_event().await.unwrap();
    assert_eq!(event.component, seat);
    assert_eq!(event.overall, Verdict::Ok);
}

#[tokio::test]
async fn clear_tears_everything_down() {
    let session = started(InspectionConfig::default()).await;
    session.clear().await.unwrap();

    assert!(matches!(session.session().await, Err(InspectionError::NotInitialized { .. })));
    assert_eq!(session.counters(Domain::Exterior).await.unwrap(), DomainCounters::default());
    assert!(session.repository().store().keys().await.unwrap().is_empty());

    session.initialize(vehicle(), inspector(), &case()).await.unwrap();
}

#[tokio::test]
async fn progress_reports_counters_that_do_not_add_up() {
    let session = started(InspectionConfig::default()).await;
    let mut drift_rx = session.events().subscribe::<CounterDriftDetected>().unwrap();

    let key = vaudit_inspection::RecordKey::Counters(Domain::Exterior).store_key().unwrap();
    session.repository().store().put(key, json!({ "pending": 2, "ok": 1, "notok": 0 })).await.unwrap();

    let progress = session.progress().await.unwrap();
    assert_eq!(progress.counters[&Domain::Exterior], counters(2, 1, 0), "reported as stored");
    let event = drift_rx.next_event().await.unwrap();
    assert_eq!(event.domain, Domain::Exterior);
    assert_eq!(event.recomputed, DomainCounters::seeded(2));

    assert_eq!(session.check_consistency().await.unwrap().len(), 1);
    drift_rx.next_event().await.unwrap();
    session.progress().await.unwrap();
    assert!(drift_rx.try_recv().is_err(), "nothing left to report");
}

#[tokio::test]
async fn overview_counters_match_its_verdicts() {
    let session = started(InspectionConfig::default()).await;
    let jack = id("Jack");
    session.begin_pass(Domain::Loose, &jack).await.unwrap();

    let (overview, closed) = tokio::join!(session.overview(), session.record_ok(Domain::Loose, &jack, 0));
    closed.unwrap();
    let overview = overview.unwrap();
    assert_eq!(overview.record.vehicle, vehicle());
    for domain in Domain::ALL {
        let ok = overview.verdicts[&domain].values().filter(|v| **v == Verdict::Ok).count();
        assert_eq!(usize::try_from(overview.counters[&domain].ok).unwrap(), ok, "{domain}");
    }
}

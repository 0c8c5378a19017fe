//! # Inspection Session
//!
//! [`InspectionSession`] is the only writer of inspection state. Each transition:
//!
//! 1. takes the session gate, so two transitions never interleave;
//! 2. reads the records it needs through the [`Repository`];
//! 3. computes every new record in memory;
//! 4. commits them as one batch;
//! 5. publishes events for what changed.
//!
//! A transition that is rejected returns before step 4 and leaves the store untouched.

use crate::counters;
use crate::error::InspectionError;
use crate::events::{BypassApplied, ComponentReopened, CounterDriftDetected, InspectionProgress, PassClosed};
use crate::registry::{ComponentRegistry, PartRef};
use crate::repository::{Changes, RecordKey, Repository};
use crate::retry::{PartCursor, RetryPrompt, RetryState};
use crate::status::ComponentStatus;
use crate::tally::{ResultTally, SessionTally};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use vaudit_events::{Event, EventBus};
use vaudit_kernel::domain::config::InspectionConfig;
use vaudit_kernel::domain::{CaseConfiguration, ComponentId, Domain, DomainCounters, Inspector, Verdict, VehicleIdentity};
use vaudit_kernel::safe_nanoid;
use vaudit_storage::PersistedStore;

/// Immutable facts of one inspection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub vehicle: VehicleIdentity,
    pub inspector: Inspector,
    pub started_at: DateTime<Utc>,
    /// Number of catalogued components per domain.
    pub totals: BTreeMap<Domain, u32>,
}

impl SessionRecord {
    #[must_use]
    pub fn total(&self, domain: Domain) -> u32 {
        self.totals.get(&domain).copied().unwrap_or_default()
    }
}

/// Everything a final report needs, read under one gate hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOverview {
    pub record: SessionRecord,
    pub counters: BTreeMap<Domain, DomainCounters>,
    pub verdicts: BTreeMap<Domain, BTreeMap<ComponentId, Verdict>>,
}

/// Result of recording a part outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    /// The pass continues with this part.
    NextPart(PartRef),
    /// The last part was recorded and the component was counted.
    PassClosed { overall: Verdict, tally: ResultTally },
    /// The pass had already been closed; nothing was written.
    AlreadyClosed { overall: Verdict },
}

#[derive(Debug)]
pub struct InspectionSession<S> {
    repo: Repository<S>,
    config: InspectionConfig,
    bus: EventBus,
    gate: Mutex<()>,
}

impl<S: PersistedStore> InspectionSession<S> {
    /// Opens the session stored in `store` (initialized or not) with a private event bus.
    pub fn new(store: S, config: InspectionConfig) -> Self {
        Self { repo: Repository::new(store), config, bus: EventBus::new(), gate: Mutex::new(()) }
    }

    /// Publishes events on a shared bus instead.
    #[must_use]
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    pub const fn events(&self) -> &EventBus {
        &self.bus
    }

    pub const fn config(&self) -> &InspectionConfig {
        &self.config
    }

    pub const fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    // --- Lifecycle ---

    /// Seeds a new session from a verified vehicle identity and its case configuration.
    ///
    /// # Errors
    /// - [`InspectionError::AlreadyInitialized`] when a session exists;
    /// - [`InspectionError::InvalidCatalog`] when the case configuration is unusable;
    /// - storage failures.
    pub async fn initialize(
        &self,
        vehicle: VehicleIdentity,
        inspector: Inspector,
        case: &CaseConfiguration,
    ) -> Result<SessionRecord, InspectionError> {
        let _gate = self.gate.lock().await;

        if let Some(existing) = self.repo.read_opt::<SessionRecord>(&RecordKey::Session).await? {
            return Err(InspectionError::AlreadyInitialized {
                message: format!("session {} is still open", existing.session_id).into(),
                context: None,
            });
        }

        let (record, changes) = Self::seed(vehicle, inspector, case)?;
        self.repo.commit(changes).await?;
        self.started(&record).await;
        Ok(record)
    }

    /// Starts a new session in place of whatever is stored, in one commit.
    ///
    /// The catalog is validated before anything is written, so an unusable catalog leaves the
    /// current session as it was.
    ///
    /// # Errors
    /// [`InspectionError::InvalidCatalog`], storage failures.
    pub async fn replace(
        &self,
        vehicle: VehicleIdentity,
        inspector: Inspector,
        case: &CaseConfiguration,
    ) -> Result<SessionRecord, InspectionError> {
        let _gate = self.gate.lock().await;

        let (record, seeded) = Self::seed(vehicle, inspector, case)?;
        let previous = self.repo.read_opt::<SessionRecord>(&RecordKey::Session).await?;
        let stale = self.repo.store().keys().await?;
        self.repo.commit(Changes::new().delete(stale).merge(seeded)).await?;

        if let Some(previous) = previous {
            warn!(previous = %previous.session_id, session_id = %record.session_id, "Open session replaced");
        }
        self.started(&record).await;
        Ok(record)
    }

    /// Builds the record and every seed write of a new session without touching the store.
    fn seed(
        vehicle: VehicleIdentity,
        inspector: Inspector,
        case: &CaseConfiguration,
    ) -> Result<(SessionRecord, Changes), InspectionError> {
        let registries = ComponentRegistry::from_case(case)?;
        let mut totals = BTreeMap::new();
        let mut changes = Changes::new();

        for (&domain, registry) in &registries {
            let total = u32::try_from(registry.len()).map_err(|_| InspectionError::InvalidCatalog {
                message: format!("{domain} has too many components").into(),
                context: None,
            })?;
            totals.insert(domain, total);

            changes = changes
                .put(&RecordKey::Registry(domain), registry)?
                .put(&RecordKey::Counters(domain), &DomainCounters::seeded(total))?;
            for (id, spec) in registry.iter() {
                changes = changes
                    .put(&RecordKey::Status(domain, id.clone()), &ComponentStatus::seeded(spec.part_count()))?
                    .put(&RecordKey::Tally(domain, id.clone()), &ResultTally::default())?;
            }
        }

        let record = SessionRecord {
            session_id: safe_nanoid!(),
            vehicle,
            inspector,
            started_at: Utc::now(),
            totals,
        };
        changes = changes
            .put(&RecordKey::Session, &record)?
            .put(&RecordKey::SessionTally, &SessionTally::default())?
            .put(&RecordKey::Retry, &RetryState::default())?;
        Ok((record, changes))
    }

    async fn started(&self, record: &SessionRecord) {
        info!(
            session_id = %record.session_id,
            vin = %record.vehicle.full_vin,
            case_spec = %record.vehicle.case_spec,
            interior = record.total(Domain::Interior),
            exterior = record.total(Domain::Exterior),
            loose = record.total(Domain::Loose),
            "Inspection session initialized"
        );
        self.publish_progress().await;
    }

    /// Drops every record of the session.
    ///
    /// # Errors
    /// Storage failures.
    pub async fn clear(&self) -> Result<(), InspectionError> {
        let _gate = self.gate.lock().await;
        self.repo.clear().await?;
        info!("Inspection session cleared");
        self.emit_watch(InspectionProgress::default());
        Ok(())
    }

    // --- Transitions ---

    /// Starts a pass over a component at its first part.
    ///
    /// A component whose previous pass left a verdict is reopened first, under the reopen policy.
    ///
    /// # Errors
    /// Unknown component, [`InspectionError::ComponentLocked`], storage failures.
    pub async fn begin_pass(&self, domain: Domain, id: &ComponentId) -> Result<PartRef, InspectionError> {
        let _gate = self.gate.lock().await;
        self.repo.session().await?;

        let first = self.repo.registry(domain).await?.part(domain, id, 0)?;
        let mut status = self.repo.status(domain, id).await?;
        let mut changes = Changes::new();
        let mut reopened = None;

        if status.overall.is_resolved() || status.closed {
            let mut counters = self.repo.counters(domain).await?;
            let previous = self.reopen_in_place(domain, id, &mut status, &mut counters)?;
            changes = changes
                .put(&RecordKey::Status(domain, id.clone()), &status)?
                .put(&RecordKey::Counters(domain), &counters)?
                .put(&RecordKey::Tally(domain, id.clone()), &ResultTally::default())?;
            reopened = Some(previous);
        }

        changes = changes
            .put(&RecordKey::SessionTally, &SessionTally::begin(domain, id.clone()))?
            .put(&RecordKey::Retry, &RetryState::default())?;
        self.repo.commit(changes).await?;

        info!(%domain, component = %id, first_part = %first.label, "Pass started");
        if let Some(previous) = reopened {
            self.emit(ComponentReopened { domain, component: id.clone(), previous });
            self.publish_progress().await;
        }
        Ok(first)
    }

    /// Records a successful verification of `part` and closes the pass on the last part.
    ///
    /// # Errors
    /// Unknown component or part, storage failures.
    pub async fn record_ok(&self, domain: Domain, id: &ComponentId, part: usize) -> Result<Transition, InspectionError> {
        let _gate = self.gate.lock().await;
        self.repo.session().await?;

        let next = self.next_part(domain, id, part).await?;
        let mut status = self.repo.status(domain, id).await?;
        if status.closed {
            debug!(%domain, component = %id, part, "Pass already closed, ignoring outcome");
            return Ok(Transition::AlreadyClosed { overall: status.overall });
        }

        let mut tally = self.repo.session_tally().await?;
        status.record_part(part, Verdict::Ok);
        tally.record(domain, id, part, Verdict::Ok);
        debug!(%domain, component = %id, part, "Part recorded ok");

        self.advance(domain, id, next, status, tally, Verdict::Ok).await
    }

    /// Registers a failed verification that was not bypassed and returns the prompt to show.
    ///
    /// Part verdicts and tallies are not touched: the worker is expected to retake the photo.
    ///
    /// # Errors
    /// Unknown component or part, [`InspectionError::PassAlreadyClosed`], storage failures.
    pub async fn register_failure(
        &self,
        domain: Domain,
        id: &ComponentId,
        part: usize,
    ) -> Result<RetryPrompt, InspectionError> {
        let _gate = self.gate.lock().await;
        self.repo.session().await?;

        self.repo.registry(domain).await?.part(domain, id, part)?;
        self.ensure_open(domain, id).await?;

        let mut retry = self.repo.retry().await?;
        let prompt = retry.register_failure(PartCursor { domain, component: id.clone(), part });
        self.repo.commit(Changes::new().put(&RecordKey::Retry, &retry)?).await?;

        info!(%domain, component = %id, part, attempts = retry.count, ?prompt, "Verification failed");
        Ok(prompt)
    }

    /// Supervisor override: resolves `part` as `notok` and locks the component to `notok`.
    ///
    /// # Errors
    /// - [`InspectionError::BypassNotOffered`] before the retake-or-bypass prompt for this part;
    /// - [`InspectionError::BypassLocked`] after too many wrong PINs;
    /// - [`InspectionError::BypassDenied`] on a wrong PIN;
    /// - unknown component or part, [`InspectionError::PassAlreadyClosed`], storage failures.
    pub async fn bypass(
        &self,
        domain: Domain,
        id: &ComponentId,
        part: usize,
        pin: &str,
    ) -> Result<Transition, InspectionError> {
        let _gate = self.gate.lock().await;
        self.repo.session().await?;

        let next = self.next_part(domain, id, part).await?;
        let mut status = self.ensure_open(domain, id).await?;

        let mut retry = self.repo.retry().await?;
        let cursor = PartCursor { domain, component: id.clone(), part };
        if !retry.bypass_offered_for(&cursor) {
            return Err(InspectionError::BypassNotOffered {
                message: format!("{domain}/{id} part {part}").into(),
                context: None,
            });
        }
        let max_attempts = self.config.bypass.max_attempts;
        if retry.is_locked(&cursor, max_attempts) {
            return Err(InspectionError::BypassLocked {
                message: format!("{} wrong PIN(s) on {domain}/{id} part {part}", retry.wrong_pins).into(),
                context: None,
            });
        }
        if pin != self.config.bypass.pin {
            warn!(%domain, component = %id, part, "Bypass PIN rejected");
            if max_attempts.is_some() {
                retry.wrong_pins += 1;
                self.repo.commit(Changes::new().put(&RecordKey::Retry, &retry)?).await?;
            }
            return Err(InspectionError::BypassDenied {
                message: "PIN does not match".into(),
                context: None,
            });
        }

        let mut tally = self.repo.session_tally().await?;
        status.record_part(part, Verdict::NotOk);
        status.lock_notok();
        tally.record(domain, id, part, Verdict::NotOk);
        info!(%domain, component = %id, part, "Part bypassed as notok");

        let transition = self.advance(domain, id, next, status, tally, Verdict::NotOk).await?;
        self.emit(BypassApplied { domain, component: id.clone(), part });
        Ok(transition)
    }

    /// Returns a component with a verdict to `pending` so it can be inspected again.
    /// Returns the verdict it had.
    ///
    /// # Errors
    /// - [`InspectionError::NothingToReopen`] for a component that has no verdict;
    /// - [`InspectionError::ComponentLocked`] for an `ok` component unless policy allows it;
    /// - unknown component, storage failures.
    pub async fn reopen(&self, domain: Domain, id: &ComponentId) -> Result<Verdict, InspectionError> {
        let _gate = self.gate.lock().await;
        self.repo.session().await?;

        self.repo.registry(domain).await?.spec(domain, id)?;
        let mut status = self.repo.status(domain, id).await?;
        if !status.overall.is_resolved() && !status.closed {
            return Err(InspectionError::NothingToReopen {
                message: format!("{domain}/{id} is pending").into(),
                context: None,
            });
        }

        let mut counters = self.repo.counters(domain).await?;
        let previous = self.reopen_in_place(domain, id, &mut status, &mut counters)?;
        let changes = Changes::new()
            .put(&RecordKey::Status(domain, id.clone()), &status)?
            .put(&RecordKey::Counters(domain), &counters)?
            .put(&RecordKey::Tally(domain, id.clone()), &ResultTally::default())?
            .put(&RecordKey::SessionTally, &SessionTally::default())?
            .put(&RecordKey::Retry, &RetryState::default())?;
        self.repo.commit(changes).await?;

        self.emit(ComponentReopened { domain, component: id.clone(), previous });
        self.publish_progress().await;
        Ok(previous)
    }

    /// Checks every domain's counters against the component statuses and rewrites those that
    /// drifted. Returns the drift found, empty when everything adds up.
    ///
    /// # Errors
    /// Storage failures.
    pub async fn check_consistency(&self) -> Result<Vec<CounterDriftDetected>, InspectionError> {
        let _gate = self.gate.lock().await;
        let session = self.repo.session().await?;

        let mut drift = Vec::new();
        let mut changes = Changes::new();
        for domain in Domain::ALL {
            let statuses = self.statuses_unlocked(domain).await?;
            let stored = self.repo.counters(domain).await?;
            let recomputed = counters::recompute(statuses.values());

            if !counters::is_closed_over(&stored, session.total(domain)) {
                warn!(%domain, ?stored, total = session.total(domain), "Counters do not add up");
            }
            if stored != recomputed {
                warn!(%domain, ?stored, ?recomputed, "Counter drift detected, rewriting");
                changes = changes.put(&RecordKey::Counters(domain), &recomputed)?;
                drift.push(CounterDriftDetected { domain, stored, recomputed });
            }
        }

        if drift.is_empty() {
            debug!("Counters consistent");
            return Ok(drift);
        }
        self.repo.commit(changes).await?;
        for event in &drift {
            self.emit(event.clone());
        }
        self.publish_progress().await;
        Ok(drift)
    }

    // --- Queries ---

    /// # Errors
    /// [`InspectionError::NotInitialized`], storage failures.
    pub async fn session(&self) -> Result<SessionRecord, InspectionError> {
        self.repo.session().await
    }

    /// # Errors
    /// Storage failures.
    pub async fn registry(&self, domain: Domain) -> Result<ComponentRegistry, InspectionError> {
        self.repo.registry(domain).await
    }

    /// # Errors
    /// Storage failures.
    pub async fn status(&self, domain: Domain, id: &ComponentId) -> Result<ComponentStatus, InspectionError> {
        self.repo.status(domain, id).await
    }

    /// Status of every catalogued component of `domain`.
    ///
    /// # Errors
    /// Storage failures.
    pub async fn statuses(&self, domain: Domain) -> Result<BTreeMap<ComponentId, ComponentStatus>, InspectionError> {
        let _gate = self.gate.lock().await;
        self.statuses_unlocked(domain).await
    }

    /// # Errors
    /// Storage failures.
    pub async fn tally(&self, domain: Domain, id: &ComponentId) -> Result<ResultTally, InspectionError> {
        self.repo.tally(domain, id).await
    }

    /// # Errors
    /// Storage failures.
    pub async fn counters(&self, domain: Domain) -> Result<DomainCounters, InspectionError> {
        self.repo.counters(domain).await
    }

    /// # Errors
    /// Storage failures.
    pub async fn all_counters(&self) -> Result<BTreeMap<Domain, DomainCounters>, InspectionError> {
        let _gate = self.gate.lock().await;
        self.all_counters_unlocked().await
    }

    /// # Errors
    /// Storage failures.
    pub async fn retry_state(&self) -> Result<RetryState, InspectionError> {
        self.repo.retry().await
    }

    /// # Errors
    /// Storage failures.
    pub async fn session_tally(&self) -> Result<SessionTally, InspectionError> {
        self.repo.session_tally().await
    }

    /// # Errors
    /// Storage failures.
    ///
    /// Counters that do not add up to the catalog size are reported as [`CounterDriftDetected`]
    /// but returned as stored; [`check_consistency`] repairs them.
    ///
    /// [`check_consistency`]: Self::check_consistency
    pub async fn progress(&self) -> Result<InspectionProgress, InspectionError> {
        let _gate = self.gate.lock().await;
        let all = self.all_counters_unlocked().await?;
        if let Some(record) = self.repo.read_opt::<SessionRecord>(&RecordKey::Session).await? {
            for (&domain, &stored) in &all {
                if counters::is_closed_over(&stored, record.total(domain)) {
                    continue;
                }
                let recomputed = counters::recompute(self.statuses_unlocked(domain).await?.values());
                warn!(%domain, ?stored, ?recomputed, total = record.total(domain), "Counters do not add up");
                self.emit(CounterDriftDetected { domain, stored, recomputed });
            }
        }
        Ok(InspectionProgress { counters: all })
    }

    /// Live progress, updated after every transition that moves a counter.
    ///
    /// # Errors
    /// Storage failures, or an event bus that already binds the progress type to another kind.
    pub async fn watch_progress(&self) -> Result<watch::Receiver<Arc<InspectionProgress>>, InspectionError> {
        let current = self.progress().await?;
        self.bus.watch(current).map_err(|e| InspectionError::Internal {
            message: e.to_string().into(),
            context: Some("Progress subscription".into()),
        })
    }

    /// Overall verdict of every catalogued component, by domain.
    ///
    /// # Errors
    /// Storage failures.
    pub async fn overall_verdicts(&self) -> Result<BTreeMap<Domain, BTreeMap<ComponentId, Verdict>>, InspectionError> {
        let _gate = self.gate.lock().await;
        self.verdicts_unlocked().await
    }

    /// Session record, counters and verdicts as of one instant.
    ///
    /// # Errors
    /// [`InspectionError::NotInitialized`], storage failures.
    pub async fn overview(&self) -> Result<SessionOverview, InspectionError> {
        let _gate = self.gate.lock().await;
        Ok(SessionOverview {
            record: self.repo.session().await?,
            counters: self.all_counters_unlocked().await?,
            verdicts: self.verdicts_unlocked().await?,
        })
    }

    // --- Internals ---

    /// Validates `part` and resolves the part after it, `None` when `part` is the last one.
    async fn next_part(&self, domain: Domain, id: &ComponentId, part: usize) -> Result<Option<PartRef>, InspectionError> {
        let registry = self.repo.registry(domain).await?;
        let current = registry.part(domain, id, part)?;
        if current.last { Ok(None) } else { registry.part(domain, id, part + 1).map(Some) }
    }

    /// Stages the records of a recorded part and closes the pass if it was the last one.
    async fn advance(
        &self,
        domain: Domain,
        id: &ComponentId,
        next: Option<PartRef>,
        mut status: ComponentStatus,
        tally: SessionTally,
        verdict: Verdict,
    ) -> Result<Transition, InspectionError> {
        let status_key = RecordKey::Status(domain, id.clone());
        let reset_retry = RetryState::default();

        if let Some(next) = next {
            let changes = Changes::new()
                .put(&status_key, &status)?
                .put(&RecordKey::SessionTally, &tally)?
                .put(&RecordKey::Retry, &reset_retry)?;
            self.repo.commit(changes).await?;
            return Ok(Transition::NextPart(next));
        }

        let mut counters = self.repo.counters(domain).await?;
        let overall = status.close_pass(verdict);
        counters::on_pass_closed(&mut counters, overall);
        let result = tally.to_result();

        let changes = Changes::new()
            .put(&status_key, &status)?
            .put(&RecordKey::Counters(domain), &counters)?
            .put(&RecordKey::Tally(domain, id.clone()), &result)?
            .put(&RecordKey::SessionTally, &SessionTally::default())?
            .put(&RecordKey::Retry, &reset_retry)?;
        self.repo.commit(changes).await?;

        info!(%domain, component = %id, %overall, ok = result.ok, notok = result.notok, "Pass closed");
        self.emit(PassClosed { domain, component: id.clone(), overall, tally: result });
        self.publish_progress().await;
        Ok(Transition::PassClosed { overall, tally: result })
    }

    /// Applies the reopen policy and moves the component back to pending in memory.
    fn reopen_in_place(
        &self,
        domain: Domain,
        id: &ComponentId,
        status: &mut ComponentStatus,
        counters: &mut DomainCounters,
    ) -> Result<Verdict, InspectionError> {
        let previous = status.overall;
        if previous == Verdict::Ok && !self.config.reopen.allow_ok {
            return Err(InspectionError::ComponentLocked {
                message: format!("{domain}/{id} passed and cannot be reopened").into(),
                context: None,
            });
        }
        let counted = status.reopen();
        counters::on_reopened(counters, counted);
        info!(%domain, component = %id, %previous, counted = %counted, "Component reopened");
        Ok(previous)
    }

    async fn ensure_open(&self, domain: Domain, id: &ComponentId) -> Result<ComponentStatus, InspectionError> {
        let status = self.repo.status(domain, id).await?;
        if status.closed {
            return Err(InspectionError::PassAlreadyClosed {
                message: format!("{domain}/{id} closed as {}", status.overall).into(),
                context: None,
            });
        }
        Ok(status)
    }

    async fn statuses_unlocked(&self, domain: Domain) -> Result<BTreeMap<ComponentId, ComponentStatus>, InspectionError> {
        let registry = self.repo.registry(domain).await?;
        let mut statuses = BTreeMap::new();
        for id in registry.ids() {
            statuses.insert(id.clone(), self.repo.status(domain, id).await?);
        }
        Ok(statuses)
    }

    async fn verdicts_unlocked(&self) -> Result<BTreeMap<Domain, BTreeMap<ComponentId, Verdict>>, InspectionError> {
        let mut verdicts = BTreeMap::new();
        for domain in Domain::ALL {
            let statuses = self.statuses_unlocked(domain).await?;
            verdicts.insert(domain, statuses.into_iter().map(|(id, s)| (id, s.overall)).collect());
        }
        Ok(verdicts)
    }

    async fn all_counters_unlocked(&self) -> Result<BTreeMap<Domain, DomainCounters>, InspectionError> {
        let mut all = BTreeMap::new();
        for domain in Domain::ALL {
            all.insert(domain, self.repo.counters(domain).await?);
        }
        Ok(all)
    }

    async fn publish_progress(&self) {
        match self.all_counters_unlocked().await {
            Ok(counters) => self.emit_watch(InspectionProgress { counters }),
            Err(e) => warn!(error = %e, "Progress snapshot unavailable"),
        }
    }

    fn emit<T: Event>(&self, event: T) {
        if let Err(e) = self.bus.publish(event) {
            warn!(error = %e, "Event not published");
        }
    }

    fn emit_watch<T: Event>(&self, value: T) {
        if let Err(e) = self.bus.publish_watch(value) {
            warn!(error = %e, "Watch value not published");
        }
    }
}

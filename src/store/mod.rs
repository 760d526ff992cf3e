//! In-memory cycle history and the active-cycle pointer.
//!
//! The store is the single source of truth the countdown reads from. Every
//! mutation takes the current wall-clock time as an argument so callers decide
//! where time comes from.

use chrono::{DateTime, Utc};

use crate::{
    error::CycleError,
    log_info,
    models::{Cycle, CycleId},
    validation::{validate, CycleForm},
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Default)]
pub struct CycleStore {
    cycles: Vec<Cycle>,
    active_id: Option<CycleId>,
    seconds_passed: u64,
}

impl CycleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new active cycle started at `now`.
    ///
    /// Rejected without touching the store when the input is invalid or when
    /// another cycle is still active.
    pub fn create_cycle(
        &mut self,
        task: &str,
        minutes_amount: i64,
        now: DateTime<Utc>,
    ) -> Result<CycleId, CycleError> {
        let input = validate(&CycleForm {
            task: task.to_string(),
            minutes_amount,
        })?;

        if self.active_id.is_some() {
            return Err(CycleError::CycleAlreadyActive);
        }

        let cycle = Cycle::begin(input.task().to_string(), input.minutes_amount(), now);
        let id = cycle.id.clone();

        log_info!(
            "Created cycle {} ({} min) for task {:?}",
            id,
            cycle.minutes_amount,
            cycle.task
        );

        self.cycles.push(cycle);
        self.active_id = Some(id.clone());
        self.seconds_passed = 0;
        Ok(id)
    }

    /// Stops the active cycle early. Returns the now-terminal cycle, or `None`
    /// when nothing was active.
    pub fn interrupt_active(&mut self, now: DateTime<Utc>) -> Option<Cycle> {
        let cycle = self.take_active()?;
        cycle.interrupt(now);
        log_info!("Interrupted cycle {}", cycle.id);
        Some(cycle.clone())
    }

    /// Marks the active cycle as having run its full duration and pins the
    /// elapsed counter to the cycle's total. `None` when nothing was active,
    /// which is how a late tick after an interruption ends up doing nothing.
    pub fn mark_active_finished(&mut self, now: DateTime<Utc>) -> Option<Cycle> {
        let cycle = self.take_active()?;
        cycle.finish(now);
        let total = cycle.total_secs();
        let finished = cycle.clone();
        self.seconds_passed = total;
        log_info!("Finished cycle {}", finished.id);
        Some(finished)
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        let id = self.active_id.as_ref()?;
        self.get(id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Cycle> {
        self.cycles.iter().find(|cycle| cycle.id == id)
    }

    /// Full history in insertion order.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn seconds_passed(&self) -> u64 {
        self.seconds_passed
    }

    /// Records a freshly derived elapsed value for the active cycle. Ignored
    /// when idle; never moves the counter backwards.
    pub fn set_seconds_passed(&mut self, secs: u64) {
        if self.active_id.is_some() && secs > self.seconds_passed {
            self.seconds_passed = secs;
        }
    }

    fn take_active(&mut self) -> Option<&mut Cycle> {
        let id = self.active_id.take()?;
        self.cycles.iter_mut().find(|cycle| cycle.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleStatus;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn active_count(store: &CycleStore) -> usize {
        store
            .cycles()
            .iter()
            .filter(|c| c.status() == CycleStatus::Active)
            .count()
    }

    #[test]
    fn create_sets_active_and_resets_counter() {
        let mut store = CycleStore::new();
        let id = store.create_cycle("write", 5, t0()).unwrap();

        let active = store.active_cycle().unwrap();
        assert_eq!(active.id, id);
        assert_eq!(active.started_at, t0());
        assert_eq!(active.total_secs(), 300);
        assert_eq!(store.seconds_passed(), 0);
    }

    #[test]
    fn invalid_input_leaves_store_untouched() {
        let mut store = CycleStore::new();
        let err = store.create_cycle("", 5, t0()).unwrap_err();
        assert!(matches!(err, CycleError::Validation(_)));
        let err = store.create_cycle("write", 61, t0()).unwrap_err();
        assert!(matches!(err, CycleError::Validation(_)));
        assert!(store.cycles().is_empty());
        assert!(store.active_cycle().is_none());
    }

    #[test]
    fn whitespace_task_is_stored_as_typed() {
        let mut store = CycleStore::new();
        let id = store.create_cycle("  review  ", 5, t0()).unwrap();
        assert_eq!(store.get(&id).unwrap().task, "  review  ");
        store.interrupt_active(t0() + Duration::seconds(1));

        let id = store.create_cycle("   ", 5, t0() + Duration::seconds(2)).unwrap();
        assert_eq!(store.get(&id).unwrap().task, "   ");
    }

    #[test]
    fn create_while_active_is_rejected() {
        let mut store = CycleStore::new();
        let first = store.create_cycle("one", 5, t0()).unwrap();
        store.set_seconds_passed(42);

        let err = store
            .create_cycle("two", 5, t0() + Duration::seconds(42))
            .unwrap_err();
        assert_eq!(err, CycleError::CycleAlreadyActive);
        assert_eq!(store.cycles().len(), 1);
        assert_eq!(store.active_id(), Some(first.as_str()));
        assert_eq!(store.seconds_passed(), 42);
    }

    #[test]
    fn interrupt_is_idempotent() {
        let mut store = CycleStore::new();
        let id = store.create_cycle("write", 5, t0()).unwrap();

        let at = t0() + Duration::seconds(30);
        let interrupted = store.interrupt_active(at).unwrap();
        assert_eq!(interrupted.interrupted_at, Some(at));
        assert!(store.active_cycle().is_none());

        assert!(store.interrupt_active(at + Duration::seconds(1)).is_none());
        let cycle = store.get(&id).unwrap();
        assert_eq!(cycle.interrupted_at, Some(at));
        assert!(cycle.finished_at.is_none());
    }

    #[test]
    fn finish_after_interrupt_is_noop() {
        let mut store = CycleStore::new();
        let id = store.create_cycle("write", 1, t0()).unwrap();
        store.interrupt_active(t0() + Duration::seconds(59));

        assert!(store.mark_active_finished(t0() + Duration::seconds(60)).is_none());
        let cycle = store.get(&id).unwrap();
        assert_eq!(cycle.status(), CycleStatus::Interrupted);
        assert!(cycle.finished_at.is_none());
    }

    #[test]
    fn finish_pins_counter_to_total() {
        let mut store = CycleStore::new();
        store.create_cycle("write", 1, t0()).unwrap();
        store.set_seconds_passed(59);

        let finished = store.mark_active_finished(t0() + Duration::seconds(61)).unwrap();
        assert_eq!(finished.status(), CycleStatus::Finished);
        assert_eq!(store.seconds_passed(), 60);
        assert!(store.active_cycle().is_none());
    }

    #[test]
    fn history_is_append_only_with_single_active() {
        let mut store = CycleStore::new();
        let a = store.create_cycle("a", 1, t0()).unwrap();
        store.interrupt_active(t0() + Duration::seconds(10));
        let b = store.create_cycle("b", 2, t0() + Duration::seconds(20)).unwrap();
        assert_eq!(active_count(&store), 1);
        store.mark_active_finished(t0() + Duration::seconds(140));
        let c = store.create_cycle("c", 3, t0() + Duration::seconds(150)).unwrap();

        let ids: Vec<&str> = store.cycles().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str(), c.as_str()]);
        assert_eq!(active_count(&store), 1);
        assert_eq!(store.active_id(), Some(c.as_str()));
    }

    #[test]
    fn seconds_passed_is_monotonic_and_ignored_when_idle() {
        let mut store = CycleStore::new();
        store.set_seconds_passed(10);
        assert_eq!(store.seconds_passed(), 0);

        store.create_cycle("a", 1, t0()).unwrap();
        store.set_seconds_passed(10);
        store.set_seconds_passed(7);
        assert_eq!(store.seconds_passed(), 10);
    }
}

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::CycleError,
    log_debug, log_info,
    models::{Cycle, CycleId},
    store::CycleStore,
    validation::CycleForm,
};

use super::{Clock, CountdownDisplay, EventSink, SystemClock, TimerEvent, TimerSnapshot};

const ENABLE_LOGS: bool = true;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Result of re-sampling the clock for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The cycle this tick was scheduled for is no longer active.
    Stale,
    Running(CountdownDisplay),
    Completed(Cycle),
}

/// One tick for `cycle_id` at `now`.
///
/// The completion check and the transition to finished happen under the same
/// `&mut` borrow, so no caller can observe elapsed past the total while the
/// cycle is still active.
pub fn advance(store: &mut CycleStore, cycle_id: &str, now: DateTime<Utc>) -> TickOutcome {
    let Some(cycle) = store.active_cycle().filter(|cycle| cycle.id == cycle_id) else {
        return TickOutcome::Stale;
    };

    let total = cycle.total_secs();
    let elapsed = cycle.elapsed_secs_at(now);

    if elapsed >= total {
        return match store.mark_active_finished(now) {
            Some(finished) => TickOutcome::Completed(finished),
            None => TickOutcome::Stale,
        };
    }

    store.set_seconds_passed(elapsed);
    TickOutcome::Running(TimerSnapshot::from_store(store).display)
}

/// Owns the ticker task for one active cycle. Dropping it stops the task.
struct TickerGuard {
    cycle_id: CycleId,
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl TickerGuard {
    fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        self.handle.abort();
    }
}

#[derive(Clone)]
pub struct TimerController {
    store: Arc<Mutex<CycleStore>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    ticker: Arc<Mutex<Option<TickerGuard>>>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn EventSink>, tick_interval: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(CycleStore::new())),
            clock,
            sink,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
        }
    }

    pub fn with_system_clock(sink: Arc<dyn EventSink>, tick_interval: Duration) -> Self {
        Self::new(Arc::new(SystemClock), sink, tick_interval)
    }

    pub async fn get_snapshot(&self) -> TimerSnapshot {
        let guard = self.store.lock().await;
        TimerSnapshot::from_store(&guard)
    }

    /// History in creation order.
    pub async fn cycles(&self) -> Vec<Cycle> {
        self.store.lock().await.cycles().to_vec()
    }

    /// Whether a ticker task is currently scheduled.
    pub async fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(TickerGuard::is_running)
    }

    pub async fn start_cycle(&self, form: &CycleForm) -> Result<TimerSnapshot, CycleError> {
        let snapshot = {
            let mut store = self.store.lock().await;
            let id = store.create_cycle(&form.task, form.minutes_amount, self.clock.now())?;
            // The guard is installed before the store lock is released, so an
            // interrupt always finds the ticker it has to cancel.
            self.spawn_ticker(id).await;
            TimerSnapshot::from_store(&store)
        };

        self.sink.emit(TimerEvent::StateChanged(snapshot.clone()));

        Ok(snapshot)
    }

    /// Interrupts the active cycle, if any, and stops its ticker.
    pub async fn interrupt_cycle(&self) -> Option<Cycle> {
        let (interrupted, snapshot) = {
            let mut store = self.store.lock().await;
            let interrupted = store.interrupt_active(self.clock.now());
            (interrupted, TimerSnapshot::from_store(&store))
        };

        self.cancel_ticker().await;

        let cycle = interrupted?;
        self.sink.emit(TimerEvent::CycleInterrupted(cycle.clone()));
        self.sink.emit(TimerEvent::StateChanged(snapshot));
        Some(cycle)
    }

    async fn spawn_ticker(&self, cycle_id: CycleId) {
        let mut ticker_guard = self.ticker.lock().await;

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(run_ticker(
            cycle_id.clone(),
            self.store.clone(),
            self.clock.clone(),
            self.sink.clone(),
            self.tick_interval,
            cancel_token.clone(),
        ));

        log_debug!("Spawned ticker for cycle {}", cycle_id);

        // Replacing the slot drops any previous guard, which cancels its task.
        *ticker_guard = Some(TickerGuard {
            cycle_id,
            cancel_token,
            handle,
        });
    }

    async fn cancel_ticker(&self) {
        if let Some(guard) = self.ticker.lock().await.take() {
            log_debug!("Cancelled ticker for cycle {}", guard.cycle_id);
        }
    }
}

async fn run_ticker(
    cycle_id: CycleId,
    store: Arc<Mutex<CycleStore>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    tick_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut interval = time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the countdown starts one period later.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let (outcome, snapshot) = {
            let mut guard = store.lock().await;
            let outcome = advance(&mut guard, &cycle_id, clock.now());
            (outcome, TimerSnapshot::from_store(&guard))
        };

        match outcome {
            TickOutcome::Stale => {
                log_debug!("Ticker for cycle {} saw it inactive; stopping", cycle_id);
                break;
            }
            TickOutcome::Running(display) => {
                log_debug!("Cycle {} at {}", cycle_id, display.clock());
                sink.emit(TimerEvent::Tick(display));
            }
            TickOutcome::Completed(cycle) => {
                log_info!("Cycle {} ran its full {} min", cycle.id, cycle.minutes_amount);
                sink.emit(TimerEvent::Tick(snapshot.display.clone()));
                sink.emit(TimerEvent::CycleFinished(cycle));
                sink.emit(TimerEvent::StateChanged(snapshot));
                break;
            }
        }
    }
}

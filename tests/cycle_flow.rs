use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use focus_cycle_lib::{
    error::CycleError,
    models::CycleStatus,
    settings::SettingsStore,
    timer::{commands, ChannelSink, ManualClock, TimerController, TimerEvent, TimerStatus},
    validation::CycleForm,
    AppState,
};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn form(task: &str, minutes: i64) -> CycleForm {
    CycleForm {
        task: task.to_string(),
        minutes_amount: minutes,
    }
}

struct Harness {
    state: AppState,
    clock: ManualClock,
    events: UnboundedReceiver<TimerEvent>,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let settings = SettingsStore::new(dir.path().join("settings.json")).unwrap();
    let clock = ManualClock::new(t0());
    let (sink, events) = ChannelSink::channel();
    let timer = TimerController::new(
        Arc::new(clock.clone()),
        Arc::new(sink),
        settings.settings().tick_interval(),
    );
    Harness {
        state: AppState::new(timer, settings),
        clock,
        events,
        _dir: dir,
    }
}

async fn tick(harness: &Harness, wall_clock_secs: i64) {
    harness
        .clock
        .set(t0() + ChronoDuration::seconds(wall_clock_secs));
    tokio::time::sleep(Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn a_session_of_cycles() {
    let mut h = harness();
    let started = commands::submit(&h.state, form("write", 2)).await.unwrap();
    assert_eq!(started.display.clock(), "02:00");
    // Keeps the test's wake-ups half a period away from the ticker's.
    tokio::time::sleep(Duration::from_millis(500)).await;

    tick(&h, 5).await;
    assert_eq!(commands::get_timer_state(&h.state).await.display.clock(), "01:55");

    // A backgrounded host can miss ticks; the next one re-derives from the wall clock.
    tick(&h, 95).await;
    assert_eq!(commands::get_timer_state(&h.state).await.display.clock(), "00:25");

    let err = commands::submit(&h.state, form("another", 5)).await.unwrap_err();
    assert_eq!(err, CycleError::CycleAlreadyActive);

    tick(&h, 130).await;
    let idle = commands::get_timer_state(&h.state).await;
    assert_eq!(idle.status, TimerStatus::Idle);
    assert_eq!(idle.display.clock(), "00:00");
    assert!(!h.state.timer.is_ticking().await);

    commands::submit(&h.state, form("read", 10)).await.unwrap();
    tick(&h, 200).await;
    let interrupted = commands::interrupt(&h.state).await.unwrap();
    assert_eq!(interrupted.task, "read");
    assert!(commands::interrupt(&h.state).await.is_none());

    let history = commands::list_cycles(&h.state).await;
    let statuses: Vec<CycleStatus> = history.iter().map(|c| c.status()).collect();
    assert_eq!(statuses, vec![CycleStatus::Finished, CycleStatus::Interrupted]);
    assert_eq!(history[0].finished_at, Some(t0() + ChronoDuration::seconds(130)));
    assert_eq!(
        commands::list_cycles_by_status(&h.state, CycleStatus::Interrupted)
            .await
            .len(),
        1
    );

    let mut finished = 0;
    let mut interrupted_events = 0;
    while let Ok(event) = h.events.try_recv() {
        match event {
            TimerEvent::CycleFinished(_) => finished += 1,
            TimerEvent::CycleInterrupted(_) => interrupted_events += 1,
            _ => {}
        }
    }
    assert_eq!((finished, interrupted_events), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn invalid_submission_never_reaches_history() {
    let h = harness();
    let err = commands::submit(&h.state, form("", 0)).await.unwrap_err();
    match err {
        CycleError::Validation(fields) => {
            assert!(fields.task.is_some());
            assert!(fields.minutes_amount.is_some());
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(commands::list_cycles(&h.state).await.is_empty());
    assert!(!h.state.timer.is_ticking().await);
}

#[tokio::test]
async fn suggestions_are_remembered() {
    let h = harness();
    let defaults = commands::task_suggestions(&h.state);
    assert_eq!(defaults.len(), 3);

    let updated = commands::add_task_suggestion(&h.state, "  deep work ").unwrap();
    assert_eq!(updated.last().map(String::as_str), Some("deep work"));

    let again = commands::add_task_suggestion(&h.state, "deep work").unwrap();
    assert_eq!(again.len(), 4);
    assert!(commands::add_task_suggestion(&h.state, "  ").is_err());
}

use serde::{Deserialize, Serialize};

use crate::{models::Cycle, store::CycleStore};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
}

/// What the rendering side shows: zero-padded minutes and seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CountdownDisplay {
    pub minutes: String,
    pub seconds: String,
    pub is_active: bool,
}

impl CountdownDisplay {
    pub fn idle() -> Self {
        Self::from_remaining(0, false)
    }

    pub fn from_remaining(remaining_secs: u64, is_active: bool) -> Self {
        Self {
            minutes: format!("{:02}", remaining_secs / 60),
            seconds: format!("{:02}", remaining_secs % 60),
            is_active,
        }
    }

    /// Remaining time for `cycle` after `elapsed_secs`, floored at zero.
    pub fn for_cycle(cycle: &Cycle, elapsed_secs: u64) -> Self {
        Self::from_remaining(cycle.total_secs().saturating_sub(elapsed_secs), true)
    }

    pub fn clock(&self) -> String {
        format!("{}:{}", self.minutes, self.seconds)
    }

    /// Title for the hosting surface; only set while a cycle is counting down.
    pub fn title(&self) -> Option<String> {
        self.is_active.then(|| self.clock())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub active_cycle: Option<Cycle>,
    pub total_secs: u64,
    pub elapsed_secs: u64,
    pub display: CountdownDisplay,
}

impl TimerSnapshot {
    /// Explicit recompute of everything derived from the store.
    pub fn from_store(store: &CycleStore) -> Self {
        match store.active_cycle() {
            Some(cycle) => {
                let elapsed_secs = store.seconds_passed();
                Self {
                    status: TimerStatus::Running,
                    total_secs: cycle.total_secs(),
                    elapsed_secs,
                    display: CountdownDisplay::for_cycle(cycle, elapsed_secs),
                    active_cycle: Some(cycle.clone()),
                }
            }
            None => Self {
                status: TimerStatus::Idle,
                active_cycle: None,
                total_secs: 0,
                elapsed_secs: store.seconds_passed(),
                display: CountdownDisplay::idle(),
            },
        }
    }
}

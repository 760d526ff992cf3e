use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CycleId = String;

pub const MIN_MINUTES_AMOUNT: u32 = 1;
pub const MAX_MINUTES_AMOUNT: u32 = 60;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CycleStatus {
    Active,
    Interrupted,
    Finished,
}

impl CycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStatus::Active => "Active",
            CycleStatus::Interrupted => "Interrupted",
            CycleStatus::Finished => "Finished",
        }
    }
}

/// One planned focus session.
///
/// A cycle is active until exactly one of `interrupted_at` / `finished_at` is
/// set, after which it no longer changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: CycleId,
    pub task: String,
    pub minutes_amount: u32,
    pub started_at: DateTime<Utc>,
    pub interrupted_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Cycle {
    pub(crate) fn begin(task: String, minutes_amount: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task,
            minutes_amount,
            started_at,
            interrupted_at: None,
            finished_at: None,
        }
    }

    pub fn status(&self) -> CycleStatus {
        match (self.interrupted_at, self.finished_at) {
            (Some(_), _) => CycleStatus::Interrupted,
            (None, Some(_)) => CycleStatus::Finished,
            (None, None) => CycleStatus::Active,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status() != CycleStatus::Active
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.minutes_amount) * 60
    }

    /// Whole seconds between `started_at` and `now`, truncated.
    /// A clock that stepped backwards yields zero.
    pub fn elapsed_secs_at(&self, now: DateTime<Utc>) -> u64 {
        let secs = now.signed_duration_since(self.started_at).num_seconds();
        u64::try_from(secs).unwrap_or(0)
    }

    pub(crate) fn interrupt(&mut self, at: DateTime<Utc>) {
        debug_assert!(!self.is_terminal());
        self.interrupted_at = Some(at);
    }

    pub(crate) fn finish(&mut self, at: DateTime<Utc>) {
        debug_assert!(!self.is_terminal());
        self.finished_at = Some(at);
    }
}

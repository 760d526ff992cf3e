//! Declared constraints of the new-cycle form.
//!
//! Front ends collect raw input into a [`CycleForm`] and must get a
//! [`ValidatedCycleInput`] from [`validate`] before touching the store.

use serde::Deserialize;

use crate::error::FieldErrors;
use crate::models::{MAX_MINUTES_AMOUNT, MIN_MINUTES_AMOUNT};

pub const TASK_REQUIRED: &str = "Enter a task";
pub const MINUTES_TOO_LOW: &str = "Minimum of 1 minute";
pub const MINUTES_TOO_HIGH: &str = "Maximum of 60 minutes";

/// Raw form input. `minutes_amount` is signed so out-of-range numbers
/// reach validation instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleForm {
    pub task: String,
    pub minutes_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCycleInput {
    task: String,
    minutes_amount: u32,
}

impl ValidatedCycleInput {
    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn minutes_amount(&self) -> u32 {
        self.minutes_amount
    }
}

pub fn validate(form: &CycleForm) -> Result<ValidatedCycleInput, FieldErrors> {
    let mut errors = FieldErrors::default();

    if form.task.is_empty() {
        errors.task = Some(TASK_REQUIRED.to_string());
    }

    let minutes = match u32::try_from(form.minutes_amount) {
        Ok(m) if m < MIN_MINUTES_AMOUNT => {
            errors.minutes_amount = Some(MINUTES_TOO_LOW.to_string());
            None
        }
        Ok(m) if m > MAX_MINUTES_AMOUNT => {
            errors.minutes_amount = Some(MINUTES_TOO_HIGH.to_string());
            None
        }
        Ok(m) => Some(m),
        Err(_) if form.minutes_amount < 0 => {
            errors.minutes_amount = Some(MINUTES_TOO_LOW.to_string());
            None
        }
        Err(_) => {
            errors.minutes_amount = Some(MINUTES_TOO_HIGH.to_string());
            None
        }
    };

    match minutes {
        Some(minutes_amount) if errors.is_empty() => Ok(ValidatedCycleInput {
            task: form.task.clone(),
            minutes_amount,
        }),
        _ => Err(errors),
    }
}

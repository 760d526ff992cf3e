use crate::{
    error::CycleError,
    models::{Cycle, CycleStatus},
    validation::CycleForm,
    AppState,
};

use super::TimerSnapshot;

pub async fn get_timer_state(state: &AppState) -> TimerSnapshot {
    state.timer.get_snapshot().await
}

/// Form submission. Field errors come back untouched so the front end can
/// show them next to the offending input.
pub async fn submit(state: &AppState, form: CycleForm) -> Result<TimerSnapshot, CycleError> {
    state.timer.start_cycle(&form).await
}

pub async fn interrupt(state: &AppState) -> Option<Cycle> {
    state.timer.interrupt_cycle().await
}

pub async fn list_cycles(state: &AppState) -> Vec<Cycle> {
    state.timer.cycles().await
}

pub async fn list_cycles_by_status(state: &AppState, status: CycleStatus) -> Vec<Cycle> {
    state
        .timer
        .cycles()
        .await
        .into_iter()
        .filter(|cycle| cycle.status() == status)
        .collect()
}

pub fn task_suggestions(state: &AppState) -> Vec<String> {
    state.settings.settings().task_suggestions
}

/// Remembers `task` as a suggestion and persists the settings file.
pub fn add_task_suggestion(state: &AppState, task: &str) -> Result<Vec<String>, String> {
    let task = task.trim();
    if task.is_empty() {
        return Err("suggestion must not be empty".to_string());
    }

    let mut settings = state.settings.settings();
    if !settings.task_suggestions.iter().any(|known| known == task) {
        settings.task_suggestions.push(task.to_string());
        state.settings.update(settings.clone()).map_err(|e| e.to_string())?;
    }
    Ok(settings.task_suggestions)
}

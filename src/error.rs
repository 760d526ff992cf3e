//! Error types for cycle operations.

use serde::Serialize;

/// Field-level messages produced when a cycle form fails validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub task: Option<String>,
    pub minutes_amount: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.minutes_amount.is_none()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = [self.task.as_deref(), self.minutes_amount.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CycleError {
    #[error("invalid cycle: {0}")]
    Validation(FieldErrors),

    #[error("a cycle is already active")]
    CycleAlreadyActive,
}

impl From<FieldErrors> for CycleError {
    fn from(errors: FieldErrors) -> Self {
        CycleError::Validation(errors)
    }
}

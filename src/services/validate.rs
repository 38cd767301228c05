use chrono::{DateTime, Utc};

use crate::models::habit::NewHabit;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Habit name is required")]
    EmptyName,
}

/// Trim raw create input and build the initial record. Derived state in the
/// raw request (streak, completion flags) is never accepted from the client;
/// a new habit always starts unstarted.
pub fn validate_and_normalize(
    name: &str,
    description: &str,
    now: DateTime<Utc>,
) -> Result<NewHabit, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    Ok(NewHabit {
        name: name.to_string(),
        description: description.trim().to_string(),
        streak: 0,
        completed_today: false,
        last_completed: None,
        created_at: now,
    })
}

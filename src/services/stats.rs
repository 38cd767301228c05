use serde::Serialize;

use crate::models::habit::Habit;

/// Aggregates over a collection snapshot.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HabitStats {
    pub total_habits: i64,
    /// Raw sum of every streak value, not a count of active streaks.
    pub total_streaks: i64,
    pub completed_today: i64,
}

pub fn compute_stats(habits: &[Habit]) -> HabitStats {
    HabitStats {
        total_habits: habits.len() as i64,
        total_streaks: habits.iter().map(|h| h.streak as i64).sum(),
        completed_today: habits.iter().filter(|h| h.completed_today).count() as i64,
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked habit. The field names are the stored-document contract: every
/// store implementation must persist them exactly as written here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub streak: i32,
    pub completed_today: bool,
    pub last_completed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A normalized record that has not been persisted yet. Produced by
/// `services::validate::validate_and_normalize`; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub description: String,
    pub streak: i32,
    pub completed_today: bool,
    pub last_completed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The fields a completion toggle is allowed to change. Name, description
/// and created_at are immutable after creation.
#[derive(Debug, Clone)]
pub struct HabitUpdate {
    pub streak: i32,
    pub completed_today: bool,
    pub last_completed: Option<DateTime<Utc>>,
}

impl From<&Habit> for HabitUpdate {
    fn from(habit: &Habit) -> Self {
        Self {
            streak: habit.streak,
            completed_today: habit.completed_today,
            last_completed: habit.last_completed,
        }
    }
}

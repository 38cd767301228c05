use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{HabitStore, Snapshot, StoreError, SNAPSHOT_CHANNEL_CAPACITY};
use crate::models::habit::{Habit, HabitUpdate, NewHabit};

/// In-memory store used by the test suite and local development. Delivers
/// the same snapshot-per-change feed as the hosted store.
#[derive(Clone)]
pub struct MemoryStore {
    habits: Arc<RwLock<HashMap<Uuid, Habit>>>,
    snapshot_tx: broadcast::Sender<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            habits: Arc::new(RwLock::new(HashMap::new())),
            snapshot_tx,
        }
    }

    async fn snapshot(&self) -> Snapshot {
        let habits = self.habits.read().await;
        let mut all: Vec<Habit> = habits.values().cloned().collect();
        all.sort_by_key(|h| (h.created_at, h.id));
        all
    }

    async fn broadcast_snapshot(&self) {
        // No receivers is fine; subscribers come and go.
        let _ = self.snapshot_tx.send(self.snapshot().await);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HabitStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Habit>, StoreError> {
        Ok(self.snapshot().await)
    }

    async fn create(&self, record: NewHabit) -> Result<Habit, StoreError> {
        let habit = Habit {
            id: Uuid::new_v4(),
            name: record.name,
            description: record.description,
            streak: record.streak,
            completed_today: record.completed_today,
            last_completed: record.last_completed,
            created_at: record.created_at,
        };
        self.habits.write().await.insert(habit.id, habit.clone());
        self.broadcast_snapshot().await;
        Ok(habit)
    }

    async fn update(&self, id: Uuid, update: HabitUpdate) -> Result<Habit, StoreError> {
        let updated = {
            let mut habits = self.habits.write().await;
            let habit = habits
                .get_mut(&id)
                .ok_or_else(|| StoreError::NotFound(format!("habit {} not found", id)))?;
            habit.streak = update.streak;
            habit.completed_today = update.completed_today;
            habit.last_completed = update.last_completed;
            habit.clone()
        };
        self.broadcast_snapshot().await;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        {
            let mut habits = self.habits.write().await;
            if habits.remove(&id).is_none() {
                return Err(StoreError::NotFound(format!("habit {} not found", id)));
            }
        }
        self.broadcast_snapshot().await;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }
}

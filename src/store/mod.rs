use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::habit::{Habit, HabitUpdate, NewHabit};

pub mod memory;
pub mod postgres;

/// Full point-in-time copy of the collection, as delivered to subscribers.
pub type Snapshot = Vec<Habit>;

/// Buffer depth for the snapshot broadcast channel. Lagging receivers
/// resynchronize by re-listing, so the depth only bounds burst tolerance.
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Narrow persistence seam. Any document store or relational table can back
/// it; the stored field names on [`Habit`] are the only contract.
///
/// Two writers racing on the same id are last-write-wins: there is no
/// version field and `update` is unconditional.
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Current full collection, ordered by creation time.
    async fn list(&self) -> Result<Vec<Habit>, StoreError>;

    /// Persist a new record. The store assigns the id.
    async fn create(&self, record: NewHabit) -> Result<Habit, StoreError>;

    /// Apply a completion update. Fails with `NotFound` if the id is gone.
    async fn update(&self, id: Uuid, update: HabitUpdate) -> Result<Habit, StoreError>;

    /// Remove a record. Deleting a missing id fails with `NotFound`.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Subscribe to collection snapshots. Every committed change is followed
    /// by a fresh full snapshot; dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<Snapshot>;
}

use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{HabitStore, Snapshot, StoreError, SNAPSHOT_CHANNEL_CAPACITY};
use crate::models::habit::{Habit, HabitUpdate, NewHabit};

/// Postgres-backed store. Every committed mutation re-reads the collection
/// and pushes a fresh snapshot to subscribers, so receivers always observe
/// full states, never deltas.
#[derive(Clone)]
pub struct PgHabitStore {
    pool: PgPool,
    snapshot_tx: broadcast::Sender<Snapshot>,
}

impl PgHabitStore {
    pub fn new(pool: PgPool) -> Self {
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self { pool, snapshot_tx }
    }

    async fn fetch_all(&self) -> Result<Vec<Habit>, StoreError> {
        sqlx::query_as::<_, Habit>("SELECT * FROM habits ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)
    }

    async fn broadcast_snapshot(&self) {
        match self.fetch_all().await {
            Ok(snapshot) => {
                let _ = self.snapshot_tx.send(snapshot);
            }
            Err(e) => {
                // The write itself committed; subscribers catch up on the
                // next successful broadcast or by re-listing.
                tracing::warn!(error = %e, "Failed to read snapshot after write");
            }
        }
    }
}

#[async_trait::async_trait]
impl HabitStore for PgHabitStore {
    async fn list(&self) -> Result<Vec<Habit>, StoreError> {
        self.fetch_all().await
    }

    async fn create(&self, record: NewHabit) -> Result<Habit, StoreError> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (id, name, description, streak, completed_today, last_completed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.streak)
        .bind(record.completed_today)
        .bind(record.last_completed)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        self.broadcast_snapshot().await;
        Ok(habit)
    }

    async fn update(&self, id: Uuid, update: HabitUpdate) -> Result<Habit, StoreError> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits SET
                streak = $2,
                completed_today = $3,
                last_completed = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.streak)
        .bind(update.completed_today)
        .bind(update.last_completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or_else(|| StoreError::NotFound(format!("habit {} not found", id)))?;

        self.broadcast_snapshot().await;
        Ok(habit)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("habit {} not found", id)));
        }

        self.broadcast_snapshot().await;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }
}

/// Map backend failures onto the gateway taxonomy. Anything that is not a
/// missing row or an access rejection is treated as transient.
fn map_sqlx_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound("row not found".into()),
        sqlx::Error::Database(db) if db.code().as_deref() == Some("42501") => {
            StoreError::PermissionDenied(db.message().to_string())
        }
        _ => StoreError::Unavailable(err.to_string()),
    }
}

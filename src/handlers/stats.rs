use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::stats::{compute_stats, HabitStats};
use crate::AppState;

pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<HabitStats>> {
    let habits = state.store.list().await?;
    Ok(Json(compute_stats(&habits)))
}

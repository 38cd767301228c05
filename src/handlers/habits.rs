use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Local, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreateHabitRequest, DeleteResponse, ToggleRequest};
use crate::error::{AppError, AppResult};
use crate::models::habit::{Habit, HabitUpdate};
use crate::services::{streak, validate};
use crate::AppState;

pub async fn list_habits(State(state): State<AppState>) -> AppResult<Json<Vec<Habit>>> {
    let habits = state.store.list().await?;
    Ok(Json(habits))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<Habit>> {
    let habits = state.store.list().await?;
    let habit = habits
        .into_iter()
        .find(|h| h.id == habit_id)
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    Ok(Json(habit))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(body): Json<CreateHabitRequest>,
) -> AppResult<Json<Habit>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = validate::validate_and_normalize(&body.name, &body.description, Utc::now())?;
    let habit = state.store.create(record).await?;

    tracing::info!(habit_id = %habit.id, "Habit created");
    Ok(Json(habit))
}

/// Toggle today's completion. The habit is resolved from the latest known
/// snapshot; a miss is a non-fatal race that the snapshot feed reconciles on
/// its next delivery.
pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
    Json(body): Json<ToggleRequest>,
) -> AppResult<Json<Habit>> {
    let habits = state.store.list().await?;
    let current = habits
        .iter()
        .find(|h| h.id == habit_id)
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    let next = streak::apply_completion_toggle(current, body.completed, Local::now());
    let habit = state
        .store
        .update(habit_id, HabitUpdate::from(&next))
        .await?;

    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    state.store.delete(habit_id).await?;

    Ok(Json(DeleteResponse {
        deleted: true,
        id: habit_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, put};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::handlers::stats::get_stats;
    use crate::store::memory::MemoryStore;

    fn test_app() -> Router {
        let state = AppState {
            store: Arc::new(MemoryStore::new()),
        };
        Router::new()
            .route("/api/habits", get(list_habits).post(create_habit))
            .route("/api/habits/:id", get(get_habit).delete(delete_habit))
            .route("/api/habits/:id/complete", put(toggle_habit))
            .route("/api/stats", get(get_stats))
            .with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, name: &str, description: &str) -> serde_json::Value {
        let body = serde_json::json!({ "name": name, "description": description }).to_string();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/habits", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_create_returns_normalized_record_with_id() {
        let app = test_app();

        let json = create(&app, "  Read  ", " 20 pages ").await;

        assert_eq!(json["name"], "Read");
        assert_eq!(json["description"], "20 pages");
        assert_eq!(json["streak"], 0);
        assert_eq!(json["completed_today"], false);
        assert!(json["last_completed"].is_null());
        assert!(json["id"].is_string());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/habits",
                r#"{"name":"   ","description":""}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], 422);
    }

    #[tokio::test]
    async fn test_list_returns_created_habits() {
        let app = test_app();
        create(&app, "Read", "").await;
        create(&app, "Run", "").await;

        let response = app
            .oneshot(json_request("GET", "/api/habits", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_complete_then_undo() {
        let app = test_app();
        let habit = create(&app, "Read", "").await;
        let id = habit["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/habits/{}/complete", id),
                r#"{"completed":true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["streak"], 1);
        assert_eq!(json["completed_today"], true);
        assert!(!json["last_completed"].is_null());

        // Completing again on the same day must not inflate the streak.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/habits/{}/complete", id),
                r#"{"completed":true}"#,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["streak"], 1);

        // Same-day undo gives the day back.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/habits/{}/complete", id),
                r#"{"completed":false}"#,
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["streak"], 0);
        assert_eq!(json["completed_today"], false);
        assert!(json["last_completed"].is_null());
    }

    #[tokio::test]
    async fn test_toggle_unknown_habit_is_not_found() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/habits/{}/complete", Uuid::new_v4()),
                r#"{"completed":true}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again_is_not_found() {
        let app = test_app();
        let habit = create(&app, "Read", "").await;
        let id = habit["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request("DELETE", &format!("/api/habits/{}", id), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["deleted"], true);

        let response = app
            .clone()
            .oneshot(json_request("DELETE", &format!("/api/habits/{}", id), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_habit_by_id() {
        let app = test_app();
        let habit = create(&app, "Read", "").await;
        let id = habit["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request("GET", &format!("/api/habits/{}", id), ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], id.as_str());
        assert_eq!(json["name"], "Read");
    }

    #[tokio::test]
    async fn test_stats_reflect_collection() {
        let app = test_app();
        let habit = create(&app, "Read", "").await;
        create(&app, "Run", "").await;
        let id = habit["id"].as_str().unwrap().to_string();

        app.clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/habits/{}/complete", id),
                r#"{"completed":true}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request("GET", "/api/stats", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total_habits"], 2);
        assert_eq!(json["total_streaks"], 1);
        assert_eq!(json["completed_today"], 1);
    }
}

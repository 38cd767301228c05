//! Request/response DTOs for the HTTP surface.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Size bounds are expressed via `validator` derive macros; domain rules
//!   (trimming, empty-name rejection) live in `services::validate`

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// POST /api/habits
#[derive(Debug, Deserialize, Validate)]
pub struct CreateHabitRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
}

/// PUT /api/habits/:id/complete
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// Desired new value of `completed_today`.
    pub completed: bool,
}

/// Standard delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

pub mod auth;
pub mod profile;
pub mod story;

use axum::Json;
use serde_json::Value;

use crate::models::response::ApiResponse;

pub async fn status() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::empty("Server is running"))
}

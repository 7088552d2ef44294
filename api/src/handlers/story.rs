use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    auth::AuthUser,
    error::AppError,
    models::{response::ApiResponse, story::AddStoryPayload},
    store::StoryStore,
    validation::Validate,
    AppState,
};

pub async fn add_story(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    payload: Result<Json<AddStoryPayload>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let story = payload.story.unwrap_or_default();

    let story_id = StoryStore::add(&state.db, user_id, &story).await?;
    tracing::debug!(user_id, story_id, "story stored");

    Ok(Json(ApiResponse::ok(
        "Story added successfully",
        json!({ "id": story_id }),
    )))
}

pub async fn get_story(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
) -> Result<Json<ApiResponse<Vec<Value>>>, AppError> {
    let stories = StoryStore::list_for_user(&state.db, user_id).await?;

    Ok(Json(ApiResponse::ok("Stories retrieved successfully", stories)))
}

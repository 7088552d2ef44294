use axum::{extract::State, Json};

use crate::{
    auth::AuthUser,
    error::AppError,
    models::{response::ApiResponse, user::Profile},
    store::AccountStore,
    AppState,
};

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
) -> Result<Json<ApiResponse<Profile>>, AppError> {
    let user = AccountStore::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(ApiResponse::ok(
        "User profile retrieved successfully",
        Profile::from(user),
    )))
}

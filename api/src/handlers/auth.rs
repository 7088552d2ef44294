use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        State,
    },
    Json,
};

use crate::{
    error::AppError,
    models::{
        response::ApiResponse,
        user::{AccountSummary, LoginPayload, NewUser, ProfilePicUpload, RegisterForm},
    },
    store::AccountStore,
    uploads,
    validation::Validate,
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<AccountSummary>>, AppError> {
    let form = read_register_form(multipart?).await?;
    form.validate()?;

    let password_hash = state.hasher.hash_blocking(form.password).await?;

    let upload = match &form.profile_pic {
        Some(pic) => Some(uploads::save(&state.config.upload_dir, &pic.file_name, &pic.bytes).await?),
        None => None,
    };

    let new_user = NewUser {
        full_name: &form.full_name,
        email: &form.email,
        password_hash: &password_hash,
        profile_pic: upload.as_ref().map(|u| u.url.as_str()),
    };

    let user = match AccountStore::create(&state.db, &new_user).await {
        Ok(user) => user,
        Err(e) => {
            if let Some(upload) = &upload {
                uploads::discard(upload).await;
            }
            return Err(e);
        }
    };

    let token = state.tokens.issue(user.id, &user.email)?;
    tracing::info!(user_id = user.id, "account registered");

    Ok(Json(
        ApiResponse::ok("User registration successful", AccountSummary::from(user)).with_token(token),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<ApiResponse<AccountSummary>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    // Unknown email and wrong password must look the same to the client,
    // in body and in time spent hashing.
    let Some(user) = AccountStore::find_by_email(&state.db, payload.email.trim()).await? else {
        state.hasher.verify_absent_blocking(payload.password).await?;
        return Err(AppError::InvalidCredentials);
    };

    let matches = state
        .hasher
        .verify_blocking(payload.password, user.password_hash.clone())
        .await?;
    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id, &user.email)?;
    tracing::info!(user_id = user.id, "login successful");

    Ok(Json(
        ApiResponse::ok("Login successful", AccountSummary::from(user)).with_token(token),
    ))
}

async fn read_register_form(mut multipart: Multipart) -> Result<RegisterForm, AppError> {
    let mut form = RegisterForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "full_name" => form.full_name = field.text().await?.trim().to_string(),
            "email" => form.email = field.text().await?.trim().to_string(),
            "password" => form.password = field.text().await?,
            "profile_pic" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.profile_pic = Some(ProfilePicUpload { file_name, bytes });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

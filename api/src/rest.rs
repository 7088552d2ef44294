use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{self, auth, profile, story},
    uploads, AppState,
};

/// Multipart registrations carry a picture; cap bodies at 10 MiB.
const MAX_BODY_BYTES: usize = 10 << 20;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.allowed_origin.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let upload_files = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/status", get(handlers::status))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", get(profile::get_profile))
        .route("/add-story", post(story::add_story))
        .route("/get-story", get(story::get_story))
        .nest_service(uploads::URL_PREFIX, upload_files)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

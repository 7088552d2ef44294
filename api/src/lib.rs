pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rest;
pub mod store;
pub mod uploads;
pub mod validation;

use std::sync::Arc;

use sqlx::sqlite::SqlitePool;

use crate::auth::{password::CredentialHasher, token::TokenIssuer};
use crate::config::Config;

/// Everything a handler needs, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: Arc<TokenIssuer>,
    pub hasher: Arc<CredentialHasher>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Result<Self, argon2::password_hash::Error> {
        let hasher = CredentialHasher::new(config.hashing)?;
        let tokens = TokenIssuer::new(config.jwt_secret.as_bytes());
        Ok(Self {
            db,
            tokens: Arc::new(tokens),
            hasher: Arc::new(hasher),
            config: Arc::new(config),
        })
    }
}

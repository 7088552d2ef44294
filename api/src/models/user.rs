use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use crate::validation::{Checks, FieldError, Validate};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_pic: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// Row to insert on registration.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub profile_pic: Option<&'a str>,
}

#[derive(Debug)]
pub struct ProfilePicUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Registration fields, read from a multipart form.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub profile_pic: Option<ProfilePicUpload>,
}

impl Validate for RegisterForm {
    fn field_errors(&self) -> Vec<FieldError> {
        Checks::new()
            .require("full_name", &self.full_name, "Full name is mandatory")
            .require("email", &self.email, "Email is mandatory")
            .require("password", &self.password, "Password is mandatory")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginPayload {
    fn field_errors(&self) -> Vec<FieldError> {
        Checks::new()
            .require("email", &self.email, "Email is mandatory")
            .require("password", &self.password, "Password is mandatory")
            .finish()
    }
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
}

impl From<User> for AccountSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            profile_pic: user.profile_pic,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub full_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name,
            email: user.email,
            profile_pic: user.profile_pic,
        }
    }
}

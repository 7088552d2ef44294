use serde::Serialize;
use serde_json::{json, Value};

/// Envelope shared by every response, success or failure.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            data,
            token: None,
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}

impl ApiResponse<Value> {
    pub fn failure(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: false,
            message: message.into(),
            data,
            token: None,
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::ok(message, json!({}))
    }
}

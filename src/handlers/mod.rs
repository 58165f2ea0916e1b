//! Route handlers for the playground endpoints.
//!
//! Each handler is a few lines of glue over canned data. Handlers that need
//! configuration take an `Arc<AppState>` ahead of the request; see
//! [`routes::with_state`](crate::routes).

use std::path::PathBuf;

use http::StatusCode;

use crate::api::Envelope;
use crate::config::Config;
use crate::response::Response;
use crate::token::TokenIssuer;

pub mod files;
pub mod general;
pub mod products;
pub mod stream;
pub mod users;

/// Read-only state shared by every request.
pub struct AppState {
    pub upload_dir: PathBuf,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            tokens: TokenIssuer::new(config.jwt_secret.as_bytes()),
        }
    }
}

/// A failure envelope with the given status.
fn failure(status: StatusCode, message: &str, error: impl Into<String>) -> Response {
    Envelope::<()>::failure(message, error).to_response(status)
}

fn bad_request(message: &str, error: impl Into<String>) -> Response {
    failure(StatusCode::BAD_REQUEST, message, error)
}

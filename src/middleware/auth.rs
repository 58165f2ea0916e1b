//! Static bearer-token check.
//!
//! There is no token verification here: the `Authorization` header must equal
//! `Bearer <expected>` byte for byte. Rejections are answered on the spot
//! with a `401` envelope; they never reach the error handler.

use http::StatusCode;
use http::header::AUTHORIZATION;
use tracing::debug;

use crate::api::Envelope;
use crate::handler::{BoxFuture, Outcome};
use crate::middleware::{Middleware, Next};
use crate::request::Request;

pub const DEFAULT_TOKEN: &str = "valid-token";

pub const MISSING_TOKEN: &str = "Token de autorização não fornecido";
pub const INVALID_TOKEN: &str = "Token inválido";

pub struct BearerAuth {
    expected: String,
}

impl BearerAuth {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self { expected: format!("Bearer {}", token.as_ref()) }
    }

    fn reject(message: &str) -> Outcome {
        let envelope: Envelope = Envelope::failure(message, "");
        Ok(envelope.to_response(StatusCode::UNAUTHORIZED))
    }
}

impl Default for BearerAuth {
    fn default() -> Self { Self::new(DEFAULT_TOKEN) }
}

impl Middleware for BearerAuth {
    fn name(&self) -> &'static str { "bearer-auth" }

    fn process<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let rejection = match req.header(AUTHORIZATION.as_str()) {
                None | Some("") => Some(MISSING_TOKEN),
                Some(value) if value != self.expected => Some(INVALID_TOKEN),
                Some(_) => None,
            };
            match rejection {
                Some(message) => {
                    debug!(path = %req.path(), reason = message, "request rejected");
                    Self::reject(message)
                }
                None => next.run(req).await,
            }
        })
    }
}

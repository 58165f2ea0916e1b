//! Panic recovery.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tracing::error;

use crate::error::HttpError;
use crate::handler::{BoxFuture, Outcome};
use crate::middleware::{Middleware, Next};
use crate::request::Request;

/// Catches a panic anywhere further down the chain and turns it into a
/// `500` for the error handler. The panic message is logged, never sent.
///
/// Register it early: only middleware after it is covered.
pub struct Recover;

impl Middleware for Recover {
    fn name(&self) -> &'static str { "recover" }

    fn process<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let method = req.method().clone();
            let path = req.path().to_owned();

            match AssertUnwindSafe(async move { next.run(req).await }).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref()).to_owned();
                    error!(%method, %path, panic = %reason, "handler panicked");
                    Outcome::Err(HttpError::internal(format!("handler panicked: {reason}")))
                }
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

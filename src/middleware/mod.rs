//! Middleware layer.
//!
//! Middleware wraps the rest of the pipeline. Each one receives the request
//! and a [`Next`] that runs everything after it; it may act before calling
//! `next`, after it returns, or short-circuit by never calling it.
//!
//! ```text
//! global[0] → global[1] → group[0] → handler
//!     ↑___________↑___________↑_______↲    (exit is the reverse)
//! ```
//!
//! Global middleware (`Router::with`) wraps every request, matched or not.
//! Group middleware (`Group::with`) only wraps routes registered in that group.
//!
//! Built-in middleware:
//! - [`RequestLogger`]: per-request start/finish records with latency
//! - [`Recover`]: panics become `500`s for the error handler
//! - [`Cors`]: preflight answers and `Access-Control-Allow-Origin`
//! - [`BearerAuth`]: static bearer-token check

use std::iter::Chain;
use std::slice::Iter;
use std::sync::Arc;

use tracing::trace;

use crate::error::HttpError;
use crate::handler::{BoxFuture, BoxedHandler, Outcome};
use crate::request::Request;

mod auth;
mod cors;
mod logger;
mod recover;

pub use auth::{BearerAuth, DEFAULT_TOKEN, INVALID_TOKEN, MISSING_TOKEN};
pub use cors::{Cors, DEFAULT_ALLOW_METHODS};
pub use logger::RequestLogger;
pub use recover::Recover;

/// A request-processing step composed around a handler.
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Process `req`, delegating to `next` to continue the chain.
    fn process<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome>;
}

pub(crate) type SharedMiddleware = Arc<dyn Middleware>;

/// Where the chain ends once every middleware has run.
pub(crate) enum Endpoint<'a> {
    Handler(&'a BoxedHandler),
    /// The router had nothing to dispatch to (404 / 405).
    Reject(HttpError),
}

/// The remainder of the pipeline after the current middleware.
///
/// Consumed by [`Next::run`], so it can only be invoked once.
pub struct Next<'a> {
    stack: Chain<Iter<'a, SharedMiddleware>, Iter<'a, SharedMiddleware>>,
    endpoint: Endpoint<'a>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        global: &'a [SharedMiddleware],
        group: &'a [SharedMiddleware],
        endpoint: Endpoint<'a>,
    ) -> Self {
        Self { stack: global.iter().chain(group.iter()), endpoint }
    }

    /// Runs the next middleware, or the endpoint when none are left.
    pub fn run(mut self, req: Request) -> BoxFuture<'a, Outcome> {
        match self.stack.next() {
            Some(middleware) => {
                trace!(middleware = middleware.name(), path = %req.path(), "entering middleware");
                middleware.process(req, self)
            }
            None => match self.endpoint {
                Endpoint::Handler(handler) => handler.call(req),
                Endpoint::Reject(err) => Box::pin(async move { Outcome::Err(err) }),
            },
        }
    }
}

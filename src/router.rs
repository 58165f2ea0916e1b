//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Routes can be collected
//! into a [`Group`] that shares a path prefix and a middleware list.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::error::HttpError;
use crate::error_handler::{ErrorContext, ErrorHandler, default_error_handler};
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{Endpoint, Middleware, Next, SharedMiddleware};
use crate::request::Request;
use crate::response::Response;

struct Route {
    handler: BoxedHandler,
    middleware: Arc<[SharedMiddleware]>,
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain naturally.
///
/// ```rust,no_run
/// # use tsu_playground::{Group, Request, Response, Router, middleware::{BearerAuth, RequestLogger}};
/// # async fn get_user(_: Request) -> Response { Response::text("") }
/// # async fn profile(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .with(RequestLogger)
///     .get("/users/:id", get_user)
///     .nest(Group::new("/protected").with(BearerAuth::default()).get("/profile", profile));
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Route>>,
    middleware: Vec<SharedMiddleware>,
    error_handler: ErrorHandler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            middleware: Vec::new(),
            error_handler: default_error_handler,
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `:name` or `{name}` syntax; `req.param("name")`
    /// retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or conflicts with an existing route.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler.into_boxed_handler(), Arc::from([]))
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self { self.on(Method::GET, path, handler) }
    pub fn post(self, path: &str, handler: impl Handler) -> Self { self.on(Method::POST, path, handler) }
    pub fn put(self, path: &str, handler: impl Handler) -> Self { self.on(Method::PUT, path, handler) }
    pub fn patch(self, path: &str, handler: impl Handler) -> Self { self.on(Method::PATCH, path, handler) }
    pub fn delete(self, path: &str, handler: impl Handler) -> Self { self.on(Method::DELETE, path, handler) }

    /// Adds a global middleware. Global middleware runs for every request,
    /// including ones that match no route, in the order it was added.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Merges every route of `group` under its prefix.
    pub fn nest(mut self, group: Group) -> Self {
        let middleware: Arc<[SharedMiddleware]> = group.middleware.into();
        for (method, path, handler) in group.routes {
            let full = join(&group.prefix, &path);
            self = self.add(method, &full, handler, Arc::clone(&middleware));
        }
        self
    }

    /// Replaces the handler that turns escaped errors into responses.
    pub fn error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = handler;
        self
    }

    fn add(
        mut self,
        method: Method,
        path: &str,
        handler: BoxedHandler,
        middleware: Arc<[SharedMiddleware]>,
    ) -> Self {
        let pattern = to_matchit(path);
        self.routes
            .entry(method)
            .or_default()
            .insert(pattern, Route { handler, middleware })
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    fn lookup(&self, method: &Method, path: &str) -> Result<(&Route, HashMap<String, String>), HttpError> {
        if let Some(matched) = self.routes.get(method).and_then(|tree| tree.at(path).ok()) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), decode(v)))
                .collect();
            return Ok((matched.value, params));
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| m.clone())
            .collect();
        if allowed.is_empty() {
            return Err(HttpError::not_found("Not Found"));
        }
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Err(HttpError::method_not_allowed(&allowed))
    }

    /// Runs one request through the whole pipeline: global middleware, route
    /// middleware, handler, and the error handler if anything failed.
    pub async fn handle(&self, mut req: Request) -> Response {
        let ctx = ErrorContext {
            method: req.method().clone(),
            path: req.path().to_owned(),
            content_type: req.media_type(),
        };

        let (group, endpoint) = match self.lookup(&ctx.method, &ctx.path) {
            Ok((route, params)) => {
                req.params = params;
                (&route.middleware[..], Endpoint::Handler(&route.handler))
            }
            Err(err) => (&[] as &[SharedMiddleware], Endpoint::Reject(err)),
        };

        match Next::new(&self.middleware, group, endpoint).run(req).await {
            Ok(res) => res,
            Err(err) => (self.error_handler)(&ctx, err),
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// Routes sharing a path prefix and a middleware list.
///
/// Group middleware runs after the router's global middleware, in the order
/// it was added. Register with [`Router::nest`].
pub struct Group {
    prefix: String,
    middleware: Vec<SharedMiddleware>,
    routes: Vec<(Method, String, BoxedHandler)>,
}

impl Group {
    pub fn new(prefix: &str) -> Self {
        Self { prefix: prefix.trim_end_matches('/').to_owned(), middleware: Vec::new(), routes: Vec::new() }
    }

    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// An empty `path` maps to the bare prefix.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes.push((method, path.to_owned(), handler.into_boxed_handler()));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self { self.on(Method::GET, path, handler) }
    pub fn post(self, path: &str, handler: impl Handler) -> Self { self.on(Method::POST, path, handler) }
    pub fn put(self, path: &str, handler: impl Handler) -> Self { self.on(Method::PUT, path, handler) }
    pub fn patch(self, path: &str, handler: impl Handler) -> Self { self.on(Method::PATCH, path, handler) }
    pub fn delete(self, path: &str, handler: impl Handler) -> Self { self.on(Method::DELETE, path, handler) }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn join(prefix: &str, path: &str) -> String {
    match (prefix, path) {
        ("", "") => "/".to_owned(),
        (_, "") => prefix.to_owned(),
        _ => format!("{prefix}{path}"),
    }
}

/// Rewrites `:name` segments into matchit's `{name}` form.
fn to_matchit(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), |cow| cow.into_owned())
}

//! The playground's route table.

use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::handler::{Handler, IntoOutcome};
use crate::handlers::{AppState, files, general, products, stream, users};
use crate::middleware::{BearerAuth, Cors, Recover, RequestLogger};
use crate::request::Request;
use crate::router::{Group, Router};

pub const API_PREFIX: &str = "/api/v1";

/// Builds the full application: request logging, panic recovery and CORS on
/// every request, the public API, the bearer-protected group and the
/// products resource.
pub fn app(config: &Config) -> Router {
    let state = Arc::new(AppState::from_config(config));

    let public = Group::new(API_PREFIX)
        .get("", general::home)
        .get("/", general::home)
        .get("/hello/:name", general::hello)
        .get("/html", general::html)
        .get("/xml", general::xml)
        .post("/users", users::create_user)
        .post("/login", with_state(Arc::clone(&state), users::login))
        .get("/search", general::search)
        .post("/upload", with_state(Arc::clone(&state), files::upload))
        .get("/download/:filename", with_state(Arc::clone(&state), files::download))
        .get("/stream", stream::stream)
        .get("/ws", general::websocket);

    let protected = Group::new(&format!("{API_PREFIX}/protected"))
        .with(BearerAuth::new(&config.auth_token))
        .get("/profile", users::profile);

    let catalogue = Group::new(&format!("{API_PREFIX}/products"))
        .get("", products::list)
        .post("", products::create)
        .get("/:id", products::get)
        .put("/:id", products::update)
        .delete("/:id", products::delete);

    Router::new()
        .with(RequestLogger)
        .with(Recover)
        .with(Cors::default())
        .nest(public)
        .nest(protected)
        .nest(catalogue)
}

/// Adapts a handler that needs shared state into a plain request handler.
pub fn with_state<S, F, Fut, R>(state: Arc<S>, handler: F) -> impl Handler
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    move |req: Request| handler(Arc::clone(&state), req)
}

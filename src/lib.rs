//! # tsu-playground
//!
//! A feature tour of the tsu HTTP framework, as a small REST service.
//!
//! ## What's here
//!
//! The framework half, usable on its own:
//!
//! - Radix-tree routing, one tree per method, via [`matchit`]
//! - Route [`Group`]s sharing a prefix and a middleware list
//! - A [`Middleware`](middleware::Middleware) chain that can short-circuit
//! - Handlers that return a response *or* an [`HttpError`], which a single
//!   [`ErrorHandler`] turns into JSON or XML
//! - Request binding from JSON, XML or form bodies, plus multipart uploads
//! - Full or chunked-stream response bodies
//! - HTTP/1.1 and HTTP/2 on hyper, with graceful shutdown on SIGTERM / Ctrl-C
//!
//! The playground half, in [`handlers`] and [`routes`]: canned endpoints
//! under `/api/v1` that exercise each of the above.
//!
//! What the playground deliberately leaves out: persistence, real
//! authentication, TLS, rate limiting. A reverse proxy owns the transport
//! concerns; the rest is demo data.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use tsu_playground::{Envelope, HttpError, IntoResponse, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tsu_playground::Error> {
//!     let app = Router::new()
//!         .get("/users/:id", get_user)
//!         .post("/users", create_user);
//!
//!     Server::bind(([0, 0, 0, 0], 3000)).serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Result<Response, HttpError> {
//!     let id: u64 = req.param("id")
//!         .and_then(|id| id.parse().ok())
//!         .ok_or_else(|| HttpError::bad_request("id must be numeric"))?;
//!     Ok(Response::text(format!("user {id}")))
//! }
//!
//! async fn create_user(req: Request) -> Result<Response, HttpError> {
//!     let body: serde_json::Value = req.bind()?;
//!     Ok((StatusCode::CREATED, Envelope::success("created", body)).into_response())
//! }
//! ```

mod error;
mod handler;
mod multipart;
mod request;
mod response;
mod router;
mod server;

pub mod api;
pub mod config;
pub mod error_handler;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod token;

pub use api::Envelope;
pub use config::{Config, ConfigError};
pub use error::{Error, HttpError};
pub use error_handler::{ErrorContext, ErrorHandler, default_error_handler};
pub use handler::{BoxFuture, Handler, IntoOutcome, Outcome};
pub use multipart::{Multipart, MultipartError};
pub use request::{BindError, Request};
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::{Group, Router};
pub use server::{Server, serve_listener};

//! Error types.
//!
//! Two families live here:
//!
//! - [`Error`] surfaces infrastructure failures: reading configuration,
//!   binding to a port, accepting a connection.
//! - [`HttpError`] is the failure half of a handler or middleware outcome.
//!   Returning one hands the request over to the router's error handler,
//!   which turns it into an envelope.

use std::borrow::Cow;

use http::header::{ALLOW, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use thiserror::Error;

use crate::config::ConfigError;

/// The error type returned by tsu's fallible infrastructure operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A request outcome that did not produce a response.
///
/// Carries a status and an optional public message. Failures without a
/// message are reported with a generic text chosen by the error handler.
#[derive(Debug, Error)]
#[error("{status}: {}", .message.as_deref().unwrap_or("no message"))]
pub struct HttpError {
    status: StatusCode,
    message: Option<Cow<'static, str>>,
    headers: HeaderMap,
    #[source]
    source: Option<BoxError>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self { status, message: Some(message.into()), headers: HeaderMap::new(), source: None }
    }

    /// An error with a status only; the error handler picks the message.
    pub fn from_status(status: StatusCode) -> Self {
        Self { status, message: None, headers: HeaderMap::new(), source: None }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// `405` with an `Allow` header listing the methods the path accepts.
    pub fn method_not_allowed(allowed: &[Method]) -> Self {
        let mut err = Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        let list = allowed.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
        if let Ok(value) = HeaderValue::from_str(&list) {
            err.headers.insert(ALLOW, value);
        }
        err
    }

    /// `500` wrapping an unexpected failure. The source is logged, never sent.
    pub fn internal(source: impl Into<BoxError>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
            headers: HeaderMap::new(),
            source: Some(source.into()),
        }
    }

    /// Adds a header the error handler copies onto the final response.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn message(&self) -> Option<&str> { self.message.as_deref() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    pub(crate) fn into_headers(self) -> HeaderMap { self.headers }
}

impl From<std::io::Error> for HttpError {
    fn from(e: std::io::Error) -> Self {
        Self::internal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_not_allowed_lists_allowed_methods() {
        let err = HttpError::method_not_allowed(&[Method::GET, Method::POST]);
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.headers().get(ALLOW).unwrap(), "GET, POST");
    }

    #[test]
    fn with_header_keeps_status_and_message() {
        let err = HttpError::not_found("gone")
            .with_header(http::header::VARY, HeaderValue::from_static("Origin"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), Some("gone"));
        assert_eq!(err.headers().get(http::header::VARY).unwrap(), "Origin");
    }

    #[test]
    fn internal_hides_source_from_message() {
        let io = std::io::Error::other("disk on fire");
        let err = HttpError::from(io);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }
}

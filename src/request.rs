//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::HttpError;
use crate::multipart::{Multipart, MultipartError};

/// An incoming HTTP request with its body fully read.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

/// Why [`Request::bind`] could not decode the body.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("missing content type")]
    MissingContentType,

    #[error("unsupported content type `{0}`")]
    UnsupportedMediaType(String),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid xml: {0}")]
    Xml(#[from] serde_xml_rs::Error),

    #[error("invalid form: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
}

impl From<BindError> for HttpError {
    fn from(e: BindError) -> Self {
        HttpError::bad_request(e.to_string())
    }
}

impl Request {
    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The media type of the body, without parameters, lowercased.
    pub fn media_type(&self) -> Option<String> {
        let raw = self.header(CONTENT_TYPE.as_str())?;
        let essence = raw.split(';').next().unwrap_or(raw).trim();
        Some(essence.to_ascii_lowercase())
    }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first value of a query-string key.
    pub fn query_param(&self, key: &str) -> Option<String> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(self.uri.query().unwrap_or("")).ok()?;
        pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Deserializes the whole query string into `T`.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_urlencoded::from_str(self.uri.query().unwrap_or(""))
            .map_err(|e| HttpError::bad_request(format!("invalid query: {e}")))
    }

    /// Decodes the body according to its declared content type.
    ///
    /// `application/json`, `application/xml` / `text/xml`, and
    /// `application/x-www-form-urlencoded` are understood. An empty body
    /// binds to `T::default()` whatever its type; a non-empty one must
    /// declare its type.
    pub fn bind<T: DeserializeOwned + Default>(&self) -> Result<T, BindError> {
        if self.body.is_empty() {
            return Ok(T::default());
        }
        match self.media_type().as_deref() {
            None => Err(BindError::MissingContentType),
            Some("application/json") => Ok(serde_json::from_slice(&self.body)?),
            Some("application/xml" | "text/xml") => {
                let text = String::from_utf8_lossy(&self.body);
                Ok(serde_xml_rs::from_str(&text)?)
            }
            Some("application/x-www-form-urlencoded") => Ok(serde_urlencoded::from_bytes(&self.body)?),
            Some(other) => Err(BindError::UnsupportedMediaType(other.to_owned())),
        }
    }

    /// Starts reading a `multipart/form-data` body.
    pub fn multipart(&self) -> Result<Multipart, MultipartError> {
        Multipart::new(self.header(CONTENT_TYPE.as_str()), self.body.clone())
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts, body)
    }
}

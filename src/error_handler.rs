//! Centralized error mapping.
//!
//! Whatever [`HttpError`] escapes the middleware chain lands here and is
//! turned into an envelope. The body format follows the request's declared
//! content type: `application/xml` gets XML, everything else JSON.

use http::{Method, StatusCode};
use serde::Serialize;
use tracing::{error, warn};

use crate::api::Envelope;
use crate::error::HttpError;
use crate::response::{ContentType, Response};

/// Message used when an error carries none of its own.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

/// Signature of a pluggable error handler, see `Router::error_handler`.
pub type ErrorHandler = fn(&ErrorContext, HttpError) -> Response;

/// What the error handler knows about the failed request.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
}

impl ErrorContext {
    fn wants_xml(&self) -> bool {
        self.content_type.as_deref() == Some("application/xml")
    }
}

#[derive(Serialize)]
#[serde(rename = "response")]
struct XmlError<'a> {
    error: &'a str,
    code: u16,
    success: bool,
}

/// The default error handler.
pub fn default_error_handler(ctx: &ErrorContext, err: HttpError) -> Response {
    let status = err.status();
    if status.is_server_error() {
        error!(method = %ctx.method, path = %ctx.path, status = status.as_u16(), "{err}");
    } else {
        warn!(method = %ctx.method, path = %ctx.path, status = status.as_u16(), "{err}");
    }

    let message = match err.message() {
        Some(message) => message.to_owned(),
        None if status == StatusCode::INTERNAL_SERVER_ERROR => INTERNAL_ERROR_MESSAGE.to_owned(),
        None => status.canonical_reason().unwrap_or(INTERNAL_ERROR_MESSAGE).to_owned(),
    };
    let headers = err.into_headers();

    if ctx.wants_xml() {
        let body = XmlError { error: &message, code: status.as_u16(), success: false };
        match serde_xml_rs::to_string(&body) {
            Ok(xml) => {
                return Response::builder().status(status).headers(headers).bytes(ContentType::Xml, xml);
            }
            Err(e) => error!("failed to serialize xml error body: {e}"),
        }
    }

    let mut res = Envelope::<()>::failure(message, "").to_response(status);
    res.headers_mut().extend(headers);
    res
}

#[cfg(test)]
mod tests {
    use http::header::ALLOW;

    use super::*;

    fn ctx(content_type: Option<&str>) -> ErrorContext {
        ErrorContext {
            method: Method::GET,
            path: "/boom".to_owned(),
            content_type: content_type.map(str::to_owned),
        }
    }

    async fn body(res: Response) -> String {
        String::from_utf8(res.body_bytes().await.unwrap().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn internal_errors_get_generic_message() {
        let res = default_error_handler(&ctx(None), HttpError::internal("db exploded"));
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let env: Envelope = serde_json::from_str(&body(res).await).unwrap();
        assert!(!env.success);
        assert_eq!(env.message, INTERNAL_ERROR_MESSAGE);
        assert_eq!(env.error.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn keeps_status_and_message() {
        let res = default_error_handler(&ctx(Some("application/json")), HttpError::not_found("Arquivo não encontrado"));
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        let env: Envelope = serde_json::from_str(&body(res).await).unwrap();
        assert_eq!(env.message, "Arquivo não encontrado");
    }

    #[tokio::test]
    async fn status_only_errors_use_reason_phrase() {
        let res = default_error_handler(&ctx(None), HttpError::from_status(StatusCode::CONFLICT));
        let env: Envelope = serde_json::from_str(&body(res).await).unwrap();
        assert_eq!(env.message, "Conflict");
    }

    #[tokio::test]
    async fn xml_requests_get_xml() {
        let res = default_error_handler(&ctx(Some("application/xml")), HttpError::bad_request("bad"));
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(res.header("content-type"), Some("application/xml"));
        let xml = body(res).await;
        assert!(xml.contains("<error>bad</error>"), "{xml}");
        assert!(xml.contains("<code>400</code>"), "{xml}");
        assert!(xml.contains("<success>false</success>"), "{xml}");
    }

    #[test]
    fn error_headers_are_forwarded() {
        let err = HttpError::method_not_allowed(&[Method::GET]);
        let res = default_error_handler(&ctx(None), err);
        assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.header(ALLOW.as_str()), Some("GET"));
    }
}

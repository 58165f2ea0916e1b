//! Cross-origin resource sharing.
//!
//! Requests without an `Origin` header are not cross-origin and pass
//! through untouched. An `OPTIONS` request with an `Origin` is a preflight
//! and is answered here with `204`; it never reaches the router.

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_REQUEST_HEADERS, HeaderValue, ORIGIN, VARY,
};
use http::{Method, StatusCode};

use crate::handler::{BoxFuture, Outcome};
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;

pub const DEFAULT_ALLOW_METHODS: &str = "GET, HEAD, PUT, PATCH, POST, DELETE";

const PREFLIGHT_VARY: &str = "Origin, Access-Control-Request-Method, Access-Control-Request-Headers";

/// Allows any origin by default.
pub struct Cors {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
}

impl Cors {
    /// Only `origin` is allowed. Falls back to `*` if it is not a valid
    /// header value.
    pub fn new(origin: &str) -> Self {
        Self {
            allow_origin: HeaderValue::from_str(origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
            ..Self::default()
        }
    }

    fn preflight(&self, req: &Request) -> Response {
        let mut res = Response::status(StatusCode::NO_CONTENT);
        let headers = res.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        if let Some(requested) = req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        headers.insert(VARY, HeaderValue::from_static(PREFLIGHT_VARY));
        res
    }
}

impl Default for Cors {
    fn default() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_methods: HeaderValue::from_static(DEFAULT_ALLOW_METHODS),
        }
    }
}

impl Middleware for Cors {
    fn name(&self) -> &'static str { "cors" }

    fn process<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            if !req.headers().contains_key(ORIGIN) {
                return next.run(req).await;
            }
            if *req.method() == Method::OPTIONS {
                return Ok(self.preflight(&req));
            }

            match next.run(req).await {
                Ok(mut res) => {
                    let headers = res.headers_mut();
                    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
                    headers.append(VARY, HeaderValue::from_static("Origin"));
                    Ok(res)
                }
                Err(err) => Err(err
                    .with_header(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone())
                    .with_header(VARY, HeaderValue::from_static("Origin"))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::error::HttpError;
    use crate::handler::Handler;
    use crate::middleware::{Endpoint, SharedMiddleware};

    fn request(method: Method, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().method(method).uri("/items");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Bytes::new()).unwrap().into()
    }

    async fn run(cors: Cors, req: Request) -> Outcome {
        let handler = (|_req: Request| async { "items" }).into_boxed_handler();
        let chain: Vec<SharedMiddleware> = vec![Arc::new(cors)];
        Next::new(&chain, &[], Endpoint::Handler(&handler)).run(req).await
    }

    #[tokio::test]
    async fn preflight_short_circuits() {
        let req = request(
            Method::OPTIONS,
            &[
                ("origin", "https://app.example"),
                ("access-control-request-method", "POST"),
                ("access-control-request-headers", "content-type, authorization"),
            ],
        );
        let res = run(Cors::default(), req).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(res.header("access-control-allow-origin"), Some("*"));
        assert_eq!(res.header("access-control-allow-methods"), Some(DEFAULT_ALLOW_METHODS));
        assert_eq!(res.header("access-control-allow-headers"), Some("content-type, authorization"));
        assert!(res.body_bytes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cross_origin_response_gets_allow_origin() {
        let res = run(Cors::new("https://app.example"), request(Method::GET, &[("origin", "https://app.example")]))
            .await
            .unwrap();
        assert_eq!(res.header("access-control-allow-origin"), Some("https://app.example"));
        assert_eq!(res.header("vary"), Some("Origin"));
        assert_eq!(res.body_bytes().await.unwrap(), "items");
    }

    #[tokio::test]
    async fn same_origin_is_untouched() {
        let res = run(Cors::default(), request(Method::GET, &[])).await.unwrap();
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn error_outcome_carries_allow_origin() {
        let chain: Vec<SharedMiddleware> = vec![Arc::new(Cors::default())];
        let err = Next::new(&chain, &[], Endpoint::Reject(HttpError::not_found("Not Found")))
            .run(request(Method::GET, &[("origin", "https://app.example")]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }
}

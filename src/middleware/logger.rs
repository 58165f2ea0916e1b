//! Per-request start/finish records.

use std::time::Instant;

use tracing::{info, warn};

use crate::handler::{BoxFuture, Outcome};
use crate::middleware::{Middleware, Next};
use crate::request::Request;

/// Logs every request on entry and again on exit with the elapsed time.
///
/// The exit record is written whether the rest of the chain produced a
/// response or an error; the outcome itself passes through untouched.
pub struct RequestLogger;

impl Middleware for RequestLogger {
    fn name(&self) -> &'static str { "request-logger" }

    fn process<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let method = req.method().clone();
            let path = req.path().to_owned();
            let start = Instant::now();
            info!(%method, %path, "request started");

            let outcome = next.run(req).await;

            let elapsed = start.elapsed();
            match &outcome {
                Ok(res) => info!(%method, %path, status = res.status_code().as_u16(), ?elapsed, "request finished"),
                Err(err) => warn!(%method, %path, status = err.status().as_u16(), ?elapsed, error = %err, "request failed"),
            }
            outcome
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::api::Envelope;
    use crate::error::HttpError;
    use crate::handler::Handler;
    use crate::middleware::{Endpoint, SharedMiddleware};

    fn request(method: &str, uri: &str) -> Request {
        http::Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap().into()
    }

    fn chain() -> Vec<SharedMiddleware> {
        vec![Arc::new(RequestLogger)]
    }

    #[tokio::test]
    async fn passes_response_through() {
        let handler = (|_req: Request| async { "success" }).into_boxed_handler();
        let chain = chain();
        let res = Next::new(&chain, &[], Endpoint::Handler(&handler))
            .run(request("GET", "/test"))
            .await
            .unwrap();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body_bytes().await.unwrap(), "success");
    }

    #[tokio::test]
    async fn passes_created_status_through() {
        let handler = (|_req: Request| async {
            Ok::<_, HttpError>((StatusCode::CREATED, Envelope::success("created", "ok")))
        })
        .into_boxed_handler();
        let chain = chain();
        let res = Next::new(&chain, &[], Endpoint::Handler(&handler))
            .run(request("POST", "/api/users"))
            .await
            .unwrap();
        assert_eq!(res.status_code(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn passes_error_through() {
        let handler = (|_req: Request| async {
            Err::<&'static str, _>(HttpError::bad_request("Bad request"))
        })
        .into_boxed_handler();
        let chain = chain();
        let err = Next::new(&chain, &[], Endpoint::Handler(&handler))
            .run(request("GET", "/error"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), Some("Bad request"));
    }
}

//! The response envelope every JSON endpoint answers with.
//!
//! ```json
//! { "success": true,  "message": "…", "data": { … } }
//! { "success": false, "message": "…", "error": "…" }
//! ```

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::response::{IntoResponse, Response};

/// Uniform success/error wrapper.
///
/// A success carries `data` (possibly absent), a failure carries `error`
/// (possibly empty). Absent fields are left out of the JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T = Value> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: message.into(), data: Some(data), error: None }
    }

    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None, error: Some(error.into()) }
    }
}

impl Envelope {
    /// A success with nothing but a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), data: None, error: None }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_response(&self, status: StatusCode) -> Response {
        match serde_json::to_vec(self) {
            Ok(body) => Response::builder().status(status).json(body),
            Err(e) => {
                error!("failed to serialize envelope: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// `(StatusCode::CREATED, Envelope::success(…))` straight from a handler.
impl<T: Serialize> IntoResponse for (StatusCode, Envelope<T>) {
    fn into_response(self) -> Response {
        self.1.to_response(self.0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_omits_error() {
        let env = Envelope::success("ok", json!({"id": 1}));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value, json!({"success": true, "message": "ok", "data": {"id": 1}}));
    }

    #[test]
    fn failure_keeps_empty_error_and_omits_data() {
        let env: Envelope = Envelope::failure("Nome é obrigatório", "");
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value, json!({"success": false, "message": "Nome é obrigatório", "error": ""}));
    }

    #[test]
    fn message_only() {
        let value = serde_json::to_value(Envelope::message("deleted")).unwrap();
        assert_eq!(value, json!({"success": true, "message": "deleted"}));
    }

    #[test]
    fn round_trip_preserves_success_and_message() {
        let original = Envelope::success("Busca realizada", vec!["a", "b"]);
        let bytes = serde_json::to_vec(&original).unwrap();
        let decoded: Envelope<Vec<String>> = serde_json::from_slice(&bytes).unwrap();
        assert!(decoded.success);
        assert_eq!(decoded.message, "Busca realizada");
        assert_eq!(decoded.data.unwrap(), ["a", "b"]);
        assert!(decoded.error.is_none());
    }

    #[tokio::test]
    async fn tuple_into_response_sets_status() {
        let res = (StatusCode::CREATED, Envelope::success("created", 7)).into_response();
        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.header("content-type"), Some("application/json"));
        let body: Envelope<u32> = serde_json::from_slice(&res.body_bytes().await.unwrap()).unwrap();
        assert_eq!(body.data, Some(7));
    }
}

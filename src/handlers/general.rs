//! Rendering demos: JSON, plain text, HTML, XML, query strings.

use std::borrow::Cow;

use http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::api::Envelope;
use crate::error::HttpError;
use crate::models::User;
use crate::request::Request;
use crate::response::{ContentType, IntoResponse, Response};

pub const FEATURES: &[&str] = &[
    "Radix-tree router",
    "Route groups",
    "Middleware chain",
    "Panic recovery",
    "CORS",
    "Centralized error handling",
    "Data binding (JSON, XML, form)",
    "JSON / XML / HTML rendering",
    "File upload and download",
    "Chunked streaming",
    "JWT login",
    "HTTP/1.1 and HTTP/2",
    "Graceful shutdown",
];

pub async fn home(_req: Request) -> Response {
    let data = json!({
        "framework": "tsu",
        "version": env!("CARGO_PKG_VERSION"),
        "features": FEATURES,
    });
    (StatusCode::OK, Envelope::success("Bem-vindo ao Echo Playground!", data)).into_response()
}

pub async fn hello(req: Request) -> Response {
    let name = req.param("name").unwrap_or_default();
    Response::text(format!("Olá, {name}! Bem-vindo ao Echo!"))
}

pub async fn html(_req: Request) -> Response {
    Response::html(render_index("Echo Playground", "Esta é uma página HTML renderizada pelo tsu!"))
}

pub async fn xml(_req: Request) -> Result<Response, HttpError> {
    let mut user = User::new("João Silva", "joao@exemplo.com", 30);
    user.set_id(1);
    let body = serde_xml_rs::to_string(&user).map_err(|e| HttpError::internal(e.to_string()))?;
    Ok(Response::builder().bytes(ContentType::Xml, body))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchParams {
    q: String,
    limit: String,
}

/// Echoes `q` and `limit` back verbatim, next to three canned results.
pub async fn search(req: Request) -> Result<Response, HttpError> {
    let params: SearchParams = req.query()?;
    let data = json!({
        "query": params.q,
        "limit": params.limit,
        "results": ["resultado 1", "resultado 2", "resultado 3"],
    });
    Ok((StatusCode::OK, Envelope::success("Busca realizada", data)).into_response())
}

/// Placeholder: answers with JSON and never upgrades the connection.
pub async fn websocket(_req: Request) -> Response {
    let data = json!({ "protocol": "WebSocket", "status": "Ready for upgrade" });
    (StatusCode::OK, Envelope::success("Endpoint WebSocket (implementação completa requer upgrade)", data))
        .into_response()
}

fn render_index(title: &str, message: &str) -> String {
    let title = escape(title);
    let message = escape(message);
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"pt-BR\">\n\
         <head>\n  <meta charset=\"utf-8\">\n  <title>{title}</title>\n</head>\n\
         <body>\n  <h1>{title}</h1>\n  <p>{message}</p>\n</body>\n\
         </html>\n"
    )
}

fn escape(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_only_allocates_when_needed() {
        assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn index_contains_title_and_message() {
        let page = render_index("T<1>", "hi");
        assert!(page.contains("<title>T&lt;1&gt;</title>"));
        assert!(page.contains("<p>hi</p>"));
    }
}

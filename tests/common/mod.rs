#![allow(dead_code)]

use bytes::Bytes;
use http::Method;
use serde_json::Value;
use tempfile::TempDir;
use tsu_playground::{Config, Request, Response, Router, routes};

pub const TOKEN: &str = "valid-token";
pub const SECRET: &str = "test-secret";

/// The full application over a throwaway upload directory.
pub struct Playground {
    pub dir: TempDir,
    pub router: Router,
}

impl Playground {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            upload_dir: dir.path().to_path_buf(),
            jwt_secret: SECRET.to_owned(),
            ..Config::default()
        };
        Self { router: routes::app(&config), dir }
    }

    pub async fn send(&self, req: Request) -> Response {
        self.router.handle(req).await
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(request(Method::GET, uri, &[], "")).await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> Response {
        self.send(request(Method::POST, uri, &[("content-type", "application/json")], body.to_owned()))
            .await
    }
}

pub fn request(method: Method, uri: &str, headers: &[(&str, &str)], body: impl Into<Bytes>) -> Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    Request::from(builder.body(body.into()).unwrap())
}

pub async fn text(res: Response) -> String {
    String::from_utf8(res.body_bytes().await.unwrap().to_vec()).unwrap()
}

pub async fn json(res: Response) -> Value {
    serde_json::from_slice(&res.body_bytes().await.unwrap()).unwrap()
}

/// A `multipart/form-data` body with a single file field.
pub fn multipart(field: &str, filename: &str, contents: &str) -> (String, String) {
    let boundary = "tsu-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         {contents}\r\n\
         --{boundary}--\r\n"
    );
    (format!("multipart/form-data; boundary={boundary}"), body)
}

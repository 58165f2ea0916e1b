//! `multipart/form-data` bodies, for file uploads.
//!
//! The body has already been read into memory by the server, so the field
//! stream is fed from a single chunk. Fields are still handed out one at a
//! time and their contents can be consumed chunk by chunk.

use std::io;

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MultipartError {
    #[error("missing content type, expected multipart/form-data")]
    MissingContentType,

    #[error("missing or invalid multipart boundary")]
    InvalidBoundary,

    #[error("no field named `{0}`")]
    FieldNotFound(String),

    #[error("multipart parse error: {0}")]
    Parse(#[from] multer::Error),
}

/// A multipart body being read field by field.
pub struct Multipart {
    inner: multer::Multipart<'static>,
}

impl Multipart {
    pub(crate) fn new(content_type: Option<&str>, body: Bytes) -> Result<Self, MultipartError> {
        let content_type = content_type.ok_or(MultipartError::MissingContentType)?;
        let boundary =
            multer::parse_boundary(content_type).map_err(|_| MultipartError::InvalidBoundary)?;
        let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
        Ok(Self { inner: multer::Multipart::new(stream, boundary) })
    }

    /// Next field in the body, `None` once all have been read.
    pub async fn next_field(&mut self) -> Result<Option<multer::Field<'static>>, MultipartError> {
        Ok(self.inner.next_field().await?)
    }

    /// Skips forward to the field called `name`.
    pub async fn field(&mut self, name: &str) -> Result<multer::Field<'static>, MultipartError> {
        while let Some(field) = self.next_field().await? {
            if field.name() == Some(name) {
                return Ok(field);
            }
        }
        Err(MultipartError::FieldNotFound(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "X-BOUNDARY";

    fn body() -> Bytes {
        Bytes::from(format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             hello\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             file contents\r\n\
             --{BOUNDARY}--\r\n"
        ))
    }

    #[tokio::test]
    async fn finds_named_field() {
        let ct = format!("multipart/form-data; boundary={BOUNDARY}");
        let mut mp = Multipart::new(Some(&ct), body()).unwrap();
        let field = mp.field("file").await.unwrap();
        assert_eq!(field.file_name(), Some("a.txt"));
        assert_eq!(field.bytes().await.unwrap(), "file contents");
    }

    #[tokio::test]
    async fn missing_field_is_reported() {
        let ct = format!("multipart/form-data; boundary={BOUNDARY}");
        let mut mp = Multipart::new(Some(&ct), body()).unwrap();
        assert!(matches!(mp.field("avatar").await, Err(MultipartError::FieldNotFound(_))));
    }

    #[test]
    fn rejects_non_multipart_content_type() {
        assert!(matches!(
            Multipart::new(Some("application/json"), Bytes::new()),
            Err(MultipartError::InvalidBoundary)
        ));
        assert!(matches!(Multipart::new(None, Bytes::new()), Err(MultipartError::MissingContentType)));
    }
}

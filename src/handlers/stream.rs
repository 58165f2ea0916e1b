//! Chunked streaming demo.

use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream;

use crate::request::Request;
use crate::response::{ContentType, Response};

pub const CHUNK_COUNT: u32 = 10;
pub const CHUNK_INTERVAL: Duration = Duration::from_millis(500);

/// Sends `Chunk 1\n` through `Chunk 10\n`, each after a half-second pause.
/// Every chunk is its own body frame, so clients see them as they are
/// produced.
pub async fn stream(_req: Request) -> Response {
    let chunks = stream::unfold(1, |n| async move {
        if n > CHUNK_COUNT {
            return None;
        }
        tokio::time::sleep(CHUNK_INTERVAL).await;
        Some((Ok::<_, io::Error>(Bytes::from(format!("Chunk {n}\n"))), n + 1))
    });
    Response::builder().stream(ContentType::Text, chunks)
}

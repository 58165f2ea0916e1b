//! File upload into, and download from, the configured upload directory.

use std::io;
use std::path::Path;
use std::sync::Arc;

use http::header::{CONTENT_DISPOSITION, HeaderValue};
use http::StatusCode;
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::{AppState, bad_request, failure};
use crate::api::Envelope;
use crate::error::HttpError;
use crate::request::Request;
use crate::response::{ContentType, IntoResponse, Response};

/// Form field that carries the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Reduces a client-supplied name to its final path component, so nothing
/// lands outside the upload directory.
fn safe_file_name(raw: &str) -> Option<String> {
    let name = Path::new(raw).file_name()?.to_str()?;
    (!name.is_empty()).then(|| name.to_owned())
}

pub async fn upload(state: Arc<AppState>, req: Request) -> Response {
    let field = match req.multipart() {
        Ok(mut multipart) => multipart.field(FILE_FIELD).await,
        Err(e) => Err(e),
    };
    let mut field = match field {
        Ok(field) => field,
        Err(e) => return bad_request("Erro ao processar arquivo", e.to_string()),
    };
    let Some(filename) = field.file_name().and_then(safe_file_name) else {
        return bad_request("Erro ao processar arquivo", "nome de arquivo ausente ou inválido");
    };

    let path = state.upload_dir.join(&filename);
    let mut file = match tokio::fs::File::create(&path).await {
        Ok(file) => file,
        Err(e) => {
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao salvar arquivo", e.to_string());
        }
    };

    let mut size: u64 = 0;
    let copied: Result<(), String> = async {
        while let Some(chunk) = field.chunk().await.map_err(|e| e.to_string())? {
            file.write_all(&chunk).await.map_err(|e| e.to_string())?;
            size += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| e.to_string())
    }
    .await;

    if let Err(e) = copied {
        drop(file);
        if let Err(remove) = tokio::fs::remove_file(&path).await {
            debug!(path = %path.display(), "could not remove partial upload: {remove}");
        }
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao copiar arquivo", e);
    }

    info!(%filename, size, "file uploaded");
    let data = json!({ "filename": filename, "size": size });
    (StatusCode::OK, Envelope::success("Arquivo enviado com sucesso", data)).into_response()
}

/// Serves a stored file as an attachment. A file that is not there is an
/// error for the error handler rather than a local envelope.
pub async fn download(state: Arc<AppState>, req: Request) -> Result<Response, HttpError> {
    let filename = req
        .param("filename")
        .and_then(safe_file_name)
        .ok_or_else(|| HttpError::bad_request("Nome de arquivo inválido"))?;

    let contents = match tokio::fs::read(state.upload_dir.join(&filename)).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(HttpError::not_found("Arquivo não encontrado"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Response::builder()
        .header(CONTENT_DISPOSITION, attachment(&filename))
        .bytes(ContentType::OctetStream, contents))
}

/// `Content-Disposition` for `filename`, using the RFC 6266 extended form
/// when the name is not plain ASCII.
fn attachment(filename: &str) -> HeaderValue {
    let quoted_ok = filename.chars().all(|c| c.is_ascii_graphic() || c == ' ') && !filename.contains(['"', '\\']);
    let value = if quoted_ok {
        format!("attachment; filename=\"{filename}\"")
    } else {
        format!("attachment; filename*=UTF-8''{}", urlencoding::encode(filename))
    };
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("report.pdf", Some("report.pdf"))]
    #[case("../../etc/passwd", Some("passwd"))]
    #[case("dir/inner.txt", Some("inner.txt"))]
    #[case("..", None)]
    #[case("", None)]
    fn file_names_are_reduced_to_one_component(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(safe_file_name(raw).as_deref(), expected);
    }

    #[test]
    fn attachment_quotes_ascii_and_encodes_the_rest() {
        assert_eq!(attachment("a b.txt"), "attachment; filename=\"a b.txt\"");
        assert_eq!(attachment("relatório.txt"), "attachment; filename*=UTF-8''relat%C3%B3rio.txt");
    }
}

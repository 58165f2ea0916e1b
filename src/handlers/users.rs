//! User creation, login and the authenticated profile.

use std::sync::Arc;

use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::{AppState, bad_request, failure};
use crate::api::Envelope;
use crate::models::User;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Id handed to every created or logged-in user.
pub const DEMO_USER_ID: i64 = 123;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginRequest {
    username: String,
    password: String,
}

pub async fn create_user(req: Request) -> Response {
    let mut user: User = match req.bind() {
        Ok(user) => user,
        Err(e) => return bad_request("Erro ao processar dados", e.to_string()),
    };
    if user.name.is_empty() {
        return bad_request("Nome é obrigatório", "");
    }

    user.set_id(DEMO_USER_ID);
    user.stamp_created();
    (StatusCode::CREATED, Envelope::success("Usuário criado com sucesso", user)).into_response()
}

/// Any non-empty username and password pair is accepted.
pub async fn login(state: Arc<AppState>, req: Request) -> Response {
    let login: LoginRequest = match req.bind() {
        Ok(login) => login,
        Err(e) => return bad_request("Dados de login inválidos", e.to_string()),
    };
    if login.username.is_empty() || login.password.is_empty() {
        return bad_request("Username e password são obrigatórios", "");
    }

    let issued = match state.tokens.issue(DEMO_USER_ID, &login.username) {
        Ok(issued) => issued,
        Err(e) => {
            error!(username = %login.username, "token signing failed: {e}");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao gerar token", e.to_string());
        }
    };
    info!(username = %login.username, expires = issued.expires, "token issued");

    let data = json!({
        "token": issued.token,
        "user_id": DEMO_USER_ID,
        "username": login.username,
        "expires": issued.expires,
    });
    (StatusCode::OK, Envelope::success("Login realizado com sucesso", data)).into_response()
}

pub async fn profile(_req: Request) -> Response {
    let mut user = User::new("Usuário Autenticado", "user@exemplo.com", 25);
    user.set_id(1);
    (StatusCode::OK, Envelope::success("Perfil do usuário autenticado", user)).into_response()
}

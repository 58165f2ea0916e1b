//! The `/products` resource over a fixed in-memory catalogue.
//!
//! Writes are acknowledged but never stored.

use http::StatusCode;
use serde_json::Value;

use super::bad_request;
use crate::api::Envelope;
use crate::error::HttpError;
use crate::models::Product;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Id assigned to a newly created product.
pub const NEXT_PRODUCT_ID: i64 = 4;

fn catalogue() -> Vec<Product> {
    let mut products = vec![
        Product::new("Laptop", "Laptop de alta performance", "Eletrônicos", 2999.99),
        Product::new("Mouse", "Mouse sem fio", "Acessórios", 89.99),
        Product::new("Teclado", "Teclado mecânico", "Acessórios", 199.99),
    ];
    for (id, product) in (1..).zip(products.iter_mut()) {
        product.set_id(id);
    }
    products
}

fn path_id(req: &Request) -> Option<i64> {
    req.param("id")?.parse().ok()
}

pub async fn list(_req: Request) -> Response {
    (StatusCode::OK, Envelope::success("Produtos listados com sucesso", catalogue())).into_response()
}

pub async fn get(req: Request) -> Result<Response, HttpError> {
    let Some(id) = path_id(&req) else {
        return Ok(bad_request("ID de produto inválido", ""));
    };
    let product = catalogue()
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| HttpError::not_found("Produto não encontrado"))?;
    Ok((StatusCode::OK, Envelope::success("Produto encontrado", product)).into_response())
}

pub async fn create(req: Request) -> Response {
    let mut product: Product = match req.bind() {
        Ok(product) => product,
        Err(e) => return bad_request("Erro ao processar dados do produto", e.to_string()),
    };
    product.set_id(NEXT_PRODUCT_ID);
    (StatusCode::CREATED, Envelope::success("Produto criado com sucesso", product)).into_response()
}

pub async fn update(req: Request) -> Response {
    let Some(id) = path_id(&req) else {
        return bad_request("ID de produto inválido", "");
    };
    let mut product: Product = match req.bind() {
        Ok(product) => product,
        Err(e) => return bad_request("Erro ao processar dados do produto", e.to_string()),
    };
    product.set_id(id);
    (StatusCode::OK, Envelope::success("Produto atualizado com sucesso", product)).into_response()
}

/// The id is echoed back as given.
pub async fn delete(req: Request) -> Response {
    let id = req.param("id").unwrap_or_default();
    Envelope::<Value>::message(format!("Produto com ID {id} deletado com sucesso")).to_response(StatusCode::OK)
}

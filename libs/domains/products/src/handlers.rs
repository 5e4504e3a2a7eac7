use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{delete, get, patch, post, put},
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, IdPath, JsonBody, ParsedPath, QueryParams,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::{INSERT_ERRORS_HEADING, ProductError, ValidationLayout};
use crate::models::{NameQuery, Product, ProductInput, ProductPatch};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const INSERTED_MESSAGE: &str = "Produto inserido com sucesso";
pub const DELETED_MESSAGE: &str = "Produto excluído com sucesso";
pub const UPDATED_MESSAGE: &str = "Produto atualizado com sucesso";

type SharedService<R> = State<Arc<ProductService<R>>>;

/// Create the product router; nest it under `/produtos`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/selecionar", get(list_products))
        .route("/inserir", post(create_product))
        .route("/excluir/{id}", delete(delete_product))
        .route("/atualizar/{id}", put(update_product))
        .route("/atualizarParcial/{id}", patch(partial_update_product))
        .route("/buscarPorId/{id}", get(get_product))
        .route("/buscarPorNome", get(search_products))
        .route("/contarPorQuantidade/{quant}", get(count_low_stock))
        .with_state(shared_service)
}

fn audit(action: &str, product: &Product, headers: &HeaderMap) {
    AuditEvent::new(
        action,
        Some(format!("product:{}", product.id)),
        AuditOutcome::Success,
    )
    .with_request(headers)
    .with_details(json!({
        "nome": product.name,
        "preco": product.price,
        "quantidadeEstoque": product.stock_quantity,
    }))
    .log();
}

async fn list_products<R: ProductRepository>(
    State(service): SharedService<R>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = service.list_all().await?;
    Ok(Json(products))
}

async fn create_product<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    JsonBody(input): JsonBody<ProductInput>,
) -> Result<&'static str, AppError> {
    let product = service
        .create(input)
        .await
        .map_err(|e| e.into_app_error(ValidationLayout::Summary(INSERT_ERRORS_HEADING)))?;

    audit("product.create", &product, &headers);
    Ok(INSERTED_MESSAGE)
}

async fn delete_product<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    ParsedPath(id): IdPath,
) -> Result<&'static str, AppError> {
    let product = service.delete(id).await?;

    audit("product.delete", &product, &headers);
    Ok(DELETED_MESSAGE)
}

async fn update_product<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    ParsedPath(id): IdPath,
    JsonBody(input): JsonBody<ProductInput>,
) -> Result<&'static str, AppError> {
    let product = service
        .update(id, input)
        .await
        .map_err(|e| e.into_app_error(ValidationLayout::Summary(INSERT_ERRORS_HEADING)))?;

    audit("product.update", &product, &headers);
    Ok(UPDATED_MESSAGE)
}

async fn partial_update_product<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    ParsedPath(id): IdPath,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> Result<Json<Product>, AppError> {
    let product = service
        .partial_update(id, patch)
        .await
        .map_err(|e| e.into_app_error(ValidationLayout::FieldMap))?;

    audit("product.partial_update", &product, &headers);
    Ok(Json(product))
}

async fn get_product<R: ProductRepository>(
    State(service): SharedService<R>,
    ParsedPath(id): IdPath,
) -> Result<Json<Product>, AppError> {
    let product = service.get_by_id(id).await?;
    Ok(Json(product))
}

async fn search_products<R: ProductRepository>(
    State(service): SharedService<R>,
    QueryParams(query): QueryParams<NameQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = service.search_by_name(&query.nome).await?;
    if products.is_empty() {
        return Err(ProductError::NoResults.into());
    }
    Ok(Json(products))
}

async fn count_low_stock<R: ProductRepository>(
    State(service): SharedService<R>,
    ParsedPath(quant): ParsedPath<i32>,
) -> Result<String, AppError> {
    let count = service.count_low_stock(quant).await?;
    if count == 0 {
        return Err(ProductError::NoResults.into());
    }
    Ok(format!("Existem {count} de produtos com estoque {quant}"))
}

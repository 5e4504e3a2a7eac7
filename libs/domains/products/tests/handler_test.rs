//! Handler tests for Products domain
//!
//! These tests drive the `/produtos` router with in-memory storage:
//! - Request deserialization (JSON → Rust structs)
//! - Response bodies, text messages and HTTP status codes
//! - Error envelopes
//!
//! The router is exercised without the application shell (no `/api` prefix,
//! no middleware).

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

fn app() -> (Router, ProductService<InMemoryProductRepository>) {
    let service = ProductService::new(InMemoryProductRepository::new());
    (handlers::router(service.clone()), service)
}

async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

async fn text_body(body: Body) -> String {
    String::from_utf8(body_bytes(body).await).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn seed(service: &ProductService<InMemoryProductRepository>, name: &str, qty: i32) -> Product {
    service
        .create(ProductInput {
            name: Some(name.to_string()),
            description: Some("Material escolar".to_string()),
            price: Some(2.5),
            stock_quantity: Some(qty),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_insert_returns_success_message() {
    let (app, service) = app();
    let builder = TestDataBuilder::from_test_name("handler_insert");
    let name = builder.name("caneta", "azul");

    let response = app
        .oneshot(json_request(
            "POST",
            "/inserir",
            json!({
                "nome": name,
                "descricao": "Azul",
                "preco": builder.price(50.0),
                "quantidadeEstoque": builder.quantity(100)
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response.into_body()).await, "Produto inserido com sucesso");

    let stored = service.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, name);
}

#[tokio::test]
async fn test_insert_ignores_client_id() {
    let (app, service) = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/inserir",
            json!({"id": 999, "nome": "Caderno", "preco": 15.0, "quantidadeEstoque": 3}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(service.list_all().await.unwrap()[0].id, 1);
}

#[tokio::test]
async fn test_insert_reports_validation_errors_in_input_order() {
    let (app, service) = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/inserir",
            json!({"nome": "C", "preco": 2.5, "quantidadeEstoque": -1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert_eq!(
        error.message,
        "Erros ao inserir produto:\n- O nome deve ter pelo menos dois caracteres;\n- A quantidade deve ser no minimo 0;"
    );
    assert_eq!(
        error.details,
        Some(json!([
            "O nome deve ter pelo menos dois caracteres",
            "A quantidade deve ser no minimo 0"
        ]))
    );
    assert!(service.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_insert_rejects_malformed_json() {
    let (app, _) = app();

    let request = Request::builder()
        .method("POST")
        .uri("/inserir")
        .header("content-type", "application/json")
        .body(Body::from("{\"nome\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_select_lists_all_products() {
    let (app, service) = app();
    seed(&service, "Caneta", 10).await;
    seed(&service, "Lápis", 5).await;

    let response = app.oneshot(empty_request("GET", "/selecionar")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["nome"], "Caneta");
    assert_eq!(products[0]["quantidadeEstoque"], 10);
    assert_eq!(products[1]["id"], 2);
}

#[tokio::test]
async fn test_get_by_id() {
    let (app, service) = app();
    let created = seed(&service, "Caneta", 10).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/buscarPorId/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product, created);

    let response = app.oneshot(empty_request("GET", "/buscarPorId/404")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Produto não encontrado com id: 404");
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let (app, _) = app();

    let response = app.oneshot(empty_request("GET", "/buscarPorId/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_PATH_PARAM");
}

#[tokio::test]
async fn test_delete_then_lookup_is_not_found() {
    let (app, service) = app();
    let created = seed(&service, "Caneta", 10).await;

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/excluir/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response.into_body()).await, "Produto excluído com sucesso");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/excluir/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", &format!("/buscarPorId/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let (app, service) = app();
    let created = seed(&service, "Caneta", 10).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/atualizar/{}", created.id),
            json!({"nome": "Caderno", "preco": 15.0, "quantidadeEstoque": 3}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response.into_body()).await, "Produto atualizado com sucesso");

    let updated = service.get_by_id(created.id).await.unwrap();
    assert_eq!(updated.name, "Caderno");
    assert_eq!(updated.description, None);
    assert_eq!(updated.stock_quantity, 3);
}

#[tokio::test]
async fn test_update_validation_and_missing_id() {
    let (app, service) = app();
    let created = seed(&service, "Caneta", 10).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/atualizar/{}", created.id),
            json!({"nome": "Caderno", "quantidadeEstoque": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Erros ao inserir produto:\n- O preço não pode ser nulo;");

    let response = app
        .oneshot(json_request(
            "PUT",
            "/atualizar/77",
            json!({"nome": "Caderno", "preco": 15.0, "quantidadeEstoque": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update_returns_saved_product() {
    let (app, service) = app();
    let created = seed(&service, "Caneta", 10).await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/atualizarParcial/{}", created.id),
            json!({"preco": 10.5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.price, 10.5);
    assert_eq!(product.name, created.name);
    assert_eq!(product.description, created.description);
    assert_eq!(product.stock_quantity, created.stock_quantity);
}

#[tokio::test]
async fn test_partial_update_reports_field_map() {
    let (app, service) = app();
    let created = seed(&service, "Caneta", 10).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/atualizarParcial/{}", created.id),
            json!({"nome": "X", "quantidadeEstoque": -5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(
        error.details,
        Some(json!({
            "nome": "O nome deve ter pelo menos dois caracteres",
            "quantidadeEstoque": "A quantidade deve ser no minimo 0"
        }))
    );

    let response = app
        .oneshot(json_request("PATCH", "/atualizarParcial/99", json!({"preco": 1.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_by_name() {
    let (app, service) = app();
    seed(&service, "Caneta Azul", 10).await;
    seed(&service, "Lápis", 5).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/buscarPorNome?nome=caneta"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Caneta Azul");

    let response = app
        .oneshot(empty_request("GET", "/buscarPorNome?nome=borracha"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Nenhum resultado encontrado");
}

#[tokio::test]
async fn test_search_without_name_is_bad_request() {
    let (app, _) = app();

    let response = app.oneshot(empty_request("GET", "/buscarPorNome")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_count_by_quantity() {
    let (app, service) = app();
    for (name, qty) in [("Caneta", 1), ("Lápis", 5), ("Caderno", 10)] {
        seed(&service, name, qty).await;
    }

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/contarPorQuantidade/5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        text_body(response.into_body()).await,
        "Existem 2 de produtos com estoque 5"
    );

    let response = app
        .oneshot(empty_request("GET", "/contarPorQuantidade/0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

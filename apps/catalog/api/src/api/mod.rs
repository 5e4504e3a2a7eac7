//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Routes nested under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/produtos", products::router(state))
}

/// Create the `produto` table when missing
pub async fn init_schema(state: &AppState) -> eyre::Result<()> {
    products::init_schema(state).await
}

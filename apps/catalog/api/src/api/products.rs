//! Products API routes

use axum::Router;
use domain_products::{handlers, PgProductRepository, ProductService};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = ProductService::new(repository);
    handlers::router(service)
}

pub async fn init_schema(state: &AppState) -> eyre::Result<()> {
    let repository = PgProductRepository::new(state.db.clone());
    repository.ensure_schema().await?;
    Ok(())
}

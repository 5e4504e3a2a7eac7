//! Readiness endpoint

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use database::postgres::{check_health, DatabaseConnection};

async fn ready(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    let database: HealthCheckFuture<'_> =
        Box::pin(async { check_health(&db).await.map_err(|e| e.to_string()) });

    run_health_checks(vec![("database", database)]).await
}

/// `GET /ready`: 200 when the database answers, 503 otherwise
pub fn router(db: DatabaseConnection) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
